use helpdesk::error::HelpdeskError;
use std::backtrace::Backtrace;
use std::error::Error;
use std::fmt;

/// Returns whether terminal output should include backtraces.
fn should_render_backtrace() -> bool {
    matches!(
        std::env::var("RUST_BACKTRACE").as_deref(),
        Ok("1") | Ok("full")
    )
}

/// Result type for simulator operations.
pub type SimulatorResult<T> = Result<T, SimulatorError>;

/// Captured backtrace wrapper to avoid thiserror's unstable feature detection.
pub struct CapturedBacktrace(Backtrace);

impl CapturedBacktrace {
    /// Captures a new backtrace for an error variant.
    fn capture() -> Self {
        Self(Backtrace::capture())
    }
}

impl fmt::Debug for CapturedBacktrace {
    /// Renders the wrapped backtrace for debugging output.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error type for the simulator service.
///
/// Wraps [`HelpdeskError`] for supervisor errors and provides variants for
/// infrastructure errors.
#[derive(Debug)]
pub enum SimulatorError {
    /// Supervisor or worker-related error.
    Helpdesk(HelpdeskError),
    /// Configuration error.
    Config(Box<dyn Error + Send + Sync>, CapturedBacktrace),
    /// I/O error.
    Io(std::io::Error, CapturedBacktrace),
}

impl SimulatorError {
    /// Returns a short category label for this error.
    pub fn category(&self) -> &'static str {
        match self {
            SimulatorError::Helpdesk(_) => "simulator error",
            SimulatorError::Config(_, _) => "configuration error",
            SimulatorError::Io(_, _) => "i/o error",
        }
    }

    /// Returns the backtrace for this error.
    pub fn backtrace(&self) -> Option<&Backtrace> {
        match self {
            SimulatorError::Helpdesk(err) => err.backtrace(),
            SimulatorError::Config(_, cb) => Some(&cb.0),
            SimulatorError::Io(_, cb) => Some(&cb.0),
        }
    }

    /// Creates a configuration error from any boxed source.
    pub fn config<E: Error + Send + Sync + 'static>(err: E) -> Self {
        SimulatorError::Config(Box::new(err), CapturedBacktrace::capture())
    }

    /// Returns a user-oriented report for terminal output.
    pub fn render_report(&self) -> String {
        let mut out = String::new();
        out.push_str("simulator failed\n");
        out.push_str(&format!("category: {}\n", self.category()));
        out.push_str(&format!("error: {}\n", self));

        if !matches!(self, SimulatorError::Helpdesk(err) if err.errors().is_some()) {
            let mut source = Error::source(self);
            let mut idx = 1usize;
            while let Some(err) = source {
                out.push_str(&format!("cause {idx}: {err}\n"));
                source = err.source();
                idx += 1;
            }
        }

        if should_render_backtrace()
            && let Some(backtrace) = self.backtrace()
        {
            out.push_str("backtrace:\n");
            out.push_str(&backtrace.to_string());
            if !out.ends_with('\n') {
                out.push('\n');
            }
        }

        out
    }
}

impl fmt::Display for SimulatorError {
    /// Renders a user-focused one-line description for terminal and log output.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimulatorError::Helpdesk(err) => write!(f, "{err}"),
            SimulatorError::Config(source, _) => write!(f, "configuration error: {source}"),
            SimulatorError::Io(source, _) => write!(f, "i/o error: {source}"),
        }
    }
}

impl Error for SimulatorError {
    /// Returns the direct cause for this error variant.
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            SimulatorError::Helpdesk(err) => err.source(),
            SimulatorError::Config(source, _) => Some(source.as_ref()),
            SimulatorError::Io(source, _) => Some(source),
        }
    }
}

impl From<std::io::Error> for SimulatorError {
    /// Converts an I/O error into an I/O error variant.
    fn from(err: std::io::Error) -> Self {
        SimulatorError::Io(err, CapturedBacktrace::capture())
    }
}

impl From<HelpdeskError> for SimulatorError {
    /// Converts a helpdesk error into a simulator error variant.
    fn from(err: HelpdeskError) -> Self {
        SimulatorError::Helpdesk(err)
    }
}
