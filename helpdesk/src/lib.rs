pub mod concurrency;
pub mod error;
mod macros;
pub mod observer;
pub mod room;
pub mod state;
pub mod supervisor;
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
pub mod types;
pub mod workers;
