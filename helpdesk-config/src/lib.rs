//! Configuration loading and shared configuration types for the helpdesk system.

mod environment;
mod load;
pub mod shared;

pub use environment::Environment;
pub use load::{Config, LoadConfigError, load_config};
