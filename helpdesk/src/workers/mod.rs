//! Worker implementations for helpdesk supervisors.

pub mod base;
pub mod helper;
pub mod pool;
pub mod seeker;
