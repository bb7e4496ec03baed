//! Observable phase tracking for helpdesk workers.

pub mod helper;
pub mod seeker;
