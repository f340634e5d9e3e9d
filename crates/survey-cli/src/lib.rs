//! CLI library components for the survey tool.

pub mod logging;
pub mod pipeline;
