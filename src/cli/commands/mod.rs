//! CLI command implementations

pub mod completions;
pub mod config;
pub mod groups;
pub mod plan;
pub mod renumber;
pub mod run;
