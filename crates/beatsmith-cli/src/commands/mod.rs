//! CLI command implementations

pub mod generate;
pub mod patterns;

mod json_output;
