//! Beatsmith CLI library.
//!
//! Command implementations live here so they can be exercised directly in
//! tests; `main.rs` only parses arguments and dispatches.

pub mod commands;
