//! Roads of Babel pricing core.
//!
//! The `babel` binary is a thin command-line wrapper; the engine itself
//! (`domain`) is plain synchronous code meant to be called in-process.

pub mod app;
pub mod config;
pub mod domain;
pub mod infra;
pub mod util;
