//! Session services and process-level integrations
//!
//! Everything that keeps state about the managed shell process lives here,
//! along with the logging setup used by the binary.

pub mod log_dirs;
pub mod repl;
pub mod tracing_setup;
