//! Core data model for REPL buffers

pub mod buffer;
