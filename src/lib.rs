// REPL field classifier library - exposes all core modules for the binary and tests

pub mod config;
pub mod model;
pub mod primitives;
pub mod services;
pub mod transcript;
