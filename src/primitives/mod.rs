//! Low-level text primitives
//!
//! Span bookkeeping and prompt recognition with no knowledge of sessions.

pub mod prompt;
pub mod text_property;
