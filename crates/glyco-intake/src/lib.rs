//! glyco-intake library root.
//!
//! The terminal intake form: session wiring, argument and prompt intake,
//! and text rendering. Exposed as a library so integration tests can drive
//! a session without a terminal.

pub mod cli;
pub mod render;
pub mod session;
