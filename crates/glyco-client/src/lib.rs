//! glyco-client
//!
//! Submission lifecycle against the remote prediction service: HTTP
//! transport, response decoding, and the submission controller.

pub mod config;
pub mod controller;
pub mod decode;
pub mod error;
pub mod health;
pub mod transport;
