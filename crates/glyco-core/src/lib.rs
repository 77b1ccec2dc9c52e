//! glyco-core
//!
//! Pure domain types for the diabetes risk intake form: the field schema,
//! the textual form store, payload coercion, the submission state machine,
//! and result interpretation. No network dependency.

pub mod error;
pub mod fields;
pub mod form;
pub mod interpret;
pub mod payload;
pub mod prediction;
