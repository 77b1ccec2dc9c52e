use thiserror::Error;

use crate::fields::FieldName;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("unknown field: {0}")]
    UnknownField(String),

    #[error("expected FIELD=VALUE, got `{0}`")]
    MalformedAssignment(String),

    #[error("invalid numeric input for: {}", join_fields(.0))]
    InvalidFields(Vec<FieldName>),
}

fn join_fields(fields: &[FieldName]) -> String {
    fields
        .iter()
        .map(|f| f.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
