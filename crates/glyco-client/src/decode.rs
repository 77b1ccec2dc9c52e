//! Turning an [`HttpReply`] into a [`PredictionResult`].
//!
//! Success bodies must be `{prediction, probability}`. Error bodies are
//! decoded best-effort for a `detail` message: a string is used as-is, a
//! list of validation entries is flattened, and anything else falls back
//! to `Server returned <status>`.

use glyco_core::prediction::PredictionResult;
use serde::Deserialize;

use crate::transport::HttpReply;

#[derive(Debug, Deserialize)]
struct PredictionBody {
    prediction: i64,
    probability: f64,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<Detail>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Detail {
    Message(String),
    Validation(Vec<ValidationEntry>),
    Other(serde_json::Value),
}

#[derive(Debug, Deserialize)]
struct ValidationEntry {
    #[serde(default)]
    loc: Vec<serde_json::Value>,
    msg: String,
}

impl ValidationEntry {
    fn describe(&self) -> String {
        match self.loc.last() {
            Some(serde_json::Value::String(field)) => format!("{field}: {}", self.msg),
            Some(other) if !other.is_null() => format!("{other}: {}", self.msg),
            _ => self.msg.clone(),
        }
    }
}

pub fn decode_reply(reply: &HttpReply) -> PredictionResult {
    if reply.is_success() {
        decode_prediction(&reply.body)
    } else {
        PredictionResult::server(reply.status, decode_detail(&reply.body))
    }
}

pub fn decode_prediction(body: &[u8]) -> PredictionResult {
    match serde_json::from_slice::<PredictionBody>(body) {
        Ok(p) => PredictionResult::success(p.prediction, p.probability),
        Err(e) => PredictionResult::malformed(e),
    }
}

/// Best-effort `detail` extraction. `None` means use the generic message.
pub fn decode_detail(body: &[u8]) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_slice(body).ok()?;
    match parsed.detail? {
        Detail::Message(message) if !message.trim().is_empty() => Some(message),
        Detail::Validation(entries) if !entries.is_empty() => Some(
            entries
                .iter()
                .map(ValidationEntry::describe)
                .collect::<Vec<_>>()
                .join("; "),
        ),
        _ => None,
    }
}
