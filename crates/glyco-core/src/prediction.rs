//! Submission outcomes and the request lifecycle state machine.
//!
//! `SubmissionState` moves `Idle → Submitting → Settled`, and any new
//! submission re-enters `Submitting` from wherever it is. Every submission
//! carries a [`SubmissionToken`]; the [`SettlePolicy`] decides whether a
//! response for an older token may still overwrite the state.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::fields::FieldName;

pub const NETWORK_ERROR_PREFIX: &str = "Network error: ";
pub const MALFORMED_PREFIX: &str = "Malformed response from server: ";

/// Why a submission attempt failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FailureKind {
    /// The request never reached the service or the response never arrived.
    Transport,
    /// The service answered with a non-success status.
    Server { status: u16 },
    /// A success status with a body that is not `{prediction, probability}`.
    MalformedResponse,
    /// Rejected locally before sending.
    InvalidInput,
    /// The payload could not be encoded as a request body.
    Encoding,
}

/// Outcome of one submission attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PredictionResult {
    Success { prediction: i64, probability: f64 },
    Failure { kind: FailureKind, message: String },
}

impl PredictionResult {
    pub fn success(prediction: i64, probability: f64) -> Self {
        PredictionResult::Success {
            prediction,
            probability,
        }
    }

    pub fn transport(description: impl fmt::Display) -> Self {
        PredictionResult::Failure {
            kind: FailureKind::Transport,
            message: format!("{NETWORK_ERROR_PREFIX}{description}"),
        }
    }

    /// Server failure, using `detail` when the body carried one.
    pub fn server(status: u16, detail: Option<String>) -> Self {
        PredictionResult::Failure {
            kind: FailureKind::Server { status },
            message: detail.unwrap_or_else(|| format!("Server returned {status}")),
        }
    }

    pub fn malformed(description: impl fmt::Display) -> Self {
        PredictionResult::Failure {
            kind: FailureKind::MalformedResponse,
            message: format!("{MALFORMED_PREFIX}{description}"),
        }
    }

    pub fn encoding(description: impl fmt::Display) -> Self {
        PredictionResult::Failure {
            kind: FailureKind::Encoding,
            message: format!("Could not encode request: {description}"),
        }
    }

    pub fn invalid_input(fields: &[FieldName]) -> Self {
        let labels = fields
            .iter()
            .map(|f| f.label())
            .collect::<Vec<_>>()
            .join(", ");
        PredictionResult::Failure {
            kind: FailureKind::InvalidInput,
            message: format!("Please enter a numeric value for: {labels}"),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, PredictionResult::Success { .. })
    }

    pub fn failure_message(&self) -> Option<&str> {
        match self {
            PredictionResult::Failure { message, .. } => Some(message),
            PredictionResult::Success { .. } => None,
        }
    }
}

/// Monotonically increasing tag for one submission. The first is 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SubmissionToken(pub u64);

impl SubmissionToken {
    pub fn next(self) -> Self {
        SubmissionToken(self.0 + 1)
    }
}

impl fmt::Display for SubmissionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// How a settle for a superseded token is treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettlePolicy {
    /// Only the most recently issued token may settle the state.
    #[default]
    LatestOnly,
    /// Every settle overwrites the state; the last response to arrive wins.
    LastWriteWins,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionEvent {
    Begin(SubmissionToken),
    Settle(SubmissionToken, PredictionResult),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum SubmissionState {
    #[default]
    Idle,
    Submitting {
        token: SubmissionToken,
    },
    Settled {
        token: SubmissionToken,
        result: PredictionResult,
    },
}

impl SubmissionState {
    /// Token of the submission this state belongs to, if any.
    pub fn token(&self) -> Option<SubmissionToken> {
        match self {
            SubmissionState::Idle => None,
            SubmissionState::Submitting { token } | SubmissionState::Settled { token, .. } => {
                Some(*token)
            }
        }
    }

    /// True in `Submitting`. Under [`SettlePolicy::LastWriteWins`] a stale
    /// settle can leave this false while a newer submission is still out;
    /// callers that issue tokens track the latest one themselves.
    pub fn is_busy(&self) -> bool {
        matches!(self, SubmissionState::Submitting { .. })
    }

    pub fn result(&self) -> Option<&PredictionResult> {
        match self {
            SubmissionState::Settled { result, .. } => Some(result),
            _ => None,
        }
    }

    /// Apply `event`, returning `false` when the policy discards it.
    ///
    /// `Begin` is always accepted and clears any previous result. Under
    /// [`SettlePolicy::LatestOnly`] a `Settle` is accepted only while the
    /// state is `Submitting` for that same token.
    pub fn apply(&mut self, event: SubmissionEvent, policy: SettlePolicy) -> bool {
        match event {
            SubmissionEvent::Begin(token) => {
                *self = SubmissionState::Submitting { token };
                true
            }
            SubmissionEvent::Settle(token, result) => {
                let accept = match policy {
                    SettlePolicy::LastWriteWins => true,
                    SettlePolicy::LatestOnly => {
                        matches!(self, SubmissionState::Submitting { token: current } if *current == token)
                    }
                };
                if accept {
                    *self = SubmissionState::Settled { token, result };
                }
                accept
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_messages() {
        assert_eq!(
            PredictionResult::server(400, Some("Glucose must be positive".into()))
                .failure_message(),
            Some("Glucose must be positive")
        );
        assert_eq!(
            PredictionResult::server(500, None).failure_message(),
            Some("Server returned 500")
        );
        let transport = PredictionResult::transport("connection refused");
        assert_eq!(
            transport.failure_message(),
            Some("Network error: connection refused")
        );
        let encoding = PredictionResult::encoding("key must be a string");
        assert!(matches!(
            encoding,
            PredictionResult::Failure { kind: FailureKind::Encoding, .. }
        ));
        assert_eq!(
            encoding.failure_message(),
            Some("Could not encode request: key must be a string")
        );
        let invalid = PredictionResult::invalid_input(&[FieldName::Glucose, FieldName::Age]);
        assert_eq!(
            invalid.failure_message(),
            Some("Please enter a numeric value for: Glucose Level (mg/dL), Age (years)")
        );
    }

    #[test]
    fn lifecycle_idle_submitting_settled() {
        let mut state = SubmissionState::default();
        assert_eq!(state, SubmissionState::Idle);
        assert!(!state.is_busy());

        let t1 = SubmissionToken(1);
        assert!(state.apply(SubmissionEvent::Begin(t1), SettlePolicy::LatestOnly));
        assert!(state.is_busy());
        assert_eq!(state.result(), None);

        let ok = PredictionResult::success(1, 0.83);
        assert!(state.apply(SubmissionEvent::Settle(t1, ok.clone()), SettlePolicy::LatestOnly));
        assert!(!state.is_busy());
        assert_eq!(state.result(), Some(&ok));

        // resubmission clears the previous result
        let t2 = t1.next();
        assert!(state.apply(SubmissionEvent::Begin(t2), SettlePolicy::LatestOnly));
        assert_eq!(state, SubmissionState::Submitting { token: t2 });
    }

    #[test]
    fn latest_only_discards_stale_settles() {
        let mut state = SubmissionState::Idle;
        let (t1, t2) = (SubmissionToken(1), SubmissionToken(2));
        state.apply(SubmissionEvent::Begin(t1), SettlePolicy::LatestOnly);
        state.apply(SubmissionEvent::Begin(t2), SettlePolicy::LatestOnly);

        let second = PredictionResult::success(0, 0.12);
        assert!(state.apply(SubmissionEvent::Settle(t2, second.clone()), SettlePolicy::LatestOnly));

        let first = PredictionResult::success(1, 0.83);
        assert!(!state.apply(SubmissionEvent::Settle(t1, first), SettlePolicy::LatestOnly));
        assert_eq!(state.result(), Some(&second));
        assert_eq!(state.token(), Some(t2));
    }

    #[test]
    fn last_write_wins_accepts_stale_settles() {
        let mut state = SubmissionState::Idle;
        let (t1, t2) = (SubmissionToken(1), SubmissionToken(2));
        state.apply(SubmissionEvent::Begin(t1), SettlePolicy::LastWriteWins);
        state.apply(SubmissionEvent::Begin(t2), SettlePolicy::LastWriteWins);
        state.apply(
            SubmissionEvent::Settle(t2, PredictionResult::success(0, 0.12)),
            SettlePolicy::LastWriteWins,
        );

        let first = PredictionResult::success(1, 0.83);
        assert!(state.apply(SubmissionEvent::Settle(t1, first.clone()), SettlePolicy::LastWriteWins));
        assert_eq!(state.result(), Some(&first));
        assert_eq!(state.token(), Some(t1));
    }

    #[test]
    fn serializes_with_outcome_tag() {
        let json = serde_json::to_value(PredictionResult::server(422, None)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "outcome": "failure",
                "kind": { "type": "server", "status": 422 },
                "message": "Server returned 422",
            })
        );
    }
}
