use std::sync::Arc;

use glyco_core::payload::Payload;
use glyco_core::prediction::{
    PredictionResult, SettlePolicy, SubmissionEvent, SubmissionState, SubmissionToken,
};
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::config::ClientConfig;
use crate::decode::decode_reply;
use crate::transport::PredictTransport;

struct Lifecycle {
    state: SubmissionState,
    last_token: SubmissionToken,
    /// Whether `last_token` has had its reply, whatever the policy did with it.
    latest_settled: bool,
}

/// Owns the submission state machine and talks to the prediction service.
///
/// Cloning shares the same state. `submit` never rejects a call while
/// another is outstanding; [`is_busy`](Self::is_busy) is advisory for the
/// UI trigger.
#[derive(Clone)]
pub struct SubmissionController {
    transport: Arc<dyn PredictTransport>,
    config: ClientConfig,
    policy: SettlePolicy,
    lifecycle: Arc<Mutex<Lifecycle>>,
}

impl SubmissionController {
    pub fn new(transport: Arc<dyn PredictTransport>, config: ClientConfig) -> Self {
        Self {
            transport,
            config,
            policy: SettlePolicy::default(),
            lifecycle: Arc::new(Mutex::new(Lifecycle {
                state: SubmissionState::Idle,
                last_token: SubmissionToken(0),
                latest_settled: true,
            })),
        }
    }

    pub fn with_policy(mut self, policy: SettlePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn policy(&self) -> SettlePolicy {
        self.policy
    }

    pub fn transport(&self) -> &dyn PredictTransport {
        self.transport.as_ref()
    }

    pub async fn state(&self) -> SubmissionState {
        self.lifecycle.lock().await.state.clone()
    }

    /// True while the most recently issued submission has no reply yet.
    pub async fn is_busy(&self) -> bool {
        !self.lifecycle.lock().await.latest_settled
    }

    /// Send `payload` to `POST {base}/predict` and settle the state.
    ///
    /// Always returns this call's own outcome, even when the policy
    /// discards it from [`SubmissionState`] because a newer submission
    /// started in the meantime.
    pub async fn submit(&self, payload: &Payload) -> PredictionResult {
        let token = self.begin().await;

        let result = match payload.to_json() {
            Ok(body) => {
                debug!(%token, payload = %body, "submitting payload");
                let url = self.config.predict_url();
                match self.transport.post_json(&url, body.into_bytes()).await {
                    Ok(reply) => {
                        info!(%token, status = reply.status, "prediction service replied");
                        decode_reply(&reply)
                    }
                    Err(e) => {
                        warn!(%token, error = %e, "prediction request failed");
                        PredictionResult::transport(e)
                    }
                }
            }
            Err(e) => {
                error!(%token, error = %e, "payload encoding failed");
                PredictionResult::encoding(e)
            }
        };

        self.settle(token, result.clone()).await;
        result
    }

    async fn begin(&self) -> SubmissionToken {
        let mut lifecycle = self.lifecycle.lock().await;
        let token = lifecycle.last_token.next();
        lifecycle.last_token = token;
        lifecycle.latest_settled = false;
        lifecycle.state.apply(SubmissionEvent::Begin(token), self.policy);
        info!(%token, "submission started");
        token
    }

    async fn settle(&self, token: SubmissionToken, result: PredictionResult) -> bool {
        let mut lifecycle = self.lifecycle.lock().await;
        let success = result.is_success();
        if token == lifecycle.last_token {
            lifecycle.latest_settled = true;
        }
        let applied = lifecycle
            .state
            .apply(SubmissionEvent::Settle(token, result), self.policy);
        if applied {
            info!(%token, success, "submission settled");
        } else {
            warn!(
                %token,
                latest = %lifecycle.last_token,
                "discarding response for superseded submission"
            );
        }
        applied
    }
}
