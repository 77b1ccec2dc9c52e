use std::future::Future;
use std::pin::Pin;

use thiserror::Error;
use tracing::debug;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Status and raw body of an HTTP response, whatever the status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// No response was obtained: connection, DNS, TLS, or body read failure.
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct TransportError(pub String);

impl From<ureq::Error> for TransportError {
    fn from(e: ureq::Error) -> Self {
        TransportError(e.to_string())
    }
}

/// HTTP seam between the controller and the network.
///
/// Non-success statuses are replies, not errors. Methods return boxed
/// futures for dyn compatibility.
pub trait PredictTransport: Send + Sync {
    fn post_json<'a>(
        &'a self,
        url: &'a str,
        body: Vec<u8>,
    ) -> BoxFuture<'a, Result<HttpReply, TransportError>>;

    fn get<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<HttpReply, TransportError>>;
}

/// Blocking `ureq` agent driven from tokio's blocking pool.
///
/// No timeout is configured: a request waits until it gets a response or
/// the connection fails.
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl UreqTransport {
    pub fn new() -> Self {
        let config = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build();
        Self {
            agent: ureq::Agent::new_with_config(config),
        }
    }

    async fn run<F>(&self, call: F) -> Result<HttpReply, TransportError>
    where
        F: FnOnce(ureq::Agent) -> Result<HttpReply, TransportError> + Send + 'static,
    {
        let agent = self.agent.clone();
        tokio::task::spawn_blocking(move || call(agent))
            .await
            .map_err(|e| TransportError(format!("request task failed: {e}")))?
    }
}

fn read_reply(mut resp: ureq::http::Response<ureq::Body>) -> Result<HttpReply, TransportError> {
    let status = resp.status().as_u16();
    let body = resp.body_mut().read_to_vec()?;
    debug!(status, body_len = body.len(), "received reply");
    Ok(HttpReply { status, body })
}

impl PredictTransport for UreqTransport {
    fn post_json<'a>(
        &'a self,
        url: &'a str,
        body: Vec<u8>,
    ) -> BoxFuture<'a, Result<HttpReply, TransportError>> {
        let url = url.to_string();
        Box::pin(self.run(move |agent| {
            let resp = agent
                .post(&url)
                .header("Content-Type", "application/json")
                .send(&body[..])?;
            read_reply(resp)
        }))
    }

    fn get<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<HttpReply, TransportError>> {
        let url = url.to_string();
        Box::pin(self.run(move |agent| {
            let resp = agent.get(&url).call()?;
            read_reply(resp)
        }))
    }
}
