use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::ClientConfig;
use crate::transport::PredictTransport;

/// Result of probing the service root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub ok: bool,
    /// Reported `status` value, HTTP status line, or transport error.
    pub status: String,
}

#[derive(Deserialize)]
struct HealthBody {
    status: String,
}

/// `GET {base}/`, healthy when the body is `{"status": "OK"}`.
pub async fn check_health(transport: &dyn PredictTransport, config: &ClientConfig) -> HealthStatus {
    let url = config.health_url();
    let health = match transport.get(&url).await {
        Ok(reply) if reply.is_success() => match serde_json::from_slice::<HealthBody>(&reply.body) {
            Ok(body) => HealthStatus {
                ok: body.status.eq_ignore_ascii_case("ok"),
                status: body.status,
            },
            Err(e) => HealthStatus {
                ok: false,
                status: format!("unexpected health body: {e}"),
            },
        },
        Ok(reply) => HealthStatus {
            ok: false,
            status: format!("Server returned {}", reply.status),
        },
        Err(e) => HealthStatus {
            ok: false,
            status: format!("unreachable: {e}"),
        },
    };

    if health.ok {
        info!(url = %url, "prediction service healthy");
    } else {
        warn!(url = %url, status = %health.status, "prediction service unhealthy");
    }
    health
}
