//! End-to-end tests for `UreqTransport` against a local axum service that
//! mimics the prediction API.

use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use glyco_client::config::ClientConfig;
use glyco_client::controller::SubmissionController;
use glyco_client::health::check_health;
use glyco_client::transport::UreqTransport;
use glyco_core::fields::FieldName;
use glyco_core::form::FormValues;
use glyco_core::payload::{PayloadBuilder, PermissiveBuilder};
use glyco_core::prediction::{FailureKind, PredictionResult};
use serde_json::{json, Value};

type Seen = Arc<Mutex<Option<Value>>>;

async fn serve(router: Router) -> ClientConfig {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    ClientConfig::new(&format!("http://{addr}")).unwrap()
}

fn controller(config: ClientConfig) -> SubmissionController {
    SubmissionController::new(Arc::new(UreqTransport::new()), config)
}

fn form() -> FormValues {
    let mut form = FormValues::new();
    let texts = ["6", "148", "72", "35", "0", "33.6", "0.627", "50"];
    for (field, text) in FieldName::ALL.into_iter().zip(texts) {
        form.set_value(field, text);
    }
    form
}

/// Rejects nulls the way a FastAPI model with float fields does.
async fn predict(State(seen): State<Seen>, Json(body): Json<Value>) -> Response {
    *seen.lock().unwrap() = Some(body.clone());

    let errors: Vec<Value> = FieldName::ALL
        .iter()
        .filter(|f| !body[f.as_str()].is_number())
        .map(|f| {
            json!({
                "type": "float_type",
                "loc": ["body", f.as_str()],
                "msg": "Input should be a valid number",
            })
        })
        .collect();
    if !errors.is_empty() {
        return (StatusCode::UNPROCESSABLE_ENTITY, Json(json!({ "detail": errors }))).into_response();
    }

    let high = body["Glucose"].as_f64().unwrap_or_default() > 140.0;
    let reply = if high {
        json!({ "prediction": 1, "probability": 0.83 })
    } else {
        json!({ "prediction": 0, "probability": 0.12 })
    };
    Json(reply).into_response()
}

fn prediction_service(seen: Seen) -> Router {
    Router::new()
        .route("/", get(|| async { Json(json!({ "status": "OK" })) }))
        .route("/predict", post(predict))
        .with_state(seen)
}

#[tokio::test(flavor = "multi_thread")]
async fn posts_json_and_decodes_prediction() {
    let seen = Seen::default();
    let config = serve(prediction_service(seen.clone())).await;

    let payload = PermissiveBuilder.build(&form()).unwrap();
    let result = controller(config).submit(&payload).await;

    assert_eq!(result, PredictionResult::success(1, 0.83));
    let body = seen.lock().unwrap().clone().unwrap();
    assert_eq!(body["Pregnancies"], 6.0);
    assert_eq!(body["DiabetesPedigreeFunction"], 0.627);
    assert_eq!(body.as_object().unwrap().len(), 8);
}

#[tokio::test(flavor = "multi_thread")]
async fn null_entries_are_rejected_by_service() {
    let seen = Seen::default();
    let config = serve(prediction_service(seen.clone())).await;

    let mut form = form();
    form.set_value(FieldName::Glucose, "");
    form.set_value(FieldName::Age, "old");
    let payload = PermissiveBuilder.build(&form).unwrap();
    let result = controller(config).submit(&payload).await;

    assert_eq!(
        result,
        PredictionResult::Failure {
            kind: FailureKind::Server { status: 422 },
            message: "Glucose: Input should be a valid number; Age: Input should be a valid number"
                .to_string(),
        }
    );
    let body = seen.lock().unwrap().clone().unwrap();
    assert!(body["Glucose"].is_null());
    assert!(body["Age"].is_null());
}

#[tokio::test(flavor = "multi_thread")]
async fn bad_request_detail() {
    let router = Router::new().route(
        "/predict",
        post(|| async {
            (
                StatusCode::BAD_REQUEST,
                Json(json!({ "detail": "Glucose must be positive" })),
            )
        }),
    );
    let config = serve(router).await;

    let payload = PermissiveBuilder.build(&form()).unwrap();
    let result = controller(config).submit(&payload).await;

    assert_eq!(result.failure_message(), Some("Glucose must be positive"));
}

#[tokio::test(flavor = "multi_thread")]
async fn internal_error_without_json() {
    let router = Router::new().route(
        "/predict",
        post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error") }),
    );
    let config = serve(router).await;

    let payload = PermissiveBuilder.build(&form()).unwrap();
    let result = controller(config).submit(&payload).await;

    assert_eq!(result.failure_message(), Some("Server returned 500"));
}

#[tokio::test(flavor = "multi_thread")]
async fn malformed_success_body() {
    let router = Router::new().route(
        "/predict",
        post(|| async { Json(json!({ "label": "diabetic" })) }),
    );
    let config = serve(router).await;

    let payload = PermissiveBuilder.build(&form()).unwrap();
    let result = controller(config).submit(&payload).await;

    assert!(matches!(
        result,
        PredictionResult::Failure { kind: FailureKind::MalformedResponse, .. }
    ));
}

#[tokio::test(flavor = "multi_thread")]
async fn connection_refused_is_network_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let config = ClientConfig::new(&format!("http://{addr}")).unwrap();

    let payload = PermissiveBuilder.build(&form()).unwrap();
    let result = controller(config).submit(&payload).await;

    match result {
        PredictionResult::Failure {
            kind: FailureKind::Transport,
            message,
        } => {
            assert!(message.starts_with("Network error: "), "{message}");
            assert!(message.len() > "Network error: ".len(), "{message}");
        }
        other => panic!("expected transport failure, got {other:?}"),
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn health_check() {
    let config = serve(prediction_service(Seen::default())).await;
    let transport = UreqTransport::new();

    let health = check_health(&transport, &config).await;
    assert!(health.ok);
    assert_eq!(health.status, "OK");

    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let down = ClientConfig::new(&format!("http://{addr}")).unwrap();
    let health = check_health(&transport, &down).await;
    assert!(!health.ok);
    assert!(health.status.starts_with("unreachable: "), "{}", health.status);
}
