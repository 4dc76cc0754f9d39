//! HTTP surface: `POST /predict` and `GET /health`.
//!
//! The model is loaded before the router is built and handed to every
//! handler through [`AppState`]; handlers never mutate it. Each request
//! preprocesses and classifies its own graph on a blocking worker thread.

use std::sync::Arc;
use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, DefaultBodyLimit, State},
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tower_http::cors::{AllowOrigin, CorsLayer};
use crate::config::ServerConfig;
use crate::errors::{InferenceError, PredictError, ValidationError};
use crate::features::{preprocess_edgelist, FeatureConfig};
use crate::model::{LightGin, Prediction};

/// Largest request body read by `/predict`, in bytes.
pub const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    model: Arc<LightGin>,
    features: FeatureConfig,
}

impl AppState {
    pub fn new(model: Arc<LightGin>, features: FeatureConfig) -> Self {
        AppState { model, features }
    }

    fn predict(&self, edgelist: &str) -> Result<Prediction, PredictError> {
        let input = preprocess_edgelist(edgelist, &self.features)?;
        let prediction = self.model.predict(&input)?;
        Ok(prediction)
    }
}

#[derive(Debug, serde::Deserialize)]
struct PredictRequest {
    #[serde(default)]
    edgelist: Option<serde_json::Value>,
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct PredictResponse {
    pub prediction: usize,
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub classes: usize,
    pub feature_width: usize,
}

pub fn router(state: AppState, allowed_origins: &[String]) -> anyhow::Result<Router> {
    let app = Router::new()
        .route("/predict", post(predict_handler))
        .route("/health", get(health_handler))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(cors_layer(allowed_origins)?)
        .with_state(state);
    Ok(app)
}

fn cors_layer(allowed_origins: &[String]) -> anyhow::Result<CorsLayer> {
    let origins = allowed_origins.iter()
        .map(|origin| HeaderValue::from_str(origin)
            .map_err(|e| anyhow::anyhow!("Invalid CORS origin {:?}: {}", origin, e)))
        .collect::<anyhow::Result<Vec<_>>>()?;
    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]))
}

pub async fn serve(config: ServerConfig, model: Arc<LightGin>) -> anyhow::Result<()> {
    config.validate()?;
    let app = router(AppState::new(model, config.features), &config.allowed_origins)?;
    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port)).await?;
    log::info!("Listening on http://{}", listener.local_addr()?);
    log::info!("  - Prediction endpoint: POST /predict");
    log::info!("  - Health endpoint:     GET /health");
    axum::serve(listener, app).await?;
    Ok(())
}

/// Extracts the edge list text; falsy values count as missing.
fn edgelist_text(value: Option<serde_json::Value>) -> Result<String, PredictError> {
    use serde_json::Value;
    match value {
        None | Some(Value::Null) | Some(Value::Bool(false)) => Err(ValidationError::MissingEdgelist.into()),
        Some(Value::String(s)) if s.is_empty() => Err(ValidationError::MissingEdgelist.into()),
        Some(Value::String(s)) => Ok(s),
        Some(Value::Array(a)) if a.is_empty() => Err(ValidationError::MissingEdgelist.into()),
        Some(Value::Object(o)) if o.is_empty() => Err(ValidationError::MissingEdgelist.into()),
        Some(Value::Number(n)) if n.as_f64() == Some(0.0) => Err(ValidationError::MissingEdgelist.into()),
        Some(other) => Err(PredictError::MalformedInput {
            reason: format!("edgelist must be a string, got {}", other)
        }),
    }
}

async fn predict_handler(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<PredictResponse>, PredictError> {
    let body = body.map_err(body_error)?;
    let request: PredictRequest = serde_json::from_slice(&body)
        .map_err(|e| ValidationError::InvalidBody { reason: e.to_string() })?;
    let edgelist = edgelist_text(request.edgelist)?;
    log::debug!("Received edgelist: {}", edgelist);

    let prediction = tokio::task::spawn_blocking(move || state.predict(&edgelist))
        .await
        .map_err(|e| InferenceError::WorkerFailed { reason: e.to_string() })??;
    log::info!(
        "Predicted class {} ({}) with probabilities {:?}",
        prediction.class,
        prediction.label().unwrap_or("unknown"),
        prediction.probabilities
    );
    Ok(Json(PredictResponse { prediction: prediction.class }))
}

fn body_error(rejection: BytesRejection) -> PredictError {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ValidationError::BodyTooLarge { reason: rejection.body_text() }.into()
    } else {
        ValidationError::InvalidBody { reason: rejection.body_text() }.into()
    }
}

async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let config = state.model.config();
    Json(HealthResponse {
        status: "ok".to_string(),
        classes: config.classes,
        feature_width: config.feature_width,
    })
}

impl PredictError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            PredictError::MissingEdgelist
            | PredictError::EmptyGraph
            | PredictError::InvalidBody { .. }
            | PredictError::TooManyNodes { .. }
            | PredictError::FeatureWidth { .. } => StatusCode::BAD_REQUEST,
            PredictError::BodyTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            PredictError::MalformedInput { .. }
            | PredictError::ShapeMismatch { .. }
            | PredictError::WorkerFailed { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for PredictError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            log::error!("Prediction failed: {}", self);
        } else {
            log::warn!("Rejected request: {}", self);
        }
        (status, Json(ErrorResponse { error: self.to_string() })).into_response()
    }
}
