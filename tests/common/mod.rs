#![allow(dead_code)]

use std::sync::Arc;
use axum::body::Body;
use axum::http::{Request, Response};
use http_body_util::BodyExt;
use lightgin_server::config::DEFAULT_ALLOWED_ORIGINS;
use lightgin_server::features::FeatureConfig;
use lightgin_server::model::{DenseWeights, GinWeights, LightGin, LightGinConfig, ModelWeights};
use lightgin_server::server::{router, AppState};

/// Hand-set weights with a predictable arg-max.
///
/// Unit 0 carries the degree signal and unit 1 the clustering signal through
/// both GIN layers. The head scores class 0 with a constant 5, class 1 with
/// twice the clustering unit and class 2 with half the degree unit.
pub fn fixture_weights() -> ModelWeights {
    let config = LightGinConfig::default();
    let mut gin1 = vec![vec![0.0; config.hidden]; config.feature_width];
    gin1[0][0] = 1.0;
    gin1[1][1] = 1.0;
    let mut gin2 = vec![vec![0.0; config.hidden]; config.hidden];
    gin2[0][0] = 1.0;
    gin2[1][1] = 1.0;
    let mut head = vec![vec![0.0; config.classes]; config.hidden];
    head[1][1] = 2.0;
    head[0][2] = 0.5;
    ModelWeights {
        gin1: GinWeights { epsilon: 0.0, kernel: gin1, bias: vec![0.0; config.hidden] },
        gin2: GinWeights { epsilon: 0.0, kernel: gin2, bias: vec![0.0; config.hidden] },
        output: DenseWeights { kernel: head, bias: vec![5.0, 0.0, 0.0] },
    }
}

pub fn write_weights(path: &std::path::Path, weights: &ModelWeights) {
    let file = std::fs::File::create(path).unwrap();
    serde_json::to_writer(file, weights).unwrap();
}

pub fn fixture_model() -> Arc<LightGin> {
    Arc::new(LightGin::from_weights(LightGinConfig::default(), &fixture_weights()).unwrap())
}

pub fn app() -> axum::Router {
    let origins: Vec<String> = DEFAULT_ALLOWED_ORIGINS.iter().map(|o| o.to_string()).collect();
    router(AppState::new(fixture_model(), FeatureConfig::default()), &origins).unwrap()
}

pub fn post_predict(body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/predict")
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap()
}

pub async fn json_body(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
