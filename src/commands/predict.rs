use std::path::PathBuf;
use lightgin_server::features::{preprocess_edgelist, FeatureConfig};
use lightgin_server::model::{LightGin, LightGinConfig};

#[derive(Debug, serde::Serialize)]
struct PredictionReport {
    prediction: usize,
    label: Option<&'static str>,
    probabilities: Vec<f32>,
}

pub fn predict(edgelist: String, weights: PathBuf) -> anyhow::Result<()> {
    let config = LightGinConfig::default();
    let model = LightGin::load(&weights, config)?;
    let features = FeatureConfig { feature_width: config.feature_width, ..FeatureConfig::default() };
    let input = preprocess_edgelist(&edgelist, &features)?;
    let prediction = model.predict(&input)?;
    let report = PredictionReport {
        prediction: prediction.class,
        label: prediction.label(),
        probabilities: prediction.probabilities,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
