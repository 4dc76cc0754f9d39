use std::path::PathBuf;
use crate::features::FeatureConfig;
use crate::model::{LightGinConfig, DEFAULT_WEIGHTS_PATH};

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_ALLOWED_ORIGINS: [&str; 2] = ["http://localhost:3000", "http://127.0.0.1:3000"];

/// Everything `serve` needs to start; immutable once the server runs.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub weights: PathBuf,
    pub allowed_origins: Vec<String>,
    pub features: FeatureConfig,
    pub model: LightGinConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            weights: PathBuf::from(DEFAULT_WEIGHTS_PATH),
            allowed_origins: DEFAULT_ALLOWED_ORIGINS.iter().map(|o| o.to_string()).collect(),
            features: FeatureConfig::default(),
            model: LightGinConfig::default(),
        }
    }
}

impl ServerConfig {
    /// The preprocessor has to emit exactly as many columns as the model reads.
    pub fn validate(&self) -> anyhow::Result<()> {
        self.features.validate()?;
        if self.features.feature_width != self.model.feature_width {
            return Err(anyhow::anyhow!(
                "Feature width {} does not match the model input width {}",
                self.features.feature_width, self.model.feature_width
            ));
        }
        Ok(())
    }
}
