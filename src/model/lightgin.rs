use std::path::Path;
use nalgebra::DMatrix;
use crate::edgelist::NodeId;
use crate::errors::{InferenceError, ModelLoadError};
use crate::features::{ModelInput, DEFAULT_FEATURE_WIDTH};
use crate::graph::SparseAdjacency;
use super::layers::{global_avg_pool, Activation, Dense, Dropout, GinConv};
use super::weights::{bias_vector, kernel_matrix, DenseWeights, GinWeights, ModelWeights};

/// Human readable names of the output classes, by class index.
pub const CLASS_LABELS: [&str; 3] = ["Tree", "Cycle", "DAG"];

const WARM_UP_NODES: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightGinConfig {
    pub feature_width: usize,
    pub hidden: usize,
    pub classes: usize,
    pub dropout: f32,
}

impl Default for LightGinConfig {
    fn default() -> Self {
        LightGinConfig {
            feature_width: DEFAULT_FEATURE_WIDTH,
            hidden: 32,
            classes: CLASS_LABELS.len(),
            dropout: 0.3,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub class: usize,
    pub probabilities: Vec<f32>,
}

impl Prediction {
    pub fn label(&self) -> Option<&'static str> {
        CLASS_LABELS.get(self.class).copied()
    }
}

/// Two GIN layers, global average pooling and a softmax head.
///
/// Immutable once built; share it behind an `Arc`.
#[derive(Debug, Clone)]
pub struct LightGin {
    config: LightGinConfig,
    gin1: GinConv,
    dropout: Dropout,
    gin2: GinConv,
    output: Dense,
}

impl LightGin {
    /// Loads weights from `path`, checks them against `config` and runs a
    /// warm-up pass before handing out the model.
    pub fn load(path: impl AsRef<Path>, config: LightGinConfig) -> Result<Self, ModelLoadError> {
        let path = path.as_ref();
        log::info!("Loading model weights from {}", path.display());
        let weights = ModelWeights::load_from_file(path)?;
        let model = Self::from_weights(config, &weights)?;
        model.warm_up()?;
        log::info!(
            "Model ready: {} features -> {} hidden -> {} classes",
            config.feature_width, config.hidden, config.classes
        );
        Ok(model)
    }

    pub fn from_weights(config: LightGinConfig, weights: &ModelWeights) -> Result<Self, ModelLoadError> {
        let gin1 = build_gin("gin1", &weights.gin1, config.feature_width, config.hidden)?;
        let gin2 = build_gin("gin2", &weights.gin2, config.hidden, config.hidden)?;
        let output = build_dense("output", &weights.output, config.hidden, config.classes, Activation::Softmax)?;
        Ok(LightGin {
            config,
            gin1,
            dropout: Dropout { rate: config.dropout },
            gin2,
            output,
        })
    }

    pub fn config(&self) -> &LightGinConfig {
        &self.config
    }

    fn warm_up(&self) -> Result<(), ModelLoadError> {
        let input = ModelInput {
            node_ids: (0..WARM_UP_NODES as i64).map(NodeId::Int).collect(),
            features: DMatrix::from_element(WARM_UP_NODES, self.config.feature_width, 0.5),
            adjacency: SparseAdjacency::identity(WARM_UP_NODES),
            batch: vec![0; WARM_UP_NODES],
        };
        let probabilities = self.forward(&input)
            .map_err(|e| ModelLoadError::WarmupFailed { reason: e.to_string() })?;
        if probabilities.iter().any(|p| !p.is_finite()) {
            return Err(ModelLoadError::WarmupFailed {
                reason: "model produced non-finite probabilities".to_string()
            });
        }
        Ok(())
    }

    fn check_input(&self, input: &ModelInput) -> Result<(), InferenceError> {
        let n = input.node_count();
        if n == 0 {
            return Err(InferenceError::EmptyGraph);
        }
        if input.features.ncols() != self.config.feature_width {
            return Err(InferenceError::ShapeMismatch {
                reason: format!(
                    "model expects {} features per node, got {}",
                    self.config.feature_width, input.features.ncols()
                )
            });
        }
        if input.adjacency.size() != n {
            return Err(InferenceError::ShapeMismatch {
                reason: format!("adjacency covers {} nodes, features cover {}", input.adjacency.size(), n)
            });
        }
        if input.batch.len() != n {
            return Err(InferenceError::ShapeMismatch {
                reason: format!("batch vector has {} entries for {} nodes", input.batch.len(), n)
            });
        }
        Ok(())
    }

    /// Class probabilities, one row per graph in the batch.
    pub fn forward(&self, input: &ModelInput) -> Result<DMatrix<f32>, InferenceError> {
        self.check_input(input)?;
        let x = self.gin1.forward(&input.features, &input.adjacency);
        let x = self.dropout.forward(x);
        let x = self.gin2.forward(&x, &input.adjacency);
        let pooled = global_avg_pool(&x, &input.batch, input.graph_count());
        Ok(self.output.forward(&pooled))
    }

    /// Arg-max class of the first graph in the batch.
    pub fn predict(&self, input: &ModelInput) -> Result<Prediction, InferenceError> {
        let probabilities: Vec<f32> = self.forward(input)?.row(0).iter().copied().collect();
        let mut class = 0;
        for (index, p) in probabilities.iter().enumerate() {
            if *p > probabilities[class] {
                class = index;
            }
        }
        Ok(Prediction { class, probabilities })
    }
}

fn build_gin(name: &str,
             weights: &GinWeights,
             inputs: usize,
             units: usize) -> Result<GinConv, ModelLoadError> {
    if !weights.epsilon.is_finite() {
        return Err(ModelLoadError::WeightMismatch {
            tensor: format!("{}/epsilon", name),
            expected: "a finite scalar".to_string(),
            found: weights.epsilon.to_string(),
        });
    }
    let kernel = kernel_matrix(&format!("{}/kernel", name), &weights.kernel, inputs, units)?;
    let bias = bias_vector(&format!("{}/bias", name), &weights.bias, units)?;
    Ok(GinConv::new(weights.epsilon, Dense::new(kernel, bias, Activation::Relu)))
}

fn build_dense(name: &str,
               weights: &DenseWeights,
               inputs: usize,
               units: usize,
               activation: Activation) -> Result<Dense, ModelLoadError> {
    let kernel = kernel_matrix(&format!("{}/kernel", name), &weights.kernel, inputs, units)?;
    let bias = bias_vector(&format!("{}/bias", name), &weights.bias, units)?;
    Ok(Dense::new(kernel, bias, activation))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::{preprocess_edgelist, FeatureConfig};

    fn identity(rows: usize, cols: usize) -> Vec<Vec<f32>> {
        (0..rows)
            .map(|r| (0..cols).map(|c| if r == c { 1.0 } else { 0.0 }).collect())
            .collect()
    }

    fn zero_weights(config: &LightGinConfig) -> ModelWeights {
        ModelWeights {
            gin1: GinWeights { epsilon: 0.0, kernel: identity(config.feature_width, config.hidden), bias: vec![0.0; config.hidden] },
            gin2: GinWeights { epsilon: 0.0, kernel: identity(config.hidden, config.hidden), bias: vec![0.0; config.hidden] },
            output: DenseWeights { kernel: vec![vec![0.0; config.classes]; config.hidden], bias: vec![0.0; config.classes] },
        }
    }

    fn input(text: &str) -> ModelInput {
        preprocess_edgelist(text, &FeatureConfig::default()).unwrap()
    }

    #[test]
    fn uniform_head_gives_uniform_probabilities() {
        let config = LightGinConfig::default();
        let model = LightGin::from_weights(config, &zero_weights(&config)).unwrap();
        let prediction = model.predict(&input("[(0,1),(1,2)]")).unwrap();
        assert_eq!(prediction.class, 0);
        for p in &prediction.probabilities {
            assert!((p - 1.0 / 3.0).abs() < 1e-6);
        }
        assert_eq!(prediction.label(), Some("Tree"));
    }

    #[test]
    fn bias_drives_the_arg_max() {
        let config = LightGinConfig::default();
        let mut weights = zero_weights(&config);
        weights.output.bias = vec![0.0, 0.0, 4.0];
        let model = LightGin::from_weights(config, &weights).unwrap();
        let prediction = model.predict(&input("[(0,1)]")).unwrap();
        assert_eq!(prediction.class, 2);
        assert_eq!(prediction.label(), Some("DAG"));
        assert!((prediction.probabilities.iter().sum::<f32>() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn wrong_shapes_are_rejected_at_build_time() {
        let config = LightGinConfig::default();
        let mut weights = zero_weights(&config);
        weights.gin1.kernel = identity(5, config.hidden);
        let err = LightGin::from_weights(config, &weights).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Weight mismatch for gin1/kernel: expected (8, 32), found (5, 32)"
        );
    }

    #[test]
    fn wrong_feature_width_is_rejected_at_inference() {
        let config = LightGinConfig::default();
        let model = LightGin::from_weights(config, &zero_weights(&config)).unwrap();
        let narrow = preprocess_edgelist("[(0,1)]", &FeatureConfig { feature_width: 4, ..FeatureConfig::default() }).unwrap();
        assert!(matches!(model.forward(&narrow), Err(InferenceError::ShapeMismatch { .. })));
    }

    #[test]
    fn empty_input_is_rejected() {
        let config = LightGinConfig::default();
        let model = LightGin::from_weights(config, &zero_weights(&config)).unwrap();
        let empty = ModelInput {
            node_ids: Vec::new(),
            features: DMatrix::zeros(0, config.feature_width),
            adjacency: SparseAdjacency::identity(0),
            batch: Vec::new(),
        };
        assert!(matches!(model.forward(&empty), Err(InferenceError::EmptyGraph)));
    }

    #[test]
    fn load_round_trips_through_a_weight_file() {
        let config = LightGinConfig::default();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("weights.json");
        serde_json::to_writer(std::fs::File::create(&path).unwrap(), &zero_weights(&config)).unwrap();
        let model = LightGin::load(&path, config).unwrap();
        assert_eq!(model.config(), &config);
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = LightGin::load(dir.path().join("nope.json"), LightGinConfig::default()).unwrap_err();
        assert!(matches!(err, ModelLoadError::WeightsNotFound { .. }));
    }
}
