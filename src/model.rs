//! The LightGIN graph classifier and its persisted weights.

mod layers;
mod lightgin;
mod weights;

pub use lightgin::{LightGin, LightGinConfig, Prediction, CLASS_LABELS};
pub use weights::{DenseWeights, GinWeights, ModelWeights, DEFAULT_WEIGHTS_PATH};
