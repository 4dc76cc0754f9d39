use std::path::Path;
use nalgebra::{DMatrix, RowDVector};
use crate::errors::ModelLoadError;

pub const DEFAULT_WEIGHTS_PATH: &str = "lightgin_model_weights.json";

/// Trained parameters of a [`LightGin`](super::LightGin), as persisted on disk.
///
/// Kernels are stored as `[input][unit]` nested arrays.
#[derive(Debug, Clone, PartialEq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct ModelWeights {
    pub gin1: GinWeights,
    pub gin2: GinWeights,
    pub output: DenseWeights,
}

#[derive(Debug, Clone, PartialEq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct GinWeights {
    #[serde(default)]
    pub epsilon: f32,
    pub kernel: Vec<Vec<f32>>,
    pub bias: Vec<f32>,
}

#[derive(Debug, Clone, PartialEq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct DenseWeights {
    pub kernel: Vec<Vec<f32>>,
    pub bias: Vec<f32>,
}

impl ModelWeights {
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ModelLoadError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ModelLoadError::WeightsNotFound {
                path: path.display().to_string()
            },
            _ => ModelLoadError::WeightsUnreadable {
                path: path.display().to_string(),
                reason: e.to_string()
            },
        })?;
        let reader = std::io::BufReader::new(file);
        serde_json::from_reader(reader).map_err(|e| ModelLoadError::WeightsUnreadable {
            path: path.display().to_string(),
            reason: e.to_string()
        })
    }
}

fn shape(rows: usize, cols: usize) -> String {
    format!("({}, {})", rows, cols)
}

/// Checks a `[rows][cols]` kernel and turns it into a matrix.
pub(super) fn kernel_matrix(tensor: &str,
                            kernel: &[Vec<f32>],
                            rows: usize,
                            cols: usize) -> Result<DMatrix<f32>, ModelLoadError> {
    let mismatch = |found: String| ModelLoadError::WeightMismatch {
        tensor: tensor.to_string(),
        expected: shape(rows, cols),
        found,
    };
    if kernel.len() != rows {
        let found_cols = kernel.first().map_or(0, |row| row.len());
        return Err(mismatch(shape(kernel.len(), found_cols)));
    }
    if let Some((index, row)) = kernel.iter().enumerate().find(|(_, row)| row.len() != cols) {
        return Err(mismatch(format!("{} values in row {}", row.len(), index)));
    }
    if kernel.iter().flatten().any(|v| !v.is_finite()) {
        return Err(mismatch("non-finite values".to_string()));
    }
    Ok(DMatrix::from_row_iterator(rows, cols, kernel.iter().flatten().copied()))
}

pub(super) fn bias_vector(tensor: &str,
                          bias: &[f32],
                          units: usize) -> Result<RowDVector<f32>, ModelLoadError> {
    let mismatch = |found: String| ModelLoadError::WeightMismatch {
        tensor: tensor.to_string(),
        expected: format!("({},)", units),
        found,
    };
    if bias.len() != units {
        return Err(mismatch(format!("({},)", bias.len())));
    }
    if bias.iter().any(|v| !v.is_finite()) {
        return Err(mismatch("non-finite values".to_string()));
    }
    Ok(RowDVector::from_row_slice(bias))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kernel_shape_is_checked() {
        let kernel = vec![vec![1.0, 2.0], vec![3.0, 4.0]];
        let m = kernel_matrix("k", &kernel, 2, 2).unwrap();
        assert_eq!(m[(0, 1)], 2.0);
        assert_eq!(m[(1, 0)], 3.0);

        let err = kernel_matrix("gin1/kernel", &kernel, 8, 2).unwrap_err();
        assert_eq!(err.to_string(), "Weight mismatch for gin1/kernel: expected (8, 2), found (2, 2)");

        let ragged = vec![vec![1.0, 2.0], vec![3.0]];
        assert!(kernel_matrix("k", &ragged, 2, 2).is_err());

        let nan = vec![vec![f32::NAN, 2.0], vec![3.0, 4.0]];
        assert!(kernel_matrix("k", &nan, 2, 2).is_err());
    }

    #[test]
    fn bias_shape_is_checked() {
        assert_eq!(bias_vector("b", &[1.0, 2.0], 2).unwrap().len(), 2);
        let err = bias_vector("output/bias", &[1.0], 3).unwrap_err();
        assert!(matches!(err, ModelLoadError::WeightMismatch { .. }));
    }

    #[test]
    fn missing_file_is_reported_as_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = ModelWeights::load_from_file(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, ModelLoadError::WeightsNotFound { .. }));
    }

    #[test]
    fn garbage_file_is_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("weights.json");
        std::fs::write(&path, b"\x89HDF\r\n").unwrap();
        let err = ModelWeights::load_from_file(&path).unwrap_err();
        assert!(matches!(err, ModelLoadError::WeightsUnreadable { .. }));
    }

    #[test]
    fn epsilon_defaults_to_zero() {
        let json = r#"{"kernel": [[1.0]], "bias": [0.0]}"#;
        let gin: GinWeights = serde_json::from_str(json).unwrap();
        assert_eq!(gin.epsilon, 0.0);
    }
}
