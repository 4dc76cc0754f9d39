use nalgebra::{DMatrix, RowDVector};
use crate::graph::SparseAdjacency;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    Linear,
    Relu,
    /// Row-wise softmax, one distribution per row.
    Softmax,
}

impl Activation {
    pub fn apply(&self, mut x: DMatrix<f32>) -> DMatrix<f32> {
        match self {
            Activation::Linear => {}
            Activation::Relu => x.apply(|v| *v = v.max(0.0)),
            Activation::Softmax => {
                for mut row in x.row_iter_mut() {
                    let max = row.max();
                    row.apply(|v| *v = (*v - max).exp());
                    let sum = row.sum();
                    row /= sum;
                }
            }
        }
        x
    }
}

/// Fully connected layer, `activation(x · kernel + bias)`.
#[derive(Debug, Clone)]
pub struct Dense {
    kernel: DMatrix<f32>,
    bias: RowDVector<f32>,
    activation: Activation,
}

impl Dense {
    /// `kernel` is `inputs × units`, `bias` has `units` entries; the weight
    /// loader checks both shapes before calling this.
    pub(super) fn new(kernel: DMatrix<f32>, bias: RowDVector<f32>, activation: Activation) -> Self {
        Dense { kernel, bias, activation }
    }

    pub fn forward(&self, x: &DMatrix<f32>) -> DMatrix<f32> {
        let mut out = x * &self.kernel;
        for mut row in out.row_iter_mut() {
            row += &self.bias;
        }
        self.activation.apply(out)
    }
}

/// Graph isomorphism convolution.
///
/// Each node sums its own features, scaled by `1 + epsilon`, with the
/// features of every node in its adjacency row, then feeds the result
/// through a dense layer.
#[derive(Debug, Clone)]
pub struct GinConv {
    epsilon: f32,
    mlp: Dense,
}

impl GinConv {
    pub(super) fn new(epsilon: f32, mlp: Dense) -> Self {
        GinConv { epsilon, mlp }
    }

    pub fn aggregate(&self, x: &DMatrix<f32>, adjacency: &SparseAdjacency) -> DMatrix<f32> {
        let mut aggregated = x * (1.0 + self.epsilon);
        for node in 0..adjacency.size() {
            let mut target = aggregated.row_mut(node);
            for source in adjacency.row(node) {
                target += x.row(*source);
            }
        }
        aggregated
    }

    pub fn forward(&self, x: &DMatrix<f32>, adjacency: &SparseAdjacency) -> DMatrix<f32> {
        self.mlp.forward(&self.aggregate(x, adjacency))
    }
}

/// Dropout as seen at serving time: the identity.
///
/// The rate is kept so the architecture stays self-describing, but no units
/// are ever dropped because the model is only evaluated, never trained.
#[derive(Debug, Clone, Copy)]
pub struct Dropout {
    pub rate: f32,
}

impl Dropout {
    pub fn forward(&self, x: DMatrix<f32>) -> DMatrix<f32> {
        x
    }
}

/// Mean of the node rows belonging to each graph of the batch.
pub fn global_avg_pool(x: &DMatrix<f32>, batch: &[usize], graphs: usize) -> DMatrix<f32> {
    let mut pooled = DMatrix::<f32>::zeros(graphs, x.ncols());
    let mut counts = vec![0usize; graphs];
    for (node, graph) in batch.iter().enumerate() {
        let mut row = pooled.row_mut(*graph);
        row += x.row(node);
        counts[*graph] += 1;
    }
    for (graph, count) in counts.into_iter().enumerate() {
        if count > 0 {
            let mut row = pooled.row_mut(graph);
            row /= count as f32;
        }
    }
    pooled
}
