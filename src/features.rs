//! Turns an edge list into the tensors the classifier consumes.
//!
//! Every node gets two structural features, its degree and its local
//! clustering coefficient, right-padded with zeros up to the configured
//! width. Rows follow the sorted node order of [`Graph`].

use nalgebra::DMatrix;
use crate::edgelist::{parse_edge_list, NodeId};
use crate::errors::{PreprocessError, ValidationError};
use crate::graph::{Graph, GraphBuilder, SparseAdjacency};

/// Number of structural features computed per node.
pub const NATURAL_FEATURES: usize = 2;

pub const DEFAULT_FEATURE_WIDTH: usize = 8;

pub const DEFAULT_MAX_NODES: usize = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureConfig {
    pub feature_width: usize,
    /// Graphs with more distinct nodes are refused before any tensor is built.
    pub max_nodes: usize,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        FeatureConfig {
            feature_width: DEFAULT_FEATURE_WIDTH,
            max_nodes: DEFAULT_MAX_NODES,
        }
    }
}

impl FeatureConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.feature_width < NATURAL_FEATURES {
            return Err(ValidationError::FeatureWidth {
                width: self.feature_width,
                natural: NATURAL_FEATURES,
            });
        }
        Ok(())
    }
}

/// Feature matrix, adjacency and batch vector for a single graph.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelInput {
    pub node_ids: Vec<NodeId>,
    pub features: DMatrix<f32>,
    pub adjacency: SparseAdjacency,
    pub batch: Vec<usize>,
}

impl ModelInput {
    pub fn node_count(&self) -> usize {
        self.features.nrows()
    }

    pub fn graph_count(&self) -> usize {
        self.batch.iter().max().map_or(0, |max| max + 1)
    }
}

pub fn preprocess_edgelist(text: &str, config: &FeatureConfig) -> Result<ModelInput, PreprocessError> {
    config.validate()?;
    let edges = parse_edge_list(text)?;
    if edges.is_empty() {
        return Err(ValidationError::EmptyGraph.into());
    }
    let builder = edges.into_iter().collect::<GraphBuilder<_>>();
    if builder.node_count() > config.max_nodes {
        return Err(ValidationError::TooManyNodes {
            nodes: builder.node_count(),
            limit: config.max_nodes,
        }.into());
    }
    let graph = builder.build();
    log::debug!("Built graph with {} nodes and {} edges", graph.node_count(), graph.edge_count());
    Ok(graph_to_input(&graph, config))
}

pub fn graph_to_input(graph: &Graph<NodeId>, config: &FeatureConfig) -> ModelInput {
    let n = graph.node_count();
    let mut features = DMatrix::<f32>::zeros(n, config.feature_width);
    for (i, (degree, clustering)) in graph.degrees()
        .into_iter()
        .zip(graph.clustering_coefficients())
        .enumerate()
    {
        features[(i, 0)] = degree as f32;
        features[(i, 1)] = clustering as f32;
    }
    ModelInput {
        node_ids: graph.nodes().to_vec(),
        features,
        adjacency: graph.adjacency(),
        batch: vec![0; n],
    }
}

/// JSON view of a [`ModelInput`], as printed by the `features` command.
#[derive(Debug, Clone, serde::Serialize)]
pub struct FeatureDump {
    pub nodes: Vec<NodeId>,
    pub features: Vec<Vec<f32>>,
    pub adjacency: Vec<Vec<u8>>,
    pub batch: Vec<usize>,
}

impl From<&ModelInput> for FeatureDump {
    fn from(input: &ModelInput) -> Self {
        let rows = |m: &DMatrix<f32>| -> Vec<Vec<f32>> {
            m.row_iter().map(|row| row.iter().copied().collect()).collect()
        };
        FeatureDump {
            nodes: input.node_ids.clone(),
            features: rows(&input.features),
            adjacency: rows(&input.adjacency.to_dense())
                .into_iter()
                .map(|row| row.into_iter().map(|x| x as u8).collect())
                .collect(),
            batch: input.batch.clone(),
        }
    }
}
