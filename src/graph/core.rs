use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt::Debug;
use std::hash::Hash;
use itertools::Itertools;
use petgraph::graphmap::UnGraphMap;
use crate::graph::adjacency::SparseAdjacency;

/// Undirected simple graph over a sorted node set.
///
/// Node `i` is the i-th smallest id; every per-node quantity (adjacency
/// rows, degrees, clustering coefficients) uses that index.
pub struct Graph<T> {
    nodes: Vec<T>,
    structure: UnGraphMap<usize, ()>,
}


impl<T: Ord + Hash + Debug + Clone> Graph<T> {
    pub(super) fn new(nodes: BTreeSet<T>, edges: HashSet<(T, T)>) -> Self {
        let nodes: Vec<T> = nodes.into_iter().collect();
        let index: HashMap<&T, usize> = nodes.iter()
            .enumerate()
            .map(|(i, node)| (node, i))
            .collect();

        let mut structure = UnGraphMap::with_capacity(nodes.len(), edges.len());
        for i in 0..nodes.len() {
            structure.add_node(i);
        }
        for (from, to) in &edges {
            structure.add_edge(index[from], index[to], ());
        }

        Graph { nodes, structure }
    }
}

impl<T> Graph<T> {
    pub fn nodes(&self) -> &[T] {
        self.nodes.as_slice()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.structure.edge_count()
    }

    /// Symmetric adjacency in compressed-row form; a self-loop marks the
    /// diagonal entry. Memory grows with the edge count, not with N².
    pub fn adjacency(&self) -> SparseAdjacency {
        SparseAdjacency::from_rows(
            (0..self.node_count()).map(|node| self.structure.neighbors(node).collect())
        )
    }

    fn has_self_loop(&self, node: usize) -> bool {
        self.structure.contains_edge(node, node)
    }

    /// Neighbours of `node`, never including the node itself.
    fn proper_neighbours(&self, node: usize) -> impl Iterator<Item = usize> + '_ {
        self.structure.neighbors(node).filter(move |other| *other != node)
    }

    /// Incident edge count; a self-loop counts twice.
    pub fn degree(&self, node: usize) -> usize {
        let loops = if self.has_self_loop(node) { 2 } else { 0 };
        self.proper_neighbours(node).count() + loops
    }

    /// Fraction of neighbour pairs that are themselves connected.
    pub fn clustering(&self, node: usize) -> f64 {
        let neighbours: Vec<usize> = self.proper_neighbours(node).sorted().collect();
        let k = neighbours.len();
        if k < 2 {
            return 0.0;
        }
        let links = neighbours.iter()
            .tuple_combinations()
            .filter(|(a, b)| self.structure.contains_edge(**a, **b))
            .count();
        (2 * links) as f64 / (k * (k - 1)) as f64
    }

    pub fn degrees(&self) -> Vec<usize> {
        (0..self.node_count()).map(|i| self.degree(i)).collect()
    }

    pub fn clustering_coefficients(&self) -> Vec<f64> {
        (0..self.node_count()).map(|i| self.clustering(i)).collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::graph::GraphBuilder;
    use super::*;

    fn build(edges: &[(i64, i64)]) -> Graph<i64> {
        edges.iter().copied().collect::<GraphBuilder<_>>().build()
    }

    #[test]
    fn nodes_are_sorted_regardless_of_edge_order() {
        let graph = build(&[(7, 3), (3, -1), (10, 7)]);
        assert_eq!(graph.nodes(), &[-1, 3, 7, 10]);
    }

    #[test]
    fn adjacency_rows_are_symmetric() {
        let graph = build(&[(3, 1), (1, 2), (2, 3), (4, 1)]);
        let adjacency = graph.adjacency();
        for i in 0..graph.node_count() {
            for j in adjacency.row(i) {
                assert!(adjacency.row(*j).contains(&i));
            }
        }
        assert_eq!(adjacency.row(0), &[1, 2, 3]);
    }

    #[test]
    fn duplicate_and_reversed_edges_collapse() {
        let graph = build(&[(0, 1), (1, 0), (0, 1)]);
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.degrees(), vec![1, 1]);
    }

    #[test]
    fn triangle_is_fully_clustered() {
        let graph = build(&[(0, 1), (1, 2), (2, 0)]);
        assert_eq!(graph.degrees(), vec![2, 2, 2]);
        assert_eq!(graph.clustering_coefficients(), vec![1.0, 1.0, 1.0]);
    }

    #[test]
    fn partial_clustering() {
        // 0 is connected to 1, 2 and 3; only 1-2 closes a triangle.
        let graph = build(&[(0, 1), (0, 2), (0, 3), (1, 2)]);
        assert!((graph.clustering(0) - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(graph.clustering(1), 1.0);
        assert_eq!(graph.clustering(3), 0.0);
    }

    #[test]
    fn self_loop_counts_twice_and_is_ignored_for_clustering() {
        let graph = build(&[(0, 0), (0, 1), (0, 2), (1, 2)]);
        assert_eq!(graph.degree(0), 4);
        assert_eq!(graph.degree(1), 2);
        assert_eq!(graph.clustering(0), 1.0);
        assert_eq!(graph.adjacency().row(0), &[0, 1, 2]);
    }
}
