use std::collections::{BTreeSet, HashSet};
use std::fmt::Debug;
use std::hash::Hash;


/// Collects undirected edges before the node ordering is fixed.
///
/// Edges are stored with their endpoints normalised (smaller id first), so
/// `(u, v)`, `(v, u)` and repeated occurrences collapse into one edge.
pub struct GraphBuilder<T> {
    nodes: BTreeSet<T>,
    edges: HashSet<(T, T)>,
}

impl<T> GraphBuilder<T> {
    pub fn new() -> Self {
        Self {
            nodes: BTreeSet::new(),
            edges: HashSet::new(),
        }
    }
}

impl<T> Default for GraphBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Ord + Hash + Debug + Clone> GraphBuilder<T> {
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn add_vertex_in_place(&mut self, vertex: T) {
        self.nodes.insert(vertex);
    }

    pub fn add_edge_in_place(&mut self, from: T, to: T) {
        self.add_vertex_in_place(from.clone());
        self.add_vertex_in_place(to.clone());
        let key = if from <= to { (from, to) } else { (to, from) };
        self.edges.insert(key);
    }

    pub fn build(self) -> super::core::Graph<T> {
        super::core::Graph::new(self.nodes, self.edges)
    }
}

impl<T: Ord + Hash + Debug + Clone> FromIterator<(T, T)> for GraphBuilder<T> {
    fn from_iter<I: IntoIterator<Item = (T, T)>>(iter: I) -> Self {
        let mut builder = GraphBuilder::new();
        for (from, to) in iter {
            builder.add_edge_in_place(from, to);
        }
        builder
    }
}
