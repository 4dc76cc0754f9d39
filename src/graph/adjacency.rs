use nalgebra::DMatrix;

/// Compressed-row form of a symmetric 0/1 adjacency matrix.
///
/// Only the positions of the ones are stored: the non-zero columns of row
/// `i` are `columns[row_offsets[i]..row_offsets[i + 1]]`, in ascending order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SparseAdjacency {
    row_offsets: Vec<usize>,
    columns: Vec<usize>,
    n_nodes: usize,
}

impl SparseAdjacency {
    /// Builds the matrix from per-node neighbour lists; each row gets sorted.
    pub fn from_rows(rows: impl IntoIterator<Item = Vec<usize>>) -> Self {
        let mut row_offsets = vec![0];
        let mut columns = Vec::new();
        for mut row in rows {
            row.sort_unstable();
            columns.extend(row);
            row_offsets.push(columns.len());
        }
        let n_nodes = row_offsets.len() - 1;
        SparseAdjacency { row_offsets, columns, n_nodes }
    }

    /// Identity pattern, every node linked only to itself.
    pub fn identity(n_nodes: usize) -> Self {
        SparseAdjacency {
            row_offsets: (0..=n_nodes).collect(),
            columns: (0..n_nodes).collect(),
            n_nodes,
        }
    }

    pub fn size(&self) -> usize {
        self.n_nodes
    }

    pub fn row(&self, node: usize) -> &[usize] {
        &self.columns[self.row_offsets[node]..self.row_offsets[node + 1]]
    }

    /// Dense 0/1 matrix in node index order. Quadratic in the node count.
    pub fn to_dense(&self) -> DMatrix<f32> {
        let mut dense = DMatrix::zeros(self.n_nodes, self.n_nodes);
        for node in 0..self.n_nodes {
            for col in self.row(node) {
                dense[(node, *col)] = 1.0;
            }
        }
        dense
    }
}
