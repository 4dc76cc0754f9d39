mod adjacency;
mod builder;
mod core;

pub use adjacency::SparseAdjacency;
pub use builder::GraphBuilder;
pub use self::core::Graph;
