//! Adjacency graph capability and chain decomposition.

mod decomposition;

pub use decomposition::{BreadthFirstDecomposer, GraphDecomposer, SingleChainDecomposer};

use crate::error::{LayoutError, LayoutResult};
use std::collections::HashMap;

/// Read access to an undirected graph over nodes `0..vertices_count()`.
///
/// Neighbour lists must keep their order for the whole generation run:
/// validity bits are addressed by position in these lists.
pub trait Graph {
    fn vertices_count(&self) -> usize;

    /// Ordered neighbours of `node`.
    fn neighbours(&self, node: usize) -> &[usize];

    /// Position of `neighbour` in the neighbour list of `node`.
    fn neighbour_index(&self, node: usize, neighbour: usize) -> Option<usize>;

    fn are_neighbours(&self, a: usize, b: usize) -> bool {
        self.neighbour_index(a, b).is_some()
    }
}

/// Undirected graph stored as adjacency lists.
///
/// Neighbours appear in edge insertion order.
///
/// # Examples
///
/// ```
/// use u_mapgen::graph::{AdjacencyGraph, Graph};
///
/// let graph = AdjacencyGraph::from_edges(3, &[(0, 1), (1, 2)]).unwrap();
/// assert_eq!(graph.neighbours(1), &[0, 2]);
/// assert_eq!(graph.neighbour_index(1, 2), Some(1));
/// ```
#[derive(Debug, Clone, Default)]
pub struct AdjacencyGraph {
    neighbours: Vec<Vec<usize>>,
    indices: Vec<HashMap<usize, usize>>,
}

impl AdjacencyGraph {
    pub fn new(vertices_count: usize) -> Self {
        Self {
            neighbours: vec![Vec::new(); vertices_count],
            indices: vec![HashMap::new(); vertices_count],
        }
    }

    pub fn from_edges(vertices_count: usize, edges: &[(usize, usize)]) -> LayoutResult<Self> {
        let mut graph = Self::new(vertices_count);
        for &(a, b) in edges {
            graph.add_edge(a, b)?;
        }
        Ok(graph)
    }

    /// Adds an undirected edge. Adding an existing edge again is a no-op.
    pub fn add_edge(&mut self, a: usize, b: usize) -> LayoutResult<()> {
        let n = self.neighbours.len();
        if a >= n || b >= n {
            return Err(LayoutError::Graph(format!(
                "edge ({a}, {b}) references a node outside 0..{n}"
            )));
        }
        if a == b {
            return Err(LayoutError::Graph(format!("self-loop on node {a}")));
        }
        if self.indices[a].contains_key(&b) {
            return Ok(());
        }

        self.indices[a].insert(b, self.neighbours[a].len());
        self.neighbours[a].push(b);
        self.indices[b].insert(a, self.neighbours[b].len());
        self.neighbours[b].push(a);
        Ok(())
    }

    /// Edges `(a, b)` with `a < b`, ordered by `a` then by neighbour position.
    pub fn edges(&self) -> Vec<(usize, usize)> {
        self.neighbours
            .iter()
            .enumerate()
            .flat_map(|(a, list)| list.iter().filter(move |&&b| b > a).map(move |&b| (a, b)))
            .collect()
    }

    pub fn max_degree(&self) -> usize {
        self.neighbours.iter().map(Vec::len).max().unwrap_or(0)
    }
}

impl Graph for AdjacencyGraph {
    fn vertices_count(&self) -> usize {
        self.neighbours.len()
    }

    fn neighbours(&self, node: usize) -> &[usize] {
        &self.neighbours[node]
    }

    fn neighbour_index(&self, node: usize, neighbour: usize) -> Option<usize> {
        self.indices.get(node)?.get(&neighbour).copied()
    }
}
