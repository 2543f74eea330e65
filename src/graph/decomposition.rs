//! Splitting a graph into chains processed one after another.

use super::Graph;
use std::collections::VecDeque;

/// Produces the ordered chain partition consumed by the generator.
///
/// Every node must appear in exactly one chain.
pub trait GraphDecomposer {
    fn chains<G: Graph>(&self, graph: &G) -> Vec<Vec<usize>>;
}

/// Puts every node into a single chain, in id order.
#[derive(Debug, Clone, Copy, Default)]
pub struct SingleChainDecomposer;

impl GraphDecomposer for SingleChainDecomposer {
    fn chains<G: Graph>(&self, graph: &G) -> Vec<Vec<usize>> {
        if graph.vertices_count() == 0 {
            return Vec::new();
        }
        vec![(0..graph.vertices_count()).collect()]
    }
}

/// Breadth-first order over all components, cut into chains of at most
/// `max_chain_length` nodes.
///
/// Each chain after the first starts next to already placed nodes within a
/// component, which keeps greedy seeding informed by earlier chains.
#[derive(Debug, Clone, Copy)]
pub struct BreadthFirstDecomposer {
    pub max_chain_length: usize,
}

impl BreadthFirstDecomposer {
    pub fn new(max_chain_length: usize) -> Self {
        Self {
            max_chain_length: max_chain_length.max(1),
        }
    }
}

impl Default for BreadthFirstDecomposer {
    fn default() -> Self {
        Self::new(8)
    }
}

impl GraphDecomposer for BreadthFirstDecomposer {
    fn chains<G: Graph>(&self, graph: &G) -> Vec<Vec<usize>> {
        let n = graph.vertices_count();
        let mut visited = vec![false; n];
        let mut order = Vec::with_capacity(n);

        for root in 0..n {
            if visited[root] {
                continue;
            }
            visited[root] = true;
            let mut queue = VecDeque::from([root]);
            while let Some(node) = queue.pop_front() {
                order.push(node);
                for &next in graph.neighbours(node) {
                    if !visited[next] {
                        visited[next] = true;
                        queue.push_back(next);
                    }
                }
            }
        }

        order
            .chunks(self.max_chain_length.max(1))
            .map(<[usize]>::to_vec)
            .collect()
    }
}
