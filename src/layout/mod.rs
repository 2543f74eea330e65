//! Layout state: per-node configurations and doors.
//!
//! A [`Layout`] owns its slot vector but shares every [`Configuration`] by
//! `Arc`. Cloning a layout therefore costs one pointer copy per node, and
//! the clone can be modified without affecting the original.

mod configuration;
mod validity;

pub use configuration::Configuration;
pub use validity::ValidityMask;

use crate::geometry::IntLine;
use std::sync::Arc;

/// A door connecting two adjacent nodes, in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Door {
    pub from: usize,
    pub to: usize,
    pub line: IntLine,
}

/// Placement state of every node of a graph.
#[derive(Debug, Clone, Default)]
pub struct Layout {
    configurations: Vec<Option<Arc<Configuration>>>,
    doors: Vec<Door>,
}

impl Layout {
    /// A layout with `vertices_count` unplaced nodes.
    pub fn new(vertices_count: usize) -> Self {
        Self {
            configurations: vec![None; vertices_count],
            doors: Vec::new(),
        }
    }

    pub fn vertices_count(&self) -> usize {
        self.configurations.len()
    }

    pub fn configuration(&self, node: usize) -> Option<&Configuration> {
        self.configurations.get(node).and_then(|c| c.as_deref())
    }

    /// Shared handle to a node's configuration.
    pub fn configuration_arc(&self, node: usize) -> Option<&Arc<Configuration>> {
        self.configurations.get(node).and_then(Option::as_ref)
    }

    /// # Panics
    ///
    /// Panics if `node` is not a vertex of this layout.
    pub fn set_configuration(&mut self, node: usize, configuration: Configuration) {
        self.configurations[node] = Some(Arc::new(configuration));
    }

    pub fn remove_configuration(&mut self, node: usize) -> Option<Arc<Configuration>> {
        self.configurations.get_mut(node).and_then(Option::take)
    }

    pub fn is_placed(&self, node: usize) -> bool {
        self.configuration(node).is_some()
    }

    /// Placed nodes with their configurations, in id order.
    pub fn placed(&self) -> impl Iterator<Item = (usize, &Configuration)> {
        self.configurations
            .iter()
            .enumerate()
            .filter_map(|(i, c)| c.as_deref().map(|c| (i, c)))
    }

    pub fn placed_count(&self) -> usize {
        self.configurations.iter().filter(|c| c.is_some()).count()
    }

    /// Sum of the energies of all placed nodes.
    pub fn energy(&self) -> f64 {
        self.placed().map(|(_, c)| c.energy()).sum()
    }

    /// True when no placed node has a violated neighbour relation.
    pub fn are_configurations_valid(&self) -> bool {
        self.placed().all(|(_, c)| c.invalid_neighbours().is_clear())
    }

    pub fn doors(&self) -> &[Door] {
        &self.doors
    }

    pub fn set_doors(&mut self, doors: Vec<Door>) {
        self.doors = doors;
    }
}
