//! Energy of node placements.
//!
//! A node's energy combines two penalties, both normalized by
//! `sigma = 100 * average catalog area`:
//!
//! ```text
//! energy = exp(overlap_area / sigma) * exp(move_distance / sigma) - 1
//! ```
//!
//! `overlap_area` counts overlap with every other placed node.
//! `move_distance` sums squared Manhattan distances between bounding-box
//! centers of graph neighbours that do not touch. The energy is zero exactly
//! when both terms are zero.

use crate::error::{LayoutError, LayoutResult};
use crate::geometry::{GridPolygon, GridPolygonOverlap, IntVector2};
use crate::graph::Graph;
use crate::layout::{Configuration, Layout};
use std::sync::Arc;

/// How neighbour distances are evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnergyMode {
    /// Test every placed neighbour for contact.
    Full,
    /// Skip neighbours whose validity bit is clear. Requires an up-to-date
    /// validity mask on the evaluated configuration.
    Fast,
}

/// Energy terms of one node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeEnergy {
    pub energy: f64,
    pub overlap_area: i64,
    pub move_distance: f64,
}

/// Energy function derived from a shape catalog.
#[derive(Debug, Clone)]
pub struct EnergyModel {
    sigma: f64,
    average_size: i32,
    overlap: GridPolygonOverlap,
}

impl EnergyModel {
    /// Derives `sigma` and the average shape size from the catalog's
    /// bounding rectangles (integer averages).
    pub fn new(shapes: &[Arc<GridPolygon>]) -> LayoutResult<Self> {
        if shapes.is_empty() {
            return Err(LayoutError::EmptyCatalog);
        }
        let count = shapes.len() as i64;
        let rects = shapes.iter().map(|s| s.bounding_rectangle());
        let average_area = rects.clone().map(|r| r.area()).sum::<i64>() / count;
        let average_size = rects
            .map(|r| ((r.width() + r.height()) / 2) as i64)
            .sum::<i64>()
            / count;

        Ok(Self {
            sigma: 100.0 * average_area.max(1) as f64,
            average_size: average_size as i32,
            overlap: GridPolygonOverlap,
        })
    }

    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    /// Integer average of `(width + height) / 2` over the catalog.
    pub fn average_size(&self) -> i32 {
        self.average_size
    }

    pub fn overlap(&self) -> &GridPolygonOverlap {
        &self.overlap
    }

    pub fn energy(&self, overlap_area: i64, move_distance: f64) -> f64 {
        (overlap_area as f64 / self.sigma).exp() * (move_distance / self.sigma).exp() - 1.0
    }

    /// Computes the energy terms of `node` placed as `configuration`,
    /// against the other nodes of `layout`.
    ///
    /// The slot of `node` itself in `layout` is ignored, so candidate
    /// configurations can be scored without inserting them. Unplaced
    /// neighbours contribute nothing.
    pub fn node_energy<G: Graph>(
        &self,
        graph: &G,
        layout: &Layout,
        node: usize,
        configuration: &Configuration,
        mode: EnergyMode,
    ) -> NodeEnergy {
        let shape = configuration.shape();
        let position = configuration.position();

        let overlap_area: i64 = layout
            .placed()
            .filter(|&(i, _)| i != node)
            .map(|(_, other)| {
                self.overlap
                    .overlap_area(shape, position, other.shape(), other.position())
            })
            .sum();

        let mut move_distance = 0.0;
        let mask = configuration.invalid_neighbours();
        for (i, &neighbour) in graph.neighbours(node).iter().enumerate() {
            let Some(other) = layout.configuration(neighbour) else {
                continue;
            };
            if mode == EnergyMode::Fast && !mask.is_invalid(i) {
                continue;
            }
            if !self
                .overlap
                .do_touch(shape, position, other.shape(), other.position())
            {
                let d = IntVector2::manhattan_distance(configuration.center(), other.center()) as f64;
                move_distance += d * d;
            }
        }

        NodeEnergy {
            energy: self.energy(overlap_area, move_distance),
            overlap_area,
            move_distance,
        }
    }

    /// Re-derives `other`'s energy after some non-neighbour moved from `old`
    /// to `new`, by adjusting its cached overlap instead of rescanning.
    pub fn update_overlap(
        &self,
        old: &Configuration,
        new: &Configuration,
        other: &Configuration,
    ) -> Configuration {
        let area_old =
            self.overlap
                .overlap_area(other.shape(), other.position(), old.shape(), old.position());
        let area_new =
            self.overlap
                .overlap_area(other.shape(), other.position(), new.shape(), new.position());
        let overlap_area = other.overlap_area() + (area_new - area_old);
        let energy = self.energy(overlap_area, other.move_distance());

        other.with_energy(energy, overlap_area, other.move_distance())
    }
}

impl NodeEnergy {
    /// Copy of `configuration` carrying these energy terms.
    pub fn apply(&self, configuration: &Configuration) -> Configuration {
        configuration.with_energy(self.energy, self.overlap_area, self.move_distance)
    }
}
