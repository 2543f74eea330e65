//! Per-node placement record.

use super::validity::ValidityMask;
use crate::geometry::{GridPolygon, GridRectangle, IntVector2};
use std::sync::Arc;

/// A node's shape and position together with its cached energy terms.
///
/// Configurations are values: the `with_*` methods return a modified copy
/// and leave `self` untouched, so a configuration can be shared freely
/// between layouts.
#[derive(Debug, Clone, PartialEq)]
pub struct Configuration {
    shape: Arc<GridPolygon>,
    position: IntVector2,
    energy: f64,
    overlap_area: i64,
    move_distance: f64,
    invalid_neighbours: ValidityMask,
}

impl Configuration {
    /// A fresh configuration with zeroed energy terms and an empty mask.
    pub fn new(shape: Arc<GridPolygon>, position: IntVector2) -> Self {
        Self {
            shape,
            position,
            energy: 0.0,
            overlap_area: 0,
            move_distance: 0.0,
            invalid_neighbours: ValidityMask::default(),
        }
    }

    pub fn shape(&self) -> &Arc<GridPolygon> {
        &self.shape
    }

    pub fn position(&self) -> IntVector2 {
        self.position
    }

    pub fn energy(&self) -> f64 {
        self.energy
    }

    pub fn overlap_area(&self) -> i64 {
        self.overlap_area
    }

    pub fn move_distance(&self) -> f64 {
        self.move_distance
    }

    pub fn invalid_neighbours(&self) -> &ValidityMask {
        &self.invalid_neighbours
    }

    /// Bounding rectangle in world coordinates.
    pub fn bounding_rectangle(&self) -> GridRectangle {
        self.shape.bounding_rectangle().translated(self.position)
    }

    /// Center of the world-space bounding rectangle.
    pub fn center(&self) -> IntVector2 {
        self.shape.bounding_rectangle().center() + self.position
    }

    pub fn with_position(&self, position: IntVector2) -> Self {
        Self {
            position,
            ..self.clone()
        }
    }

    pub fn with_shape(&self, shape: Arc<GridPolygon>) -> Self {
        Self {
            shape,
            ..self.clone()
        }
    }

    pub fn with_shape_position(&self, shape: Arc<GridPolygon>, position: IntVector2) -> Self {
        Self {
            shape,
            position,
            ..self.clone()
        }
    }

    pub fn with_energy(&self, energy: f64, overlap_area: i64, move_distance: f64) -> Self {
        Self {
            energy,
            overlap_area,
            move_distance,
            ..self.clone()
        }
    }

    pub fn with_validity(&self, invalid_neighbours: ValidityMask) -> Self {
        Self {
            invalid_neighbours,
            ..self.clone()
        }
    }
}
