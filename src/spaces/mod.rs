//! Configuration spaces: where a shape may be placed relative to others.
//!
//! The generator never inspects geometry to decide whether two neighbours
//! are correctly placed; it asks a [`ConfigurationSpaces`] implementation.
//! The door pass relies on the same predicate, so an implementation must
//! only accept relations whose shared boundary can hold a door.

mod grid;

pub use grid::GridConfigurationSpaces;

use crate::geometry::{GridPolygon, IntVector2};
use crate::layout::Configuration;
use rand::Rng;
use std::sync::Arc;

/// Geometric service consulted by the layout generator.
pub trait ConfigurationSpaces {
    /// The shape catalog, in a fixed enumeration order.
    fn shapes(&self) -> &[Arc<GridPolygon>];

    /// A uniformly random catalog shape.
    fn random_shape<R: Rng>(&self, rng: &mut R) -> Arc<GridPolygon>;

    /// Positions for `candidate`'s shape lying in as many of the neighbours'
    /// configuration spaces as possible, in ascending order.
    ///
    /// Returns an empty vector when `neighbours` is empty or no position
    /// lies in any of the spaces.
    fn maximum_intersection(
        &self,
        neighbours: &[&Configuration],
        candidate: &Configuration,
    ) -> Vec<IntVector2>;

    /// A uniformly random position from [`maximum_intersection`](Self::maximum_intersection).
    fn random_intersection<R: Rng>(
        &self,
        neighbours: &[&Configuration],
        candidate: &Configuration,
        rng: &mut R,
    ) -> Option<IntVector2>;

    /// Whether `a` and `b` touch without overlapping. Must be symmetric.
    fn have_valid_position(&self, a: &Configuration, b: &Configuration) -> bool;
}
