//! Precomputed configuration spaces for small shape catalogs.

use super::ConfigurationSpaces;
use crate::error::{LayoutError, LayoutResult};
use crate::geometry::{GridPolygon, GridPolygonOverlap, IntVector2};
use crate::layout::Configuration;
use rand::seq::IndexedRandom;
use rand::Rng;
use std::collections::HashMap;
use std::sync::Arc;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Configuration spaces computed by exhaustive offset enumeration.
///
/// For every ordered pair of catalog shapes `(moving, fixed)` the engine
/// stores the sorted offsets `moving.position - fixed.position` at which the
/// shapes do not overlap and one edge of each shares a straight stretch of at
/// least `minimum_contact` units. Contacts on different edges are not added
/// up: a door needs the whole stretch on one wall of both rooms. Enumeration is bounded by the two bounding rectangles, so the
/// table size grows with the product of shape extents; it is meant for
/// catalogs of room-sized shapes, not for large polygons.
///
/// # Examples
///
/// ```
/// use u_mapgen::geometry::{GridPolygon, IntVector2};
/// use u_mapgen::spaces::GridConfigurationSpaces;
///
/// let square = GridPolygon::rectangle(1, 1).unwrap();
/// let spaces = GridConfigurationSpaces::new(vec![square], 1).unwrap();
/// let shape = &spaces.shapes_slice()[0];
/// assert_eq!(
///     spaces.space(shape, shape),
///     &[
///         IntVector2::new(-1, 0),
///         IntVector2::new(0, -1),
///         IntVector2::new(0, 1),
///         IntVector2::new(1, 0),
///     ]
/// );
/// ```
#[derive(Debug, Clone)]
pub struct GridConfigurationSpaces {
    shapes: Vec<Arc<GridPolygon>>,
    index: HashMap<GridPolygon, usize>,
    spaces: Vec<Vec<Vec<IntVector2>>>,
    minimum_contact: i64,
}

impl GridConfigurationSpaces {
    /// Builds the offset tables for `shapes`.
    ///
    /// Shapes equal to an earlier catalog entry share its tables but still
    /// count as separate entries when sampling random shapes.
    pub fn new(shapes: Vec<GridPolygon>, minimum_contact: i64) -> LayoutResult<Self> {
        if shapes.is_empty() {
            return Err(LayoutError::EmptyCatalog);
        }
        if minimum_contact < 1 {
            return Err(LayoutError::Config(format!(
                "minimum_contact must be at least 1, got {minimum_contact}"
            )));
        }

        let shapes: Vec<Arc<GridPolygon>> = shapes.into_iter().map(Arc::new).collect();
        let mut index = HashMap::new();
        for (i, shape) in shapes.iter().enumerate() {
            index.entry(GridPolygon::clone(shape)).or_insert(i);
        }

        let row = |moving: &Arc<GridPolygon>| -> Vec<Vec<IntVector2>> {
            shapes
                .iter()
                .map(|fixed| compute_offsets(moving, fixed, minimum_contact))
                .collect()
        };

        #[cfg(feature = "parallel")]
        let spaces = shapes.par_iter().map(row).collect();
        #[cfg(not(feature = "parallel"))]
        let spaces = shapes.iter().map(row).collect();

        Ok(Self {
            shapes,
            index,
            spaces,
            minimum_contact,
        })
    }

    pub fn minimum_contact(&self) -> i64 {
        self.minimum_contact
    }

    /// The catalog as a slice, for callers without the trait in scope.
    pub fn shapes_slice(&self) -> &[Arc<GridPolygon>] {
        &self.shapes
    }

    /// Valid offsets of `moving` relative to `fixed`, ascending.
    ///
    /// Shapes outside the catalog have an empty space.
    pub fn space(&self, moving: &GridPolygon, fixed: &GridPolygon) -> &[IntVector2] {
        match (self.index.get(moving), self.index.get(fixed)) {
            (Some(&m), Some(&f)) => self.spaces[m][f].as_slice(),
            _ => &[],
        }
    }
}

fn compute_offsets(moving: &GridPolygon, fixed: &GridPolygon, minimum_contact: i64) -> Vec<IntVector2> {
    let overlap = GridPolygonOverlap;
    let bm = moving.bounding_rectangle();
    let bf = fixed.bounding_rectangle();

    let mut offsets = Vec::new();
    for dx in (bf.a.x - bm.b.x)..=(bf.b.x - bm.a.x) {
        for dy in (bf.a.y - bm.b.y)..=(bf.b.y - bm.a.y) {
            let offset = IntVector2::new(dx, dy);
            if overlap.overlap_area(moving, offset, fixed, IntVector2::ZERO) == 0
                && overlap.longest_contact(moving, offset, fixed, IntVector2::ZERO) >= minimum_contact
            {
                offsets.push(offset);
            }
        }
    }
    offsets
}

impl ConfigurationSpaces for GridConfigurationSpaces {
    fn shapes(&self) -> &[Arc<GridPolygon>] {
        &self.shapes
    }

    fn random_shape<R: Rng>(&self, rng: &mut R) -> Arc<GridPolygon> {
        let i = rng.random_range(0..self.shapes.len());
        Arc::clone(&self.shapes[i])
    }

    fn maximum_intersection(
        &self,
        neighbours: &[&Configuration],
        candidate: &Configuration,
    ) -> Vec<IntVector2> {
        match neighbours {
            [] => Vec::new(),
            [single] => self
                .space(candidate.shape(), single.shape())
                .iter()
                .map(|&offset| single.position() + offset)
                .collect(),
            _ => {
                let mut counts: HashMap<IntVector2, usize> = HashMap::new();
                for neighbour in neighbours {
                    for &offset in self.space(candidate.shape(), neighbour.shape()) {
                        *counts.entry(neighbour.position() + offset).or_insert(0) += 1;
                    }
                }

                let Some(&best) = counts.values().max() else {
                    return Vec::new();
                };
                let mut positions: Vec<IntVector2> = counts
                    .into_iter()
                    .filter(|&(_, count)| count == best)
                    .map(|(position, _)| position)
                    .collect();
                positions.sort_unstable();
                positions
            }
        }
    }

    fn random_intersection<R: Rng>(
        &self,
        neighbours: &[&Configuration],
        candidate: &Configuration,
        rng: &mut R,
    ) -> Option<IntVector2> {
        self.maximum_intersection(neighbours, candidate)
            .choose(rng)
            .copied()
    }

    fn have_valid_position(&self, a: &Configuration, b: &Configuration) -> bool {
        self.space(a.shape(), b.shape())
            .binary_search(&(a.position() - b.position()))
            .is_ok()
    }
}
