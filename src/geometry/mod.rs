//! Integer grid geometry.
//!
//! Shapes are orthogonal polygons with integer vertices. The generator only
//! needs a handful of queries from this module: overlap area, the touch test
//! between two positioned shapes, bounding rectangles and boundary segments
//! for door placement.

mod line;
mod overlap;
mod polygon;
mod vector;

pub use line::IntLine;
pub use overlap::GridPolygonOverlap;
pub use polygon::{GridPolygon, GridRectangle};
pub use vector::IntVector2;
