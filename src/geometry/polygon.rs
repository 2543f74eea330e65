//! Orthogonal polygons on the integer grid.

use super::line::IntLine;
use super::vector::IntVector2;
use crate::error::{LayoutError, LayoutResult};
use std::hash::{Hash, Hasher};

/// Axis-aligned rectangle spanning `a` (min corner) to `b` (max corner).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridRectangle {
    pub a: IntVector2,
    pub b: IntVector2,
}

impl GridRectangle {
    /// Creates a rectangle from any two opposite corners.
    pub fn new(p: IntVector2, q: IntVector2) -> Self {
        Self {
            a: IntVector2::new(p.x.min(q.x), p.y.min(q.y)),
            b: IntVector2::new(p.x.max(q.x), p.y.max(q.y)),
        }
    }

    pub fn width(&self) -> i32 {
        self.b.x - self.a.x
    }

    pub fn height(&self) -> i32 {
        self.b.y - self.a.y
    }

    pub fn area(&self) -> i64 {
        self.width() as i64 * self.height() as i64
    }

    /// Integer center (truncated towards zero).
    pub fn center(&self) -> IntVector2 {
        IntVector2::new((self.a.x + self.b.x) / 2, (self.a.y + self.b.y) / 2)
    }

    pub fn translated(&self, offset: IntVector2) -> Self {
        Self {
            a: self.a + offset,
            b: self.b + offset,
        }
    }

    /// Area of the interior intersection with `other`.
    pub fn intersection_area(&self, other: &GridRectangle) -> i64 {
        let w = self.b.x.min(other.b.x) - self.a.x.max(other.a.x);
        let h = self.b.y.min(other.b.y) - self.a.y.max(other.a.y);
        if w <= 0 || h <= 0 {
            0
        } else {
            w as i64 * h as i64
        }
    }

    /// Length of the boundary shared with an adjacent rectangle.
    ///
    /// Only meaningful for interior-disjoint rectangles.
    pub fn contact_length(&self, other: &GridRectangle) -> i64 {
        let mut length = 0;
        if self.b.x == other.a.x || other.b.x == self.a.x {
            let shared = self.b.y.min(other.b.y) - self.a.y.max(other.a.y);
            length += shared.max(0) as i64;
        }
        if self.b.y == other.a.y || other.b.y == self.a.y {
            let shared = self.b.x.min(other.b.x) - self.a.x.max(other.a.x);
            length += shared.max(0) as i64;
        }
        length
    }
}

/// A simple orthogonal polygon with integer vertices.
///
/// Vertices are kept in the order given; edges run between consecutive
/// vertices and from the last vertex back to the first. The bounding
/// rectangle, area and a decomposition into interior-disjoint rectangles are
/// computed once on construction.
///
/// Equality and hashing use the vertex list only.
#[derive(Debug, Clone)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "Vec<IntVector2>", into = "Vec<IntVector2>")
)]
pub struct GridPolygon {
    points: Vec<IntVector2>,
    bounding_rectangle: GridRectangle,
    area: i64,
    rectangles: Vec<GridRectangle>,
}

impl GridPolygon {
    /// Builds a polygon, checking that it is orthogonal and non-degenerate.
    pub fn new(points: Vec<IntVector2>) -> LayoutResult<Self> {
        if points.len() < 4 {
            return Err(LayoutError::Polygon(format!(
                "an orthogonal polygon needs at least 4 vertices, got {}",
                points.len()
            )));
        }

        for (i, &p) in points.iter().enumerate() {
            let q = points[(i + 1) % points.len()];
            let horizontal = p.y == q.y && p.x != q.x;
            let vertical = p.x == q.x && p.y != q.y;
            if !horizontal && !vertical {
                return Err(LayoutError::Polygon(format!(
                    "edge {p} -> {q} is not axis-aligned or has zero length"
                )));
            }
        }

        let rectangles = decompose(&points);
        let area: i64 = rectangles.iter().map(GridRectangle::area).sum();
        if area <= 0 {
            return Err(LayoutError::Polygon("polygon has no interior".into()));
        }
        if area != shoelace_area(&points) {
            return Err(LayoutError::Polygon("polygon is self-intersecting".into()));
        }

        let min_x = points.iter().map(|p| p.x).min().unwrap_or(0);
        let min_y = points.iter().map(|p| p.y).min().unwrap_or(0);
        let max_x = points.iter().map(|p| p.x).max().unwrap_or(0);
        let max_y = points.iter().map(|p| p.y).max().unwrap_or(0);

        Ok(Self {
            points,
            bounding_rectangle: GridRectangle::new(
                IntVector2::new(min_x, min_y),
                IntVector2::new(max_x, max_y),
            ),
            area,
            rectangles,
        })
    }

    /// Axis-aligned `width` x `height` rectangle with its min corner at the origin.
    pub fn rectangle(width: i32, height: i32) -> LayoutResult<Self> {
        if width <= 0 || height <= 0 {
            return Err(LayoutError::Polygon(format!(
                "rectangle sides must be positive, got {width}x{height}"
            )));
        }
        Self::new(vec![
            IntVector2::new(0, 0),
            IntVector2::new(0, height),
            IntVector2::new(width, height),
            IntVector2::new(width, 0),
        ])
    }

    pub fn points(&self) -> &[IntVector2] {
        &self.points
    }

    pub fn bounding_rectangle(&self) -> GridRectangle {
        self.bounding_rectangle
    }

    pub fn area(&self) -> i64 {
        self.area
    }

    /// Interior-disjoint rectangles covering the polygon.
    pub fn rectangles(&self) -> &[GridRectangle] {
        &self.rectangles
    }

    /// Boundary segments in vertex order.
    pub fn lines(&self) -> Vec<IntLine> {
        let n = self.points.len();
        (0..n)
            .map(|i| IntLine::new(self.points[i], self.points[(i + 1) % n]))
            .collect()
    }
}

impl PartialEq for GridPolygon {
    fn eq(&self, other: &Self) -> bool {
        self.points == other.points
    }
}

impl Eq for GridPolygon {}

impl Hash for GridPolygon {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.points.hash(state);
    }
}

impl TryFrom<Vec<IntVector2>> for GridPolygon {
    type Error = LayoutError;

    fn try_from(points: Vec<IntVector2>) -> LayoutResult<Self> {
        Self::new(points)
    }
}

impl From<GridPolygon> for Vec<IntVector2> {
    fn from(polygon: GridPolygon) -> Self {
        polygon.points
    }
}

/// Horizontal slab decomposition: between consecutive distinct y values,
/// vertical edges spanning the slab alternate between entering and leaving
/// the interior.
fn decompose(points: &[IntVector2]) -> Vec<GridRectangle> {
    let n = points.len();
    let mut ys: Vec<i32> = points.iter().map(|p| p.y).collect();
    ys.sort_unstable();
    ys.dedup();

    let mut rectangles = Vec::new();
    for slab in ys.windows(2) {
        let (y0, y1) = (slab[0], slab[1]);
        let mut xs: Vec<i32> = (0..n)
            .filter_map(|i| {
                let p = points[i];
                let q = points[(i + 1) % n];
                let spans = p.x == q.x && p.y.min(q.y) <= y0 && p.y.max(q.y) >= y1;
                spans.then_some(p.x)
            })
            .collect();
        xs.sort_unstable();

        for pair in xs.chunks_exact(2) {
            if pair[0] < pair[1] {
                rectangles.push(GridRectangle::new(
                    IntVector2::new(pair[0], y0),
                    IntVector2::new(pair[1], y1),
                ));
            }
        }
    }
    rectangles
}

fn shoelace_area(points: &[IntVector2]) -> i64 {
    let n = points.len();
    let twice: i64 = (0..n)
        .map(|i| {
            let p = points[i];
            let q = points[(i + 1) % n];
            p.x as i64 * q.y as i64 - q.x as i64 * p.y as i64
        })
        .sum();
    twice.abs() / 2
}
