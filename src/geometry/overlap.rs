//! Overlap and touch tests between positioned polygons.

use super::line::IntLine;
use super::polygon::GridPolygon;
use super::vector::IntVector2;

/// Pairwise overlap queries for polygons placed at integer offsets.
///
/// All queries work on the rectangle decompositions cached in
/// [`GridPolygon`], after a bounding-rectangle rejection test.
#[derive(Debug, Clone, Copy, Default)]
pub struct GridPolygonOverlap;

impl GridPolygonOverlap {
    /// Area of the interior intersection of `a` at `pa` and `b` at `pb`.
    pub fn overlap_area(
        &self,
        a: &GridPolygon,
        pa: IntVector2,
        b: &GridPolygon,
        pb: IntVector2,
    ) -> i64 {
        let ba = a.bounding_rectangle().translated(pa);
        let bb = b.bounding_rectangle().translated(pb);
        if ba.intersection_area(&bb) == 0 {
            return 0;
        }

        a.rectangles()
            .iter()
            .map(|r1| {
                let r1 = r1.translated(pa);
                b.rectangles()
                    .iter()
                    .map(|r2| r1.intersection_area(&r2.translated(pb)))
                    .sum::<i64>()
            })
            .sum()
    }

    pub fn do_overlap(&self, a: &GridPolygon, pa: IntVector2, b: &GridPolygon, pb: IntVector2) -> bool {
        self.overlap_area(a, pa, b, pb) > 0
    }

    /// Total length of boundary shared by the two polygons.
    ///
    /// Assumes the polygons do not overlap; for overlapping polygons the
    /// value only counts edge-to-edge contacts between decomposition
    /// rectangles.
    pub fn contact_length(
        &self,
        a: &GridPolygon,
        pa: IntVector2,
        b: &GridPolygon,
        pb: IntVector2,
    ) -> i64 {
        let ba = a.bounding_rectangle().translated(pa);
        let bb = b.bounding_rectangle().translated(pb);
        if ba.b.x < bb.a.x || bb.b.x < ba.a.x || ba.b.y < bb.a.y || bb.b.y < ba.a.y {
            return 0;
        }

        a.rectangles()
            .iter()
            .map(|r1| {
                let r1 = r1.translated(pa);
                b.rectangles()
                    .iter()
                    .map(|r2| r1.contact_length(&r2.translated(pb)))
                    .sum::<i64>()
            })
            .sum()
    }

    /// Length of the longest straight contact lying on a single edge of each
    /// polygon.
    ///
    /// Separate contacts are never added up, so a polygon pressed into a
    /// notch scores its longest side of contact, not the sum of both.
    pub fn longest_contact(
        &self,
        a: &GridPolygon,
        pa: IntVector2,
        b: &GridPolygon,
        pb: IntVector2,
    ) -> i64 {
        let ba = a.bounding_rectangle().translated(pa);
        let bb = b.bounding_rectangle().translated(pb);
        if ba.b.x < bb.a.x || bb.b.x < ba.a.x || ba.b.y < bb.a.y || bb.b.y < ba.a.y {
            return 0;
        }

        let lines_a = a.lines();
        let lines_b: Vec<IntLine> = b.lines().iter().map(|l| l.translated(pb)).collect();
        lines_a
            .iter()
            .map(|l| l.translated(pa))
            .flat_map(|la| lines_b.iter().map(move |lb| shared_length(&la, lb)))
            .max()
            .unwrap_or(0)
    }

    /// Whether the polygons share a boundary segment of positive length.
    pub fn do_touch(&self, a: &GridPolygon, pa: IntVector2, b: &GridPolygon, pb: IntVector2) -> bool {
        self.contact_length(a, pa, b, pb) > 0
    }
}

fn shared_length(a: &IntLine, b: &IntLine) -> i64 {
    let (a_lo, a_hi, b_lo, b_hi) = match (a.is_horizontal(), b.is_horizontal()) {
        (true, true) if a.from.y == b.from.y => (
            a.from.x.min(a.to.x),
            a.from.x.max(a.to.x),
            b.from.x.min(b.to.x),
            b.from.x.max(b.to.x),
        ),
        (false, false) if a.from.x == b.from.x => (
            a.from.y.min(a.to.y),
            a.from.y.max(a.to.y),
            b.from.y.min(b.to.y),
            b.from.y.max(b.to.y),
        ),
        _ => return 0,
    };
    i64::from((a_hi.min(b_hi) - a_lo.max(b_lo)).max(0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(size: i32) -> GridPolygon {
        GridPolygon::rectangle(size, size).unwrap()
    }

    #[test]
    fn test_overlap_area() {
        let overlap = GridPolygonOverlap;
        let a = square(2);
        let b = square(2);
        assert_eq!(overlap.overlap_area(&a, IntVector2::ZERO, &b, IntVector2::ZERO), 4);
        assert_eq!(overlap.overlap_area(&a, IntVector2::ZERO, &b, IntVector2::new(1, 1)), 1);
        assert_eq!(overlap.overlap_area(&a, IntVector2::ZERO, &b, IntVector2::new(2, 0)), 0);
        assert!(!overlap.do_overlap(&a, IntVector2::ZERO, &b, IntVector2::new(5, 5)));
    }

    #[test]
    fn test_touch() {
        let overlap = GridPolygonOverlap;
        let a = square(1);
        assert!(overlap.do_touch(&a, IntVector2::ZERO, &a, IntVector2::new(1, 0)));
        assert!(overlap.do_touch(&a, IntVector2::ZERO, &a, IntVector2::new(0, -1)));
        // corner contact only
        assert!(!overlap.do_touch(&a, IntVector2::ZERO, &a, IntVector2::new(1, 1)));
        assert!(!overlap.do_touch(&a, IntVector2::ZERO, &a, IntVector2::new(2, 0)));
    }

    #[test]
    fn test_l_shape_contact() {
        let overlap = GridPolygonOverlap;
        let l = GridPolygon::new(vec![
            IntVector2::new(0, 0),
            IntVector2::new(0, 3),
            IntVector2::new(1, 3),
            IntVector2::new(1, 1),
            IntVector2::new(3, 1),
            IntVector2::new(3, 0),
        ])
        .unwrap();
        let filler = square(2);

        // the 2x2 square fills the notch exactly
        let notch = IntVector2::new(1, 1);
        assert_eq!(overlap.overlap_area(&l, IntVector2::ZERO, &filler, notch), 0);
        assert_eq!(overlap.contact_length(&l, IntVector2::ZERO, &filler, notch), 4);
        // two sides of 2, not one of 4
        assert_eq!(overlap.longest_contact(&l, IntVector2::ZERO, &filler, notch), 2);
        assert_eq!(overlap.longest_contact(&filler, notch, &l, IntVector2::ZERO), 2);
    }

    #[test]
    fn test_longest_contact() {
        let overlap = GridPolygonOverlap;
        let a = square(3);
        let b = GridPolygon::rectangle(2, 5).unwrap();
        assert_eq!(overlap.longest_contact(&a, IntVector2::ZERO, &b, IntVector2::new(3, -1)), 3);
        assert_eq!(overlap.longest_contact(&a, IntVector2::ZERO, &b, IntVector2::new(3, 2)), 1);
        assert_eq!(overlap.longest_contact(&a, IntVector2::ZERO, &b, IntVector2::new(3, 3)), 0);
        assert_eq!(overlap.longest_contact(&a, IntVector2::ZERO, &b, IntVector2::new(4, 0)), 0);
    }
}
