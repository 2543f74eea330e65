//! Integer 2D vectors.

use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub};

/// A point or offset on the integer grid.
///
/// Ordering is lexicographic on `(x, y)`; the generator relies on it to
/// enumerate candidate positions in a reproducible order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IntVector2 {
    pub x: i32,
    pub y: i32,
}

impl IntVector2 {
    pub const ZERO: IntVector2 = IntVector2 { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Manhattan (L1) distance between two points.
    pub fn manhattan_distance(a: IntVector2, b: IntVector2) -> i32 {
        (a.x - b.x).abs() + (a.y - b.y).abs()
    }

    /// Component-wise sign, i.e. the unit step from the origin towards `self`.
    pub fn signum(self) -> Self {
        Self::new(self.x.signum(), self.y.signum())
    }

    pub fn scaled(self, factor: i32) -> Self {
        Self::new(self.x * factor, self.y * factor)
    }
}

impl Add for IntVector2 {
    type Output = IntVector2;

    fn add(self, rhs: IntVector2) -> IntVector2 {
        IntVector2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for IntVector2 {
    fn add_assign(&mut self, rhs: IntVector2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for IntVector2 {
    type Output = IntVector2;

    fn sub(self, rhs: IntVector2) -> IntVector2 {
        IntVector2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Neg for IntVector2 {
    type Output = IntVector2;

    fn neg(self) -> IntVector2 {
        IntVector2::new(-self.x, -self.y)
    }
}

impl fmt::Display for IntVector2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.x, self.y)
    }
}

impl From<(i32, i32)> for IntVector2 {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}
