//! Axis-aligned integer segments.

use super::vector::IntVector2;

/// An axis-aligned segment between two grid points.
///
/// Orientation matters for equality: `a -> b` and `b -> a` are different
/// lines. Use [`IntLine::switch_orientation`] to compare regardless of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IntLine {
    pub from: IntVector2,
    pub to: IntVector2,
}

impl IntLine {
    pub const fn new(from: IntVector2, to: IntVector2) -> Self {
        Self { from, to }
    }

    /// Length of the segment. Exact for axis-aligned lines.
    pub fn length(&self) -> i32 {
        IntVector2::manhattan_distance(self.from, self.to)
    }

    /// Unit step from `from` towards `to`.
    pub fn direction(&self) -> IntVector2 {
        (self.to - self.from).signum()
    }

    pub fn is_horizontal(&self) -> bool {
        self.from.y == self.to.y
    }

    /// Moves `from` forward by `from_amount` and `to` backward by `to_amount`.
    pub fn shrink(&self, from_amount: i32, to_amount: i32) -> IntLine {
        let direction = self.direction();
        IntLine::new(
            self.from + direction.scaled(from_amount),
            self.to - direction.scaled(to_amount),
        )
    }

    /// Shrinks both ends by the same amount.
    pub fn shrink_uniform(&self, amount: i32) -> IntLine {
        self.shrink(amount, amount)
    }

    pub fn switch_orientation(&self) -> IntLine {
        IntLine::new(self.to, self.from)
    }

    pub fn translated(&self, offset: IntVector2) -> IntLine {
        IntLine::new(self.from + offset, self.to + offset)
    }

    /// All sub-segments of `length`, ordered from `from` to `to`.
    pub fn sub_segments(&self, length: i32) -> Vec<IntLine> {
        let total = self.length();
        if length <= 0 || length > total {
            return Vec::new();
        }
        (0..=total - length)
            .map(|i| self.shrink(i, total - length - i))
            .collect()
    }
}
