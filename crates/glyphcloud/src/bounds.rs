//! Axis-aligned bounds of a point set.

use glam::Vec3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub lower: [f32; 3],
    pub upper: [f32; 3],
}

impl Bounds {
    /// The inverted box `(+∞, -∞)`; any included point makes it valid.
    pub const EMPTY: Self = Self {
        lower: [f32::INFINITY; 3],
        upper: [f32::NEG_INFINITY; 3],
    };

    /// Grows the box to contain `p`.
    #[inline]
    pub fn include(&mut self, p: [f32; 3]) {
        for j in 0..3 {
            self.upper[j] = self.upper[j].max(p[j]);
            self.lower[j] = self.lower[j].min(p[j]);
        }
    }

    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a [f32; 3]>) -> Self {
        let mut b = Self::EMPTY;
        for p in points {
            b.include(*p);
        }
        b
    }

    /// True until at least one point has been included.
    pub fn is_empty(&self) -> bool {
        (0..3).any(|j| self.lower[j] > self.upper[j])
    }

    pub fn center(&self) -> Option<Vec3> {
        (!self.is_empty()).then(|| (Vec3::from(self.lower) + Vec3::from(self.upper)) * 0.5)
    }

    pub fn extent(&self) -> Option<Vec3> {
        (!self.is_empty()).then(|| Vec3::from(self.upper) - Vec3::from(self.lower))
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::EMPTY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_bounds_are_inverted() {
        let b = Bounds::from_points(&[]);
        assert_eq!(b.lower, [f32::INFINITY; 3]);
        assert_eq!(b.upper, [f32::NEG_INFINITY; 3]);
        assert!(b.is_empty());
        assert_eq!(b.center(), None);
    }

    #[test]
    fn test_single_point() {
        let b = Bounds::from_points(&[[1.0, 2.0, 3.0]]);
        assert_eq!(b, Bounds { lower: [1.0, 2.0, 3.0], upper: [1.0, 2.0, 3.0] });
        assert_eq!(b.extent(), Some(Vec3::ZERO));
    }

    #[test]
    fn test_two_points() {
        let b = Bounds::from_points(&[[0.0, 0.0, 0.0], [5.0, -2.0, 9.0]]);
        assert_eq!(b.lower, [0.0, -2.0, 0.0]);
        assert_eq!(b.upper, [5.0, 0.0, 9.0]);
        assert_eq!(b.center(), Some(Vec3::new(2.5, -1.0, 4.5)));
    }
}
