use crate::Scalar;

/// A closed range `[min, max]` on a scalar axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval<S> {
    pub min: S,
    pub max: S,
}

impl<S: Scalar> Interval<S> {
    /// Create a new interval given min and max values.
    pub fn new(min: S, max: S) -> Self {
        Self { min, max }
    }

    /// Build from float literals (scene construction only).
    pub fn from_f32(min: f32, max: f32) -> Self {
        Self::new(S::from_f32(min), S::from_f32(max))
    }

    /// Returns true if x is strictly within the interval (min, max) (exclusive).
    pub fn surrounds(&self, x: S) -> bool {
        self.min < x && x < self.max
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Fixed;

    #[test]
    fn test_interval_surrounds() {
        let interval = Interval::<Fixed>::from_f32(-30.0, -10.0);

        // Exclusive bounds - endpoints NOT included
        assert!(!interval.surrounds(Fixed::from_int(-30)));
        assert!(!interval.surrounds(Fixed::from_int(-10)));

        assert!(interval.surrounds(Fixed::from_int(-20)));
        assert!(interval.surrounds(Fixed::from_f32(-10.01)));

        assert!(!interval.surrounds(Fixed::from_int(-31)));
        assert!(!interval.surrounds(Fixed::ZERO));
    }
}
