//! Geometric primitives for footprint coordinates and extents.
//!
//! # Overview
//!
//! - [`Point`] - A 2D coordinate in the footprint frame
//! - [`Size`] - Width and height dimensions
//! - [`Bounds`] - An axis-aligned box defined by minimum and maximum coordinates
//!
//! # Coordinate System
//!
//! Coordinates are relative to the footprint's placement point and follow the
//! usual PCB convention:
//!
//! ```text
//!          -Y
//!           ▲
//!           │
//!   -X ◄────┼────► +X
//!           │
//!           ▼
//!          +Y
//! ```
//!
//! Units are not interpreted; in practice they are millimeters.

/// A 2D point in the footprint frame.
///
/// # Examples
///
/// ```
/// # use padforge_core::geometry::{Point, Size};
/// let pad = Point::new(-2.5, 0.75).to_bounds(Size::new(1.0, 0.5));
/// assert_eq!(pad.min_x(), -3.0);
/// assert_eq!(pad.max_y(), 1.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    x: f64,
    y: f64,
}

impl Point {
    /// Creates a new point with the specified coordinates
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns the x-coordinate of the point
    pub fn x(self) -> f64 {
        self.x
    }

    /// Returns the y-coordinate of the point
    pub fn y(self) -> f64 {
        self.y
    }

    /// Builds the box of the given size centered on this point
    pub fn to_bounds(self, size: Size) -> Bounds {
        let half_width = size.width / 2.0;
        let half_height = size.height / 2.0;
        Bounds {
            min_x: self.x - half_width,
            min_y: self.y - half_height,
            max_x: self.x + half_width,
            max_y: self.y + half_height,
        }
    }
}

/// Width and height of an element
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    width: f64,
    height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Returns the width dimension of this size
    pub fn width(self) -> f64 {
        self.width
    }

    /// Returns the height dimension of this size
    pub fn height(self) -> f64 {
        self.height
    }
}

/// An axis-aligned bounding box with minimum and maximum coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    min_x: f64,
    min_y: f64,
    max_x: f64,
    max_y: f64,
}

impl Bounds {
    /// Creates the smallest bounds containing both corner points, in any order
    pub fn new_from_corners(a: Point, b: Point) -> Self {
        Self {
            min_x: a.x.min(b.x),
            min_y: a.y.min(b.y),
            max_x: a.x.max(b.x),
            max_y: a.y.max(b.y),
        }
    }

    /// Returns the minimum x-coordinate of the bounds
    pub fn min_x(self) -> f64 {
        self.min_x
    }

    /// Returns the minimum y-coordinate of the bounds
    pub fn min_y(self) -> f64 {
        self.min_y
    }

    /// Returns the maximum x-coordinate of the bounds
    pub fn max_x(self) -> f64 {
        self.max_x
    }

    /// Returns the maximum y-coordinate of the bounds
    pub fn max_y(self) -> f64 {
        self.max_y
    }

    /// Returns the width of the bounds
    pub fn width(self) -> f64 {
        self.max_x - self.min_x
    }

    /// Returns the height of the bounds
    pub fn height(self) -> f64 {
        self.max_y - self.min_y
    }

    /// Merges two bounds to create a larger bounds that contains both.
    ///
    /// # Examples
    ///
    /// ```
    /// # use padforge_core::geometry::{Bounds, Point, Size};
    /// let left = Point::new(-2.0, 0.0).to_bounds(Size::new(1.0, 1.0));
    /// let right = Point::new(2.0, 0.0).to_bounds(Size::new(1.0, 3.0));
    ///
    /// let combined = left.merge(&right);
    /// assert_eq!(combined.min_x(), -2.5);
    /// assert_eq!(combined.max_x(), 2.5);
    /// assert_eq!(combined.height(), 3.0);
    /// ```
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// Grows the bounds by `amount` on every side.
    ///
    /// Used to account for stroke widths, which extend half their width past
    /// the nominal outline.
    pub fn expand(&self, amount: f64) -> Self {
        Self {
            min_x: self.min_x - amount,
            min_y: self.min_y - amount,
            max_x: self.max_x + amount,
            max_y: self.max_y + amount,
        }
    }
}


#[cfg(test)]
mod proptest_tests {
    use float_cmp::approx_eq;
    use proptest::prelude::*;

    use super::*;

    // ===================
    // Strategies
    // ===================

    fn point_strategy() -> impl Strategy<Value = Point> {
        (-100.0f64..100.0, -100.0f64..100.0).prop_map(|(x, y)| Point::new(x, y))
    }

    fn bounds_strategy() -> impl Strategy<Value = Bounds> {
        (point_strategy(), 0.01f64..50.0, 0.01f64..50.0)
            .prop_map(|(center, w, h)| center.to_bounds(Size::new(w, h)))
    }

    // ===================
    // Property Test Functions
    // ===================

    /// Merging is commutative: a.merge(b) == b.merge(a).
    fn check_merge_is_commutative(b1: Bounds, b2: Bounds) -> Result<(), TestCaseError> {
        prop_assert_eq!(b1.merge(&b2), b2.merge(&b1));
        Ok(())
    }

    /// The merged bounds enclose both inputs.
    fn check_merge_contains_both(b1: Bounds, b2: Bounds) -> Result<(), TestCaseError> {
        let merged = b1.merge(&b2);
        for inner in [b1, b2] {
            prop_assert!(merged.min_x() <= inner.min_x() && merged.max_x() >= inner.max_x());
            prop_assert!(merged.min_y() <= inner.min_y() && merged.max_y() >= inner.max_y());
        }
        prop_assert!(merged.width() >= b1.width().max(b2.width()));
        Ok(())
    }

    /// A box built around a point keeps the requested size.
    fn check_size_roundtrip(center: Point, w: f64, h: f64) -> Result<(), TestCaseError> {
        let bounds = center.to_bounds(Size::new(w, h));
        prop_assert!(approx_eq!(f64, bounds.width(), w, epsilon = 1e-9));
        prop_assert!(approx_eq!(f64, bounds.height(), h, epsilon = 1e-9));
        Ok(())
    }

    // ===================
    // Proptest Wrappers
    // ===================

    proptest! {
        #[test]
        fn merge_is_commutative(b1 in bounds_strategy(), b2 in bounds_strategy()) {
            check_merge_is_commutative(b1, b2)?;
        }

        #[test]
        fn merge_contains_both(b1 in bounds_strategy(), b2 in bounds_strategy()) {
            check_merge_contains_both(b1, b2)?;
        }

        #[test]
        fn size_roundtrip(center in point_strategy(), w in 0.0f64..50.0, h in 0.0f64..50.0) {
            check_size_roundtrip(center, w, h)?;
        }
    }
}
