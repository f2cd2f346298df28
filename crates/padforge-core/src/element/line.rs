//! Straight line segments.

use crate::{
    geometry::{Bounds, Point},
    layer,
};

/// Stroke width of a line created without an explicit width.
pub const DEFAULT_LINE_WIDTH: f64 = 0.12;

/// A stroked segment from `(x1, y1)` to `(x2, y2)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
    w: f64,
    layer: String,
}

impl Line {
    /// Creates a silkscreen line between two points with the default stroke width
    pub fn new(start: Point, end: Point) -> Self {
        Self {
            x1: start.x(),
            y1: start.y(),
            x2: end.x(),
            y2: end.y(),
            w: DEFAULT_LINE_WIDTH,
            layer: layer::F_SILKS.to_string(),
        }
    }

    pub fn x1(&self) -> f64 {
        self.x1
    }

    pub fn y1(&self) -> f64 {
        self.y1
    }

    pub fn x2(&self) -> f64 {
        self.x2
    }

    pub fn y2(&self) -> f64 {
        self.y2
    }

    pub fn w(&self) -> f64 {
        self.w
    }

    pub fn layer(&self) -> &str {
        &self.layer
    }

    pub fn start(&self) -> Point {
        Point::new(self.x1, self.y1)
    }

    pub fn end(&self) -> Point {
        Point::new(self.x2, self.y2)
    }

    pub fn with_x1(mut self, x1: f64) -> Self {
        self.x1 = x1;
        self
    }

    pub fn with_y1(mut self, y1: f64) -> Self {
        self.y1 = y1;
        self
    }

    pub fn with_x2(mut self, x2: f64) -> Self {
        self.x2 = x2;
        self
    }

    pub fn with_y2(mut self, y2: f64) -> Self {
        self.y2 = y2;
        self
    }

    pub fn with_w(mut self, w: f64) -> Self {
        self.w = w;
        self
    }

    pub fn with_layer(mut self, layer: impl Into<String>) -> Self {
        self.layer = layer.into();
        self
    }

    /// Returns the extent of the stroked segment
    pub fn bounds(&self) -> Bounds {
        Bounds::new_from_corners(self.start(), self.end()).expand(self.w / 2.0)
    }
}
