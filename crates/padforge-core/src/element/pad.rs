//! Surface-mount and through-hole pads.
//!
//! Pads are the only elements the layout generators replicate, so both
//! [`Smd`] and [`Pad`] carry an [`at`](Smd::at) derivation that produces an
//! independent copy with a new identifier and position.

use std::fmt;

use serde::Serialize;

use crate::{
    geometry::{Bounds, Point, Size},
    layer,
};

// =============================================================================
// Pad identifiers
// =============================================================================

/// The identifier of a pad: a pin number or a free-form name.
///
/// The variant is kept through serialization so numeric identifiers stay
/// JSON integers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PadName {
    Number(i64),
    Text(String),
}

impl fmt::Display for PadName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(number) => write!(f, "{number}"),
            Self::Text(text) => f.write_str(text),
        }
    }
}

impl From<i64> for PadName {
    fn from(number: i64) -> Self {
        Self::Number(number)
    }
}

impl From<&str> for PadName {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for PadName {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

// =============================================================================
// Surface-mount pads
// =============================================================================

/// Copper shape of a surface-mount pad.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PadShape {
    #[default]
    Rect,
    Circle,
}

impl PadShape {
    pub fn name(self) -> &'static str {
        match self {
            Self::Rect => "rect",
            Self::Circle => "circle",
        }
    }
}

/// A surface-mount pad of size `dx` × `dy` centered on `(x, y)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Smd {
    name: PadName,
    x: f64,
    y: f64,
    dx: f64,
    dy: f64,
    shape: PadShape,
    layers: Vec<String>,
}

impl Smd {
    /// Creates a rectangular pad at the origin on the front copper, paste and mask layers
    pub fn new(name: impl Into<PadName>, size: Size) -> Self {
        Self {
            name: name.into(),
            x: 0.0,
            y: 0.0,
            dx: size.width(),
            dy: size.height(),
            shape: PadShape::Rect,
            layers: layer::smd_layers(),
        }
    }

    /// Returns a copy with a new identifier and position.
    ///
    /// # Examples
    ///
    /// ```
    /// # use padforge_core::element::{PadName, Smd};
    /// # use padforge_core::geometry::Size;
    /// let template = Smd::new(1i64, Size::new(1.55, 0.25));
    /// let pad = template.at(7i64, -2.8, 1.5);
    ///
    /// assert_eq!(pad.name(), &PadName::Number(7));
    /// assert_eq!(pad.x(), -2.8);
    /// assert_eq!(template.name(), &PadName::Number(1));
    /// assert_eq!(template.x(), 0.0);
    /// ```
    pub fn at(&self, name: impl Into<PadName>, x: f64, y: f64) -> Self {
        Self {
            name: name.into(),
            x,
            y,
            ..self.clone()
        }
    }

    /// Switches the copper shape to a circle
    pub fn circle(mut self) -> Self {
        self.shape = PadShape::Circle;
        self
    }

    pub fn name(&self) -> &PadName {
        &self.name
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn dx(&self) -> f64 {
        self.dx
    }

    pub fn dy(&self) -> f64 {
        self.dy
    }

    pub fn shape(&self) -> PadShape {
        self.shape
    }

    pub fn layers(&self) -> &[String] {
        &self.layers
    }

    pub fn with_name(mut self, name: impl Into<PadName>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_x(mut self, x: f64) -> Self {
        self.x = x;
        self
    }

    pub fn with_y(mut self, y: f64) -> Self {
        self.y = y;
        self
    }

    pub fn with_dx(mut self, dx: f64) -> Self {
        self.dx = dx;
        self
    }

    pub fn with_dy(mut self, dy: f64) -> Self {
        self.dy = dy;
        self
    }

    pub fn with_shape(mut self, shape: PadShape) -> Self {
        self.shape = shape;
        self
    }

    pub fn with_layers(mut self, layers: Vec<String>) -> Self {
        self.layers = layers;
        self
    }

    pub fn bounds(&self) -> Bounds {
        Point::new(self.x, self.y).to_bounds(Size::new(self.dx, self.dy))
    }
}

// =============================================================================
// Through-hole pads and holes
// =============================================================================

/// Whether a drilled element is a plated pad or a bare mounting hole.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PadKind {
    Pad,
    Hole,
}

impl PadKind {
    /// Returns the record tag of this flavor
    pub fn name(self) -> &'static str {
        match self {
            Self::Pad => "Pad",
            Self::Hole => "Hole",
        }
    }
}

/// A round through-hole pad of diameter `d` with a `drill` bore.
///
/// Holes share the representation and are never plated.
#[derive(Debug, Clone, PartialEq)]
pub struct Pad {
    kind: PadKind,
    name: PadName,
    x: f64,
    y: f64,
    d: f64,
    drill: f64,
    plated: bool,
    layers: Vec<String>,
}

impl Pad {
    /// Creates a plated through-hole pad at the origin
    pub fn new(name: impl Into<PadName>, d: f64, drill: f64) -> Self {
        Self::with_kind(PadKind::Pad, name.into(), d, drill)
    }

    /// Creates a non-plated mounting hole at the origin
    pub fn hole(name: impl Into<PadName>, d: f64, drill: f64) -> Self {
        Self::with_kind(PadKind::Hole, name.into(), d, drill)
    }

    fn with_kind(kind: PadKind, name: PadName, d: f64, drill: f64) -> Self {
        Self {
            kind,
            name,
            x: 0.0,
            y: 0.0,
            d,
            drill,
            plated: kind == PadKind::Pad,
            layers: layer::through_hole_layers(),
        }
    }

    /// Returns a copy with a new identifier and position
    pub fn at(&self, name: impl Into<PadName>, x: f64, y: f64) -> Self {
        Self {
            name: name.into(),
            x,
            y,
            ..self.clone()
        }
    }

    pub fn kind(&self) -> PadKind {
        self.kind
    }

    pub fn name(&self) -> &PadName {
        &self.name
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    /// Returns the copper diameter
    pub fn d(&self) -> f64 {
        self.d
    }

    pub fn drill(&self) -> f64 {
        self.drill
    }

    pub fn plated(&self) -> bool {
        self.plated
    }

    pub fn layers(&self) -> &[String] {
        &self.layers
    }

    pub fn with_name(mut self, name: impl Into<PadName>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_x(mut self, x: f64) -> Self {
        self.x = x;
        self
    }

    pub fn with_y(mut self, y: f64) -> Self {
        self.y = y;
        self
    }

    pub fn with_d(mut self, d: f64) -> Self {
        self.d = d;
        self
    }

    pub fn with_drill(mut self, drill: f64) -> Self {
        self.drill = drill;
        self
    }

    /// Sets the plating of a pad. Holes stay unplated.
    pub fn with_plated(mut self, plated: bool) -> Self {
        self.plated = plated && self.kind == PadKind::Pad;
        self
    }

    pub fn with_layers(mut self, layers: Vec<String>) -> Self {
        self.layers = layers;
        self
    }

    pub fn bounds(&self) -> Bounds {
        Point::new(self.x, self.y).to_bounds(Size::new(self.d, self.d))
    }
}
