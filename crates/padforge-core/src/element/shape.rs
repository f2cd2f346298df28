//! Rectangles and their layer-specialized forms.

use std::{fmt, str::FromStr};

use crate::{
    geometry::{Bounds, Point, Size},
    layer,
};

// =============================================================================
// Type Definitions
// =============================================================================

/// Which flavor of rectangle an element is.
///
/// Every flavor shares the same attributes; they differ only in their
/// default layer, stroke width and fill, and in the record tag they emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RectKind {
    /// Generic rectangle on the silkscreen
    Rect,
    /// Silkscreen outline
    Outline,
    /// Courtyard keep-out boundary
    Courtyard,
    /// Fabrication-layer body outline
    Fabrication,
    /// Filled paste aperture
    Paste,
    /// Filled mask opening
    Mask,
}

/// An axis-aligned rectangle centered on `(x, y)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Rect {
    kind: RectKind,
    x: f64,
    y: f64,
    dx: f64,
    dy: f64,
    w: f64,
    filled: bool,
    layer: String,
    corner: f64,
}

// =============================================================================
// Implementations
// =============================================================================

impl RectKind {
    /// Returns the record tag of this flavor
    pub fn name(self) -> &'static str {
        match self {
            Self::Rect => "Rect",
            Self::Outline => "Outline",
            Self::Courtyard => "Courtyard",
            Self::Fabrication => "Fabrication",
            Self::Paste => "Paste",
            Self::Mask => "Mask",
        }
    }

    /// Returns the layer a new rectangle of this flavor is placed on
    pub fn default_layer(self) -> &'static str {
        match self {
            Self::Rect | Self::Outline => layer::F_SILKS,
            Self::Courtyard => layer::F_CRTYD,
            Self::Fabrication => layer::F_FAB,
            Self::Paste => layer::F_PASTE,
            Self::Mask => layer::F_MASK,
        }
    }

    /// Returns the stroke width a new rectangle of this flavor starts with
    pub fn default_width(self) -> f64 {
        match self {
            Self::Rect | Self::Outline => 0.12,
            Self::Courtyard => 0.05,
            Self::Fabrication => 0.1,
            Self::Paste | Self::Mask => 0.0,
        }
    }

    /// Returns whether a new rectangle of this flavor is filled
    pub fn default_filled(self) -> bool {
        matches!(self, Self::Paste | Self::Mask)
    }
}

impl fmt::Display for RectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RectKind {
    type Err = String;

    /// Accepts the record tags and the layer-named aliases (`FSilkS`, `FFab`, ...).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Rect" => Ok(Self::Rect),
            "Outline" | "FSilkS" => Ok(Self::Outline),
            "Courtyard" | "FCrtYd" | "CrtYd" => Ok(Self::Courtyard),
            "Fabrication" | "FFab" => Ok(Self::Fabrication),
            "Paste" | "FPaste" => Ok(Self::Paste),
            "Mask" | "FMask" => Ok(Self::Mask),
            _ => Err(format!("unknown rectangle kind `{s}`")),
        }
    }
}

impl Rect {
    /// Creates a rectangle of the given flavor and size at the origin, with
    /// the flavor's default layer, stroke width and fill.
    pub fn new(kind: RectKind, size: Size) -> Self {
        Self {
            kind,
            x: 0.0,
            y: 0.0,
            dx: size.width(),
            dy: size.height(),
            w: kind.default_width(),
            filled: kind.default_filled(),
            layer: kind.default_layer().to_string(),
            corner: 0.0,
        }
    }

    pub fn kind(&self) -> RectKind {
        self.kind
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

    /// Returns the stroke width
    pub fn w(&self) -> f64 {
        self.w
    }

    pub fn filled(&self) -> bool {
        self.filled
    }

    pub fn layer(&self) -> &str {
        &self.layer
    }

    /// Returns the corner chamfer of the outline
    pub fn corner(&self) -> f64 {
        self.corner
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
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

    pub fn with_w(mut self, w: f64) -> Self {
        self.w = w;
        self
    }

    pub fn with_filled(mut self, filled: bool) -> Self {
        self.filled = filled;
        self
    }

    pub fn with_layer(mut self, layer: impl Into<String>) -> Self {
        self.layer = layer.into();
        self
    }

    pub fn with_corner(mut self, corner: f64) -> Self {
        self.corner = corner;
        self
    }

    /// Returns the outline extent including half the stroke width
    pub fn bounds(&self) -> Bounds {
        self.position()
            .to_bounds(Size::new(self.dx, self.dy))
            .expand(self.w / 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_per_kind() {
        let fab = Rect::new(RectKind::Fabrication, Size::new(4.5, 5.0));
        assert_eq!(fab.layer(), "F.Fab");
        assert_eq!(fab.w(), 0.1);
        assert!(!fab.filled());
        assert_eq!(fab.corner(), 0.0);

        let courtyard = Rect::new(RectKind::Courtyard, Size::new(1.0, 1.0));
        assert_eq!(courtyard.layer(), "F.CrtYd");
        assert_eq!(courtyard.w(), 0.05);

        let paste = Rect::new(RectKind::Paste, Size::new(2.46, 2.31));
        assert_eq!(paste.layer(), "F.Paste");
        assert_eq!(paste.w(), 0.0);
        assert!(paste.filled());

        let mask = Rect::new(RectKind::Mask, Size::new(2.46, 2.31));
        assert_eq!(mask.layer(), "F.Mask");
        assert!(mask.filled());

        let outline = Rect::new(RectKind::Outline, Size::new(1.0, 1.0));
        assert_eq!(outline.layer(), "F.SilkS");
        assert_eq!(outline.w(), 0.12);
    }

    #[test]
    fn test_kind_from_aliases() {
        assert_eq!("FFab".parse::<RectKind>(), Ok(RectKind::Fabrication));
        assert_eq!("FCrtYd".parse::<RectKind>(), Ok(RectKind::Courtyard));
        assert_eq!("CrtYd".parse::<RectKind>(), Ok(RectKind::Courtyard));
        assert_eq!("FSilkS".parse::<RectKind>(), Ok(RectKind::Outline));
        assert_eq!("Mask".parse::<RectKind>(), Ok(RectKind::Mask));
        assert!("Circle".parse::<RectKind>().is_err());
    }

    #[test]
    fn test_derivations_leave_source_untouched() {
        let fab = Rect::new(RectKind::Fabrication, Size::new(8.0, 8.0));
        let chamfered = fab.clone().with_corner(0.4).with_y(1.0);
        assert_eq!(fab.corner(), 0.0);
        assert_eq!(fab.y(), 0.0);
        assert_eq!(chamfered.corner(), 0.4);
        assert_eq!(chamfered.y(), 1.0);
    }

    #[test]
    fn test_bounds_include_half_stroke() {
        let rect = Rect::new(RectKind::Rect, Size::new(2.0, 1.0)).with_w(0.5);
        let bounds = rect.bounds();
        assert_eq!(bounds.min_x(), -1.25);
        assert_eq!(bounds.max_y(), 0.75);
    }
}
