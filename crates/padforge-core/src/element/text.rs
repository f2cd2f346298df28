//! Text labels, including the footprint name and reference designator.

use std::fmt;

use crate::{
    geometry::{Bounds, Point, Size},
    layer,
};

/// Placeholder the CAD tool replaces with the reference designator.
pub const REFERENCE_PLACEHOLDER: &str = "REF**";

/// Width of one glyph relative to the text size, used for extent estimates.
const GLYPH_ASPECT: f64 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextKind {
    /// Free text on the silkscreen
    Text,
    /// The footprint's value/name field, on the fabrication layer
    Name,
    /// The reference designator field, on the silkscreen
    Reference,
}

impl TextKind {
    /// Returns the record tag of this flavor
    pub fn name(self) -> &'static str {
        match self {
            Self::Text => "Text",
            Self::Name => "Name",
            Self::Reference => "Reference",
        }
    }

    pub fn default_layer(self) -> &'static str {
        match self {
            Self::Text | Self::Reference => layer::F_SILKS,
            Self::Name => layer::F_FAB,
        }
    }
}

impl fmt::Display for TextKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A text label centered on `(x, y)`.
///
/// `dy` is the glyph height and `w` the stroke thickness.
#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    kind: TextKind,
    txt: String,
    x: f64,
    y: f64,
    dy: f64,
    w: f64,
    layer: String,
}

impl Text {
    pub fn new(kind: TextKind, txt: impl Into<String>) -> Self {
        Self {
            kind,
            txt: txt.into(),
            x: 0.0,
            y: 0.0,
            dy: 1.0,
            w: 0.15,
            layer: kind.default_layer().to_string(),
        }
    }

    /// Creates the reference designator label
    pub fn reference() -> Self {
        Self::new(TextKind::Reference, REFERENCE_PLACEHOLDER)
    }

    pub fn kind(&self) -> TextKind {
        self.kind
    }

    pub fn txt(&self) -> &str {
        &self.txt
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn dy(&self) -> f64 {
        self.dy
    }

    pub fn w(&self) -> f64 {
        self.w
    }

    pub fn layer(&self) -> &str {
        &self.layer
    }

    pub fn with_txt(mut self, txt: impl Into<String>) -> Self {
        self.txt = txt.into();
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

    pub fn with_dy(mut self, dy: f64) -> Self {
        self.dy = dy;
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

    /// Estimates the extent of the rendered text.
    ///
    /// Glyph metrics depend on the CAD tool's stroke font, so the width is
    /// approximated from the character count.
    pub fn bounds(&self) -> Bounds {
        let chars = self.txt.chars().count() as f64;
        let size = Size::new(chars * self.dy * GLYPH_ASPECT, self.dy);
        Point::new(self.x, self.y)
            .to_bounds(size)
            .expand(self.w / 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_defaults_to_fabrication_layer() {
        let name = Text::new(TextKind::Name, "TSSOP-14");
        assert_eq!(name.txt(), "TSSOP-14");
        assert_eq!(name.layer(), "F.Fab");
        assert_eq!(name.dy(), 1.0);
        assert_eq!(name.w(), 0.15);
    }

    #[test]
    fn test_reference_defaults() {
        let reference = Text::reference();
        assert_eq!(reference.kind(), TextKind::Reference);
        assert_eq!(reference.txt(), "REF**");
        assert_eq!(reference.layer(), "F.SilkS");
    }

    #[test]
    fn test_bounds_scale_with_length() {
        let short = Text::new(TextKind::Text, "AB").bounds();
        let long = Text::new(TextKind::Text, "ABCD").bounds();
        assert!(long.width() > short.width());
        assert_eq!(short.height(), long.height());
    }
}
