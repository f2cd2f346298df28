//! The closed set of footprint primitives.
//!
//! Every element is an immutable value. Changes are expressed as derivations
//! (`with_*`, [`Smd::at`], [`Smd::circle`]) that return a new value and leave
//! the receiver untouched, so a pad can be reused as a template any number of
//! times.
//!
//! # Variants
//!
//! | Element | Record tags |
//! |---|---|
//! | [`Rect`] | `Rect`, `Outline`, `Courtyard`, `Fabrication`, `Paste`, `Mask` |
//! | [`Line`] | `Line` |
//! | [`Text`] | `Text`, `Name`, `Reference` |
//! | [`Smd`] | `Smd` |
//! | [`Pad`] | `Pad`, `Hole` |
//! | [`Model`] | `Model` |

mod line;
mod model;
mod pad;
mod shape;
mod text;

pub use line::{DEFAULT_LINE_WIDTH, Line};
pub use model::Model;
pub use pad::{Pad, PadKind, PadName, PadShape, Smd};
pub use shape::{Rect, RectKind};
pub use text::{REFERENCE_PLACEHOLDER, Text, TextKind};

use crate::geometry::Bounds;

/// One primitive of a footprint.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Rect(Rect),
    Line(Line),
    Text(Text),
    Smd(Smd),
    Pad(Pad),
    Model(Model),
}

impl Element {
    /// Returns the variant name emitted as the record tag.
    ///
    /// Layer-specialized rectangles, text fields and holes report their own
    /// tag rather than the shared representation's.
    pub fn variant_name(&self) -> &'static str {
        match self {
            Self::Rect(rect) => rect.kind().name(),
            Self::Line(_) => "Line",
            Self::Text(text) => text.kind().name(),
            Self::Smd(_) => "Smd",
            Self::Pad(pad) => pad.kind().name(),
            Self::Model(_) => "Model",
        }
    }

    /// Returns the extent of the element in the footprint frame.
    ///
    /// Models have no extent and return `None`.
    pub fn bounds(&self) -> Option<Bounds> {
        match self {
            Self::Rect(rect) => Some(rect.bounds()),
            Self::Line(line) => Some(line.bounds()),
            Self::Text(text) => Some(text.bounds()),
            Self::Smd(smd) => Some(smd.bounds()),
            Self::Pad(pad) => Some(pad.bounds()),
            Self::Model(_) => None,
        }
    }

    /// Returns true for copper pads and holes
    pub fn is_pad(&self) -> bool {
        matches!(self, Self::Smd(_) | Self::Pad(_))
    }
}

/// Returns the combined extent of all elements, or `None` when none has an extent.
pub fn bounds_of(elements: &[Element]) -> Option<Bounds> {
    elements
        .iter()
        .filter_map(Element::bounds)
        .reduce(|acc, bounds| acc.merge(&bounds))
}

impl From<Rect> for Element {
    fn from(rect: Rect) -> Self {
        Self::Rect(rect)
    }
}

impl From<Line> for Element {
    fn from(line: Line) -> Self {
        Self::Line(line)
    }
}

impl From<Text> for Element {
    fn from(text: Text) -> Self {
        Self::Text(text)
    }
}

impl From<Smd> for Element {
    fn from(smd: Smd) -> Self {
        Self::Smd(smd)
    }
}

impl From<Pad> for Element {
    fn from(pad: Pad) -> Self {
        Self::Pad(pad)
    }
}

impl From<Model> for Element {
    fn from(model: Model) -> Self {
        Self::Model(model)
    }
}
