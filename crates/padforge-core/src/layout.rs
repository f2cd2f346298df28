//! Generators that place evenly spaced copies of a template pad.
//!
//! Both generators are pure: the template is only read, and the output order
//! is fixed by the pad index.
//!
//! ```text
//!   dual(span_x, pitch_y, 6)          single(pitch_y, 3)
//!
//!     1 ■          ■ 6                      ■ 1
//!     2 ■    ┼     ■ 5                      ┼ 2
//!     3 ■          ■ 4                      ■ 3
//!       ◄── span_x ──►
//! ```

use log::trace;
use thiserror::Error;

use crate::element::{Element, Pad, PadName, Smd};

/// A pad that can be replicated by the layout generators.
pub trait Stamp: Sized {
    /// Returns a copy of `self` with a new identifier and position
    fn stamp(&self, name: PadName, x: f64, y: f64) -> Self;
}

impl Stamp for Smd {
    fn stamp(&self, name: PadName, x: f64, y: f64) -> Self {
        self.at(name, x, y)
    }
}

impl Stamp for Pad {
    fn stamp(&self, name: PadName, x: f64, y: f64) -> Self {
        self.at(name, x, y)
    }
}

impl Stamp for Element {
    /// Stamps pads and holes. Other variants are returned unchanged; use
    /// [`dual_element`] and [`single_element`] to reject them.
    fn stamp(&self, name: PadName, x: f64, y: f64) -> Self {
        match self {
            Self::Smd(smd) => Self::Smd(smd.stamp(name, x, y)),
            Self::Pad(pad) => Self::Pad(pad.stamp(name, x, y)),
            other => other.clone(),
        }
    }
}

/// Errors raised when a layout generator is given an unusable template.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    #[error("layout template must be an Smd, Pad or Hole, got {variant}")]
    NotAPad { variant: &'static str },
}

/// Places `count` copies of `template` in two columns at `x = ±span_x / 2`.
///
/// The left column is numbered top to bottom starting at 1, the right column
/// continues bottom to top. Each column holds `count / 2` pads, so an odd
/// `count` yields one pad fewer than requested. When `name` is given every
/// copy shares it.
pub fn dual<T: Stamp>(
    template: &T,
    span_x: f64,
    pitch_y: f64,
    count: usize,
    name: Option<&PadName>,
) -> Vec<T> {
    let half = count / 2;
    let total_span = pitch_y * count as f64 / 2.0;
    trace!(count, half, total_span; "Dual layout");

    let identifier = |index: usize| {
        name.cloned()
            .unwrap_or_else(|| PadName::Number(index as i64 + 1))
    };

    let left = (0..half).map(|i| {
        let y = -total_span / 2.0 + pitch_y / 2.0 + pitch_y * i as f64;
        template.stamp(identifier(i), -span_x / 2.0, y)
    });
    let right = (0..half).map(|i| {
        let y = total_span / 2.0 - pitch_y / 2.0 - pitch_y * i as f64;
        template.stamp(identifier(i + half), span_x / 2.0, y)
    });

    left.chain(right).collect()
}

/// Places `count` copies of `template` in one column at `x = 0`, numbered top
/// to bottom starting at 1 unless `name` is given.
pub fn single<T: Stamp>(
    template: &T,
    pitch_y: f64,
    count: usize,
    name: Option<&PadName>,
) -> Vec<T> {
    let total_span = pitch_y * count as f64;
    trace!(count, total_span; "Single layout");

    (0..count)
        .map(|i| {
            let y = -total_span / 2.0 + pitch_y / 2.0 + pitch_y * i as f64;
            let identifier = name
                .cloned()
                .unwrap_or_else(|| PadName::Number(i as i64 + 1));
            template.stamp(identifier, 0.0, y)
        })
        .collect()
}

fn check_template(template: &Element) -> Result<(), LayoutError> {
    if template.is_pad() {
        Ok(())
    } else {
        Err(LayoutError::NotAPad {
            variant: template.variant_name(),
        })
    }
}

/// [`dual`] over an arbitrary element, rejecting templates that are not pads.
pub fn dual_element(
    template: &Element,
    span_x: f64,
    pitch_y: f64,
    count: usize,
    name: Option<&PadName>,
) -> Result<Vec<Element>, LayoutError> {
    check_template(template)?;
    Ok(dual(template, span_x, pitch_y, count, name))
}

/// [`single`] over an arbitrary element, rejecting templates that are not pads.
pub fn single_element(
    template: &Element,
    pitch_y: f64,
    count: usize,
    name: Option<&PadName>,
) -> Result<Vec<Element>, LayoutError> {
    check_template(template)?;
    Ok(single(template, pitch_y, count, name))
}
