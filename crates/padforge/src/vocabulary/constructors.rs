//! Element constructors and pad layout generators.
//!
//! Required arguments build the element; every optional argument is then
//! applied as a field write, so `FFab(4.5, 5, corner=0.4)` behaves like
//! `let fab = FFab(4.5, 5); fab.corner = 0.4;`.

use padforge_core::{
    element::{
        Element, Line, Model, Pad, PadKind, REFERENCE_PLACEHOLDER, Rect, RectKind, Smd, Text,
        TextKind,
    },
    geometry::{Point, Size},
    layout,
};

use super::args::{Args, Bound};
use crate::{
    fault::Fault,
    sandbox::Sandbox,
    value::{Value, set_field},
};

/// Writes every remaining bound argument onto `element` as a field.
fn apply_fields(mut element: Element, bound: Bound) -> Result<Value, Fault> {
    for (field, value) in bound.into_values() {
        element = set_field(element, &field, &value)?;
    }
    Ok(Value::Element(element))
}

pub(super) fn rect(kind: RectKind, args: Args) -> Result<Value, Fault> {
    let mut bound = args.bind(
        kind.name(),
        &["dx", "dy", "x", "y", "w", "filled", "layer", "corner"],
    )?;
    let size = Size::new(bound.require_number("dx")?, bound.require_number("dy")?);
    apply_fields(Element::Rect(Rect::new(kind, size)), bound)
}

pub(super) fn line(args: Args) -> Result<Value, Fault> {
    let mut bound = args.bind("Line", &["p1", "p2", "w", "layer"])?;
    let (x1, y1) = bound.require_pair("p1")?;
    let (x2, y2) = bound.require_pair("p2")?;
    let line = Line::new(Point::new(x1, y1), Point::new(x2, y2));
    apply_fields(Element::Line(line), bound)
}

pub(super) fn text(kind: TextKind, args: Args) -> Result<Value, Fault> {
    let mut bound = args.bind(kind.name(), &["txt", "dy", "x", "y", "w", "layer"])?;
    let txt = match kind {
        TextKind::Reference => match bound.take("txt") {
            Some(value) => value.to_str("txt")?.to_string(),
            None => REFERENCE_PLACEHOLDER.to_string(),
        },
        TextKind::Text | TextKind::Name => bound.require_str("txt")?,
    };
    apply_fields(Element::Text(Text::new(kind, txt)), bound)
}

/// `Smd(name, size)` or `Smd(name, pos, size)`.
pub(super) fn smd(args: Args) -> Result<Value, Fault> {
    let params: &[&str] = if args.positional_len() == 2 {
        &["name", "size", "x", "y", "shape", "layers", "pos"]
    } else {
        &["name", "pos", "size", "x", "y", "shape", "layers"]
    };
    let mut bound = args.bind("Smd", params)?;
    let name = bound.require_pad_name("name")?;
    let (dx, dy) = bound.require_pair("size")?;
    let mut smd = Smd::new(name, Size::new(dx, dy));
    if let Some((x, y)) = bound.pair("pos")? {
        smd = smd.with_x(x).with_y(y);
    }
    apply_fields(Element::Smd(smd), bound)
}

pub(super) fn pad(kind: PadKind, args: Args) -> Result<Value, Fault> {
    let params: &[&str] = match kind {
        PadKind::Pad => &["name", "d", "drill", "x", "y", "plated", "layers"],
        PadKind::Hole => &["name", "d", "drill", "x", "y", "layers"],
    };
    let mut bound = args.bind(kind.name(), params)?;
    let name = bound.require_pad_name("name")?;
    let d = bound.require_number("d")?;
    let drill = bound.require_number("drill")?;
    let pad = match kind {
        PadKind::Pad => Pad::new(name, d, drill),
        PadKind::Hole => Pad::hole(name, d, drill),
    };
    apply_fields(Element::Pad(pad), bound)
}

pub(super) fn model(args: Args) -> Result<Value, Fault> {
    let mut bound = args.bind("Model", &["filename"])?;
    Ok(Value::Element(Element::Model(Model::new(
        bound.require_str("filename")?,
    ))))
}

fn template(bound: &mut Bound) -> Result<Element, Fault> {
    match bound.require("template")? {
        Value::Element(element) => Ok(element),
        other => Err(Fault::runtime(format!(
            "layout template must be an Smd, Pad or Hole, got {}",
            other.type_name()
        ))),
    }
}

fn layout_result(
    sandbox: &mut Sandbox,
    count: usize,
    place: impl FnOnce() -> Result<Vec<Element>, layout::LayoutError>,
) -> Result<Value, Fault> {
    sandbox.check_len(count)?;
    sandbox.charge(u64::try_from(count).unwrap_or(u64::MAX))?;
    let pads = place().map_err(|err| Fault::runtime(err.to_string()))?;
    Ok(Value::from(pads))
}

/// `dual(template, span_x, pitch_y, count, name=none)`
pub(super) fn dual(args: Args, sandbox: &mut Sandbox) -> Result<Value, Fault> {
    let mut bound = args.bind("dual", &["template", "span_x", "pitch_y", "count", "name"])?;
    let template = template(&mut bound)?;
    let span_x = bound.require_number("span_x")?;
    let pitch_y = bound.require_number("pitch_y")?;
    let count = bound.require_count("count")?;
    let name = bound.pad_name("name")?;
    layout_result(sandbox, count, || {
        layout::dual_element(&template, span_x, pitch_y, count, name.as_ref())
    })
}

/// `single(template, pitch_y, count, name=none)`
pub(super) fn single(args: Args, sandbox: &mut Sandbox) -> Result<Value, Fault> {
    let mut bound = args.bind("single", &["template", "pitch_y", "count", "name"])?;
    let template = template(&mut bound)?;
    let pitch_y = bound.require_number("pitch_y")?;
    let count = bound.require_count("count")?;
    let name = bound.pad_name("name")?;
    layout_result(sandbox, count, || {
        layout::single_element(&template, pitch_y, count, name.as_ref())
    })
}
