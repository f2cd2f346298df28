//! Script access to element attributes (`pad.x`, `ep.layers`, ...).
//!
//! Reads return plain values; writes produce a new element with the field
//! replaced. Every variant also exposes a read-only `t` holding its tag.

use padforge_core::element::{Element, Line, Model, Pad, PadShape, Rect, Smd, Text};

use super::{Sequence, Value};
use crate::fault::Fault;

fn number(value: f64) -> Value {
    Value::Float(value)
}

fn layers(layers: &[String]) -> Value {
    Value::List(layers.iter().cloned().map(Value::Str).collect::<Sequence>())
}

fn shape_name(shape: PadShape) -> Value {
    Value::Str(shape.name().to_string())
}

/// Returns the value of `field` on `element`, or `None` if the variant has
/// no such field.
pub(crate) fn get_field(element: &Element, field: &str) -> Option<Value> {
    if field == "t" {
        return Some(Value::Str(element.variant_name().to_string()));
    }
    match element {
        Element::Rect(rect) => match field {
            "x" => Some(number(rect.x())),
            "y" => Some(number(rect.y())),
            "dx" => Some(number(rect.dx())),
            "dy" => Some(number(rect.dy())),
            "w" => Some(number(rect.w())),
            "filled" => Some(Value::Bool(rect.filled())),
            "layer" => Some(Value::Str(rect.layer().to_string())),
            "corner" => Some(number(rect.corner())),
            _ => None,
        },
        Element::Line(line) => match field {
            "x1" => Some(number(line.x1())),
            "y1" => Some(number(line.y1())),
            "x2" => Some(number(line.x2())),
            "y2" => Some(number(line.y2())),
            "w" => Some(number(line.w())),
            "layer" => Some(Value::Str(line.layer().to_string())),
            _ => None,
        },
        Element::Text(text) => match field {
            "txt" => Some(Value::Str(text.txt().to_string())),
            "x" => Some(number(text.x())),
            "y" => Some(number(text.y())),
            "dy" => Some(number(text.dy())),
            "w" => Some(number(text.w())),
            "layer" => Some(Value::Str(text.layer().to_string())),
            _ => None,
        },
        Element::Smd(smd) => match field {
            "name" => Some(Value::from(smd.name().clone())),
            "x" => Some(number(smd.x())),
            "y" => Some(number(smd.y())),
            "dx" => Some(number(smd.dx())),
            "dy" => Some(number(smd.dy())),
            "shape" => Some(shape_name(smd.shape())),
            "layers" => Some(layers(smd.layers())),
            _ => None,
        },
        Element::Pad(pad) => match field {
            "name" => Some(Value::from(pad.name().clone())),
            "x" => Some(number(pad.x())),
            "y" => Some(number(pad.y())),
            "d" => Some(number(pad.d())),
            "drill" => Some(number(pad.drill())),
            "plated" => Some(Value::Bool(pad.plated())),
            "layers" => Some(layers(pad.layers())),
            _ => None,
        },
        Element::Model(model) => match field {
            "filename" => Some(Value::Str(model.filename().to_string())),
            _ => None,
        },
    }
}

fn parse_shape(value: &Value) -> Result<PadShape, Fault> {
    match value.to_str("shape")? {
        "rect" => Ok(PadShape::Rect),
        "circle" => Ok(PadShape::Circle),
        other => Err(Fault::runtime(format!(
            "unknown pad shape \"{other}\", expected \"rect\" or \"circle\""
        ))),
    }
}

fn set_rect(rect: Rect, field: &str, value: &Value) -> Result<Option<Rect>, Fault> {
    Ok(Some(match field {
        "x" => rect.with_x(value.to_number(field)?),
        "y" => rect.with_y(value.to_number(field)?),
        "dx" => rect.with_dx(value.to_number(field)?),
        "dy" => rect.with_dy(value.to_number(field)?),
        "w" => rect.with_w(value.to_number(field)?),
        "filled" => rect.with_filled(value.to_bool(field)?),
        "layer" => rect.with_layer(value.to_str(field)?),
        "corner" => rect.with_corner(value.to_number(field)?),
        _ => return Ok(None),
    }))
}

fn set_line(line: Line, field: &str, value: &Value) -> Result<Option<Line>, Fault> {
    Ok(Some(match field {
        "x1" => line.with_x1(value.to_number(field)?),
        "y1" => line.with_y1(value.to_number(field)?),
        "x2" => line.with_x2(value.to_number(field)?),
        "y2" => line.with_y2(value.to_number(field)?),
        "w" => line.with_w(value.to_number(field)?),
        "layer" => line.with_layer(value.to_str(field)?),
        _ => return Ok(None),
    }))
}

fn set_text(text: Text, field: &str, value: &Value) -> Result<Option<Text>, Fault> {
    Ok(Some(match field {
        "txt" => text.with_txt(value.to_str(field)?),
        "x" => text.with_x(value.to_number(field)?),
        "y" => text.with_y(value.to_number(field)?),
        "dy" => text.with_dy(value.to_number(field)?),
        "w" => text.with_w(value.to_number(field)?),
        "layer" => text.with_layer(value.to_str(field)?),
        _ => return Ok(None),
    }))
}

fn set_smd(smd: Smd, field: &str, value: &Value) -> Result<Option<Smd>, Fault> {
    Ok(Some(match field {
        "name" => smd.with_name(value.to_pad_name(field)?),
        "x" => smd.with_x(value.to_number(field)?),
        "y" => smd.with_y(value.to_number(field)?),
        "dx" => smd.with_dx(value.to_number(field)?),
        "dy" => smd.with_dy(value.to_number(field)?),
        "shape" => smd.with_shape(parse_shape(value)?),
        "layers" => smd.with_layers(value.to_layers(field)?),
        _ => return Ok(None),
    }))
}

fn set_pad(pad: Pad, field: &str, value: &Value) -> Result<Option<Pad>, Fault> {
    Ok(Some(match field {
        "name" => pad.with_name(value.to_pad_name(field)?),
        "x" => pad.with_x(value.to_number(field)?),
        "y" => pad.with_y(value.to_number(field)?),
        "d" => pad.with_d(value.to_number(field)?),
        "drill" => pad.with_drill(value.to_number(field)?),
        "plated" => pad.with_plated(value.to_bool(field)?),
        "layers" => pad.with_layers(value.to_layers(field)?),
        _ => return Ok(None),
    }))
}

fn set_model(model: Model, field: &str, value: &Value) -> Result<Option<Model>, Fault> {
    Ok(match field {
        "filename" => Some(model.with_filename(value.to_str(field)?)),
        _ => None,
    })
}

/// Returns `element` with `field` replaced by `value`.
pub(crate) fn set_field(element: Element, field: &str, value: &Value) -> Result<Element, Fault> {
    if field == "t" {
        return Err(Fault::runtime("the `t` tag of an element is read-only"));
    }
    let variant = element.variant_name();
    let updated = match element {
        Element::Rect(rect) => set_rect(rect, field, value)?.map(Element::Rect),
        Element::Line(line) => set_line(line, field, value)?.map(Element::Line),
        Element::Text(text) => set_text(text, field, value)?.map(Element::Text),
        Element::Smd(smd) => set_smd(smd, field, value)?.map(Element::Smd),
        Element::Pad(pad) => set_pad(pad, field, value)?.map(Element::Pad),
        Element::Model(model) => set_model(model, field, value)?.map(Element::Model),
    };
    updated.ok_or_else(|| Fault::runtime(format!("{variant} has no field `{field}`")))
}
