//! Plain, JSON-ready records for footprint elements.
//!
//! Each element maps to exactly one [`Record`] through an explicit
//! per-variant conversion. The record tag is emitted as the `t` key:
//!
//! ```json
//! { "t": "Smd", "name": 1, "x": 2.6, "y": 8.2, "dx": 1.0, "dy": 1.0,
//!   "shape": "rect", "layers": ["F.Cu", "F.Paste", "F.Mask"] }
//! ```
//!
//! Measurements are always floats and pad identifiers keep their type, so an
//! integer pin number serializes as a JSON integer. No rounding or unit
//! conversion takes place.

use serde::Serialize;

use crate::element::{
    Element, Line, Model, Pad, PadKind, PadName, PadShape, Rect, RectKind, Smd, Text, TextKind,
};

/// One serialized footprint element, or the fault record that replaces all
/// output when evaluation fails.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "t")]
pub enum Record {
    Rect(RectRecord),
    Outline(RectRecord),
    Courtyard(RectRecord),
    Fabrication(RectRecord),
    Paste(RectRecord),
    Mask(RectRecord),
    Line(LineRecord),
    Text(TextRecord),
    Name(TextRecord),
    Reference(TextRecord),
    Smd(SmdRecord),
    Pad(PadRecord),
    Hole(PadRecord),
    Model(ModelRecord),
    Error { message: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RectRecord {
    pub x: f64,
    pub y: f64,
    pub dx: f64,
    pub dy: f64,
    pub w: f64,
    pub filled: bool,
    pub layer: String,
    pub corner: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineRecord {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub w: f64,
    pub layer: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextRecord {
    pub txt: String,
    pub x: f64,
    pub y: f64,
    pub dy: f64,
    pub w: f64,
    pub layer: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SmdRecord {
    pub name: PadName,
    pub x: f64,
    pub y: f64,
    pub dx: f64,
    pub dy: f64,
    pub shape: PadShape,
    pub layers: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PadRecord {
    pub name: PadName,
    pub x: f64,
    pub y: f64,
    pub d: f64,
    pub drill: f64,
    pub plated: bool,
    pub layers: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelRecord {
    pub filename: String,
}

impl Record {
    /// Creates the fault record carrying a full diagnostic
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }

    /// Returns the `t` tag this record serializes with
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Rect(_) => "Rect",
            Self::Outline(_) => "Outline",
            Self::Courtyard(_) => "Courtyard",
            Self::Fabrication(_) => "Fabrication",
            Self::Paste(_) => "Paste",
            Self::Mask(_) => "Mask",
            Self::Line(_) => "Line",
            Self::Text(_) => "Text",
            Self::Name(_) => "Name",
            Self::Reference(_) => "Reference",
            Self::Smd(_) => "Smd",
            Self::Pad(_) => "Pad",
            Self::Hole(_) => "Hole",
            Self::Model(_) => "Model",
            Self::Error { .. } => "Error",
        }
    }
}

/// Converts an ordered element sequence into records, preserving order
pub fn records(elements: &[Element]) -> Vec<Record> {
    elements.iter().map(Record::from).collect()
}

impl From<&Element> for Record {
    fn from(element: &Element) -> Self {
        match element {
            Element::Rect(rect) => rect_record(rect),
            Element::Line(line) => Self::Line(line_record(line)),
            Element::Text(text) => text_record(text),
            Element::Smd(smd) => Self::Smd(smd_record(smd)),
            Element::Pad(pad) => pad_record(pad),
            Element::Model(model) => Self::Model(model_record(model)),
        }
    }
}

fn rect_record(rect: &Rect) -> Record {
    let record = RectRecord {
        x: rect.x(),
        y: rect.y(),
        dx: rect.dx(),
        dy: rect.dy(),
        w: rect.w(),
        filled: rect.filled(),
        layer: rect.layer().to_string(),
        corner: rect.corner(),
    };
    match rect.kind() {
        RectKind::Rect => Record::Rect(record),
        RectKind::Outline => Record::Outline(record),
        RectKind::Courtyard => Record::Courtyard(record),
        RectKind::Fabrication => Record::Fabrication(record),
        RectKind::Paste => Record::Paste(record),
        RectKind::Mask => Record::Mask(record),
    }
}

fn line_record(line: &Line) -> LineRecord {
    LineRecord {
        x1: line.x1(),
        y1: line.y1(),
        x2: line.x2(),
        y2: line.y2(),
        w: line.w(),
        layer: line.layer().to_string(),
    }
}

fn text_record(text: &Text) -> Record {
    let record = TextRecord {
        txt: text.txt().to_string(),
        x: text.x(),
        y: text.y(),
        dy: text.dy(),
        w: text.w(),
        layer: text.layer().to_string(),
    };
    match text.kind() {
        TextKind::Text => Record::Text(record),
        TextKind::Name => Record::Name(record),
        TextKind::Reference => Record::Reference(record),
    }
}

fn smd_record(smd: &Smd) -> SmdRecord {
    SmdRecord {
        name: smd.name().clone(),
        x: smd.x(),
        y: smd.y(),
        dx: smd.dx(),
        dy: smd.dy(),
        shape: smd.shape(),
        layers: smd.layers().to_vec(),
    }
}

fn pad_record(pad: &Pad) -> Record {
    let record = PadRecord {
        name: pad.name().clone(),
        x: pad.x(),
        y: pad.y(),
        d: pad.d(),
        drill: pad.drill(),
        plated: pad.plated(),
        layers: pad.layers().to_vec(),
    };
    match pad.kind() {
        PadKind::Pad => Record::Pad(record),
        PadKind::Hole => Record::Hole(record),
    }
}

fn model_record(model: &Model) -> ModelRecord {
    ModelRecord {
        filename: model.filename().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;
    use crate::geometry::{Point, Size};

    fn to_json(element: Element) -> Value {
        serde_json::to_value(Record::from(&element)).expect("records serialize")
    }

    #[test]
    fn test_smd_keeps_float_type() {
        let smd = Smd::new(1i64, Size::new(1.0, 1.0)).at(1i64, 2.6, 8.2);
        let value = to_json(smd.into());

        assert_eq!(value["t"], "Smd");
        assert_eq!(value["x"].as_f64(), Some(2.6));
        assert_eq!(value["y"].as_f64(), Some(8.2));
        assert!(value["dx"].is_f64());
        assert!(value["dy"].is_f64());
        assert_eq!(value["dx"].as_f64(), Some(1.0));
        assert!(value["name"].is_i64());

        let text = serde_json::to_string(&Record::from(&Element::from(
            Smd::new(1i64, Size::new(1.0, 1.0)).at(1i64, 2.6, 8.2),
        )))
        .expect("records serialize");
        assert!(text.contains(r#""x":2.6,"y":8.2,"dx":1.0,"dy":1.0"#));
    }

    #[test]
    fn test_smd_record_shape() {
        let value = to_json(Smd::new("EP", Size::new(3.4, 5.0)).circle().into());
        assert_eq!(
            value,
            json!({
                "t": "Smd",
                "name": "EP",
                "x": 0.0,
                "y": 0.0,
                "dx": 3.4,
                "dy": 5.0,
                "shape": "circle",
                "layers": ["F.Cu", "F.Paste", "F.Mask"],
            })
        );
    }

    #[test]
    fn test_rect_kinds_use_their_tag() {
        let value = to_json(
            Rect::new(RectKind::Fabrication, Size::new(4.5, 5.0))
                .with_corner(0.4)
                .into(),
        );
        assert_eq!(
            value,
            json!({
                "t": "Fabrication",
                "x": 0.0,
                "y": 0.0,
                "dx": 4.5,
                "dy": 5.0,
                "w": 0.1,
                "filled": false,
                "layer": "F.Fab",
                "corner": 0.4,
            })
        );
    }

    #[test]
    fn test_text_line_hole_and_model() {
        let reference = to_json(Text::reference().with_y(-3.5).into());
        assert_eq!(reference["t"], "Reference");
        assert_eq!(reference["txt"], "REF**");
        assert_eq!(reference["y"].as_f64(), Some(-3.5));

        let line = to_json(Line::new(Point::new(-2.25, 2.6), Point::new(2.25, 2.6)).into());
        assert_eq!(line["t"], "Line");
        assert_eq!(line["x1"].as_f64(), Some(-2.25));
        assert_eq!(line["w"].as_f64(), Some(0.12));

        let hole = to_json(Pad::hole(1i64, 2.0, 2.0).into());
        assert_eq!(hole["t"], "Hole");
        assert_eq!(hole["plated"], false);
        assert_eq!(hole["layers"], json!(["*.Cu", "*.Mask"]));

        let model = to_json(Model::new("SOT-23.wrl").into());
        assert_eq!(model, json!({"t": "Model", "filename": "SOT-23.wrl"}));
    }

    #[test]
    fn test_error_record() {
        let record = Record::error("runtime: division by zero");
        assert!(record.is_error());
        assert_eq!(record.tag(), "Error");
        assert_eq!(
            serde_json::to_value(&record).expect("records serialize"),
            json!({"t": "Error", "message": "runtime: division by zero"})
        );
    }

    #[test]
    fn test_records_preserve_order() {
        let elements: Vec<Element> = vec![
            Text::new(TextKind::Name, "X").into(),
            Text::reference().into(),
            Smd::new(1i64, Size::new(1.0, 1.0)).into(),
        ];
        let tags: Vec<_> = records(&elements).iter().map(Record::tag).collect();
        assert_eq!(tags, ["Name", "Reference", "Smd"]);
    }
}
