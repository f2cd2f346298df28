//! The fixed set of names every evaluation starts with.
//!
//! The vocabulary holds the element constructors, the two layout generators
//! and a few pure helpers. It is the only way a script can produce a value it
//! did not write literally; nothing else from the host is reachable.

mod args;
mod constructors;
mod functions;
mod methods;

pub(crate) use args::Args;
pub(crate) use methods::{call_method, mutates};

use std::{cmp::Ordering, str::FromStr};

use padforge_core::element::{PadKind, RectKind, TextKind};

use crate::{fault::Fault, sandbox::Sandbox, value::Value};

/// A function provided by the engine rather than the script.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Builtin {
    Rect(RectKind),
    Line,
    Text(TextKind),
    Smd,
    Pad(PadKind),
    Model,
    Dual,
    Single,
    Range,
    Len,
    Abs,
    Min,
    Max,
    Str,
    Int,
    Float,
}

impl Builtin {
    /// Resolves a script name, including the layer-named rectangle aliases.
    pub fn lookup(name: &str) -> Option<Self> {
        if let Ok(kind) = RectKind::from_str(name) {
            return Some(Self::Rect(kind));
        }
        let builtin = match name {
            "Line" => Self::Line,
            "Text" => Self::Text(TextKind::Text),
            "Name" => Self::Text(TextKind::Name),
            "Reference" => Self::Text(TextKind::Reference),
            "Smd" => Self::Smd,
            "Pad" => Self::Pad(PadKind::Pad),
            "Hole" => Self::Pad(PadKind::Hole),
            "Model" => Self::Model,
            "dual" => Self::Dual,
            "single" => Self::Single,
            "range" => Self::Range,
            "len" => Self::Len,
            "abs" => Self::Abs,
            "min" => Self::Min,
            "max" => Self::Max,
            "str" => Self::Str,
            "int" => Self::Int,
            "float" => Self::Float,
            _ => return None,
        };
        Some(builtin)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Rect(kind) => kind.name(),
            Self::Line => "Line",
            Self::Text(kind) => kind.name(),
            Self::Smd => "Smd",
            Self::Pad(kind) => kind.name(),
            Self::Model => "Model",
            Self::Dual => "dual",
            Self::Single => "single",
            Self::Range => "range",
            Self::Len => "len",
            Self::Abs => "abs",
            Self::Min => "min",
            Self::Max => "max",
            Self::Str => "str",
            Self::Int => "int",
            Self::Float => "float",
        }
    }

    pub(crate) fn call(self, args: Args, sandbox: &mut Sandbox) -> Result<Value, Fault> {
        match self {
            Self::Rect(kind) => constructors::rect(kind, args),
            Self::Line => constructors::line(args),
            Self::Text(kind) => constructors::text(kind, args),
            Self::Smd => constructors::smd(args),
            Self::Pad(kind) => constructors::pad(kind, args),
            Self::Model => constructors::model(args),
            Self::Dual => constructors::dual(args, sandbox),
            Self::Single => constructors::single(args, sandbox),
            Self::Range => functions::range(args, sandbox),
            Self::Len => functions::len(args),
            Self::Abs => functions::abs(args),
            Self::Min => functions::extremum(args, "min", Ordering::Less),
            Self::Max => functions::extremum(args, "max", Ordering::Greater),
            Self::Str => functions::stringify(args, sandbox),
            Self::Int => functions::int(args),
            Self::Float => functions::float(args),
        }
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;
    use padforge_core::element::{Element, PadName, PadShape};

    use super::*;
    use crate::config::LimitsConfig;

    fn call(name: &str, positional: Vec<Value>, keywords: &[(&str, Value)]) -> Result<Value, Fault> {
        let mut args = Args::new(positional);
        for (keyword, value) in keywords {
            args.push_keyword(keyword, value.clone())?;
        }
        let builtin = Builtin::lookup(name).expect("known builtin");
        builtin.call(args, &mut Sandbox::new(LimitsConfig::default()))
    }

    fn element(value: Result<Value, Fault>) -> Element {
        match value {
            Ok(Value::Element(element)) => element,
            other => panic!("expected an element, got {other:?}"),
        }
    }

    fn pair(a: f64, b: f64) -> Value {
        Value::Tuple([Value::Float(a), Value::Float(b)].into_iter().collect())
    }

    #[test]
    fn test_lookup() {
        assert_eq!(
            Builtin::lookup("FCrtYd"),
            Some(Builtin::Rect(RectKind::Courtyard))
        );
        assert_eq!(Builtin::lookup("Hole"), Some(Builtin::Pad(PadKind::Hole)));
        assert_eq!(Builtin::lookup("dual").map(Builtin::name), Some("dual"));
        assert_eq!(Builtin::lookup("open"), None);
        assert_eq!(Builtin::lookup("footprint"), None);
    }

    #[test]
    fn test_rect_keywords_become_fields() {
        let Element::Rect(rect) = element(call(
            "FFab",
            vec![Value::Float(4.5), Value::Int(5)],
            &[("corner", Value::Float(0.4)), ("y", Value::Int(-1))],
        )) else {
            panic!("FFab builds a Rect");
        };
        assert_eq!(rect.kind(), RectKind::Fabrication);
        assert_approx_eq!(f64, rect.dy(), 5.0);
        assert_approx_eq!(f64, rect.corner(), 0.4);
        assert_approx_eq!(f64, rect.y(), -1.0);
        assert_eq!(rect.layer(), "F.Fab");
    }

    #[test]
    fn test_smd_forms() {
        let Element::Smd(short) = element(call("Smd", vec![Value::Int(1), pair(1.55, 0.25)], &[]))
        else {
            panic!("Smd");
        };
        assert_eq!(short.name(), &PadName::Number(1));
        assert_approx_eq!(f64, short.dx(), 1.55);

        let Element::Smd(long) = element(call(
            "Smd",
            vec![Value::Str("EP".into()), pair(2.6, 8.2), pair(1.0, 1.0)],
            &[("shape", Value::Str("circle".into()))],
        )) else {
            panic!("Smd");
        };
        assert_approx_eq!(f64, long.x(), 2.6);
        assert_approx_eq!(f64, long.y(), 8.2);
        assert_eq!(long.shape(), PadShape::Circle);
    }

    #[test]
    fn test_reference_defaults_placeholder() {
        let Element::Text(text) = element(call("Reference", vec![], &[])) else {
            panic!("Reference builds a Text");
        };
        assert_eq!(text.txt(), "REF**");
        assert!(call("Name", vec![], &[]).is_err());
    }

    #[test]
    fn test_hole_rejects_plated() {
        let args = vec![Value::Int(1), Value::Float(2.0), Value::Float(2.0)];
        assert!(call("Hole", args.clone(), &[("plated", Value::Bool(true))]).is_err());
        let Element::Pad(pad) = element(call("Pad", args, &[("plated", Value::Bool(false))]))
        else {
            panic!("Pad");
        };
        assert!(!pad.plated());
    }

    #[test]
    fn test_dual_builds_pads() {
        let smd = call("Smd", vec![Value::Int(1), pair(1.0, 0.5)], &[]).expect("template");
        let pads = call(
            "dual",
            vec![smd, Value::Float(2.0), Value::Float(1.0), Value::Int(4)],
            &[],
        )
        .expect("dual");
        let Value::List(pads) = pads else {
            panic!("dual returns a list");
        };
        assert_eq!(pads.len(), 4);

        let err = call(
            "single",
            vec![Value::Int(3), Value::Float(1.0), Value::Int(2)],
            &[],
        )
        .expect_err("bad template");
        assert!(err.message().contains("template"));
    }

    #[test]
    fn test_line_requires_points() {
        let line = element(call(
            "Line",
            vec![pair(0.0, 0.0), pair(1.0, 2.0)],
            &[("w", Value::Float(0.2))],
        ));
        let Element::Line(line) = line else {
            panic!("Line");
        };
        assert_approx_eq!(f64, line.w(), 0.2);
        assert!(call("Line", vec![Value::Int(1), pair(1.0, 2.0)], &[]).is_err());
    }
}
