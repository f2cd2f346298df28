//! Methods on lists and elements.

use padforge_core::element::{Element, PadShape};

use super::args::Args;
use crate::{
    fault::Fault,
    sandbox::Sandbox,
    value::{Sequence, Value},
};

/// Returns true for methods that change their receiver in place.
pub(crate) fn mutates(method: &str) -> bool {
    matches!(method, "append" | "extend" | "remove" | "pop" | "circle")
}

/// Calls `method` on `receiver`, which mutating methods change in place.
pub(crate) fn call_method(
    receiver: &mut Value,
    method: &str,
    args: Args,
    sandbox: &mut Sandbox,
) -> Result<Value, Fault> {
    match receiver {
        Value::List(items) => list_method(items, method, args, sandbox),
        Value::Element(element) => element_method(element, method, args),
        other => Err(no_method(other.type_name(), method)),
    }
}

fn no_method(type_name: &str, method: &str) -> Fault {
    Fault::runtime(format!("{type_name} has no method `{method}`"))
}

fn one_argument(args: Args, method: &str) -> Result<Value, Fault> {
    let mut positional = args.into_positional(method)?;
    if positional.len() != 1 {
        return Err(Fault::runtime(format!(
            "`{method}` takes 1 argument, got {}",
            positional.len()
        )));
    }
    Ok(positional.remove(0))
}

fn no_arguments(args: Args, method: &str) -> Result<(), Fault> {
    let positional = args.into_positional(method)?;
    if !positional.is_empty() {
        return Err(Fault::runtime(format!(
            "`{method}` takes no arguments, got {}",
            positional.len()
        )));
    }
    Ok(())
}

fn list_method(
    items: &mut Sequence,
    method: &str,
    args: Args,
    sandbox: &mut Sandbox,
) -> Result<Value, Fault> {
    match method {
        "append" => {
            let value = one_argument(args, method)?;
            sandbox.check_len(items.len() + 1)?;
            items.push(value);
            sandbox.check_sequence(items)?;
            Ok(Value::None)
        }
        "extend" => {
            let value = one_argument(args, method)?;
            let (Value::List(other) | Value::Tuple(other)) = value else {
                return Err(Fault::runtime(format!(
                    "`extend` expects a list or tuple, got {}",
                    value.type_name()
                )));
            };
            sandbox.check_len(items.len() + other.len())?;
            sandbox.charge(u64::try_from(other.len()).unwrap_or(u64::MAX))?;
            items.extend(&other);
            Ok(Value::None)
        }
        "remove" => {
            let value = one_argument(args, method)?;
            if items.remove_first(&value, sandbox)? {
                Ok(Value::None)
            } else {
                Err(Fault::runtime(format!("{value} is not in the list")))
            }
        }
        "pop" => {
            no_arguments(args, method)?;
            items
                .pop()
                .ok_or_else(|| Fault::runtime("pop from an empty list"))
        }
        "contains" => {
            let value = one_argument(args, method)?;
            Ok(Value::Bool(items.position(&value, sandbox)?.is_some()))
        }
        _ => Err(no_method("list", method)),
    }
}

fn element_method(element: &mut Element, method: &str, args: Args) -> Result<Value, Fault> {
    match (method, &*element) {
        ("at", Element::Smd(_) | Element::Pad(_)) => {
            let mut bound = args.bind("at", &["name", "x", "y"])?;
            let name = bound.require_pad_name("name")?;
            let x = bound.require_number("x")?;
            let y = bound.require_number("y")?;
            let copy = match &*element {
                Element::Smd(smd) => Element::Smd(smd.at(name, x, y)),
                Element::Pad(pad) => Element::Pad(pad.at(name, x, y)),
                other => other.clone(),
            };
            Ok(Value::Element(copy))
        }
        ("circle", Element::Smd(smd)) => {
            no_arguments(args, method)?;
            let round = smd.clone().with_shape(PadShape::Circle);
            *element = Element::Smd(round);
            Ok(Value::None)
        }
        _ => Err(no_method(element.variant_name(), method)),
    }
}

#[cfg(test)]
mod tests {
    use padforge_core::{element::Smd, geometry::Size};

    use super::*;
    use crate::config::LimitsConfig;

    fn sandbox() -> Sandbox {
        Sandbox::new(LimitsConfig::default())
    }

    fn layers() -> Value {
        Value::List(
            ["F.Cu", "F.Paste", "F.Mask"]
                .into_iter()
                .map(|layer| Value::Str(layer.to_string()))
                .collect(),
        )
    }

    #[test]
    fn test_remove_and_append() {
        let mut sandbox = sandbox();
        let mut value = layers();

        let removed = call_method(
            &mut value,
            "remove",
            Args::new(vec![Value::Str("F.Mask".to_string())]),
            &mut sandbox,
        );
        assert_eq!(removed.ok(), Some(Value::None));

        call_method(&mut value, "append", Args::new(vec![Value::Int(1)]), &mut sandbox)
            .expect("append");
        assert_eq!(value.to_string(), r#"["F.Cu", "F.Paste", 1]"#);

        let err = call_method(
            &mut value,
            "remove",
            Args::new(vec![Value::Str("B.Cu".to_string())]),
            &mut sandbox,
        )
        .expect_err("absent");
        assert_eq!(err.message(), r#""B.Cu" is not in the list"#);
    }

    #[test]
    fn test_append_respects_limits() {
        let mut sandbox = Sandbox::new(LimitsConfig::default().with_max_collection_len(3));
        let mut value = layers();
        let appended = call_method(&mut value, "append", Args::new(vec![Value::None]), &mut sandbox);
        assert!(appended.is_err());
    }

    #[test]
    fn test_circle_mutates_receiver() {
        let mut value = Value::Element(Element::Smd(Smd::new(1i64, Size::new(10.0, 10.0))));
        call_method(&mut value, "circle", Args::default(), &mut sandbox()).expect("circle");
        let Value::Element(Element::Smd(smd)) = &value else {
            panic!("still an Smd");
        };
        assert_eq!(smd.shape(), PadShape::Circle);
    }

    #[test]
    fn test_at_copies() {
        let template = Value::Element(Element::Smd(Smd::new(1i64, Size::new(1.0, 0.5))));
        let mut receiver = template.clone();
        let copy = call_method(
            &mut receiver,
            "at",
            Args::new(vec![Value::Int(2), Value::Float(1.5), Value::Int(-1)]),
            &mut sandbox(),
        )
        .expect("at");
        assert_eq!(receiver, template);
        let Value::Element(Element::Smd(smd)) = copy else {
            panic!("copy is an Smd");
        };
        assert_eq!((smd.x(), smd.y()), (1.5, -1.0));
    }

    #[test]
    fn test_unknown_methods() {
        let mut value = Value::Int(1);
        let err = call_method(&mut value, "append", Args::default(), &mut sandbox())
            .expect_err("ints have no methods");
        assert_eq!(err.message(), "int has no method `append`");

        let mut smd = Value::Element(Element::Smd(Smd::new(1i64, Size::new(1.0, 1.0))));
        assert!(call_method(&mut smd, "extend", Args::default(), &mut sandbox()).is_err());
    }
}
