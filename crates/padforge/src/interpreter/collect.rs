//! Conversion of the entry point's return value into elements.

use std::fmt::Write;

use padforge_core::{
    element::Element,
    flatten::{Nested, flatten},
};

use crate::{fault::Fault, value::Value};

/// Flattens a returned element, or a nested list or tuple of elements, in
/// depth-first order. Any other leaf is a shape fault naming its position.
pub(super) fn into_elements(value: Value, max_elements: usize) -> Result<Vec<Element>, Fault> {
    let mut count = 0;
    let nested = to_nested(value, &mut Vec::new(), &mut count, max_elements)?;
    Ok(flatten(nested))
}

fn to_nested(
    value: Value,
    path: &mut Vec<usize>,
    count: &mut usize,
    max_elements: usize,
) -> Result<Nested<Element>, Fault> {
    match value {
        Value::Element(element) => {
            *count += 1;
            if *count > max_elements {
                return Err(Fault::shape(format!(
                    "footprint returned more than {max_elements} elements"
                )));
            }
            Ok(Nested::Leaf(element))
        }
        Value::List(items) | Value::Tuple(items) => {
            let mut children = Vec::with_capacity(items.len());
            for (index, item) in items.into_items().into_iter().enumerate() {
                path.push(index);
                children.push(to_nested(item, path, count, max_elements)?);
                path.pop();
            }
            Ok(Nested::List(children))
        }
        other => Err(Fault::shape(format!(
            "footprint result{} is {}, expected an element",
            render_path(path),
            other.describe()
        ))
        .with_help("return an element or a list of elements from `footprint`")),
    }
}

fn render_path(path: &[usize]) -> String {
    path.iter().fold(String::new(), |mut out, index| {
        let _ = write!(out, "[{index}]");
        out
    })
}
