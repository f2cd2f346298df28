//! Writable locations: a variable followed by field and index steps.

use padforge_parser::Span;

use crate::{
    fault::Fault,
    sandbox::Sandbox,
    value::{Value, get_field, set_field},
};

#[derive(Debug)]
pub(super) enum Step {
    Field { name: String, span: Span },
    Index { index: i64, span: Span },
}

/// A resolved place such as `pads[0].layers`; index expressions have
/// already been evaluated.
#[derive(Debug)]
pub(super) struct Place {
    pub root: String,
    pub root_span: Span,
    pub steps: Vec<Step>,
}

/// Runs `write` on the value reached by following `steps` from `value`,
/// then writes every changed component back up the path.
///
/// Elements are immutable, so a field step reads the field, updates the
/// copy and stores a derived element in its place.
pub(super) fn update_path<T>(
    value: &mut Value,
    steps: &[Step],
    sandbox: &mut Sandbox,
    write: impl FnOnce(&mut Value, &mut Sandbox) -> Result<T, Fault>,
) -> Result<T, Fault> {
    let Some((step, rest)) = steps.split_first() else {
        return write(value, sandbox);
    };

    match step {
        Step::Field { name, span } => {
            let Value::Element(element) = value else {
                return Err(
                    Fault::runtime(format!("{} has no field `{name}`", value.type_name()))
                        .at(*span),
                );
            };
            let mut field = get_field(element, name).ok_or_else(|| {
                Fault::runtime(format!("{} has no field `{name}`", element.variant_name()))
                    .at(*span)
            })?;
            let result = update_path(&mut field, rest, sandbox, write)?;
            let updated = set_field(element.clone(), name, &field).map_err(|err| err.at(*span))?;
            *value = Value::Element(updated);
            Ok(result)
        }
        Step::Index { index, span } => match value {
            Value::List(items) => {
                let len = items.len();
                items
                    .update(*index, |item| update_path(item, rest, sandbox, write))
                    .unwrap_or_else(|| Err(out_of_range(*index, len).at(*span)))
            }
            other => Err(Fault::runtime(format!(
                "{} does not support item assignment",
                other.type_name()
            ))
            .at(*span)),
        },
    }
}

pub(super) fn out_of_range(index: i64, len: usize) -> Fault {
    Fault::runtime(format!("index {index} is out of range for length {len}"))
}
