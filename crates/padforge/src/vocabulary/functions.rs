//! General-purpose builtin functions.

use std::{cmp::Ordering, fmt::Write};

use super::args::Args;
use crate::{fault::Fault, sandbox::Sandbox, value::Value};

fn single_argument(args: Args, callee: &str) -> Result<Value, Fault> {
    let mut positional = args.into_positional(callee)?;
    if positional.len() != 1 {
        return Err(Fault::runtime(format!(
            "`{callee}` takes exactly 1 argument, got {}",
            positional.len()
        )));
    }
    Ok(positional.remove(0))
}

fn to_int(value: &Value, what: &str) -> Result<i64, Fault> {
    match value {
        Value::Int(number) => Ok(*number),
        other => Err(Fault::runtime(format!(
            "`{what}` expects an int, got {}",
            other.type_name()
        ))),
    }
}

/// `range(stop)`, `range(start, stop)` or `range(start, stop, step)`
pub(super) fn range(args: Args, sandbox: &mut Sandbox) -> Result<Value, Fault> {
    let positional = args.into_positional("range")?;
    let (start, stop, step) = match positional.as_slice() {
        [stop] => (0, to_int(stop, "stop")?, 1),
        [start, stop] => (to_int(start, "start")?, to_int(stop, "stop")?, 1),
        [start, stop, step] => (
            to_int(start, "start")?,
            to_int(stop, "stop")?,
            to_int(step, "step")?,
        ),
        other => {
            return Err(Fault::runtime(format!(
                "`range` takes 1 to 3 arguments, got {}",
                other.len()
            )));
        }
    };
    if step == 0 {
        return Err(Fault::runtime("`range` step must not be zero"));
    }

    let span = i128::from(stop) - i128::from(start);
    let step_wide = i128::from(step);
    let len = if (span > 0) == (step > 0) && span != 0 {
        (span.abs() + step_wide.abs() - 1) / step_wide.abs()
    } else {
        0
    };
    let len = usize::try_from(len).unwrap_or(usize::MAX);
    sandbox.check_len(len)?;
    sandbox.charge(u64::try_from(len).unwrap_or(u64::MAX))?;

    let items = (0..len)
        .map(|index| Value::Int((i128::from(start) + step_wide * index as i128) as i64))
        .collect();
    Ok(Value::List(items))
}

pub(super) fn len(args: Args) -> Result<Value, Fault> {
    let length = match single_argument(args, "len")? {
        Value::List(items) | Value::Tuple(items) => items.len(),
        Value::Str(text) => text.chars().count(),
        other => {
            return Err(Fault::runtime(format!(
                "`len` expects a list, tuple or str, got {}",
                other.type_name()
            )));
        }
    };
    i64::try_from(length)
        .map(Value::Int)
        .map_err(|_| Fault::runtime("length does not fit in an int"))
}

pub(super) fn abs(args: Args) -> Result<Value, Fault> {
    match single_argument(args, "abs")? {
        Value::Int(number) => number
            .checked_abs()
            .map(Value::Int)
            .ok_or_else(|| Fault::runtime("integer overflow in `abs`")),
        Value::Float(number) => Ok(Value::Float(number.abs())),
        other => Err(Fault::runtime(format!(
            "`abs` expects a number, got {}",
            other.type_name()
        ))),
    }
}

fn compare_numbers(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
        _ => a.as_f64()?.partial_cmp(&b.as_f64()?),
    }
}

/// `min`/`max` over the arguments, or over the items of a single sequence
/// argument. Ties keep the first candidate.
pub(super) fn extremum(args: Args, callee: &str, wanted: Ordering) -> Result<Value, Fault> {
    let mut candidates = args.into_positional(callee)?;
    if let [Value::List(items) | Value::Tuple(items)] = candidates.as_slice() {
        candidates = items.items().to_vec();
    }

    let mut candidates = candidates.into_iter();
    let Some(mut best) = candidates.next() else {
        return Err(Fault::runtime(format!("`{callee}` of an empty sequence")));
    };
    for candidate in candidates {
        let ordering = compare_numbers(&candidate, &best).ok_or_else(|| {
            Fault::runtime(format!(
                "`{callee}` expects numbers, got {} and {}",
                candidate.type_name(),
                best.type_name()
            ))
        })?;
        if ordering == wanted {
            best = candidate;
        }
    }
    if best.as_f64().is_none() {
        return Err(Fault::runtime(format!(
            "`{callee}` expects numbers, got {}",
            best.type_name()
        )));
    }
    Ok(best)
}

/// String form of a value; strings are returned unquoted.
pub(super) fn stringify(args: Args, sandbox: &Sandbox) -> Result<Value, Fault> {
    let value = single_argument(args, "str")?;
    if let Value::Str(_) = value {
        return Ok(value);
    }

    let mut out = LimitedString::new(sandbox.limits().max_collection_len());
    write!(out, "{value}").map_err(|_| {
        Fault::runtime(format!(
            "string form exceeds the limit of {} bytes",
            sandbox.limits().max_collection_len()
        ))
    })?;
    Ok(Value::Str(out.text))
}

pub(super) fn int(args: Args) -> Result<Value, Fault> {
    match single_argument(args, "int")? {
        Value::Int(number) => Ok(Value::Int(number)),
        Value::Bool(flag) => Ok(Value::Int(i64::from(flag))),
        Value::Float(number) => {
            let truncated = number.trunc();
            if truncated.is_finite() && truncated >= i64::MIN as f64 && truncated < i64::MAX as f64
            {
                Ok(Value::Int(truncated as i64))
            } else {
                Err(Fault::runtime(format!("cannot convert {number:?} to an int")))
            }
        }
        Value::Str(text) => text
            .trim()
            .parse::<i64>()
            .map(Value::Int)
            .map_err(|_| Fault::runtime(format!("invalid int literal \"{text}\""))),
        other => Err(Fault::runtime(format!(
            "cannot convert {} to an int",
            other.type_name()
        ))),
    }
}

pub(super) fn float(args: Args) -> Result<Value, Fault> {
    match single_argument(args, "float")? {
        Value::Int(number) => Ok(Value::Float(number as f64)),
        Value::Float(number) => Ok(Value::Float(number)),
        Value::Str(text) => text
            .trim()
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|_| Fault::runtime(format!("invalid float literal \"{text}\""))),
        other => Err(Fault::runtime(format!(
            "cannot convert {} to a float",
            other.type_name()
        ))),
    }
}

/// A string buffer that refuses to grow past a byte limit.
struct LimitedString {
    text: String,
    limit: usize,
}

impl LimitedString {
    fn new(limit: usize) -> Self {
        Self {
            text: String::new(),
            limit,
        }
    }
}

impl Write for LimitedString {
    fn write_str(&mut self, s: &str) -> std::fmt::Result {
        if self.text.len() + s.len() > self.limit {
            return Err(std::fmt::Error);
        }
        self.text.push_str(s);
        Ok(())
    }
}
