//! Operators on values.

use std::cmp::Ordering;

use padforge_parser::ast::BinaryOp;

use crate::{
    fault::Fault,
    sandbox::Sandbox,
    value::{Sequence, Value},
};

fn unsupported(op: BinaryOp, left: &Value, right: &Value) -> Fault {
    Fault::runtime(format!(
        "unsupported operand types for {op}: {} and {}",
        left.type_name(),
        right.type_name()
    ))
}

fn overflow(op: BinaryOp) -> Fault {
    Fault::runtime(format!("integer overflow in `{op}`"))
}

fn division_by_zero(op: BinaryOp) -> Fault {
    Fault::runtime(format!("division by zero in `{op}`"))
}

fn cost(len: usize) -> u64 {
    u64::try_from(len).unwrap_or(u64::MAX)
}

pub(super) fn negate(value: Value) -> Result<Value, Fault> {
    match value {
        Value::Int(number) => number
            .checked_neg()
            .map(Value::Int)
            .ok_or_else(|| Fault::runtime("integer overflow in unary `-`")),
        Value::Float(number) => Ok(Value::Float(-number)),
        other => Err(Fault::runtime(format!(
            "bad operand type for unary `-`: {}",
            other.type_name()
        ))),
    }
}

/// Applies an arithmetic or comparison operator. `and`/`or` short-circuit
/// and are evaluated by the interpreter.
pub(super) fn binary(
    op: BinaryOp,
    left: Value,
    right: Value,
    sandbox: &mut Sandbox,
) -> Result<Value, Fault> {
    match op {
        BinaryOp::Add => add(left, right, sandbox),
        BinaryOp::Sub => arithmetic(op, &left, &right, i64::checked_sub, |a, b| a - b),
        BinaryOp::Mul => multiply(left, right, sandbox),
        BinaryOp::Div => divide(&left, &right),
        BinaryOp::Mod => modulo(&left, &right),
        BinaryOp::Eq => Ok(Value::Bool(left.equals(&right, sandbox)?)),
        BinaryOp::Ne => Ok(Value::Bool(!left.equals(&right, sandbox)?)),
        BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => {
            let ordering = compare(op, &left, &right)?;
            let result = match op {
                BinaryOp::Lt => ordering == Some(Ordering::Less),
                BinaryOp::Le => matches!(ordering, Some(Ordering::Less | Ordering::Equal)),
                BinaryOp::Gt => ordering == Some(Ordering::Greater),
                _ => matches!(ordering, Some(Ordering::Greater | Ordering::Equal)),
            };
            Ok(Value::Bool(result))
        }
        BinaryOp::And | BinaryOp::Or => Err(Fault::internal(format!(
            "`{op}` reached the eager operator table"
        ))),
    }
}

fn arithmetic(
    op: BinaryOp,
    left: &Value,
    right: &Value,
    integers: fn(i64, i64) -> Option<i64>,
    floats: fn(f64, f64) -> f64,
) -> Result<Value, Fault> {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => integers(*a, *b)
            .map(Value::Int)
            .ok_or_else(|| overflow(op)),
        _ => match (left.as_f64(), right.as_f64()) {
            (Some(a), Some(b)) => Ok(Value::Float(floats(a, b))),
            _ => Err(unsupported(op, left, right)),
        },
    }
}

fn add(left: Value, right: Value, sandbox: &mut Sandbox) -> Result<Value, Fault> {
    match (left, right) {
        (Value::Str(mut a), Value::Str(b)) => {
            sandbox.check_len(a.len() + b.len())?;
            sandbox.charge(cost(b.len()))?;
            a.push_str(&b);
            Ok(Value::Str(a))
        }
        (Value::List(a), Value::List(b)) => Ok(Value::List(concat(&a, &b, sandbox)?)),
        (Value::Tuple(a), Value::Tuple(b)) => Ok(Value::Tuple(concat(&a, &b, sandbox)?)),
        (left, right) => arithmetic(BinaryOp::Add, &left, &right, i64::checked_add, |a, b| a + b),
    }
}

fn concat(a: &Sequence, b: &Sequence, sandbox: &mut Sandbox) -> Result<Sequence, Fault> {
    let len = a.len() + b.len();
    sandbox.check_len(len)?;
    sandbox.charge(cost(len))?;
    let joined = a.concat(b);
    sandbox.check_sequence(&joined)?;
    Ok(joined)
}

fn multiply(left: Value, right: Value, sandbox: &mut Sandbox) -> Result<Value, Fault> {
    match (left, right) {
        (Value::List(items), Value::Int(times)) | (Value::Int(times), Value::List(items)) => {
            Ok(Value::List(repeat(&items, times, sandbox)?))
        }
        (Value::Str(text), Value::Int(times)) | (Value::Int(times), Value::Str(text)) => {
            let times = usize::try_from(times).unwrap_or(0);
            let len = text.len().saturating_mul(times);
            sandbox.check_len(len)?;
            sandbox.charge(cost(len))?;
            Ok(Value::Str(text.repeat(times)))
        }
        (left, right) => arithmetic(BinaryOp::Mul, &left, &right, i64::checked_mul, |a, b| a * b),
    }
}

fn repeat(items: &Sequence, times: i64, sandbox: &mut Sandbox) -> Result<Sequence, Fault> {
    let times = usize::try_from(times).unwrap_or(0);
    let len = items.len().saturating_mul(times);
    sandbox.check_len(len)?;
    sandbox.charge(cost(len))?;
    Ok((0..times).flat_map(|_| items.iter().cloned()).collect())
}

/// True division; the result is always a float.
fn divide(left: &Value, right: &Value) -> Result<Value, Fault> {
    let (Some(a), Some(b)) = (left.as_f64(), right.as_f64()) else {
        return Err(unsupported(BinaryOp::Div, left, right));
    };
    if b == 0.0 {
        return Err(division_by_zero(BinaryOp::Div));
    }
    Ok(Value::Float(a / b))
}

/// Remainder with the sign of the divisor.
fn modulo(left: &Value, right: &Value) -> Result<Value, Fault> {
    match (left, right) {
        (Value::Int(_), Value::Int(0)) => Err(division_by_zero(BinaryOp::Mod)),
        (Value::Int(a), Value::Int(b)) => {
            let remainder = a.checked_rem(*b).ok_or_else(|| overflow(BinaryOp::Mod))?;
            if remainder != 0 && (remainder < 0) != (*b < 0) {
                Ok(Value::Int(remainder + b))
            } else {
                Ok(Value::Int(remainder))
            }
        }
        _ => {
            let (Some(a), Some(b)) = (left.as_f64(), right.as_f64()) else {
                return Err(unsupported(BinaryOp::Mod, left, right));
            };
            if b == 0.0 {
                return Err(division_by_zero(BinaryOp::Mod));
            }
            let remainder = a % b;
            if remainder != 0.0 && (remainder < 0.0) != (b < 0.0) {
                Ok(Value::Float(remainder + b))
            } else {
                Ok(Value::Float(remainder))
            }
        }
    }
}

/// Orders numbers or strings; `None` when a float operand is NaN.
fn compare(op: BinaryOp, left: &Value, right: &Value) -> Result<Option<Ordering>, Fault> {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => Ok(Some(a.cmp(b))),
        (Value::Str(a), Value::Str(b)) => Ok(Some(a.cmp(b))),
        _ => match (left.as_f64(), right.as_f64()) {
            (Some(a), Some(b)) => Ok(a.partial_cmp(&b)),
            _ => Err(Fault::runtime(format!(
                "cannot compare {} and {} with `{op}`",
                left.type_name(),
                right.type_name()
            ))),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LimitsConfig;

    fn eval(op: BinaryOp, left: Value, right: Value) -> Result<Value, Fault> {
        binary(op, left, right, &mut Sandbox::new(LimitsConfig::default()))
    }

    #[test]
    fn test_integer_arithmetic_stays_integral() {
        assert_eq!(eval(BinaryOp::Add, Value::Int(2), Value::Int(3)).ok(), Some(Value::Int(5)));
        assert_eq!(
            eval(BinaryOp::Mul, Value::Int(2), Value::Float(0.5)).ok(),
            Some(Value::Float(1.0))
        );
        assert!(eval(BinaryOp::Add, Value::Int(i64::MAX), Value::Int(1)).is_err());
    }

    #[test]
    fn test_division_is_true_division() {
        assert_eq!(eval(BinaryOp::Div, Value::Int(7), Value::Int(2)).ok(), Some(Value::Float(3.5)));
        let err = eval(BinaryOp::Div, Value::Int(1), Value::Int(0)).expect_err("zero");
        assert!(err.message().contains("division by zero"));
        assert!(eval(BinaryOp::Mod, Value::Float(1.0), Value::Float(0.0)).is_err());
    }

    #[test]
    fn test_modulo_follows_divisor_sign() {
        assert_eq!(eval(BinaryOp::Mod, Value::Int(-7), Value::Int(3)).ok(), Some(Value::Int(2)));
        assert_eq!(eval(BinaryOp::Mod, Value::Int(7), Value::Int(-3)).ok(), Some(Value::Int(-2)));
        assert_eq!(
            eval(BinaryOp::Mod, Value::Float(-1.5), Value::Int(1)).ok(),
            Some(Value::Float(0.5))
        );
    }

    #[test]
    fn test_sequences() {
        let list = |values: &[i64]| Value::List(values.iter().copied().map(Value::Int).collect());
        assert_eq!(
            eval(BinaryOp::Add, list(&[1]), list(&[2, 3])).ok(),
            Some(list(&[1, 2, 3]))
        );
        assert_eq!(eval(BinaryOp::Mul, list(&[0]), Value::Int(3)).ok(), Some(list(&[0, 0, 0])));
        assert!(eval(BinaryOp::Add, list(&[1]), Value::Int(1)).is_err());
        assert_eq!(
            eval(BinaryOp::Add, Value::Str("F.".into()), Value::Str("Cu".into())).ok(),
            Some(Value::Str("F.Cu".into()))
        );
    }

    #[test]
    fn test_concatenation_respects_limits() {
        let mut sandbox = Sandbox::new(LimitsConfig::default().with_max_collection_len(4));
        let list = Value::List(vec![Value::None; 3].into_iter().collect());
        assert!(binary(BinaryOp::Add, list.clone(), list.clone(), &mut sandbox).is_err());
        assert!(binary(BinaryOp::Mul, list, Value::Int(i64::MAX), &mut sandbox).is_err());
    }

    #[test]
    fn test_comparisons() {
        assert_eq!(eval(BinaryOp::Lt, Value::Int(1), Value::Float(1.5)).ok(), Some(Value::Bool(true)));
        assert_eq!(eval(BinaryOp::Eq, Value::Int(1), Value::Float(1.0)).ok(), Some(Value::Bool(true)));
        assert_eq!(
            eval(BinaryOp::Ge, Value::Str("b".into()), Value::Str("a".into())).ok(),
            Some(Value::Bool(true))
        );
        assert_eq!(
            eval(BinaryOp::Le, Value::Float(f64::NAN), Value::Int(0)).ok(),
            Some(Value::Bool(false))
        );
        assert!(eval(BinaryOp::Lt, Value::Int(1), Value::Str("1".into())).is_err());
    }

    #[test]
    fn test_negate() {
        assert_eq!(negate(Value::Float(0.65)).ok(), Some(Value::Float(-0.65)));
        assert!(negate(Value::Int(i64::MIN)).is_err());
        assert!(negate(Value::Bool(true)).is_err());
    }
}
