//! Values manipulated by footprint scripts.
//!
//! Values have copy semantics: binding, passing or returning a value never
//! lets two names observe each other's writes. Lists and tuples share their
//! items until written (see [`Sequence`]), so copies stay cheap.

mod fields;
mod sequence;

pub use sequence::Sequence;

pub(crate) use fields::{get_field, set_field};

use std::fmt;

use padforge_core::{
    element::{Element, PadName},
    record::Record,
};

use crate::{fault::Fault, sandbox::Sandbox, vocabulary::Builtin};

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Sequence),
    Tuple(Sequence),
    Element(Element),
    /// A script-defined function, by name
    Function(String),
    Builtin(Builtin),
}

impl Value {
    /// Name of the value's type as shown in messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Str(_) => "str",
            Self::List(_) => "list",
            Self::Tuple(_) => "tuple",
            Self::Element(element) => element.variant_name(),
            Self::Function(_) | Self::Builtin(_) => "function",
        }
    }

    /// Nesting depth of lists and tuples; scalars are 0
    pub fn depth(&self) -> usize {
        match self {
            Self::List(items) | Self::Tuple(items) => items.depth(),
            _ => 0,
        }
    }

    /// Script equality: integers and floats compare by numeric value,
    /// sequences item by item. Every compared item is charged to `sandbox`.
    pub(crate) fn equals(&self, other: &Value, sandbox: &mut Sandbox) -> Result<bool, Fault> {
        sandbox.tick()?;
        match (self, other) {
            (Self::Int(a), Self::Float(b)) | (Self::Float(b), Self::Int(a)) => Ok(*a as f64 == *b),
            (Self::List(a), Self::List(b)) | (Self::Tuple(a), Self::Tuple(b)) => {
                if a.shares_items(b) {
                    return Ok(true);
                }
                if a.len() != b.len() {
                    return Ok(false);
                }
                for (x, y) in a.iter().zip(b.iter()) {
                    if !x.equals(y, sandbox)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            _ => Ok(self == other),
        }
    }

    /// Numeric value of an int or float
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(value) => Some(*value as f64),
            Self::Float(value) => Some(*value),
            _ => None,
        }
    }

    /// Reads a finite number, naming `what` in the fault
    pub fn to_number(&self, what: &str) -> Result<f64, Fault> {
        let number = self.as_f64().ok_or_else(|| {
            Fault::runtime(format!(
                "`{what}` expects a number, got {}",
                self.type_name()
            ))
        })?;
        if number.is_finite() {
            Ok(number)
        } else {
            Err(Fault::runtime(format!("`{what}` must be a finite number")))
        }
    }

    pub fn to_bool(&self, what: &str) -> Result<bool, Fault> {
        match self {
            Self::Bool(value) => Ok(*value),
            other => Err(Fault::runtime(format!(
                "`{what}` expects a bool, got {}",
                other.type_name()
            ))),
        }
    }

    pub fn to_str(&self, what: &str) -> Result<&str, Fault> {
        match self {
            Self::Str(value) => Ok(value),
            other => Err(Fault::runtime(format!(
                "`{what}` expects a str, got {}",
                other.type_name()
            ))),
        }
    }

    /// Reads a pad identifier: an int or a str
    pub fn to_pad_name(&self, what: &str) -> Result<PadName, Fault> {
        match self {
            Self::Int(number) => Ok(PadName::Number(*number)),
            Self::Str(text) => Ok(PadName::Text(text.clone())),
            other => Err(Fault::runtime(format!(
                "`{what}` expects an int or str pad name, got {}",
                other.type_name()
            ))),
        }
    }

    /// Reads a pair of numbers given as a list or tuple
    pub fn to_pair(&self, what: &str) -> Result<(f64, f64), Fault> {
        match self {
            Self::List(items) | Self::Tuple(items) if items.len() == 2 => Ok((
                items.items()[0].to_number(what)?,
                items.items()[1].to_number(what)?,
            )),
            other => Err(Fault::runtime(format!(
                "`{what}` expects a pair of numbers, got {}",
                other.describe()
            ))),
        }
    }

    /// Reads a layer list given as a list or tuple of strings
    pub fn to_layers(&self, what: &str) -> Result<Vec<String>, Fault> {
        match self {
            Self::List(items) | Self::Tuple(items) => items
                .iter()
                .map(|item| item.to_str(what).map(str::to_string))
                .collect(),
            other => Err(Fault::runtime(format!(
                "`{what}` expects a list of layer names, got {}",
                other.type_name()
            ))),
        }
    }

    /// Short description for messages: the type, plus the value for scalars
    pub fn describe(&self) -> String {
        match self {
            Self::Bool(_) | Self::Int(_) | Self::Float(_) | Self::Str(_) => {
                format!("{} `{self}`", self.type_name())
            }
            Self::List(items) | Self::Tuple(items) => {
                format!("{} of length {}", self.type_name(), items.len())
            }
            _ => self.type_name().to_string(),
        }
    }
}

impl From<PadName> for Value {
    fn from(name: PadName) -> Self {
        match name {
            PadName::Number(number) => Self::Int(number),
            PadName::Text(text) => Self::Str(text),
        }
    }
}

impl From<Element> for Value {
    fn from(element: Element) -> Self {
        Self::Element(element)
    }
}

impl From<Vec<Element>> for Value {
    fn from(elements: Vec<Element>) -> Self {
        Self::List(elements.into_iter().map(Value::Element).collect())
    }
}

fn write_items(f: &mut fmt::Formatter<'_>, items: &Sequence) -> fmt::Result {
    for (index, item) in items.iter().enumerate() {
        if index > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

/// Script literal form; strings are quoted.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("none"),
            Self::Bool(value) => write!(f, "{value}"),
            Self::Int(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value:?}"),
            Self::Str(value) => write!(f, "{value:?}"),
            Self::List(items) => {
                f.write_str("[")?;
                write_items(f, items)?;
                f.write_str("]")
            }
            Self::Tuple(items) => {
                f.write_str("(")?;
                write_items(f, items)?;
                if items.len() == 1 {
                    f.write_str(",")?;
                }
                f.write_str(")")
            }
            Self::Element(element) => match serde_json::to_string(&Record::from(element)) {
                Ok(json) => f.write_str(&json),
                Err(_) => f.write_str(element.variant_name()),
            },
            Self::Function(name) => write!(f, "<fn {name}>"),
            Self::Builtin(builtin) => write!(f, "<builtin {}>", builtin.name()),
        }
    }
}
