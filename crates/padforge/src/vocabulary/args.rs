//! Call arguments and their binding to parameter names.

use indexmap::IndexMap;

use padforge_core::element::PadName;

use crate::{fault::Fault, value::Value};

/// Evaluated arguments of one call, positional first.
#[derive(Debug, Default)]
pub(crate) struct Args {
    positional: Vec<Value>,
    keywords: IndexMap<String, Value>,
}

impl Args {
    #[cfg(test)]
    pub fn new(positional: Vec<Value>) -> Self {
        Self {
            positional,
            keywords: IndexMap::new(),
        }
    }

    pub fn positional_len(&self) -> usize {
        self.positional.len()
    }

    pub fn push_positional(&mut self, value: Value) {
        self.positional.push(value);
    }

    pub fn push_keyword(&mut self, name: &str, value: Value) -> Result<(), Fault> {
        if self.keywords.insert(name.to_string(), value).is_some() {
            return Err(Fault::runtime(format!(
                "keyword argument `{name}` given more than once"
            )));
        }
        Ok(())
    }

    /// Returns the positional arguments of a call that takes no keywords.
    pub fn into_positional(self, callee: &str) -> Result<Vec<Value>, Fault> {
        if let Some(name) = self.keywords.keys().next() {
            return Err(Fault::runtime(format!(
                "`{callee}` got an unexpected keyword argument `{name}`"
            )));
        }
        Ok(self.positional)
    }

    /// Matches arguments to `params`: positional arguments in order, then
    /// keywords by name.
    pub fn bind<S: AsRef<str>>(self, callee: &str, params: &[S]) -> Result<Bound, Fault> {
        if self.positional.len() > params.len() {
            return Err(Fault::runtime(format!(
                "`{callee}` takes at most {} arguments, got {}",
                params.len(),
                self.positional.len()
            )));
        }

        let mut values: IndexMap<String, Value> = params
            .iter()
            .zip(self.positional)
            .map(|(param, value)| (param.as_ref().to_string(), value))
            .collect();

        for (name, value) in self.keywords {
            if !params.iter().any(|param| param.as_ref() == name) {
                return Err(Fault::runtime(format!(
                    "`{callee}` got an unexpected keyword argument `{name}`"
                )));
            }
            if values.contains_key(&name) {
                return Err(Fault::runtime(format!(
                    "`{callee}` got multiple values for argument `{name}`"
                )));
            }
            values.insert(name, value);
        }

        Ok(Bound {
            callee: callee.to_string(),
            values,
        })
    }
}

/// Arguments matched to parameter names.
#[derive(Debug)]
pub(crate) struct Bound {
    callee: String,
    values: IndexMap<String, Value>,
}

impl Bound {
    pub fn take(&mut self, name: &str) -> Option<Value> {
        self.values.shift_remove(name)
    }

    pub fn require(&mut self, name: &str) -> Result<Value, Fault> {
        self.take(name).ok_or_else(|| {
            Fault::runtime(format!(
                "`{}` is missing required argument `{name}`",
                self.callee
            ))
        })
    }

    pub fn require_number(&mut self, name: &str) -> Result<f64, Fault> {
        self.require(name)?.to_number(name)
    }

    pub fn require_str(&mut self, name: &str) -> Result<String, Fault> {
        match self.require(name)? {
            Value::Str(text) => Ok(text),
            other => other.to_str(name).map(str::to_string),
        }
    }

    pub fn require_pair(&mut self, name: &str) -> Result<(f64, f64), Fault> {
        self.require(name)?.to_pair(name)
    }

    pub fn pair(&mut self, name: &str) -> Result<Option<(f64, f64)>, Fault> {
        self.take(name).map(|value| value.to_pair(name)).transpose()
    }

    pub fn require_pad_name(&mut self, name: &str) -> Result<PadName, Fault> {
        self.require(name)?.to_pad_name(name)
    }

    /// Optional pad name; `none` counts as absent
    pub fn pad_name(&mut self, name: &str) -> Result<Option<PadName>, Fault> {
        match self.take(name) {
            None | Some(Value::None) => Ok(None),
            Some(value) => value.to_pad_name(name).map(Some),
        }
    }

    /// Reads a non-negative integer count
    pub fn require_count(&mut self, name: &str) -> Result<usize, Fault> {
        match self.require(name)? {
            Value::Int(count) => usize::try_from(count).map_err(|_| {
                Fault::runtime(format!("`{name}` must not be negative, got {count}"))
            }),
            other => Err(Fault::runtime(format!(
                "`{name}` expects an int, got {}",
                other.type_name()
            ))),
        }
    }

    /// Returns the bound values in parameter order
    pub fn into_values(self) -> impl Iterator<Item = (String, Value)> {
        self.values.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(positional: Vec<Value>, keywords: &[(&str, Value)]) -> Args {
        let mut args = Args::new(positional);
        for (name, value) in keywords {
            args.push_keyword(name, value.clone()).expect("distinct keywords");
        }
        args
    }

    #[test]
    fn test_positional_then_keywords() {
        let mut bound = args(vec![Value::Int(4)], &[("dy", Value::Float(5.0))])
            .bind("FFab", &["dx", "dy", "corner"])
            .expect("binds");
        assert_eq!(bound.require_number("dx").ok(), Some(4.0));
        assert_eq!(bound.require_number("dy").ok(), Some(5.0));
        assert!(bound.take("corner").is_none());
    }

    #[test]
    fn test_binding_errors() {
        let err = args(vec![Value::Int(1); 3], &[])
            .bind("Model", &["filename"])
            .expect_err("too many");
        assert_eq!(err.message(), "`Model` takes at most 1 arguments, got 3");

        let err = args(vec![], &[("size", Value::None)])
            .bind("Model", &["filename"])
            .expect_err("unknown keyword");
        assert!(err.message().contains("unexpected keyword argument `size`"));

        let err = args(vec![Value::Int(1)], &[("dx", Value::Int(2))])
            .bind("Rect", &["dx", "dy"])
            .expect_err("duplicate");
        assert!(err.message().contains("multiple values for argument `dx`"));

        let mut repeated = Args::default();
        repeated.push_keyword("w", Value::Int(1)).expect("first");
        assert!(repeated.push_keyword("w", Value::Int(2)).is_err());
    }

    #[test]
    fn test_missing_required() {
        let mut bound = Args::default().bind("Smd", &["name"]).expect("binds");
        let err = bound.require_pad_name("name").expect_err("missing");
        assert_eq!(err.message(), "`Smd` is missing required argument `name`");
    }

    #[test]
    fn test_counts() {
        let mut bound = args(vec![Value::Int(-1), Value::Float(2.0)], &[])
            .bind("dual", &["a", "b"])
            .expect("binds");
        assert!(bound.require_count("a").is_err());
        assert!(bound.require_count("b").is_err());
    }
}
