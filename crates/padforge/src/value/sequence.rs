use std::rc::Rc;

use super::Value;
use crate::{fault::Fault, sandbox::Sandbox};

/// Items of a list or tuple.
///
/// Items are shared until first written, so copying a sequence is cheap.
/// The nesting depth is tracked on every write so limits can be checked
/// without walking the contents.
#[derive(Debug, Clone)]
pub struct Sequence {
    items: Rc<Vec<Value>>,
    depth: usize,
}

impl Sequence {
    pub fn new(items: Vec<Value>) -> Self {
        let depth = 1 + items.iter().map(Value::depth).max().unwrap_or(0);
        Self {
            items: Rc::new(items),
            depth,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether both sequences still share one item buffer
    pub fn shares_items(&self, other: &Sequence) -> bool {
        Rc::ptr_eq(&self.items, &other.items)
    }

    pub fn items(&self) -> &[Value] {
        &self.items
    }

    /// Depth of the deepest nesting, counting this sequence as one
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Resolves a possibly negative index counted from the end
    pub fn resolve_index(&self, index: i64) -> Option<usize> {
        let len = i64::try_from(self.len()).ok()?;
        let resolved = if index < 0 { index + len } else { index };
        (0..len)
            .contains(&resolved)
            .then(|| usize::try_from(resolved).ok())
            .flatten()
    }

    pub fn get(&self, index: i64) -> Option<&Value> {
        self.resolve_index(index).map(|index| &self.items[index])
    }

    /// Applies `f` to the item at `index` in place, or returns `None` if
    /// the index is out of range.
    pub fn update<T>(&mut self, index: i64, f: impl FnOnce(&mut Value) -> T) -> Option<T> {
        let index = self.resolve_index(index)?;
        let item = Rc::make_mut(&mut self.items).get_mut(index)?;
        let result = f(item);
        let item_depth = item.depth();
        self.depth = self.depth.max(item_depth + 1);
        Some(result)
    }

    pub fn push(&mut self, value: Value) {
        self.depth = self.depth.max(value.depth() + 1);
        Rc::make_mut(&mut self.items).push(value);
    }

    pub fn pop(&mut self) -> Option<Value> {
        Rc::make_mut(&mut self.items).pop()
    }

    /// Position of the first item equal to `value`
    pub(crate) fn position(
        &self,
        value: &Value,
        sandbox: &mut Sandbox,
    ) -> Result<Option<usize>, Fault> {
        for (position, item) in self.items.iter().enumerate() {
            if item.equals(value, sandbox)? {
                return Ok(Some(position));
            }
        }
        Ok(None)
    }

    /// Removes the first item equal to `value`, returning whether one was found
    pub(crate) fn remove_first(
        &mut self,
        value: &Value,
        sandbox: &mut Sandbox,
    ) -> Result<bool, Fault> {
        let Some(position) = self.position(value, sandbox)? else {
            return Ok(false);
        };
        Rc::make_mut(&mut self.items).remove(position);
        Ok(true)
    }

    pub fn extend(&mut self, other: &Sequence) {
        self.depth = self.depth.max(other.depth);
        Rc::make_mut(&mut self.items).extend(other.items.iter().cloned());
    }

    /// Returns `self` followed by `other`
    pub fn concat(&self, other: &Sequence) -> Sequence {
        let mut result = self.clone();
        result.extend(other);
        result
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.items.iter()
    }

    /// Takes the items out, copying only if they are still shared
    pub fn into_items(self) -> Vec<Value> {
        Rc::try_unwrap(self.items).unwrap_or_else(|shared| (*shared).clone())
    }
}

impl Default for Sequence {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl PartialEq for Sequence {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.items, &other.items) || self.items == other.items
    }
}

impl FromIterator<Value> for Sequence {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
