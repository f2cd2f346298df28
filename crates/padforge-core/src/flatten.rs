//! Normalization of nested results into one ordered sequence.
//!
//! Footprint entry points commonly return lists of lists (`[name, fab] + pads
//! + [lines]`). [`flatten`] walks the structure depth-first, left to right,
//! and keeps the order of first appearance. The walk uses an explicit stack,
//! so nesting depth is not limited by the call stack.

/// An arbitrarily nested list of leaves.
#[derive(Debug, Clone, PartialEq)]
pub enum Nested<T> {
    Leaf(T),
    List(Vec<Nested<T>>),
}

impl<T> From<T> for Nested<T> {
    fn from(leaf: T) -> Self {
        Self::Leaf(leaf)
    }
}

impl<T> FromIterator<Nested<T>> for Nested<T> {
    fn from_iter<I: IntoIterator<Item = Nested<T>>>(iter: I) -> Self {
        Self::List(iter.into_iter().collect())
    }
}

/// Flattens `nested` into its leaves in depth-first, left-to-right order.
///
/// A bare leaf becomes a one-element sequence and empty lists contribute
/// nothing.
///
/// # Examples
///
/// ```
/// # use padforge_core::flatten::{flatten, Nested};
/// let nested = Nested::List(vec![
///     Nested::Leaf('a'),
///     Nested::List(vec![Nested::Leaf('b'), Nested::List(vec![Nested::Leaf('c'), Nested::Leaf('d')])]),
///     Nested::Leaf('e'),
/// ]);
/// assert_eq!(flatten(nested), vec!['a', 'b', 'c', 'd', 'e']);
/// ```
pub fn flatten<T>(nested: Nested<T>) -> Vec<T> {
    let mut leaves = Vec::new();
    let mut stack = vec![vec![nested].into_iter()];

    while let Some(top) = stack.last_mut() {
        match top.next() {
            Some(Nested::Leaf(leaf)) => leaves.push(leaf),
            Some(Nested::List(items)) => stack.push(items.into_iter()),
            None => {
                stack.pop();
            }
        }
    }

    leaves
}
