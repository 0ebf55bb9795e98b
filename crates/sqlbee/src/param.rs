//! Ordered parameter storage filled while rendering.

use crate::value::Value;

/// Parameters in the order their `?` placeholders appear in the rendered text.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParamList {
    params: Vec<Value>,
}

impl ParamList {
    /// Create a new empty parameter list.
    pub fn new() -> Self {
        Self { params: Vec::new() }
    }

    /// Add a parameter and return its 1-based position.
    pub fn push(&mut self, value: Value) -> usize {
        self.params.push(value);
        self.params.len()
    }

    /// Get the current parameter count.
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Check if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Append another list's parameters after this one's.
    pub fn append(&mut self, mut other: ParamList) {
        self.params.append(&mut other.params);
    }

    pub fn as_slice(&self) -> &[Value] {
        &self.params
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.params.iter()
    }

    pub fn into_vec(self) -> Vec<Value> {
        self.params
    }
}

impl Extend<Value> for ParamList {
    fn extend<I: IntoIterator<Item = Value>>(&mut self, iter: I) {
        self.params.extend(iter);
    }
}

impl IntoIterator for ParamList {
    type Item = Value;
    type IntoIter = std::vec::IntoIter<Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.params.into_iter()
    }
}

impl<'a> IntoIterator for &'a ParamList {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.params.iter()
    }
}
