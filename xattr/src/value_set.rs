use std::mem;

use crate::value::TypedValue;

/// Values of an attribute.
///
/// `Single` always holds exactly one value. `Multi` holds any number, including
/// none. The two are distinct states: `Multi` with one element is not `Single`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueSet {
    Single(TypedValue),
    Multi(Vec<TypedValue>),
}

impl ValueSet {
    /// One value decodes to `Single`, anything else to `Multi`.
    pub fn from_vec(mut values: Vec<TypedValue>) -> Self {
        match values.pop() {
            Some(value) if values.is_empty() => ValueSet::Single(value),
            Some(value) => {
                values.push(value);
                ValueSet::Multi(values)
            }
            None => ValueSet::Multi(values),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ValueSet::Single(_) => 1,
            ValueSet::Multi(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_single(&self) -> bool {
        matches!(self, ValueSet::Single(_))
    }

    pub fn get(&self, index: usize) -> Option<&TypedValue> {
        self.as_slice().get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut TypedValue> {
        self.as_mut_slice().get_mut(index)
    }

    /// Appends `value`. A `Single` is promoted to `Multi` holding the previous
    /// value followed by the new one.
    pub fn push(&mut self, value: TypedValue) {
        *self = match mem::replace(self, ValueSet::Multi(Vec::new())) {
            ValueSet::Single(first) => ValueSet::Multi(vec![first, value]),
            ValueSet::Multi(mut values) => {
                values.push(value);
                ValueSet::Multi(values)
            }
        };
    }

    pub fn as_slice(&self) -> &[TypedValue] {
        match self {
            ValueSet::Single(value) => std::slice::from_ref(value),
            ValueSet::Multi(values) => values,
        }
    }

    pub fn as_mut_slice(&mut self) -> &mut [TypedValue] {
        match self {
            ValueSet::Single(value) => std::slice::from_mut(value),
            ValueSet::Multi(values) => values,
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TypedValue> {
        self.as_slice().iter()
    }

    pub fn into_vec(self) -> Vec<TypedValue> {
        match self {
            ValueSet::Single(value) => vec![value],
            ValueSet::Multi(values) => values,
        }
    }
}

impl<'a> IntoIterator for &'a ValueSet {
    type Item = &'a TypedValue;
    type IntoIter = std::slice::Iter<'a, TypedValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl IntoIterator for ValueSet {
    type Item = TypedValue;
    type IntoIter = std::vec::IntoIter<TypedValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.into_vec().into_iter()
    }
}
