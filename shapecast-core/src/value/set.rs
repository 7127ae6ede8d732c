use super::Value;

/// An insertion-ordered collection of unique values.
///
/// Values are not required to be hashable (floats, maps), so uniqueness is
/// checked with `PartialEq`. Equality between sets ignores order.
#[derive(Clone, Debug, Default)]
pub struct VSet {
    items: Vec<Value>,
}

impl VSet {
    /// Creates an empty set.
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Inserts a value, returning `false` if an equal value was already present.
    pub fn insert(&mut self, value: Value) -> bool {
        if self.contains(&value) {
            return false;
        }
        self.items.push(value);
        true
    }

    /// Returns `true` if an equal value is present.
    pub fn contains(&self, value: &Value) -> bool {
        self.items.iter().any(|item| item == value)
    }

    /// Number of values.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the set holds no values.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterates values in insertion order.
    pub fn iter(&self) -> core::slice::Iter<'_, Value> {
        self.items.iter()
    }

    /// The values in insertion order.
    pub fn as_slice(&self) -> &[Value] {
        &self.items
    }
}

impl PartialEq for VSet {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.items.iter().all(|item| other.contains(item))
    }
}

impl FromIterator<Value> for VSet {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        let mut set = VSet::new();
        for value in iter {
            set.insert(value);
        }
        set
    }
}

impl IntoIterator for VSet {
    type Item = Value;
    type IntoIter = std::vec::IntoIter<Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a VSet {
    type Item = &'a Value;
    type IntoIter = core::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
