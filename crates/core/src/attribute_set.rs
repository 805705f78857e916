//! Attribute set: ordered attribute names plus defaults for a subset of them.

use indexmap::{IndexMap, IndexSet};

use crate::value::Value;

/// Immutable descriptor of a value object's attributes.
///
/// `names` is the deduplicated union of the bare names (in given order)
/// followed by the default-only keys (in given order). [`AttributeSet::add`]
/// and [`AttributeSet::remove`] return new sets and never touch `self`.
#[derive(Debug, Clone, Default)]
pub struct AttributeSet {
    names: IndexSet<String>,
    defaults: IndexMap<String, Value>,
}

impl AttributeSet {
    /// Build a set from bare names and a defaults mapping.
    ///
    /// A name given both bare and with a default is stored once, at the
    /// position of the bare name.
    pub fn new<N, S, D, K>(names: N, defaults: D) -> Self
    where
        N: IntoIterator<Item = S>,
        S: Into<String>,
        D: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        let defaults: IndexMap<String, Value> = defaults
            .into_iter()
            .map(|(name, value)| (name.into(), value))
            .collect();

        let names: IndexSet<String> = names
            .into_iter()
            .map(Into::into)
            .chain(defaults.keys().cloned())
            .collect();

        Self { names, defaults }
    }

    /// A set with no defaults.
    pub fn from_names<N, S>(names: N) -> Self
    where
        N: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(names, Vec::<(String, Value)>::new())
    }

    /// A set where every attribute has a default.
    pub fn from_defaults<D, K>(defaults: D) -> Self
    where
        D: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        Self::new(Vec::<String>::new(), defaults)
    }

    /// Attribute names in declaration order.
    pub fn names(&self) -> &IndexSet<String> {
        &self.names
    }

    pub fn defaults(&self) -> &IndexMap<String, Value> {
        &self.defaults
    }

    pub fn default_for(&self, name: &str) -> Option<&Value> {
        self.defaults.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Derive a set with extra names and defaults.
    ///
    /// New defaults win over existing ones for the same key. Names already
    /// present keep their position.
    pub fn add<N, S, D, K>(&self, names: N, defaults: D) -> Self
    where
        N: IntoIterator<Item = S>,
        S: Into<String>,
        D: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        let mut merged = self.defaults.clone();
        for (name, value) in defaults {
            merged.insert(name.into(), value);
        }

        let names = self
            .names
            .iter()
            .cloned()
            .chain(names.into_iter().map(Into::into));

        let derived = Self::new(names, merged);
        tracing::trace!(names = ?derived.names, "derived attribute set (add)");
        derived
    }

    pub fn add_names<N, S>(&self, names: N) -> Self
    where
        N: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.add(names, Vec::<(String, Value)>::new())
    }

    pub fn add_defaults<D, K>(&self, defaults: D) -> Self
    where
        D: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        self.add(Vec::<String>::new(), defaults)
    }

    /// Derive a set without the given names or their defaults.
    ///
    /// Names that are not present are ignored.
    pub fn remove<N, S>(&self, names: N) -> Self
    where
        N: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let removed: IndexSet<String> = names.into_iter().map(|n| n.as_ref().to_owned()).collect();

        let kept = self.names.iter().filter(|n| !removed.contains(*n)).cloned();
        let defaults: Vec<(String, Value)> = self
            .defaults
            .iter()
            .filter(|(name, _)| !removed.contains(*name))
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();

        let derived = Self::new(kept, defaults);
        tracing::trace!(names = ?derived.names, "derived attribute set (remove)");
        derived
    }
}

// Name order is part of a set's identity; `IndexSet` equality ignores it.
impl PartialEq for AttributeSet {
    fn eq(&self, other: &Self) -> bool {
        self.names.iter().eq(other.names.iter()) && self.defaults == other.defaults
    }
}
