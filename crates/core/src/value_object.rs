//! Value objects: equality by value, not identity.
//!
//! A [`ValueClass`] binds a class name to an [`AttributeSet`] once, at
//! definition time. Every [`ValueObject`] built from it holds exactly one value
//! per attribute name and never changes after construction. To "modify" a
//! value object, derive a new one with [`ValueObject::with`] or
//! [`ValueObject::append_to`].

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::attribute_set::AttributeSet;
use crate::error::{AttribsError, AttribsResult, ValidationError};
use crate::pretty::{Formattable, PrettyOptions, render_object};
use crate::value::Value;

/// Ordered attribute name to value mapping.
pub type Attributes = IndexMap<String, Value>;

#[derive(Debug)]
struct ClassDef {
    name: String,
    attributes: AttributeSet,
}

/// A class definition: a name associated with an attribute set.
///
/// Cloning is cheap and clones compare equal; two separately defined classes
/// never do, even with identical attribute sets.
#[derive(Clone)]
pub struct ValueClass {
    def: Arc<ClassDef>,
}

impl ValueClass {
    pub fn new(name: impl Into<String>, attributes: AttributeSet) -> Self {
        Self {
            def: Arc::new(ClassDef {
                name: name.into(),
                attributes,
            }),
        }
    }

    /// Define a new class whose attribute set is derived from this one.
    ///
    /// ```ignore
    /// let extended = base.derive("Extended", |set| set.add_defaults([("baz", Value::from(7))]));
    /// ```
    pub fn derive<F>(&self, name: impl Into<String>, f: F) -> Self
    where
        F: FnOnce(&AttributeSet) -> AttributeSet,
    {
        Self::new(name, f(self.attributes()))
    }

    pub fn name(&self) -> &str {
        &self.def.name
    }

    pub fn attributes(&self) -> &AttributeSet {
        &self.def.attributes
    }

    /// Construct an instance from a mapping, filling in defaults.
    ///
    /// Fails unless the merged mapping's keys are exactly the attribute names.
    pub fn construct(&self, attributes: Attributes) -> Result<ValueObject, ValidationError> {
        let set = self.attributes();

        let mut merged = set.defaults().clone();
        merged.extend(attributes);

        let missing: Vec<String> = set
            .names()
            .iter()
            .filter(|name| !merged.contains_key(name.as_str()))
            .cloned()
            .collect();
        let unknown: Vec<String> = merged
            .keys()
            .filter(|key| !set.contains(key))
            .cloned()
            .collect();

        if !missing.is_empty() || !unknown.is_empty() {
            let err = ValidationError::new(self.name(), missing, unknown);
            tracing::debug!(class = self.name(), error = %err, "value object construction rejected");
            return Err(err);
        }

        let mut values = Attributes::with_capacity(set.len());
        for name in set.names() {
            if let Some(value) = merged.swap_remove(name) {
                values.insert(name.clone(), value);
            }
        }

        Ok(ValueObject {
            inner: Arc::new(ObjectInner {
                class: self.clone(),
                values,
            }),
        })
    }

    /// Construct an instance from defaults alone.
    pub fn build(&self) -> Result<ValueObject, ValidationError> {
        self.construct(Attributes::new())
    }
}

impl PartialEq for ValueClass {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.def, &other.def)
    }
}

impl Eq for ValueClass {}

impl fmt::Debug for ValueClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueClass")
            .field("name", &self.def.name)
            .field("names", &self.def.attributes.names())
            .finish()
    }
}

struct ObjectInner {
    class: ValueClass,
    values: Attributes,
}

/// An immutable instance of a [`ValueClass`].
///
/// Two instances are equal iff they belong to the same class and all
/// attribute values are equal.
#[derive(Clone)]
pub struct ValueObject {
    inner: Arc<ObjectInner>,
}

impl ValueObject {
    pub fn class(&self) -> &ValueClass {
        &self.inner.class
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.inner.values.get(name)
    }

    /// Attribute values in attribute-name order.
    pub fn attributes(&self) -> &Attributes {
        &self.inner.values
    }

    /// Snapshot of every attribute, in attribute-name order.
    pub fn to_mapping(&self) -> Attributes {
        self.inner.values.clone()
    }

    /// Like [`ValueObject::to_mapping`], minus attributes still holding the
    /// very default value they were given.
    ///
    /// A value that merely equals its default (say, a freshly built empty
    /// list) is kept.
    pub fn to_mapping_compact(&self) -> Attributes {
        let defaults = self.class().attributes().defaults();
        self.inner
            .values
            .iter()
            .filter(|(name, value)| {
                !defaults
                    .get(name.as_str())
                    .is_some_and(|default| value.is_identical(default))
            })
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect()
    }

    /// A new instance with `changes` applied over the current values.
    pub fn with(&self, changes: Attributes) -> Result<ValueObject, ValidationError> {
        let mut values = self.to_mapping();
        values.extend(changes);
        self.class().construct(values)
    }

    /// A new instance whose list attribute `name` has `items` appended.
    ///
    /// The current list is left untouched.
    pub fn append_to<I>(&self, name: &str, items: I) -> AttribsResult<ValueObject>
    where
        I: IntoIterator<Item = Value>,
    {
        let appended = match self.get(name) {
            Some(Value::List(current)) => {
                let mut next: Vec<Value> = current.as_ref().clone();
                next.extend(items);
                Value::from(next)
            }
            Some(other) => return Err(AttribsError::not_concatenable(name, other.kind())),
            None => Value::list(items),
        };

        let mut changes = Attributes::new();
        changes.insert(name.to_owned(), appended);
        Ok(self.with(changes)?)
    }

    /// Same allocation (clones share identity).
    pub fn is_same(&self, other: &ValueObject) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl PartialEq for ValueObject {
    fn eq(&self, other: &Self) -> bool {
        self.class() == other.class() && self.inner.values == other.inner.values
    }
}

impl Formattable for ValueObject {
    fn pretty_with(&self, options: &PrettyOptions) -> String {
        render_object(self.class().name(), &self.to_mapping_compact(), options)
    }
}

impl fmt::Display for ValueObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pretty())
    }
}

impl fmt::Debug for ValueObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct(self.class().name());
        for (name, value) in &self.inner.values {
            s.field(name, value);
        }
        s.finish()
    }
}

impl Serialize for ValueObject {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.inner.values.len()))?;
        for (name, value) in &self.inner.values {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
