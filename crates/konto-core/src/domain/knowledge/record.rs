//! Normalized knowledge-base records
//!
//! A record is constructed fresh per query response, immutable from the
//! caller's point of view, and discarded after rendering or slot update.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDateTime;

/// Scalar value of a single attribute
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Number(f64),
    DateTime(NaiveDateTime),
}

impl Value {
    /// Borrow the text content, if this is a text value
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    /// Plain string form, without any type-specific presentation rules
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => write!(f, "{s}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::DateTime(dt) => write!(f, "{dt}"),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(dt: NaiveDateTime) -> Self {
        Self::DateTime(dt)
    }
}

/// Equality constraint on an attribute
///
/// A filter set is unordered and conjunctive: every member must match for a
/// record to qualify.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeFilter {
    pub key: String,
    pub value: String,
}

impl AttributeFilter {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// A record returned from a knowledge-base query
///
/// Holds the attribute values of one entity or relation instance. Relation
/// records additionally embed the records of their role players under the
/// role name (e.g. a transaction embeds `account-of-creator` and
/// `account-of-receiver` account records).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    attributes: BTreeMap<String, Value>,
    nested: BTreeMap<String, Record>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an attribute value (builder-style)
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Embed a sub-record under a role name (builder-style)
    pub fn with_nested(mut self, role: impl Into<String>, record: Record) -> Self {
        self.nested.insert(role.into(), record);
        self
    }

    /// Set an attribute value
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.attributes.insert(name.into(), value.into());
    }

    /// Embed a sub-record under a role name
    pub fn set_nested(&mut self, role: impl Into<String>, record: Record) {
        self.nested.insert(role.into(), record);
    }

    /// Copy all top-level attributes of `other` into this record
    ///
    /// Used to flatten a relation's primary role player into the relation
    /// record itself (an account listing carries the account's attributes at
    /// the top level while the other role players stay nested).
    pub fn absorb(&mut self, other: Record) {
        self.attributes.extend(other.attributes);
    }

    /// Value of a top-level attribute
    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    /// Embedded sub-record for a role name
    pub fn nested(&self, role: &str) -> Option<&Record> {
        self.nested.get(role)
    }

    /// Iterate over the top-level attributes
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Resolve a dotted attribute path, descending one nested level per `.`
    /// segment. A missing segment fails the whole path.
    pub fn value_at(&self, path: &str) -> Option<&Value> {
        match path.split_once('.') {
            None => self.attributes.get(path),
            Some((role, rest)) => self.nested.get(role)?.value_at(rest),
        }
    }

    /// Whether this record satisfies every filter in the set
    ///
    /// Filter values originate from conversation slots and are compared
    /// against the plain string form of the attribute value.
    pub fn satisfies(&self, filters: &[AttributeFilter]) -> bool {
        filters.iter().all(|f| {
            self.attributes
                .get(&f.key)
                .is_some_and(|v| v.to_string() == f.value)
        })
    }
}
