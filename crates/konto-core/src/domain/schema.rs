//! Entity schema registry
//!
//! Per-type description of the filterable attributes, the key attribute that
//! uniquely identifies an instance, and the ordered representation paths used
//! to render an instance as a string. Per-type behavior is data, not a type
//! hierarchy: adding an entity type is a pure data change.
//!
//! The registry is loaded once at process start and read-only afterwards.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Canonical names of the entity types the banking knowledge base ships with.
pub mod entity_type {
    pub const TRANSACTION: &str = "transaction";
    pub const CONTRACT: &str = "contract";
    pub const ACCOUNT: &str = "account";
    pub const BANK: &str = "bank";
    pub const PERSON: &str = "person";
    pub const CARD: &str = "card";
}

/// Schema for a single entity type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySchema {
    /// Attributes a user may filter this type by, in declaration order
    pub attributes: Vec<String>,
    /// Attribute that uniquely identifies an instance of this type
    pub key: String,
    /// Ordered attribute names or dotted paths (one nested level per `.`)
    /// used to render an instance as a human-readable string
    pub representation: Vec<String>,
}

/// Read-only registry of entity schemas, keyed by canonical type name
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SchemaRegistry {
    entries: BTreeMap<String, EntitySchema>,
}

impl SchemaRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the schema for an entity type (builder-style)
    pub fn with_type(mut self, name: impl Into<String>, schema: EntitySchema) -> Self {
        self.entries.insert(name.into(), schema);
        self
    }

    /// Whether the registry knows the given entity type
    pub fn contains(&self, entity_type: &str) -> bool {
        self.entries.contains_key(entity_type)
    }

    /// Full schema entry for an entity type
    pub fn get(&self, entity_type: &str) -> Option<&EntitySchema> {
        self.entries.get(entity_type)
    }

    /// Filterable attributes of an entity type
    pub fn attributes_of(&self, entity_type: &str) -> Option<&[String]> {
        self.entries.get(entity_type).map(|s| s.attributes.as_slice())
    }

    /// Key attribute of an entity type
    pub fn key_of(&self, entity_type: &str) -> Option<&str> {
        self.entries.get(entity_type).map(|s| s.key.as_str())
    }

    /// Representation paths of an entity type
    pub fn representation_of(&self, entity_type: &str) -> Option<&[String]> {
        self.entries
            .get(entity_type)
            .map(|s| s.representation.as_slice())
    }

    /// Iterate over the registered type names
    pub fn types(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Parse a registry from its TOML form
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|e| Error::SchemaError(e.to_string()))
    }

    /// Load a registry from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&contents)
    }

    /// The built-in schema of the personal-banking knowledge base
    pub fn banking() -> Self {
        fn schema(attributes: &[&str], key: &str, representation: &[&str]) -> EntitySchema {
            EntitySchema {
                attributes: attributes.iter().map(|s| s.to_string()).collect(),
                key: key.to_string(),
                representation: representation.iter().map(|s| s.to_string()).collect(),
            }
        }

        Self::new()
            .with_type(
                entity_type::TRANSACTION,
                schema(
                    &["category", "execution-date", "amount", "reference"],
                    "identifier",
                    &[
                        "execution-date",
                        "reference",
                        "account-of-receiver.account-number",
                        "amount",
                    ],
                ),
            )
            .with_type(
                entity_type::CONTRACT,
                schema(&["sign-date"], "identifier", &["identifier"]),
            )
            .with_type(
                entity_type::ACCOUNT,
                schema(
                    &["balance", "account-type", "opening-date", "account-number"],
                    "account-number",
                    &["provider.name", "account-number", "account-type"],
                ),
            )
            .with_type(
                entity_type::BANK,
                schema(
                    &[
                        "name",
                        "headquarters",
                        "country",
                        "english-website",
                        "english-mobile-app",
                        "allowed-residents",
                        "free-accounts",
                        "free-worldwide-withdrawals",
                        "english-customer-service",
                    ],
                    "name",
                    &["name"],
                ),
            )
            .with_type(
                entity_type::PERSON,
                schema(
                    &[
                        "email",
                        "last-name",
                        "first-name",
                        "gender",
                        "phone-number",
                        "city",
                    ],
                    "email",
                    &["first-name", "last-name"],
                ),
            )
            .with_type(
                entity_type::CARD,
                schema(
                    &["name-on-card", "expiry-date", "created-date", "card-number"],
                    "card-number",
                    &["name-on-card", "card-number"],
                ),
            )
    }
}
