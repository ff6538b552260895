//! Knowledge-base query contract
//!
//! The four canonical query shapes every backend must provide: entity
//! listing, attribute lookup, validation lookup, and the raw mapping-table
//! primitive. Implementations live in `infrastructure` (SQLite and
//! in-memory); the core never depends on a wire protocol or query language.
//!
//! Result-shape misses (zero matches, non-unique matches) are ordinary
//! absent values. Only transport/execution failures surface as errors, and
//! those are fatal for the surrounding action invocation.

use async_trait::async_trait;

use crate::domain::schema::entity_type;
use crate::error::Result;

use super::record::{AttributeFilter, Record, Value};

/// Default number of entities a listing query returns
pub const DEFAULT_LISTING_LIMIT: usize = 5;

/// The well-known key/value mapping tables
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MappingTable {
    /// User wording for an entity type → canonical type name
    EntityType,
    /// User wording for an attribute → canonical attribute name
    Attribute,
    /// Canonical ordinal token → zero-based listing index
    Mention,
}

impl MappingTable {
    /// Name of the table inside the knowledge base
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EntityType => "entity-type-mapping",
            Self::Attribute => "attribute-mapping",
            Self::Mention => "mention-mapping",
        }
    }
}

impl std::fmt::Display for MappingTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Read-only query contract against the knowledge base
///
/// All parameters are canonical names and values, already resolved through
/// the mapping tables. Every call is an independent read; no transaction
/// state is shared across calls.
///
/// Queries for scoped types (everything except `bank` and `person`) are
/// implicitly restricted to records owned by the configured principal via
/// the person–contract–account ownership chain. The scoping clause applies
/// identically to all four query shapes.
#[async_trait]
pub trait KnowledgeBase: Send + Sync {
    /// Up to `limit` records of `entity_type` matching every filter
    ///
    /// Relation types embed their role players as sub-records. Transaction
    /// listings ignore `limit` and are returned uncapped; callers shape them
    /// with [`filter_transactions`] afterwards.
    async fn get_entities(
        &self,
        entity_type: &str,
        filters: &[AttributeFilter],
        limit: usize,
    ) -> Result<Vec<Record>>;

    /// Values of `attribute` on the entity identified by `key_value`
    ///
    /// Zero values means the entity or attribute is absent; more than one
    /// signals an inconsistent knowledge base. Callers accept exactly one
    /// value as success.
    async fn get_attribute_of(
        &self,
        entity_type: &str,
        key_attribute: &str,
        key_value: &str,
        attribute: &str,
    ) -> Result<Vec<Value>>;

    /// The unique record matching the key and all filters, if any
    ///
    /// Uniqueness is mandatory: zero or multiple matches resolve to `None`.
    async fn validate_entity(
        &self,
        entity_type: &str,
        key_value: &str,
        key_attribute: &str,
        filters: &[AttributeFilter],
    ) -> Result<Option<Record>>;

    /// Single-valued lookup in one of the mapping tables
    ///
    /// `None` when the key is unknown or maps to more than one value.
    async fn lookup(&self, table: MappingTable, key: &str) -> Result<Option<String>>;
}

/// Shape a raw transaction listing for display
///
/// Transactions carry no ownership edge that distinguishes the currently
/// selected account at query time, so the relation query runs broad and this
/// pass narrows it: keep only transactions created from `account` (when one
/// is selected), then cap to [`DEFAULT_LISTING_LIMIT`] entries, preserving
/// relation-query order.
pub fn filter_transactions(transactions: Vec<Record>, account: Option<&str>) -> Vec<Record> {
    let mut kept: Vec<Record> = match account {
        Some(number) => transactions
            .into_iter()
            .filter(|t| {
                t.value_at("account-of-creator.account-number")
                    .is_some_and(|v| v.to_string() == number)
            })
            .collect(),
        None => transactions,
    };
    kept.truncate(DEFAULT_LISTING_LIMIT);
    kept
}

/// Whether queries for this entity type are scoped to the principal
pub(crate) fn is_scoped(name: &str) -> bool {
    name != entity_type::BANK && name != entity_type::PERSON
}
