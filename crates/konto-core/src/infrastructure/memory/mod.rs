//! In-memory knowledge base
//!
//! A dictionary-backed implementation of the knowledge-base contract for
//! tests and offline demos. It honors the same result-shape semantics as the
//! SQLite store (conjunctive filters, exactly-one lookups, uncapped
//! transaction listings) but keeps no ownership graph: there is no principal
//! and no scoping clause, so it suits unscoped types and fixture data.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::domain::knowledge::{
    AttributeFilter, KnowledgeBase, MappingTable, Record, Value,
};
use crate::domain::schema::entity_type;
use crate::error::Result;

/// Dictionary-backed knowledge base
#[derive(Debug, Default)]
pub struct MemoryKnowledgeBase {
    graph: HashMap<String, Vec<Record>>,
    mappings: HashMap<&'static str, HashMap<String, Vec<String>>>,
}

impl MemoryKnowledgeBase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a record for an entity type
    pub fn insert_entity(&mut self, entity_type: impl Into<String>, record: Record) {
        self.graph.entry(entity_type.into()).or_default().push(record);
    }

    /// Add a mapping-table row
    ///
    /// Inserting a second value for the same key makes the key ambiguous and
    /// every later lookup of it resolves to nothing.
    pub fn insert_mapping(
        &mut self,
        table: MappingTable,
        key: impl Into<String>,
        value: impl Into<String>,
    ) {
        self.mappings
            .entry(table.as_str())
            .or_default()
            .entry(key.into())
            .or_default()
            .push(value.into());
    }

    /// Records of a type whose key attribute carries the given value
    fn by_key<'a>(
        &'a self,
        entity_type: &str,
        key_attribute: &str,
        key_value: &str,
    ) -> Vec<&'a Record> {
        self.graph
            .get(entity_type)
            .map(|records| {
                records
                    .iter()
                    .filter(|r| {
                        r.attribute(key_attribute)
                            .is_some_and(|v| v.to_string() == key_value)
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[async_trait]
impl KnowledgeBase for MemoryKnowledgeBase {
    async fn get_entities(
        &self,
        requested_type: &str,
        filters: &[AttributeFilter],
        limit: usize,
    ) -> Result<Vec<Record>> {
        let Some(records) = self.graph.get(requested_type) else {
            return Ok(Vec::new());
        };

        let mut matching: Vec<Record> = records
            .iter()
            .filter(|r| r.satisfies(filters))
            .cloned()
            .collect();

        // transaction listings stay uncapped; they are shaped downstream
        if requested_type != entity_type::TRANSACTION {
            matching.truncate(limit);
        }
        Ok(matching)
    }

    async fn get_attribute_of(
        &self,
        requested_type: &str,
        key_attribute: &str,
        key_value: &str,
        attribute: &str,
    ) -> Result<Vec<Value>> {
        let candidates = self.by_key(requested_type, key_attribute, key_value);
        let [record] = candidates.as_slice() else {
            return Ok(Vec::new());
        };
        Ok(record.attribute(attribute).cloned().into_iter().collect())
    }

    async fn validate_entity(
        &self,
        requested_type: &str,
        key_value: &str,
        key_attribute: &str,
        filters: &[AttributeFilter],
    ) -> Result<Option<Record>> {
        let candidates = self.by_key(requested_type, key_attribute, key_value);
        let [record] = candidates.as_slice() else {
            return Ok(None);
        };
        Ok(record.satisfies(filters).then(|| (*record).clone()))
    }

    async fn lookup(&self, table: MappingTable, key: &str) -> Result<Option<String>> {
        let values = self
            .mappings
            .get(table.as_str())
            .and_then(|entries| entries.get(key));
        match values.map(Vec::as_slice) {
            Some([value]) => Ok(Some(value.clone())),
            _ => Ok(None),
        }
    }
}
