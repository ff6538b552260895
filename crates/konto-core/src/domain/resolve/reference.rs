//! Entity reference resolution
//!
//! Decides which concrete entity the user is talking about, given the
//! canonical entity type. Three sources, in strict precedence order:
//!
//! 1. a pending ordinal mention,
//! 2. a directly recognized name in the entity-type slot,
//! 3. attribute-based disambiguation against the current listing.
//!
//! A pending mention commits: its miss is final and never falls through to
//! direct naming, since a mention and a direct name are mutually exclusive
//! within one turn.

use tracing::debug;

use crate::domain::dialogue::{Slots, attribute_slot, slot};
use crate::domain::knowledge::{AttributeFilter, KnowledgeBase, render_key};
use crate::domain::schema::SchemaRegistry;
use crate::error::Result;

use super::mention::resolve_mention;

/// Filters contributed by the schema attribute slots currently set
pub fn attribute_filters(
    schema: &SchemaRegistry,
    slots: &Slots,
    entity_type: &str,
) -> Vec<AttributeFilter> {
    let Some(attributes) = schema.attributes_of(entity_type) else {
        return Vec::new();
    };
    attributes
        .iter()
        .filter_map(|attr| {
            slots
                .text(&attribute_slot(attr))
                .map(|value| AttributeFilter::new(attr.clone(), value))
        })
        .collect()
}

/// Resolve the key-attribute label of the entity the user referred to
pub async fn resolve_entity_reference(
    kb: &dyn KnowledgeBase,
    schema: &SchemaRegistry,
    slots: &Slots,
    entity_type: &str,
) -> Result<Option<String>> {
    // An ordinal mention, when present, is the whole answer for this turn.
    if let Some(mention) = slots.text(slot::MENTION) {
        let listed = slots.list(slot::LISTED_ITEMS).unwrap_or(&[]);
        return resolve_mention(kb, mention, listed).await;
    }

    // The extractor recognized the entity by name.
    if let Some(name) = slots.text(entity_type) {
        return Ok(Some(name.to_string()));
    }

    // The user described the entity by its attributes: probe each listed
    // label until one record satisfies every filter.
    let filters = attribute_filters(schema, slots, entity_type);
    let listed = slots.list(slot::LISTED_ITEMS).unwrap_or(&[]);
    if !filters.is_empty() && !listed.is_empty() {
        let Some(key_attribute) = schema.key_of(entity_type) else {
            return Ok(None);
        };
        debug!(
            entity_type,
            candidates = listed.len(),
            filters = filters.len(),
            "Disambiguating entity by attributes"
        );
        for label in listed {
            let validated = kb
                .validate_entity(entity_type, label, key_attribute, &filters)
                .await?;
            if let Some(record) = validated {
                return Ok(render_key(&record, key_attribute));
            }
        }
    }

    Ok(None)
}
