//! Canonicalization of user vocabulary
//!
//! The user says "banks" or "HQ"; the knowledge base knows "bank" and
//! "headquarters". The mapping tables own that translation. Lookups are
//! case- and form-sensitive, exactly as the upstream extractor delivered the
//! token; an unknown or ambiguous token resolves to nothing and the caller
//! asks the user to rephrase.

use crate::domain::dialogue::{Slots, slot};
use crate::domain::knowledge::{KnowledgeBase, MappingTable};
use crate::error::Result;

/// Canonical entity-type name for the current `entity_type` slot, if any
pub async fn canonical_entity_type(
    kb: &dyn KnowledgeBase,
    slots: &Slots,
) -> Result<Option<String>> {
    match slots.text(slot::ENTITY_TYPE) {
        Some(token) => kb.lookup(MappingTable::EntityType, token).await,
        None => Ok(None),
    }
}

/// Canonical attribute name for the current `attribute` slot, if any
pub async fn canonical_attribute(kb: &dyn KnowledgeBase, slots: &Slots) -> Result<Option<String>> {
    match slots.text(slot::ATTRIBUTE) {
        Some(token) => kb.lookup(MappingTable::Attribute, token).await,
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::memory::MemoryKnowledgeBase;

    fn kb() -> MemoryKnowledgeBase {
        let mut kb = MemoryKnowledgeBase::new();
        kb.insert_mapping(MappingTable::EntityType, "banks", "bank");
        kb.insert_mapping(MappingTable::Attribute, "HQ", "headquarters");
        // a key deliberately mapped twice; must resolve to nothing
        kb.insert_mapping(MappingTable::Attribute, "office", "headquarters");
        kb.insert_mapping(MappingTable::Attribute, "office", "city");
        kb
    }

    #[tokio::test]
    async fn test_entity_type_mapping() {
        let kb = kb();
        let slots = Slots::new().with(slot::ENTITY_TYPE, "banks");
        let resolved = canonical_entity_type(&kb, &slots).await.unwrap();
        assert_eq!(resolved.as_deref(), Some("bank"));
    }

    #[tokio::test]
    async fn test_unknown_token_is_absent() {
        let kb = kb();
        let slots = Slots::new().with(slot::ENTITY_TYPE, "asteroids");
        assert_eq!(canonical_entity_type(&kb, &slots).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_lookup_is_case_sensitive() {
        let kb = kb();
        let slots = Slots::new().with(slot::ATTRIBUTE, "hq");
        assert_eq!(canonical_attribute(&kb, &slots).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_multi_valued_key_is_absent() {
        let kb = kb();
        let slots = Slots::new().with(slot::ATTRIBUTE, "office");
        assert_eq!(canonical_attribute(&kb, &slots).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_missing_slot_is_absent() {
        let kb = kb();
        let slots = Slots::new();
        assert_eq!(canonical_attribute(&kb, &slots).await.unwrap(), None);
    }
}
