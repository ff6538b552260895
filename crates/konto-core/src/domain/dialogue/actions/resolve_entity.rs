//! Reference pinning action
//!
//! Pins an ordinal or directly named reference from the current listing into
//! the entity-type slot, so later turns can ask about "it" without
//! re-listing. Runs after a listing, when the `entity_type` slot already
//! holds the canonical type name.

use crate::domain::dialogue::{ActionResponse, SlotUpdate, Slots, slot};
use crate::domain::knowledge::KnowledgeBase;
use crate::domain::resolve::resolve_mention;
use crate::error::Result;

pub async fn resolve_entity(kb: &dyn KnowledgeBase, slots: &Slots) -> Result<ActionResponse> {
    let Some(entity_type) = slots.text(slot::ENTITY_TYPE) else {
        return Ok(ActionResponse::rephrase());
    };
    let listed = slots.list(slot::LISTED_ITEMS).unwrap_or(&[]);

    // A pending mention commits; a direct name must actually be one of the
    // listed labels to count.
    let resolved = if let Some(mention) = slots.text(slot::MENTION) {
        resolve_mention(kb, mention, listed).await?
    } else {
        slots
            .text(entity_type)
            .filter(|value| listed.iter().any(|item| item.as_str() == *value))
            .map(str::to_string)
    };

    let mut response;
    match resolved {
        Some(value) => {
            response = ActionResponse::new();
            response.update(SlotUpdate::set(entity_type, value));
        }
        None => {
            response = ActionResponse::rephrase();
            response.update(SlotUpdate::clear(entity_type));
        }
    }
    response.update(SlotUpdate::clear(slot::MENTION));

    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::knowledge::MappingTable;
    use crate::infrastructure::memory::MemoryKnowledgeBase;

    fn kb() -> MemoryKnowledgeBase {
        let mut kb = MemoryKnowledgeBase::new();
        kb.insert_mapping(MappingTable::Mention, "first", "0");
        kb.insert_mapping(MappingTable::Mention, "last", "1");
        kb
    }

    fn slots_with_listing() -> Slots {
        Slots::new()
            .with(slot::ENTITY_TYPE, "bank")
            .with(
                slot::LISTED_ITEMS,
                vec!["N26".to_string(), "DKB".to_string()],
            )
    }

    #[tokio::test]
    async fn test_mention_is_pinned_into_the_type_slot() {
        let kb = kb();
        let slots = slots_with_listing().with(slot::MENTION, "first");

        let response = resolve_entity(&kb, &slots).await.unwrap();

        assert!(!response.is_rephrase());
        assert!(
            response
                .slot_updates
                .contains(&SlotUpdate::set("bank", "N26"))
        );
        assert!(
            response
                .slot_updates
                .contains(&SlotUpdate::clear(slot::MENTION))
        );
    }

    #[tokio::test]
    async fn test_direct_name_must_be_listed() {
        let kb = kb();
        let slots = slots_with_listing().with("bank", "DKB");

        let response = resolve_entity(&kb, &slots).await.unwrap();
        assert!(
            response
                .slot_updates
                .contains(&SlotUpdate::set("bank", "DKB"))
        );

        let slots = slots_with_listing().with("bank", "Sparkasse");
        let response = resolve_entity(&kb, &slots).await.unwrap();
        assert!(response.is_rephrase());
        assert!(
            response
                .slot_updates
                .contains(&SlotUpdate::clear("bank"))
        );
    }

    #[tokio::test]
    async fn test_failed_mention_does_not_fall_back_to_direct_name() {
        let kb = kb();
        // mention points past the listing while a valid direct name is set
        let slots = slots_with_listing()
            .with(slot::MENTION, "last")
            .with(
                slot::LISTED_ITEMS,
                vec!["N26".to_string()],
            )
            .with("bank", "N26");

        let response = resolve_entity(&kb, &slots).await.unwrap();
        assert!(response.is_rephrase());
    }

    #[tokio::test]
    async fn test_missing_entity_type_asks_to_rephrase() {
        let kb = kb();
        let slots = Slots::new().with(slot::MENTION, "first");

        let response = resolve_entity(&kb, &slots).await.unwrap();
        assert!(response.is_rephrase());
        assert!(response.slot_updates.is_empty());
    }
}
