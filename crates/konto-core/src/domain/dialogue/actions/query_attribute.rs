//! Attribute question action
//!
//! Answers "what is the <attribute> of <entity>?" once the entity reference
//! and the attribute synonym both resolve.

use tracing::debug;

use crate::domain::dialogue::{ActionResponse, SlotUpdate, Slots, slot};
use crate::domain::knowledge::KnowledgeBase;
use crate::domain::resolve::{canonical_attribute, canonical_entity_type, resolve_entity_reference};
use crate::domain::schema::SchemaRegistry;
use crate::error::Result;

use super::reset_attribute_slots;

pub async fn query_attribute(
    kb: &dyn KnowledgeBase,
    schema: &SchemaRegistry,
    slots: &Slots,
) -> Result<ActionResponse> {
    let Some(entity_type) = canonical_entity_type(kb, slots).await? else {
        return Ok(ActionResponse::rephrase());
    };

    let name = resolve_entity_reference(kb, schema, slots, &entity_type).await?;
    let attribute = canonical_attribute(kb, slots).await?;

    let (Some(name), Some(attribute)) = (name, attribute) else {
        // the reference or the attribute could not be resolved; drop the
        // stale mention and filters before the user tries again
        let mut response = ActionResponse::rephrase();
        response.update(SlotUpdate::clear(slot::MENTION));
        reset_attribute_slots(&mut response, schema, slots, &entity_type);
        return Ok(response);
    };

    let Some(key_attribute) = schema.key_of(&entity_type) else {
        return Ok(ActionResponse::rephrase());
    };

    debug!(%entity_type, %name, %attribute, "Querying attribute");
    let values = kb
        .get_attribute_of(&entity_type, key_attribute, &name, &attribute)
        .await?;

    let mut response = ActionResponse::new();
    match values.as_slice() {
        [value] => response.say(format!(
            "{name} has the value '{value}' for attribute '{attribute}'."
        )),
        // zero values or an inconsistent knowledge base: same answer
        _ => response.say(format!(
            "Did not find a valid value for attribute '{attribute}' for entity '{name}'."
        )),
    }

    response.update(SlotUpdate::clear(slot::MENTION));
    response.update(SlotUpdate::set(entity_type.clone(), name));
    reset_attribute_slots(&mut response, schema, slots, &entity_type);

    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::knowledge::{MappingTable, Record};
    use crate::infrastructure::memory::MemoryKnowledgeBase;

    fn kb() -> MemoryKnowledgeBase {
        let mut kb = MemoryKnowledgeBase::new();
        kb.insert_mapping(MappingTable::EntityType, "banks", "bank");
        kb.insert_mapping(MappingTable::Attribute, "HQ", "headquarters");
        kb.insert_mapping(MappingTable::Mention, "second", "1");
        kb.insert_entity(
            "bank",
            Record::new()
                .with_attribute("name", "N26")
                .with_attribute("headquarters", "Berlin"),
        );
        kb.insert_entity(
            "bank",
            Record::new()
                .with_attribute("name", "bunq")
                .with_attribute("headquarters", "Amsterdam"),
        );
        kb
    }

    #[tokio::test]
    async fn test_answers_for_directly_named_entity() {
        let kb = kb();
        let schema = SchemaRegistry::banking();
        let slots = Slots::new()
            .with(slot::ENTITY_TYPE, "banks")
            .with(slot::ATTRIBUTE, "HQ")
            .with("bank", "N26");

        let response = query_attribute(&kb, &schema, &slots).await.unwrap();

        assert_eq!(
            response.messages,
            vec!["N26 has the value 'Berlin' for attribute 'headquarters'."]
        );
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
    async fn test_answers_for_mentioned_entity() {
        let kb = kb();
        let schema = SchemaRegistry::banking();
        let slots = Slots::new()
            .with(slot::ENTITY_TYPE, "banks")
            .with(slot::ATTRIBUTE, "HQ")
            .with(slot::MENTION, "second")
            .with(
                slot::LISTED_ITEMS,
                vec!["N26".to_string(), "bunq".to_string()],
            );

        let response = query_attribute(&kb, &schema, &slots).await.unwrap();

        assert_eq!(
            response.messages,
            vec!["bunq has the value 'Amsterdam' for attribute 'headquarters'."]
        );
    }

    #[tokio::test]
    async fn test_unresolvable_attribute_asks_to_rephrase() {
        let kb = kb();
        let schema = SchemaRegistry::banking();
        let slots = Slots::new()
            .with(slot::ENTITY_TYPE, "banks")
            .with(slot::ATTRIBUTE, "swift code")
            .with("bank", "N26");

        let response = query_attribute(&kb, &schema, &slots).await.unwrap();

        assert!(response.is_rephrase());
        assert!(
            response
                .slot_updates
                .contains(&SlotUpdate::clear(slot::MENTION))
        );
    }

    #[tokio::test]
    async fn test_missing_attribute_value_yields_not_found_message() {
        let mut kb = kb();
        kb.insert_mapping(MappingTable::Attribute, "website", "english-website");
        let schema = SchemaRegistry::banking();
        let slots = Slots::new()
            .with(slot::ENTITY_TYPE, "banks")
            .with(slot::ATTRIBUTE, "website")
            .with("bank", "N26");

        let response = query_attribute(&kb, &schema, &slots).await.unwrap();

        assert_eq!(
            response.messages,
            vec![
                "Did not find a valid value for attribute 'english-website' for entity 'N26'."
            ]
        );
    }
}
