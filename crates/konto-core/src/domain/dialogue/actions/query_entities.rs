//! Listing action
//!
//! Lists entities of the requested type, optionally narrowed by attribute
//! filters, and records the listing in the `listed_items` slot so follow-up
//! turns can address entries by ordinal.

use tracing::{debug, warn};

use crate::domain::dialogue::{ActionResponse, SlotUpdate, Slots, slot};
use crate::domain::knowledge::{
    DEFAULT_LISTING_LIMIT, KnowledgeBase, filter_transactions, render, render_key,
};
use crate::domain::resolve::{attribute_filters, canonical_entity_type};
use crate::domain::schema::{SchemaRegistry, entity_type};
use crate::error::Result;

use super::reset_attribute_slots;

pub async fn query_entities(
    kb: &dyn KnowledgeBase,
    schema: &SchemaRegistry,
    slots: &Slots,
) -> Result<ActionResponse> {
    let Some(entity_type) = canonical_entity_type(kb, slots).await? else {
        return Ok(ActionResponse::rephrase());
    };
    let Some(entity_schema) = schema.get(&entity_type) else {
        return Ok(ActionResponse::rephrase());
    };

    let filters = attribute_filters(schema, slots, &entity_type);
    debug!(%entity_type, filters = filters.len(), "Listing entities");

    let mut entities = kb
        .get_entities(&entity_type, &filters, DEFAULT_LISTING_LIMIT)
        .await?;

    if entity_type == entity_type::TRANSACTION {
        entities = filter_transactions(entities, slots.text(slot::ACCOUNT));
    }

    let mut response = ActionResponse::new();

    if entities.is_empty() {
        response.say(format!(
            "I could not find any entities for '{entity_type}'."
        ));
        return Ok(response);
    }

    // One shared order keeps the displayed enumeration and the listed-items
    // labels addressing the same records.
    let mut rendered: Vec<(String, String)> = Vec::with_capacity(entities.len());
    for record in &entities {
        let Some(display) = render(record, &entity_schema.representation) else {
            warn!(%entity_type, "Skipping record with unresolvable representation path");
            continue;
        };
        let Some(label) = render_key(record, &entity_schema.key) else {
            warn!(%entity_type, "Skipping record without key attribute");
            continue;
        };
        rendered.push((display, label));
    }
    rendered.sort();

    response.say(format!("Found the following '{entity_type}' entities:"));
    for (i, (display, _)) in rendered.iter().enumerate() {
        response.say(format!("{}: {display}", i + 1));
    }

    let labels: Vec<String> = rendered.into_iter().map(|(_, label)| label).collect();

    response.update(SlotUpdate::set(slot::ENTITY_TYPE, entity_type.clone()));
    if let [only] = labels.as_slice() {
        // a single hit also pins the entity itself for follow-up questions
        response.update(SlotUpdate::set(entity_type.clone(), only.clone()));
    }
    response.update(SlotUpdate::set(slot::LISTED_ITEMS, labels));
    reset_attribute_slots(&mut response, schema, slots, &entity_type);

    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::dialogue::SlotValue;
    use crate::domain::knowledge::{MappingTable, Record};
    use crate::infrastructure::memory::MemoryKnowledgeBase;

    fn bank(name: &str, city: &str) -> Record {
        Record::new()
            .with_attribute("name", name)
            .with_attribute("headquarters", city)
    }

    fn kb() -> MemoryKnowledgeBase {
        let mut kb = MemoryKnowledgeBase::new();
        kb.insert_mapping(MappingTable::EntityType, "banks", "bank");
        kb.insert_mapping(MappingTable::EntityType, "transactions", "transaction");
        kb.insert_entity("bank", bank("N26", "Berlin"));
        kb.insert_entity("bank", bank("DKB", "Berlin"));
        kb.insert_entity("bank", bank("Comdirect", "Quickborn"));
        kb
    }

    fn updated_value(response: &ActionResponse, name: &str) -> Option<SlotValue> {
        response
            .slot_updates
            .iter()
            .find(|u| u.name == name)
            .and_then(|u| u.value.clone())
    }

    #[tokio::test]
    async fn test_listing_enumerates_in_display_order() {
        let kb = kb();
        let schema = SchemaRegistry::banking();
        let slots = Slots::new().with(slot::ENTITY_TYPE, "banks");

        let response = query_entities(&kb, &schema, &slots).await.unwrap();

        assert_eq!(
            response.messages,
            vec![
                "Found the following 'bank' entities:",
                "1: Comdirect",
                "2: DKB",
                "3: N26",
            ]
        );
        // listed_items must match the displayed order byte for byte
        assert_eq!(
            updated_value(&response, slot::LISTED_ITEMS),
            Some(SlotValue::List(vec![
                "Comdirect".to_string(),
                "DKB".to_string(),
                "N26".to_string(),
            ]))
        );
        assert_eq!(
            updated_value(&response, slot::ENTITY_TYPE),
            Some(SlotValue::Text("bank".to_string()))
        );
    }

    #[tokio::test]
    async fn test_attribute_filters_narrow_the_listing() {
        let kb = kb();
        let schema = SchemaRegistry::banking();
        let slots = Slots::new()
            .with(slot::ENTITY_TYPE, "banks")
            .with("headquarters", "Quickborn");

        let response = query_entities(&kb, &schema, &slots).await.unwrap();

        assert_eq!(response.messages.len(), 2);
        assert_eq!(response.messages[1], "1: Comdirect");
        // the consumed filter slot is cleared
        assert!(
            response
                .slot_updates
                .contains(&SlotUpdate::clear("headquarters"))
        );
        // a single match pins the entity slot
        assert_eq!(
            updated_value(&response, "bank"),
            Some(SlotValue::Text("Comdirect".to_string()))
        );
    }

    #[tokio::test]
    async fn test_unknown_entity_type_asks_to_rephrase() {
        let kb = kb();
        let schema = SchemaRegistry::banking();
        let slots = Slots::new().with(slot::ENTITY_TYPE, "asteroids");

        let response = query_entities(&kb, &schema, &slots).await.unwrap();
        assert!(response.is_rephrase());
        assert!(response.slot_updates.is_empty());
    }

    #[tokio::test]
    async fn test_empty_result_is_reported_not_rephrased() {
        let kb = kb();
        let schema = SchemaRegistry::banking();
        let slots = Slots::new()
            .with(slot::ENTITY_TYPE, "banks")
            .with("headquarters", "Atlantis");

        let response = query_entities(&kb, &schema, &slots).await.unwrap();
        assert!(!response.is_rephrase());
        assert_eq!(
            response.messages,
            vec!["I could not find any entities for 'bank'."]
        );
    }

    #[tokio::test]
    async fn test_transaction_listing_respects_selected_account() {
        let mut kb = kb();
        for i in 0..8 {
            let creator = if i < 3 { "DE01" } else { "DE02" };
            kb.insert_entity(
                "transaction",
                Record::new()
                    .with_attribute("identifier", format!("T-{i}"))
                    .with_attribute("reference", "rent")
                    .with_attribute("amount", 10.0 + f64::from(i))
                    .with_attribute(
                        "execution-date",
                        chrono::NaiveDate::from_ymd_opt(2021, 1, 1 + i)
                            .unwrap()
                            .and_hms_opt(12, 0, 0)
                            .unwrap(),
                    )
                    .with_nested(
                        "account-of-creator",
                        Record::new().with_attribute("account-number", creator),
                    )
                    .with_nested(
                        "account-of-receiver",
                        Record::new().with_attribute("account-number", "DE99"),
                    ),
            );
        }
        let schema = SchemaRegistry::banking();
        let slots = Slots::new()
            .with(slot::ENTITY_TYPE, "transactions")
            .with(slot::ACCOUNT, "DE01");

        let response = query_entities(&kb, &schema, &slots).await.unwrap();

        // header plus exactly the three DE01 transactions
        assert_eq!(response.messages.len(), 4);
        let listed = updated_value(&response, slot::LISTED_ITEMS).unwrap();
        assert_eq!(
            listed,
            SlotValue::List(vec![
                "T-0".to_string(),
                "T-1".to_string(),
                "T-2".to_string(),
            ])
        );
    }
}
