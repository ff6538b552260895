//! Comparison action
//!
//! Reports the value of one attribute for every entity in the current
//! listing, so the user can compare the listed entries side by side.

use crate::domain::dialogue::{ActionResponse, Slots, slot};
use crate::domain::knowledge::KnowledgeBase;
use crate::domain::resolve::{canonical_attribute, canonical_entity_type};
use crate::domain::schema::SchemaRegistry;
use crate::error::Result;

pub async fn compare_entities(
    kb: &dyn KnowledgeBase,
    schema: &SchemaRegistry,
    slots: &Slots,
) -> Result<ActionResponse> {
    let Some(listed) = slots.list(slot::LISTED_ITEMS) else {
        return Ok(ActionResponse::rephrase());
    };
    let Some(entity_type) = canonical_entity_type(kb, slots).await? else {
        return Ok(ActionResponse::rephrase());
    };
    let Some(attribute) = canonical_attribute(kb, slots).await? else {
        return Ok(ActionResponse::rephrase());
    };
    let Some(key_attribute) = schema.key_of(&entity_type) else {
        return Ok(ActionResponse::rephrase());
    };

    let mut response = ActionResponse::new();
    for label in listed {
        let values = kb
            .get_attribute_of(&entity_type, key_attribute, label, &attribute)
            .await?;
        // entries without exactly one value are silently skipped; the
        // comparison only covers what the knowledge base answers for
        if let [value] = values.as_slice() {
            response.say(format!(
                "{label} has the value '{value}' for attribute '{attribute}'."
            ));
        }
    }

    Ok(response)
}
