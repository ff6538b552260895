//! Dialogue actions
//!
//! The entry points the dialogue collaborator invokes by name. Each action
//! consumes an immutable slot snapshot, queries the knowledge base, and
//! produces an [`ActionResponse`](super::ActionResponse).
//!
//! Error handling follows one rule: anything the user can fix (an unknown
//! synonym, an unresolvable reference) turns into a rephrase prompt plus
//! slot cleanup; a legitimately empty result gets its own message; only
//! backing-store failures propagate as errors.

mod compare_entities;
mod query_attribute;
mod query_entities;
mod resolve_entity;

pub use compare_entities::compare_entities;
pub use query_attribute::query_attribute;
pub use query_entities::query_entities;
pub use resolve_entity::resolve_entity;

use crate::domain::dialogue::{ActionResponse, SlotUpdate, Slots, attribute_slot};
use crate::domain::knowledge::KnowledgeBase;
use crate::domain::schema::SchemaRegistry;
use crate::error::{Error, Result};

/// Canonical action names, as invoked by the dialogue collaborator
pub mod action {
    pub const QUERY_ENTITIES: &str = "action_query_entities";
    pub const QUERY_ATTRIBUTE: &str = "action_query_attribute";
    pub const COMPARE_ENTITIES: &str = "action_compare_entities";
    pub const RESOLVE_ENTITY: &str = "action_resolve_entity";
}

/// Dispatch an action by its canonical name
pub async fn dispatch(
    name: &str,
    kb: &dyn KnowledgeBase,
    schema: &SchemaRegistry,
    slots: &Slots,
) -> Result<ActionResponse> {
    match name {
        action::QUERY_ENTITIES => query_entities(kb, schema, slots).await,
        action::QUERY_ATTRIBUTE => query_attribute(kb, schema, slots).await,
        action::COMPARE_ENTITIES => compare_entities(kb, schema, slots).await,
        action::RESOLVE_ENTITY => resolve_entity(kb, slots).await,
        other => Err(Error::UnknownAction(other.to_string())),
    }
}

/// Clear every schema attribute slot currently set for the type
///
/// Stale filters must not leak into the next turn once they have been
/// consumed or invalidated.
fn reset_attribute_slots(
    response: &mut ActionResponse,
    schema: &SchemaRegistry,
    slots: &Slots,
    entity_type: &str,
) {
    let Some(attributes) = schema.attributes_of(entity_type) else {
        return;
    };
    for attr in attributes {
        let slot_name = attribute_slot(attr);
        if slots.get(&slot_name).is_some() {
            response.update(SlotUpdate::clear(slot_name));
        }
    }
}
