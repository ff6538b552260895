//! Reference resolution
//!
//! Maps what the user said to what the knowledge base knows: entity-type and
//! attribute synonyms to canonical names, ordinal mentions to previously
//! listed entities, and bare attribute descriptions to a concrete entity
//! key. All vocabulary lives in the knowledge base's mapping tables; nothing
//! here is hard-coded wording.

mod mention;
mod reference;
mod synonym;

pub use mention::resolve_mention;
pub use reference::{attribute_filters, resolve_entity_reference};
pub use synonym::{canonical_attribute, canonical_entity_type};
