//! Knowledge-base domain module
//!
//! Everything the resolution engine knows about the knowledge base lives
//! here: the normalized record model, the rendering rules that turn records
//! into user-visible strings, and the query contract implemented by the
//! storage backends in `infrastructure`.
//!
//! ## Data model
//!
//! - **Record**: attribute values plus embedded role-player sub-records for
//!   relation types (a transaction embeds its creator and receiver accounts,
//!   an account embeds its provider bank and owning person)
//! - **AttributeFilter**: an equality constraint; a filter set is a
//!   conjunction
//! - **MappingTable**: the three key/value synonym tables backing reference
//!   resolution

mod record;
mod render;
mod repository;

pub use record::{AttributeFilter, Record, Value};
pub use render::{render, render_key};
pub use repository::{
    DEFAULT_LISTING_LIMIT, KnowledgeBase, MappingTable, filter_transactions,
};
pub(crate) use repository::is_scoped;
