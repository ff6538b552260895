//! Konto Core Library
//!
//! This crate provides the core functionality for Konto, including:
//! - Schema registry (per-type key, filterable attributes, representation)
//! - Reference resolution (entity-type/attribute synonyms, ordinal mentions,
//!   attribute-based disambiguation)
//! - Knowledge-base query contract and its SQLite / in-memory backends
//! - Record rendering (currency and date formatting)
//! - Dialogue actions consuming slot snapshots and producing slot updates

pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;

pub use error::{Error, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::domain::dialogue::{ActionResponse, SlotUpdate, SlotValue, Slots};
    pub use crate::domain::knowledge::{AttributeFilter, KnowledgeBase, Record, Value};
    pub use crate::domain::schema::SchemaRegistry;
    pub use crate::error::{Error, Result};
}
