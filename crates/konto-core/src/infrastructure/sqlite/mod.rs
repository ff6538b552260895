//! SQLite knowledge-base backend
//!
//! Stores the knowledge graph in SQLite: typed nodes in `things` (entities
//! and relation instances alike), typed attribute values in `attributes`,
//! role players in `roles`, and the synonym tables in `mappings`.
//!
//! - `database`: connection pool management and initialization
//! - `migrations`: schema versioning and automatic migration
//! - `store`: the [`KnowledgeBase`](crate::domain::knowledge::KnowledgeBase)
//!   implementation, including the principal-ownership scoping joins

pub mod database;
pub mod migrations;
mod store;

pub use database::{Database, DatabaseConfig};
pub use migrations::{CURRENT_VERSION, MigrationStatus, migration_status, run_migrations};
pub use store::SqliteKnowledgeBase;
