//! Database migrations
//!
//! Versioned SQLite schema for the knowledge graph, applied automatically on
//! database connection.

use sqlx::SqlitePool;

use crate::error::Result;

/// Current schema version
pub const CURRENT_VERSION: i32 = 1;

/// SQL for creating the migrations tracking table
const CREATE_MIGRATIONS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS _migrations (
        version INTEGER PRIMARY KEY NOT NULL,
        applied_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
    );
"#;

/// Migration 1: Knowledge graph schema
///
/// Entities and relation instances are both rows in `things`; relations
/// additionally point at their role players through `roles`. Attribute
/// values keep their scalar kind so records can be rebuilt with typed
/// values. `mappings` holds the synonym tables (entity-type, attribute and
/// mention mappings).
const MIGRATION_V1: &str = r#"
    CREATE TABLE IF NOT EXISTS things (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        kind TEXT NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_things_kind ON things(kind);

    CREATE TABLE IF NOT EXISTS attributes (
        thing_id INTEGER NOT NULL REFERENCES things(id) ON DELETE CASCADE,
        name TEXT NOT NULL,
        value TEXT NOT NULL,
        value_kind TEXT NOT NULL DEFAULT 'text'
            CHECK (value_kind IN ('text', 'number', 'datetime'))
    );

    CREATE INDEX IF NOT EXISTS idx_attributes_thing_id ON attributes(thing_id);
    CREATE INDEX IF NOT EXISTS idx_attributes_name_value ON attributes(name, value);

    CREATE TABLE IF NOT EXISTS roles (
        relation_id INTEGER NOT NULL REFERENCES things(id) ON DELETE CASCADE,
        role TEXT NOT NULL,
        player_id INTEGER NOT NULL REFERENCES things(id) ON DELETE CASCADE
    );

    CREATE INDEX IF NOT EXISTS idx_roles_relation_id ON roles(relation_id);
    CREATE INDEX IF NOT EXISTS idx_roles_player_id ON roles(player_id);

    CREATE TABLE IF NOT EXISTS mappings (
        mapping_table TEXT NOT NULL,
        mapping_key TEXT NOT NULL,
        mapping_value TEXT NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_mappings_table_key ON mappings(mapping_table, mapping_key);
"#;

/// Get the current schema version from the database
async fn get_current_version(pool: &SqlitePool) -> Result<i32> {
    // Ensure migrations table exists
    sqlx::raw_sql(CREATE_MIGRATIONS_TABLE).execute(pool).await?;

    let row: Option<(i32,)> = sqlx::query_as("SELECT MAX(version) FROM _migrations")
        .fetch_optional(pool)
        .await?;

    Ok(row.map(|(v,)| v).unwrap_or(0))
}

/// Record that a migration has been applied
async fn record_migration(pool: &SqlitePool, version: i32) -> Result<()> {
    sqlx::query("INSERT INTO _migrations (version) VALUES (?)")
        .bind(version)
        .execute(pool)
        .await?;
    Ok(())
}

/// Run all pending migrations
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    let current_version = get_current_version(pool).await?;

    tracing::debug!(
        current_version,
        target_version = CURRENT_VERSION,
        "Checking database migrations"
    );

    if current_version >= CURRENT_VERSION {
        return Ok(());
    }

    if current_version < 1 {
        tracing::info!("Applying migration v1: Knowledge graph schema");
        sqlx::raw_sql(MIGRATION_V1).execute(pool).await?;
        record_migration(pool, 1).await?;
    }

    tracing::info!("Database migrations completed");
    Ok(())
}

/// Get migration status information
pub async fn migration_status(pool: &SqlitePool) -> Result<MigrationStatus> {
    let current_version = get_current_version(pool).await?;
    Ok(MigrationStatus {
        current_version,
        target_version: CURRENT_VERSION,
        needs_migration: current_version < CURRENT_VERSION,
    })
}

/// Migration status information
#[derive(Debug, Clone)]
pub struct MigrationStatus {
    /// Current schema version in the database
    pub current_version: i32,
    /// Target schema version (latest)
    pub target_version: i32,
    /// Whether migrations need to be run
    pub needs_migration: bool,
}
