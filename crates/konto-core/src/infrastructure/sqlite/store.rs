//! SQLite implementation of the knowledge-base contract
//!
//! Translates the four canonical query shapes into SQL over the graph
//! tables. Every query for a scoped type carries the same ownership clause:
//! the record must be reachable from the configured principal through the
//! person–contract–account chain (cards via `represented-by`, transactions
//! via their creator account). The clause is assembled once per shape, never
//! opted into per call.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use sqlx::SqlitePool;
use tracing::debug;

use crate::domain::knowledge::{
    AttributeFilter, KnowledgeBase, MappingTable, Record, Value, is_scoped,
};
use crate::domain::schema::entity_type;
use crate::error::{Error, Result};

/// Storage format of datetime attribute values
const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Accounts owned by the principal: the `offer` role of a `contract` whose
/// `customer` role player carries the principal's email. Contains exactly
/// one bind placeholder (the email).
const OWNED_ACCOUNTS: &str = "\
SELECT offer.player_id \
  FROM things contract \
  JOIN roles offer ON offer.relation_id = contract.id AND offer.role = 'offer' \
  JOIN roles customer ON customer.relation_id = contract.id AND customer.role = 'customer' \
  JOIN attributes email ON email.thing_id = customer.player_id \
       AND email.name = 'email' AND email.value = ? \
 WHERE contract.kind = 'contract'";

/// SQLite-backed knowledge base
#[derive(Debug, Clone)]
pub struct SqliteKnowledgeBase {
    pool: SqlitePool,
    principal: String,
}

impl SqliteKnowledgeBase {
    /// Create a store scoped to the given conversational principal
    pub fn new(pool: SqlitePool, principal: impl Into<String>) -> Self {
        Self {
            pool,
            principal: principal.into(),
        }
    }

    /// Ownership condition restricting `column` to the principal's records
    ///
    /// `None` for unscoped types. Each returned condition contains exactly
    /// one bind placeholder, to be filled with the principal's email.
    fn scope_condition(&self, requested_type: &str, column: &str) -> Option<String> {
        if !is_scoped(requested_type) {
            return None;
        }
        match requested_type {
            entity_type::ACCOUNT => Some(format!("{column} IN ({OWNED_ACCOUNTS})")),
            entity_type::CARD => Some(format!(
                "{column} IN (\
                 SELECT bank_card.player_id \
                   FROM things rb \
                   JOIN roles bank_account ON bank_account.relation_id = rb.id \
                        AND bank_account.role = 'bank-account' \
                   JOIN roles bank_card ON bank_card.relation_id = rb.id \
                        AND bank_card.role = 'bank-card' \
                  WHERE rb.kind = 'represented-by' \
                    AND bank_account.player_id IN ({OWNED_ACCOUNTS}))"
            )),
            entity_type::TRANSACTION => Some(format!(
                "{column} IN (\
                 SELECT creator.relation_id \
                   FROM roles creator \
                  WHERE creator.role = 'account-of-creator' \
                    AND creator.player_id IN ({OWNED_ACCOUNTS}))"
            )),
            entity_type::CONTRACT => Some(format!(
                "{column} IN (\
                 SELECT contract.id \
                   FROM things contract \
                   JOIN roles customer ON customer.relation_id = contract.id \
                        AND customer.role = 'customer' \
                   JOIN attributes email ON email.thing_id = customer.player_id \
                        AND email.name = 'email' AND email.value = ? \
                  WHERE contract.kind = 'contract')"
            )),
            // types outside the ownership graph have no scope edge
            _ => None,
        }
    }

    /// Ids of things of a kind, scoped and filtered, in insertion order
    async fn thing_ids(
        &self,
        kind: &str,
        filters: &[AttributeFilter],
        limit: Option<usize>,
    ) -> Result<Vec<i64>> {
        let mut sql = String::from("SELECT id FROM things WHERE kind = ?");
        let mut binds: Vec<String> = vec![kind.to_string()];

        if let Some(condition) = self.scope_condition(kind, "id") {
            sql.push_str(" AND ");
            sql.push_str(&condition);
            binds.push(self.principal.clone());
        }
        for filter in filters {
            sql.push_str(" AND id IN (SELECT thing_id FROM attributes WHERE name = ? AND value = ?)");
            binds.push(filter.key.clone());
            binds.push(filter.value.clone());
        }
        sql.push_str(" ORDER BY id");
        if limit.is_some() {
            sql.push_str(" LIMIT ?");
        }

        debug!(%sql, "Executing entity query");
        let mut query = sqlx::query_as::<_, (i64,)>(&sql);
        for bind in &binds {
            query = query.bind(bind);
        }
        if let Some(limit) = limit {
            query = query.bind(limit as i64);
        }
        let rows = query.fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    /// Attribute values of one thing as a record, without role players
    async fn load_record(&self, thing_id: i64) -> Result<Record> {
        let rows: Vec<(String, String, String)> = sqlx::query_as(
            "SELECT name, value, value_kind FROM attributes WHERE thing_id = ? ORDER BY rowid",
        )
        .bind(thing_id)
        .fetch_all(&self.pool)
        .await?;

        let mut record = Record::new();
        for (name, value, value_kind) in rows {
            record.set_attribute(name, decode_value(&value, &value_kind)?);
        }
        Ok(record)
    }

    /// Role players of a relation thing, in insertion order
    async fn role_players(&self, relation_id: i64) -> Result<Vec<(String, i64)>> {
        let rows: Vec<(String, i64)> = sqlx::query_as(
            "SELECT role, player_id FROM roles WHERE relation_id = ? ORDER BY rowid",
        )
        .bind(relation_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// A relation record with its role players embedded as sub-records
    ///
    /// When `flatten_role` names a role, that player's attributes land on the
    /// relation record itself instead of a sub-record.
    async fn load_relation_record(
        &self,
        relation_id: i64,
        flatten_role: Option<&str>,
    ) -> Result<Record> {
        let mut record = self.load_record(relation_id).await?;
        for (role, player_id) in self.role_players(relation_id).await? {
            let player = self.load_record(player_id).await?;
            if flatten_role == Some(role.as_str()) {
                record.absorb(player);
            } else {
                record.set_nested(role, player);
            }
        }
        Ok(record)
    }

    /// Account listing: the contract relation carries the account as its
    /// `offer` role player, flattened into the record; the provider bank and
    /// owning person stay nested.
    async fn account_entities(
        &self,
        filters: &[AttributeFilter],
        limit: usize,
    ) -> Result<Vec<Record>> {
        let mut sql = String::from(
            "SELECT contract.id \
               FROM things contract \
              WHERE contract.kind = 'contract' \
                AND contract.id IN (\
                    SELECT customer.relation_id \
                      FROM roles customer \
                      JOIN attributes email ON email.thing_id = customer.player_id \
                           AND email.name = 'email' AND email.value = ? \
                     WHERE customer.role = 'customer')",
        );
        let mut binds: Vec<String> = vec![self.principal.clone()];

        for filter in filters {
            sql.push_str(
                " AND contract.id IN (\
                   SELECT offer.relation_id FROM roles offer \
                    WHERE offer.role = 'offer' \
                      AND offer.player_id IN (SELECT thing_id FROM attributes WHERE name = ? AND value = ?))",
            );
            binds.push(filter.key.clone());
            binds.push(filter.value.clone());
        }
        sql.push_str(" ORDER BY contract.id LIMIT ?");

        debug!(%sql, "Executing account relation query");
        let mut query = sqlx::query_as::<_, (i64,)>(&sql);
        for bind in &binds {
            query = query.bind(bind);
        }
        query = query.bind(limit as i64);
        let rows = query.fetch_all(&self.pool).await?;

        let mut records = Vec::with_capacity(rows.len());
        for (contract_id,) in rows {
            records.push(self.load_relation_record(contract_id, Some("offer")).await?);
        }
        Ok(records)
    }
}

#[async_trait]
impl KnowledgeBase for SqliteKnowledgeBase {
    async fn get_entities(
        &self,
        requested_type: &str,
        filters: &[AttributeFilter],
        limit: usize,
    ) -> Result<Vec<Record>> {
        match requested_type {
            // relation query, uncapped; shaped downstream by the post-filter
            entity_type::TRANSACTION => {
                let ids = self.thing_ids(requested_type, filters, None).await?;
                let mut records = Vec::with_capacity(ids.len());
                for id in ids {
                    records.push(self.load_relation_record(id, None).await?);
                }
                Ok(records)
            }
            entity_type::ACCOUNT => self.account_entities(filters, limit).await,
            _ => {
                let ids = self.thing_ids(requested_type, filters, Some(limit)).await?;
                let mut records = Vec::with_capacity(ids.len());
                for id in ids {
                    records.push(self.load_record(id).await?);
                }
                Ok(records)
            }
        }
    }

    async fn get_attribute_of(
        &self,
        requested_type: &str,
        key_attribute: &str,
        key_value: &str,
        attribute: &str,
    ) -> Result<Vec<Value>> {
        let mut sql = String::from(
            "SELECT a.value, a.value_kind \
               FROM attributes a \
               JOIN things t ON t.id = a.thing_id \
              WHERE t.kind = ? AND a.name = ? \
                AND t.id IN (SELECT thing_id FROM attributes WHERE name = ? AND value = ?)",
        );
        let mut binds = vec![
            requested_type.to_string(),
            attribute.to_string(),
            key_attribute.to_string(),
            key_value.to_string(),
        ];
        if let Some(condition) = self.scope_condition(requested_type, "t.id") {
            sql.push_str(" AND ");
            sql.push_str(&condition);
            binds.push(self.principal.clone());
        }
        sql.push_str(" ORDER BY a.rowid");

        debug!(%sql, "Executing attribute query");
        let mut query = sqlx::query_as::<_, (String, String)>(&sql);
        for bind in &binds {
            query = query.bind(bind);
        }
        let rows = query.fetch_all(&self.pool).await?;

        rows.iter()
            .map(|(value, value_kind)| decode_value(value, value_kind))
            .collect()
    }

    async fn validate_entity(
        &self,
        requested_type: &str,
        key_value: &str,
        key_attribute: &str,
        filters: &[AttributeFilter],
    ) -> Result<Option<Record>> {
        let key_filter = AttributeFilter::new(key_attribute, key_value);
        let mut all_filters = vec![key_filter];
        all_filters.extend_from_slice(filters);

        // fetch up to two ids: uniqueness is part of the contract
        let ids = self.thing_ids(requested_type, &all_filters, Some(2)).await?;
        match ids.as_slice() {
            [id] => Ok(Some(self.load_record(*id).await?)),
            _ => Ok(None),
        }
    }

    async fn lookup(&self, table: MappingTable, key: &str) -> Result<Option<String>> {
        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT mapping_value FROM mappings WHERE mapping_table = ? AND mapping_key = ?",
        )
        .bind(table.as_str())
        .bind(key)
        .fetch_all(&self.pool)
        .await?;

        match rows.as_slice() {
            [(value,)] => Ok(Some(value.clone())),
            _ => Ok(None),
        }
    }
}

/// Rebuild a typed value from its stored form
fn decode_value(value: &str, value_kind: &str) -> Result<Value> {
    match value_kind {
        "text" => Ok(Value::Text(value.to_string())),
        "number" => value
            .parse::<f64>()
            .map(Value::Number)
            .map_err(|_| Error::InvalidValue(format!("not a number: '{value}'"))),
        "datetime" => NaiveDateTime::parse_from_str(value, DATETIME_FORMAT)
            .map(Value::DateTime)
            .map_err(|_| Error::InvalidValue(format!("not a datetime: '{value}'"))),
        other => Err(Error::InvalidValue(format!("unknown value kind: '{other}'"))),
    }
}
