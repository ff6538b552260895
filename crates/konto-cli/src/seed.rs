//! Demo dataset seeding
//!
//! Loads a small personal-banking world into the knowledge base: two
//! persons, seven banks, three accounts with their contracts and cards, a
//! handful of transactions, and the three synonym tables. The default
//! principal (`mitchell.gillis@t-online.de`) owns two of the accounts.

use anyhow::{Result, bail};
use sqlx::SqlitePool;
use tracing::info;
use uuid::Uuid;

async fn thing(pool: &SqlitePool, kind: &str) -> Result<i64> {
    let row: (i64,) = sqlx::query_as("INSERT INTO things (kind) VALUES (?) RETURNING id")
        .bind(kind)
        .fetch_one(pool)
        .await?;
    Ok(row.0)
}

async fn attr(pool: &SqlitePool, thing_id: i64, name: &str, value: &str, kind: &str) -> Result<()> {
    sqlx::query("INSERT INTO attributes (thing_id, name, value, value_kind) VALUES (?, ?, ?, ?)")
        .bind(thing_id)
        .bind(name)
        .bind(value)
        .bind(kind)
        .execute(pool)
        .await?;
    Ok(())
}

async fn text(pool: &SqlitePool, thing_id: i64, name: &str, value: &str) -> Result<()> {
    attr(pool, thing_id, name, value, "text").await
}

async fn number(pool: &SqlitePool, thing_id: i64, name: &str, value: f64) -> Result<()> {
    attr(pool, thing_id, name, &value.to_string(), "number").await
}

async fn datetime(pool: &SqlitePool, thing_id: i64, name: &str, value: &str) -> Result<()> {
    attr(pool, thing_id, name, value, "datetime").await
}

async fn role(pool: &SqlitePool, relation_id: i64, role_name: &str, player_id: i64) -> Result<()> {
    sqlx::query("INSERT INTO roles (relation_id, role, player_id) VALUES (?, ?, ?)")
        .bind(relation_id)
        .bind(role_name)
        .bind(player_id)
        .execute(pool)
        .await?;
    Ok(())
}

async fn mapping(pool: &SqlitePool, table: &str, key: &str, value: &str) -> Result<()> {
    sqlx::query("INSERT INTO mappings (mapping_table, mapping_key, mapping_value) VALUES (?, ?, ?)")
        .bind(table)
        .bind(key)
        .bind(value)
        .execute(pool)
        .await?;
    Ok(())
}

fn transaction_identifier() -> String {
    let id = Uuid::new_v4().simple().to_string();
    format!("TX-{}", &id[..8])
}

/// Load the demo dataset; refuses to touch a non-empty graph unless `force`
pub async fn run(pool: &SqlitePool, principal: &str, force: bool) -> Result<()> {
    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM things")
        .fetch_one(pool)
        .await?;
    if count.0 > 0 {
        if !force {
            bail!("knowledge base already contains data; re-run with --force to replace it");
        }
        sqlx::query("DELETE FROM things").execute(pool).await?;
        sqlx::query("DELETE FROM mappings").execute(pool).await?;
    }

    // persons
    let mitchell = thing(pool, "person").await?;
    text(pool, mitchell, "email", principal).await?;
    text(pool, mitchell, "first-name", "Mitchell").await?;
    text(pool, mitchell, "last-name", "Gillis").await?;
    text(pool, mitchell, "gender", "male").await?;
    text(pool, mitchell, "phone-number", "+49 30 901820").await?;
    text(pool, mitchell, "city", "Berlin").await?;

    let anna = thing(pool, "person").await?;
    text(pool, anna, "email", "anna.schmidt@web.de").await?;
    text(pool, anna, "first-name", "Anna").await?;
    text(pool, anna, "last-name", "Schmidt").await?;
    text(pool, anna, "gender", "female").await?;
    text(pool, anna, "phone-number", "+49 40 428280").await?;
    text(pool, anna, "city", "Hamburg").await?;

    // banks
    let mut banks = std::collections::HashMap::new();
    for (name, headquarters, country, free_accounts) in [
        ("N26", "Berlin", "Germany", "true"),
        ("bunq", "Amsterdam", "Netherlands", "false"),
        ("Deutsche Bank", "Frankfurt am Main", "Germany", "false"),
        ("Commerzbank", "Frankfurt am Main", "Germany", "true"),
        ("Targobank", "Düsseldorf", "Germany", "true"),
        ("DKB", "Berlin", "Germany", "true"),
        ("Comdirect", "Quickborn", "Germany", "true"),
    ] {
        let bank = thing(pool, "bank").await?;
        text(pool, bank, "name", name).await?;
        text(pool, bank, "headquarters", headquarters).await?;
        text(pool, bank, "country", country).await?;
        text(pool, bank, "free-accounts", free_accounts).await?;
        banks.insert(name, bank);
    }

    // accounts with their contracts
    let mut accounts = Vec::new();
    for (owner, bank, account_number, account_type, balance, opened, contract_id) in [
        (mitchell, banks["N26"], "DE0001", "maestro", 1823.5, "2018-05-02T09:30:00", "C-1001"),
        (mitchell, banks["DKB"], "DE0002", "savings", 15000.0, "2019-11-20T14:00:00", "C-1002"),
        (anna, banks["bunq"], "DE0003", "visa", 420.75, "2020-01-13T11:15:00", "C-1003"),
    ] {
        let account = thing(pool, "account").await?;
        text(pool, account, "account-number", account_number).await?;
        text(pool, account, "account-type", account_type).await?;
        number(pool, account, "balance", balance).await?;
        datetime(pool, account, "opening-date", opened).await?;

        let contract = thing(pool, "contract").await?;
        text(pool, contract, "identifier", contract_id).await?;
        datetime(pool, contract, "sign-date", opened).await?;
        role(pool, contract, "customer", owner).await?;
        role(pool, contract, "offer", account).await?;
        role(pool, contract, "provider", bank).await?;

        accounts.push(account);
    }

    // cards
    for (account, card_number, holder) in [
        (accounts[0], "4111 0001", "MITCHELL GILLIS"),
        (accounts[1], "4111 0002", "MITCHELL GILLIS"),
        (accounts[2], "4111 0003", "ANNA SCHMIDT"),
    ] {
        let card = thing(pool, "card").await?;
        text(pool, card, "card-number", card_number).await?;
        text(pool, card, "name-on-card", holder).await?;
        datetime(pool, card, "created-date", "2021-02-01T00:00:00").await?;
        datetime(pool, card, "expiry-date", "2026-02-01T00:00:00").await?;

        let represented_by = thing(pool, "represented-by").await?;
        role(pool, represented_by, "bank-account", account).await?;
        role(pool, represented_by, "bank-card", card).await?;
    }

    // transactions (creator index, receiver index, amount, category, reference, date)
    for (creator, receiver, amount, category, reference, date) in [
        (0, 2, 820.0, "housing", "rent february", "2024-02-01T08:00:00"),
        (0, 1, 500.0, "savings", "monthly savings", "2024-02-02T09:00:00"),
        (0, 2, 42.8, "groceries", "supermarket", "2024-02-05T17:45:00"),
        (1, 0, 200.0, "transfer", "travel budget", "2024-02-08T12:30:00"),
        (0, 2, 15.9, "leisure", "cinema", "2024-02-10T20:15:00"),
        (0, 1, 500.0, "savings", "monthly savings", "2024-03-02T09:00:00"),
        (0, 2, 64.2, "groceries", "supermarket", "2024-03-06T18:05:00"),
        (2, 0, 30.0, "transfer", "shared dinner", "2024-03-09T21:00:00"),
    ] {
        let tx = thing(pool, "transaction").await?;
        text(pool, tx, "identifier", &transaction_identifier()).await?;
        number(pool, tx, "amount", amount).await?;
        text(pool, tx, "category", category).await?;
        text(pool, tx, "reference", reference).await?;
        datetime(pool, tx, "execution-date", date).await?;
        role(pool, tx, "account-of-creator", accounts[creator]).await?;
        role(pool, tx, "account-of-receiver", accounts[receiver]).await?;
    }

    // entity-type synonyms
    for (key, value) in [
        ("bank", "bank"),
        ("banks", "bank"),
        ("account", "account"),
        ("accounts", "account"),
        ("card", "card"),
        ("cards", "card"),
        ("credit card", "card"),
        ("transaction", "transaction"),
        ("transactions", "transaction"),
        ("payments", "transaction"),
        ("person", "person"),
        ("people", "person"),
        ("contract", "contract"),
        ("contracts", "contract"),
    ] {
        mapping(pool, "entity-type-mapping", key, value).await?;
    }

    // attribute synonyms: every canonical attribute maps to itself, plus the
    // common alternative wordings
    for name in [
        "category",
        "execution-date",
        "amount",
        "reference",
        "sign-date",
        "balance",
        "account-type",
        "opening-date",
        "account-number",
        "name",
        "headquarters",
        "country",
        "english-website",
        "english-mobile-app",
        "allowed-residents",
        "free-accounts",
        "free-worldwide-withdrawals",
        "english-customer-service",
        "email",
        "last-name",
        "first-name",
        "gender",
        "phone-number",
        "city",
        "name-on-card",
        "expiry-date",
        "created-date",
        "card-number",
    ] {
        mapping(pool, "attribute-mapping", name, name).await?;
    }
    for (key, value) in [
        ("HQ", "headquarters"),
        ("main office", "headquarters"),
        ("free accounts", "free-accounts"),
        ("website", "english-website"),
        ("phone number", "phone-number"),
        ("IBAN", "account-number"),
        ("account number", "account-number"),
    ] {
        mapping(pool, "attribute-mapping", key, value).await?;
    }

    // ordinal mentions; "last" follows the listing cap of five
    for (key, value) in [
        ("first", "0"),
        ("second", "1"),
        ("third", "2"),
        ("fourth", "3"),
        ("fifth", "4"),
        ("last", "4"),
    ] {
        mapping(pool, "mention-mapping", key, value).await?;
    }

    info!(principal, "Seeded demo knowledge base");
    Ok(())
}
