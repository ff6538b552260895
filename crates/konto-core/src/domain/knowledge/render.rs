//! Human-readable rendering of records
//!
//! Turns a record into a display string by resolving the representation
//! paths of its entity type and applying the type-specific formatting rules:
//! monetary attributes get a euro suffix, date attributes a fixed
//! `DD.MM.YYYY (HH:MM:SS)` pattern, everything else its plain string form.

use super::record::{Record, Value};

/// Format one resolved value according to the attribute path it came from
///
/// The monetary/date decision matches on the full dotted path, so e.g.
/// `account-of-creator.balance` is still monetary.
fn format_value(path: &str, value: &Value) -> String {
    if path.contains("balance") || path.contains("amount") {
        format!("{value} €")
    } else if path.contains("date") {
        match value {
            Value::DateTime(dt) => dt.format("%d.%m.%Y (%H:%M:%S)").to_string(),
            other => other.to_string(),
        }
    } else {
        value.to_string()
    }
}

/// Render a record through the given representation paths, joined by `", "`
///
/// Returns `None` when any path fails to resolve against the record.
pub fn render<S: AsRef<str>>(record: &Record, paths: &[S]) -> Option<String> {
    let mut parts = Vec::with_capacity(paths.len());
    for path in paths {
        let path = path.as_ref();
        let value = record.value_at(path)?;
        parts.push(format_value(path, value));
    }
    Some(parts.join(", "))
}

/// Render just the key attribute of a record
///
/// Produces the labels stored in the `listed_items` slot; ordinal mentions
/// later index into exactly these strings.
pub fn render_key(record: &Record, key_attribute: &str) -> Option<String> {
    render(record, &[key_attribute])
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_currency_suffix() {
        let record = Record::new().with_attribute("balance", 1200.5);
        assert_eq!(render(&record, &["balance"]), Some("1200.5 €".to_string()));

        let record = Record::new().with_attribute("amount", 9.99);
        assert_eq!(render(&record, &["amount"]), Some("9.99 €".to_string()));
    }

    #[test]
    fn test_date_pattern() {
        let dt = NaiveDate::from_ymd_opt(2020, 3, 1)
            .unwrap()
            .and_hms_opt(14, 5, 0)
            .unwrap();
        let record = Record::new().with_attribute("execution-date", dt);
        assert_eq!(
            render(&record, &["execution-date"]),
            Some("01.03.2020 (14:05:00)".to_string())
        );
    }

    #[test]
    fn test_plain_values_joined_in_path_order() {
        let record = Record::new()
            .with_attribute("name-on-card", "M. Gillis")
            .with_attribute("card-number", "4123");
        assert_eq!(
            render(&record, &["name-on-card", "card-number"]),
            Some("M. Gillis, 4123".to_string())
        );
    }

    #[test]
    fn test_dotted_path_resolution() {
        let record = Record::new()
            .with_attribute("account-number", "DE01")
            .with_attribute("account-type", "maestro")
            .with_nested("provider", Record::new().with_attribute("name", "N26"));
        assert_eq!(
            render(&record, &["provider.name", "account-number", "account-type"]),
            Some("N26, DE01, maestro".to_string())
        );
    }

    #[test]
    fn test_missing_path_renders_nothing() {
        let record = Record::new().with_attribute("name", "N26");
        assert_eq!(render(&record, &["name", "headquarters"]), None);
    }

    #[test]
    fn test_rendering_is_idempotent() {
        let dt = NaiveDate::from_ymd_opt(2021, 12, 24)
            .unwrap()
            .and_hms_opt(8, 30, 15)
            .unwrap();
        let record = Record::new()
            .with_attribute("execution-date", dt)
            .with_attribute("amount", 50.0)
            .with_attribute("reference", "rent");

        let paths = ["execution-date", "reference", "amount"];
        let first = render(&record, &paths);
        let second = render(&record, &paths);
        assert_eq!(first, second);
        assert_eq!(first, Some("24.12.2021 (08:30:15), rent, 50 €".to_string()));
    }

    #[test]
    fn test_render_key() {
        let record = Record::new().with_attribute("email", "a@b.de");
        assert_eq!(render_key(&record, "email"), Some("a@b.de".to_string()));
        assert_eq!(render_key(&record, "name"), None);
    }
}
