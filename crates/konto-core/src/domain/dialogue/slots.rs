//! Conversation slot snapshot and update directives

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Well-known slot names
pub mod slot {
    /// Entity-type token as spoken by the user (e.g. "banks")
    pub const ENTITY_TYPE: &str = "entity_type";
    /// Attribute token as spoken by the user (e.g. "HQ")
    pub const ATTRIBUTE: &str = "attribute";
    /// Canonical ordinal token of a pending mention (e.g. "first")
    pub const MENTION: &str = "mention";
    /// Key-attribute labels of the most recent listing, in display order
    pub const LISTED_ITEMS: &str = "listed_items";
    /// Account number the conversation is currently about
    pub const ACCOUNT: &str = "account";
}

/// Slot name carrying the value of an entity attribute
///
/// Attribute names use dashes; slot names cannot, so `account-type` is
/// tracked in the `account_type` slot.
pub fn attribute_slot(attribute: &str) -> String {
    attribute.replace('-', "_")
}

/// Value held in a conversation slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SlotValue {
    Text(String),
    List(Vec<String>),
}

impl SlotValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::List(_) => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::List(items) => Some(items),
            Self::Text(_) => None,
        }
    }
}

impl From<&str> for SlotValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for SlotValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<Vec<String>> for SlotValue {
    fn from(items: Vec<String>) -> Self {
        Self::List(items)
    }
}

/// Immutable snapshot of the slot store for one action invocation
///
/// Owned by the external dialogue collaborator; the core only reads it and
/// computes replacement values to hand back.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Slots {
    values: BTreeMap<String, SlotValue>,
}

impl Slots {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a slot value (builder-style)
    pub fn with(mut self, name: impl Into<String>, value: impl Into<SlotValue>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }

    /// Set a slot value
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<SlotValue>) {
        self.values.insert(name.into(), value.into());
    }

    /// Remove a slot value (used by slot stores applying clear directives)
    pub fn remove(&mut self, name: &str) -> Option<SlotValue> {
        self.values.remove(name)
    }

    /// Raw slot value
    pub fn get(&self, name: &str) -> Option<&SlotValue> {
        self.values.get(name)
    }

    /// Text content of a slot, when it holds text
    pub fn text(&self, name: &str) -> Option<&str> {
        self.values.get(name).and_then(SlotValue::as_text)
    }

    /// List content of a slot, when it holds a list
    pub fn list(&self, name: &str) -> Option<&[String]> {
        self.values.get(name).and_then(SlotValue::as_list)
    }
}

/// Replacement value to hand back to the slot store; `None` clears the slot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlotUpdate {
    pub name: String,
    pub value: Option<SlotValue>,
}

impl SlotUpdate {
    /// Directive setting a slot to a value
    pub fn set(name: impl Into<String>, value: impl Into<SlotValue>) -> Self {
        Self {
            name: name.into(),
            value: Some(value.into()),
        }
    }

    /// Directive clearing a slot
    pub fn clear(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_slot_names() {
        assert_eq!(attribute_slot("account-type"), "account_type");
        assert_eq!(attribute_slot("balance"), "balance");
        assert_eq!(attribute_slot("free-worldwide-withdrawals"), "free_worldwide_withdrawals");
    }

    #[test]
    fn test_text_and_list_accessors() {
        let slots = Slots::new()
            .with(slot::ENTITY_TYPE, "banks")
            .with(slot::LISTED_ITEMS, vec!["N26".to_string(), "DKB".to_string()]);

        assert_eq!(slots.text(slot::ENTITY_TYPE), Some("banks"));
        assert_eq!(slots.list(slot::ENTITY_TYPE), None);
        assert_eq!(
            slots.list(slot::LISTED_ITEMS),
            Some(&["N26".to_string(), "DKB".to_string()][..])
        );
        assert_eq!(slots.text(slot::MENTION), None);
    }

    #[test]
    fn test_update_directives() {
        let set = SlotUpdate::set("mention", "first");
        assert_eq!(set.value, Some(SlotValue::Text("first".into())));

        let clear = SlotUpdate::clear("mention");
        assert_eq!(clear.name, "mention");
        assert_eq!(clear.value, None);
    }
}
