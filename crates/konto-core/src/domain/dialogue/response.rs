//! Action responses
//!
//! What an action hands back to the dialogue collaborator: user-visible
//! messages in utterance order, slot-update directives, and optionally the
//! name of a prompt template to trigger.

use serde::Serialize;

use super::slots::SlotUpdate;

/// Name of the rephrase prompt understood by the dialogue collaborator
pub const REPHRASE_PROMPT: &str = "utter_rephrase";

/// Result of one action invocation
#[derive(Debug, Clone, Default, Serialize)]
pub struct ActionResponse {
    /// User-visible messages, in utterance order
    pub messages: Vec<String>,
    /// Replacement slot values for the external slot store
    pub slot_updates: Vec<SlotUpdate>,
    /// Prompt template to trigger, if any
    pub prompt: Option<String>,
}

impl ActionResponse {
    pub fn new() -> Self {
        Self::default()
    }

    /// Response asking the user to rephrase
    pub fn rephrase() -> Self {
        Self {
            prompt: Some(REPHRASE_PROMPT.to_string()),
            ..Self::default()
        }
    }

    /// Append a user-visible message
    pub fn say(&mut self, message: impl Into<String>) {
        self.messages.push(message.into());
    }

    /// Append a slot-update directive
    pub fn update(&mut self, update: SlotUpdate) {
        self.slot_updates.push(update);
    }

    /// Whether this response asks the user to rephrase
    pub fn is_rephrase(&self) -> bool {
        self.prompt.as_deref() == Some(REPHRASE_PROMPT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rephrase_response() {
        let response = ActionResponse::rephrase();
        assert!(response.is_rephrase());
        assert!(response.messages.is_empty());
        assert!(response.slot_updates.is_empty());
    }

    #[test]
    fn test_messages_keep_order() {
        let mut response = ActionResponse::new();
        response.say("Found the following 'bank' entities:");
        response.say("1: DKB");
        response.say("2: N26");
        assert_eq!(response.messages.len(), 3);
        assert!(response.messages[0].starts_with("Found"));
        assert!(!response.is_rephrase());
    }
}
