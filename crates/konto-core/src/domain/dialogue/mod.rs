//! Dialogue layer
//!
//! The seam to the external slot-tracking collaborator: an immutable slot
//! snapshot comes in with each action invocation, an [`ActionResponse`]
//! (messages, slot updates, optional rephrase prompt) goes back out. The
//! core never mutates conversation state in place.

pub mod actions;
mod response;
mod slots;

pub use response::{ActionResponse, REPHRASE_PROMPT};
pub use slots::{SlotUpdate, SlotValue, Slots, attribute_slot, slot};
