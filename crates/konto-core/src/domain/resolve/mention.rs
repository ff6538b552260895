//! Ordinal mention resolution
//!
//! "The first one" only means something relative to what was just listed.
//! The `mention-mapping` table maps the canonical ordinal token to a
//! zero-based index string; that table is the single source of truth for the
//! ordinal→index relationship, including whatever index it assigns to
//! "last". No bounds adjustment, no negative indices.

use crate::domain::knowledge::{KnowledgeBase, MappingTable};
use crate::error::Result;

/// Resolve an ordinal mention against the currently listed items
///
/// Absent when the token is unmapped, the mapped value is not an integer, or
/// the index falls outside the listing.
pub async fn resolve_mention(
    kb: &dyn KnowledgeBase,
    mention: &str,
    listed_items: &[String],
) -> Result<Option<String>> {
    let Some(mapped) = kb.lookup(MappingTable::Mention, mention).await? else {
        return Ok(None);
    };
    let Ok(index) = mapped.parse::<usize>() else {
        return Ok(None);
    };
    Ok(listed_items.get(index).cloned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::memory::MemoryKnowledgeBase;

    fn kb() -> MemoryKnowledgeBase {
        let mut kb = MemoryKnowledgeBase::new();
        for (token, index) in [("first", "0"), ("second", "1"), ("third", "2")] {
            kb.insert_mapping(MappingTable::Mention, token, index);
        }
        kb.insert_mapping(MappingTable::Mention, "that one", "not-a-number");
        kb
    }

    fn listing() -> Vec<String> {
        vec!["N26".to_string(), "DKB".to_string(), "bunq".to_string()]
    }

    #[tokio::test]
    async fn test_every_valid_index_hits_its_item() {
        let kb = kb();
        let listed = listing();
        for (token, expected) in [("first", "N26"), ("second", "DKB"), ("third", "bunq")] {
            let resolved = resolve_mention(&kb, token, &listed).await.unwrap();
            assert_eq!(resolved.as_deref(), Some(expected), "token {token}");
        }
    }

    #[tokio::test]
    async fn test_index_past_the_listing_is_absent() {
        let kb = kb();
        let listed = vec!["N26".to_string()];
        assert_eq!(resolve_mention(&kb, "second", &listed).await.unwrap(), None);
        assert_eq!(resolve_mention(&kb, "third", &listed).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_non_integer_mapping_is_absent() {
        let kb = kb();
        let resolved = resolve_mention(&kb, "that one", &listing()).await.unwrap();
        assert_eq!(resolved, None);
    }

    #[tokio::test]
    async fn test_unmapped_token_is_absent() {
        let kb = kb();
        let resolved = resolve_mention(&kb, "seventeenth", &listing()).await.unwrap();
        assert_eq!(resolved, None);
    }

    #[tokio::test]
    async fn test_empty_listing_resolves_nothing() {
        let kb = kb();
        assert_eq!(resolve_mention(&kb, "first", &[]).await.unwrap(), None);
    }
}
