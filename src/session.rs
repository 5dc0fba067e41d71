//! In-memory store of converted documents for one server session.
//!
//! ## Why insertion order matters
//!
//! The browser lists documents in the order they were submitted, and the
//! bulk archive derives member names (including collision suffixes) by
//! walking the store front to back. An [`IndexMap`] gives both for free:
//! iteration follows insertion, and re-converting a document updates its
//! markdown in place without moving it to the end.
//!
//! Only successful conversions are stored. A failed conversion reports its
//! error to the caller and leaves the store untouched, so everything listed,
//! downloaded, or archived is real output.

use indexmap::IndexMap;

/// Converted documents keyed by their display id (the source URL for remote
/// documents, the original filename for uploads).
#[derive(Debug, Default)]
pub struct SessionStore {
    documents: IndexMap<String, String>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a document. Replacing keeps the original position.
    pub fn put(&mut self, id: impl Into<String>, markdown: impl Into<String>) {
        self.documents.insert(id.into(), markdown.into());
    }

    /// Markdown for one document, if present.
    pub fn get(&self, id: &str) -> Option<&str> {
        self.documents.get(id).map(String::as_str)
    }

    /// Drop every document. Safe to call on an already-empty store.
    pub fn clear(&mut self) {
        self.documents.clear();
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// All documents in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.documents
            .iter()
            .map(|(id, markdown)| (id.as_str(), markdown.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iteration_follows_insertion_order() {
        let mut store = SessionStore::new();
        store.put("c.pdf", "# C");
        store.put("a.pdf", "# A");
        store.put("b.pdf", "# B");

        let ids: Vec<&str> = store.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec!["c.pdf", "a.pdf", "b.pdf"]);
    }

    #[test]
    fn overwrite_updates_in_place() {
        let mut store = SessionStore::new();
        store.put("first.pdf", "old");
        store.put("second.pdf", "# Second");
        store.put("first.pdf", "new");

        assert_eq!(store.len(), 2);
        assert_eq!(store.get("first.pdf"), Some("new"));
        let ids: Vec<&str> = store.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec!["first.pdf", "second.pdf"]);
    }

    #[test]
    fn clear_is_idempotent() {
        let mut store = SessionStore::new();
        store.put("doc.pdf", "# Doc");
        assert!(!store.is_empty());

        store.clear();
        assert!(store.is_empty());
        store.clear();
        assert!(store.is_empty());
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn get_missing_returns_none() {
        let store = SessionStore::new();
        assert_eq!(store.get("nope.pdf"), None);
    }
}
