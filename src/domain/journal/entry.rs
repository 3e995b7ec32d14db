//! Journal entry entity
//!
//! Domain-only: the CLI stores media and prints items but does not persist
//! entries. Callers embedding the library attach saved items here by id.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::media::MediaItem;

/// Free text plus ordered attachments, referenced by media id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntry {
    id: Uuid,
    text: String,
    media_ids: Vec<Uuid>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl JournalEntry {
    pub fn new(text: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            media_ids: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn media_ids(&self) -> &[Uuid] {
        &self.media_ids
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.touch();
    }

    /// Append an attachment. Returns false if it was already attached.
    pub fn attach(&mut self, item: &MediaItem) -> bool {
        if self.media_ids.contains(&item.id()) {
            return false;
        }
        self.media_ids.push(item.id());
        self.touch();
        true
    }

    /// Remove an attachment. Returns false if it was not attached.
    pub fn detach(&mut self, media_id: Uuid) -> bool {
        let before = self.media_ids.len();
        self.media_ids.retain(|id| *id != media_id);
        let removed = self.media_ids.len() != before;
        if removed {
            self.touch();
        }
        removed
    }

    /// No text worth keeping and no attachments
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty() && self.media_ids.is_empty()
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now().max(self.created_at);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_entry_timestamps_match() {
        let entry = JournalEntry::new("hello");
        assert_eq!(entry.created_at(), entry.updated_at());
        assert_eq!(entry.text(), "hello");
        assert!(!entry.is_empty());
    }

    #[test]
    fn whitespace_only_entry_is_empty() {
        assert!(JournalEntry::new("   ").is_empty());
    }

    #[test]
    fn attach_preserves_order_and_ignores_duplicates() {
        let mut entry = JournalEntry::new("");
        let a = MediaItem::image("a", "a.png", 1).unwrap();
        let b = MediaItem::voice("b", "b.flac", 1, 2).unwrap();

        assert!(entry.attach(&a));
        assert!(entry.attach(&b));
        assert!(!entry.attach(&a));
        assert_eq!(entry.media_ids(), &[a.id(), b.id()]);
        assert!(!entry.is_empty());
        assert!(entry.updated_at() >= entry.created_at());
    }

    #[test]
    fn detach_removes_by_id() {
        let mut entry = JournalEntry::new("");
        let a = MediaItem::image("a", "a.png", 1).unwrap();
        entry.attach(&a);

        assert!(entry.detach(a.id()));
        assert!(!entry.detach(a.id()));
        assert!(entry.is_empty());
    }

    #[test]
    fn serializes_camel_case() {
        let entry = JournalEntry::new("x");
        let json = serde_json::to_value(&entry).unwrap();
        assert!(json.get("mediaIds").is_some());
        assert!(json.get("createdAt").is_some());
    }
}
