//! In-memory note store for development and tests.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::trace;
use uuid::Uuid;

use jotter_core::note_filter::sort_for_listing;
use jotter_core::{Error, Note, NoteFilter, NoteStore, Result, UserId};

/// [`NoteStore`] backed by a `HashMap` behind a tokio `RwLock`.
///
/// Contents are lost when the process exits.
#[derive(Default)]
pub struct InMemoryNoteRepository {
    notes: RwLock<HashMap<Uuid, Note>>,
}

impl InMemoryNoteRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored notes across all owners.
    pub async fn len(&self) -> usize {
        self.notes.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.notes.read().await.is_empty()
    }
}

#[async_trait]
impl NoteStore for InMemoryNoteRepository {
    async fn insert(&self, note: Note) -> Result<Note> {
        let mut notes = self.notes.write().await;
        if notes.contains_key(&note.id) {
            return Err(Error::Internal(format!("Duplicate note id {}", note.id)));
        }
        notes.insert(note.id, note.clone());
        Ok(note)
    }

    async fn find(&self, filter: &NoteFilter) -> Result<Vec<Note>> {
        let notes = self.notes.read().await;
        let mut matched: Vec<Note> = notes
            .values()
            .filter(|n| filter.matches(n))
            .cloned()
            .collect();
        sort_for_listing(&mut matched);

        trace!(
            subsystem = "db",
            component = "memory_store",
            op = "find",
            result_count = matched.len(),
            "Filtered in-memory notes"
        );
        Ok(matched)
    }

    async fn find_one(&self, id: Uuid, owner: UserId) -> Result<Option<Note>> {
        let notes = self.notes.read().await;
        Ok(notes.get(&id).filter(|n| n.is_owned_by(owner)).cloned())
    }

    async fn update(&self, note: &Note) -> Result<Option<Note>> {
        let mut notes = self.notes.write().await;
        match notes.get_mut(&note.id) {
            Some(stored) if stored.is_owned_by(note.owner_id) => {
                // id, owner and created_at are immutable
                stored.title = note.title.clone();
                stored.content = note.content.clone();
                stored.tags = note.tags.clone();
                stored.priority = note.priority;
                stored.background_color = note.background_color.clone();
                stored.is_pinned = note.is_pinned;
                stored.is_archived = note.is_archived;
                stored.is_deleted = note.is_deleted;
                stored.updated_at = note.updated_at;
                Ok(Some(stored.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn delete(&self, id: Uuid, owner: UserId) -> Result<bool> {
        let mut notes = self.notes.write().await;
        match notes.get(&id) {
            Some(n) if n.is_owned_by(owner) => {
                notes.remove(&id);
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
