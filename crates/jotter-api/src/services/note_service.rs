//! Note lifecycle operations.
//!
//! A note's view bucket is derived from two flags:
//!
//! | `is_archived` | `is_deleted` | bucket   |
//! |---------------|--------------|----------|
//! | false         | false        | Active   |
//! | true          | false        | Archived |
//! | any           | true         | Trashed  |
//!
//! `is_pinned` is orthogonal and only affects ordering. Every operation is
//! scoped by the caller's [`UserId`]; a note owned by someone else is
//! reported exactly like a missing one.
//!
//! Toggles are read-flip-write against the store, so two concurrent toggles
//! on one note are last-writer-wins.

use std::str::FromStr;
use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use jotter_core::{
    defaults, new_v7, BucketFilter, Clock, CreateNoteRequest, Error, Note, NoteFilter, NoteQuery,
    NoteStore, Priority, Result, UpdateNoteRequest, UserId,
};

/// Message returned when a create request lacks title or content.
pub const MISSING_FIELDS: &str = "Title and content are required";

/// `empty_trash` stopped early; `deleted` notes were already removed.
#[derive(Debug, thiserror::Error)]
#[error("Emptying trash stopped after {deleted} deletions: {source}")]
pub struct EmptyTrashError {
    pub deleted: usize,
    #[source]
    pub source: Error,
}

/// Business logic over a [`NoteStore`].
#[derive(Clone)]
pub struct NoteService {
    store: Arc<dyn NoteStore>,
    clock: Arc<dyn Clock>,
}

impl NoteService {
    pub fn new(store: Arc<dyn NoteStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Create an Active, unpinned note owned by `owner`.
    pub async fn create(&self, owner: UserId, req: CreateNoteRequest) -> Result<Note> {
        let title = req.title.as_deref().map(str::trim).unwrap_or_default();
        let content = req.content.unwrap_or_default();
        if title.is_empty() || content.is_empty() {
            return Err(Error::InvalidInput(MISSING_FIELDS.to_string()));
        }

        let priority = match req.priority.as_deref() {
            Some(p) if !p.is_empty() => Priority::from_str(p)?,
            _ => Priority::default(),
        };
        let background_color = req
            .background_color
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| defaults::BACKGROUND_COLOR.to_string());

        let now = self.clock.now();
        let note = Note {
            id: new_v7(),
            owner_id: owner,
            title: title.to_string(),
            content,
            tags: trim_tags(req.tags.unwrap_or_default()),
            priority,
            background_color,
            is_pinned: false,
            is_archived: false,
            is_deleted: false,
            created_at: now,
            updated_at: now,
        };

        let note = self.store.insert(note).await?;
        info!(
            subsystem = "service",
            component = "notes",
            op = "create",
            note_id = %note.id,
            user_id = %owner,
            "Note created"
        );
        Ok(note)
    }

    /// Fetch one note.
    pub async fn get(&self, owner: UserId, id: Uuid) -> Result<Note> {
        self.store
            .find_one(id, owner)
            .await?
            .ok_or_else(|| Error::note_not_found(id))
    }

    /// List the caller's notes for one view, pinned first then most recent.
    pub async fn list(&self, owner: UserId, query: &NoteQuery) -> Result<Vec<Note>> {
        let filter = NoteFilter::build(owner, query);
        debug!(
            subsystem = "service",
            component = "notes",
            op = "list",
            user_id = %owner,
            bucket = filter.bucket.as_bucket().as_str(),
            has_search = filter.search.is_some(),
            has_tag = filter.tag.is_some(),
            has_priority = filter.priority.is_some(),
            "Listing notes"
        );
        self.store.find(&filter).await
    }

    /// Apply a partial edit.
    ///
    /// `title`, `content`, `priority` and `background_color` overwrite only
    /// when present and non-empty. `tags` overwrites whenever present, so an
    /// empty array clears them. `updated_at` is always stamped.
    pub async fn update(&self, owner: UserId, id: Uuid, req: UpdateNoteRequest) -> Result<Note> {
        let mut note = self.get(owner, id).await?;

        if let Some(title) = req.title.filter(|t| !t.is_empty()) {
            let trimmed = title.trim();
            if trimmed.is_empty() {
                return Err(Error::InvalidInput("Title cannot be blank".to_string()));
            }
            note.title = trimmed.to_string();
        }
        if let Some(content) = req.content.filter(|c| !c.is_empty()) {
            note.content = content;
        }
        if let Some(tags) = req.tags {
            note.tags = trim_tags(tags);
        }
        if let Some(priority) = req.priority.filter(|p| !p.is_empty()) {
            note.priority = Priority::from_str(&priority)?;
        }
        if let Some(color) = req.background_color.filter(|c| !c.is_empty()) {
            note.background_color = color;
        }

        self.save(note, "update").await
    }

    /// Flip `is_pinned`, in any bucket.
    pub async fn toggle_pin(&self, owner: UserId, id: Uuid) -> Result<Note> {
        let mut note = self.get(owner, id).await?;
        note.is_pinned = !note.is_pinned;
        self.save(note, "toggle_pin").await
    }

    /// Flip `is_archived`. `is_deleted` is left alone, so toggling a trashed
    /// note changes where it lands on restore.
    pub async fn toggle_archive(&self, owner: UserId, id: Uuid) -> Result<Note> {
        let mut note = self.get(owner, id).await?;
        note.is_archived = !note.is_archived;
        self.save(note, "toggle_archive").await
    }

    /// Move to trash. Idempotent; `updated_at` is stamped every time.
    pub async fn soft_delete(&self, owner: UserId, id: Uuid) -> Result<Note> {
        let mut note = self.get(owner, id).await?;
        note.is_deleted = true;
        self.save(note, "soft_delete").await
    }

    /// Clear `is_deleted`; the note returns to Active or Archived according
    /// to its retained `is_archived`.
    pub async fn restore(&self, owner: UserId, id: Uuid) -> Result<Note> {
        let mut note = self.get(owner, id).await?;
        note.is_deleted = false;
        self.save(note, "restore").await
    }

    /// Remove a note in any bucket.
    pub async fn permanent_delete(&self, owner: UserId, id: Uuid) -> Result<()> {
        if !self.store.delete(id, owner).await? {
            return Err(Error::note_not_found(id));
        }
        info!(
            subsystem = "service",
            component = "notes",
            op = "permanent_delete",
            note_id = %id,
            user_id = %owner,
            "Note permanently deleted"
        );
        Ok(())
    }

    /// Permanently delete every note in the caller's trash, one at a time.
    ///
    /// Stops at the first store failure; notes deleted before it stay
    /// deleted. A note that vanished between listing and deletion is skipped.
    pub async fn empty_trash(&self, owner: UserId) -> std::result::Result<usize, EmptyTrashError> {
        let filter = NoteFilter::for_bucket(owner, BucketFilter::Trashed);
        let trashed = self
            .store
            .find(&filter)
            .await
            .map_err(|source| EmptyTrashError { deleted: 0, source })?;

        let mut deleted = 0;
        for note in &trashed {
            match self.store.delete(note.id, owner).await {
                Ok(true) => deleted += 1,
                Ok(false) => {
                    debug!(
                        subsystem = "service",
                        component = "notes",
                        op = "empty_trash",
                        note_id = %note.id,
                        "Trashed note already gone"
                    );
                }
                Err(source) => {
                    warn!(
                        subsystem = "service",
                        component = "notes",
                        op = "empty_trash",
                        note_id = %note.id,
                        deleted,
                        error = %source,
                        "Emptying trash stopped"
                    );
                    return Err(EmptyTrashError { deleted, source });
                }
            }
        }

        info!(
            subsystem = "service",
            component = "notes",
            op = "empty_trash",
            user_id = %owner,
            result_count = deleted,
            "Trash emptied"
        );
        Ok(deleted)
    }

    async fn save(&self, mut note: Note, op: &'static str) -> Result<Note> {
        note.updated_at = self.clock.now();
        let id = note.id;
        let saved = self
            .store
            .update(&note)
            .await?
            .ok_or_else(|| Error::note_not_found(id))?;

        debug!(
            subsystem = "service",
            component = "notes",
            op,
            note_id = %saved.id,
            bucket = saved.bucket().as_str(),
            is_pinned = saved.is_pinned,
            "Note saved"
        );
        Ok(saved)
    }
}

fn trim_tags(tags: Vec<String>) -> Vec<String> {
    tags.into_iter().map(|t| t.trim().to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicI64, Ordering};

    use async_trait::async_trait;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use jotter_core::NoteBucket;
    use jotter_db::InMemoryNoteRepository;

    /// Advances one second on every call.
    struct SteppingClock {
        base: DateTime<Utc>,
        ticks: AtomicI64,
    }

    impl SteppingClock {
        fn new() -> Self {
            Self {
                base: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
                ticks: AtomicI64::new(0),
            }
        }
    }

    impl Clock for SteppingClock {
        fn now(&self) -> DateTime<Utc> {
            let n = self.ticks.fetch_add(1, Ordering::SeqCst);
            self.base + Duration::seconds(n)
        }
    }

    fn service() -> NoteService {
        NoteService::new(
            Arc::new(InMemoryNoteRepository::new()),
            Arc::new(SteppingClock::new()),
        )
    }

    fn user() -> UserId {
        UserId(Uuid::new_v4())
    }

    fn contains(notes: &[Note], id: Uuid) -> bool {
        notes.iter().any(|n| n.id == id)
    }

    async fn views(svc: &NoteService, owner: UserId) -> (Vec<Note>, Vec<Note>, Vec<Note>) {
        (
            svc.list(owner, &NoteQuery::default()).await.unwrap(),
            svc.list(owner, &NoteQuery::archived()).await.unwrap(),
            svc.list(owner, &NoteQuery::trashed()).await.unwrap(),
        )
    }

    #[tokio::test]
    async fn test_create_defaults() {
        let svc = service();
        let owner = user();
        let note = svc
            .create(owner, CreateNoteRequest::new("  Groceries  ", "milk, eggs"))
            .await
            .unwrap();

        assert_eq!(note.title, "Groceries");
        assert_eq!(note.owner_id, owner);
        assert_eq!(note.priority, Priority::Low);
        assert_eq!(note.background_color, "#ffffff");
        assert!(note.tags.is_empty());
        assert!(!note.is_pinned && !note.is_archived && !note.is_deleted);
        assert_eq!(note.created_at, note.updated_at);
        assert_eq!(note.bucket(), NoteBucket::Active);
    }

    #[tokio::test]
    async fn test_create_trims_tags_and_keeps_duplicates() {
        let svc = service();
        let note = svc
            .create(
                user(),
                CreateNoteRequest::new("t", "c").with_tags(vec![
                    " work ".to_string(),
                    "work".to_string(),
                ]),
            )
            .await
            .unwrap();
        assert_eq!(note.tags, vec!["work".to_string(), "work".to_string()]);
    }

    #[tokio::test]
    async fn test_create_requires_title_and_content() {
        let svc = service();
        let owner = user();

        for req in [
            CreateNoteRequest::default(),
            CreateNoteRequest {
                title: Some("t".to_string()),
                ..Default::default()
            },
            CreateNoteRequest::new("", "c"),
            CreateNoteRequest::new("   ", "c"),
            CreateNoteRequest::new("t", ""),
        ] {
            match svc.create(owner, req).await {
                Err(Error::InvalidInput(msg)) => assert_eq!(msg, MISSING_FIELDS),
                other => panic!("expected InvalidInput, got {:?}", other),
            }
        }
        assert!(svc.list(owner, &NoteQuery::default()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_rejects_unknown_priority() {
        let svc = service();
        let req = CreateNoteRequest {
            priority: Some("Urgent".to_string()),
            ..CreateNoteRequest::new("t", "c")
        };
        assert!(matches!(
            svc.create(user(), req).await,
            Err(Error::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn test_non_owner_gets_not_found_everywhere() {
        let svc = service();
        let owner = user();
        let stranger = user();
        let note = svc
            .create(owner, CreateNoteRequest::new("mine", "c"))
            .await
            .unwrap();

        assert!(matches!(svc.get(stranger, note.id).await, Err(Error::NotFound(_))));
        assert!(matches!(
            svc.update(stranger, note.id, UpdateNoteRequest::default()).await,
            Err(Error::NotFound(_))
        ));
        assert!(matches!(svc.toggle_pin(stranger, note.id).await, Err(Error::NotFound(_))));
        assert!(matches!(
            svc.toggle_archive(stranger, note.id).await,
            Err(Error::NotFound(_))
        ));
        assert!(matches!(svc.soft_delete(stranger, note.id).await, Err(Error::NotFound(_))));
        assert!(matches!(svc.restore(stranger, note.id).await, Err(Error::NotFound(_))));
        assert!(matches!(
            svc.permanent_delete(stranger, note.id).await,
            Err(Error::NotFound(_))
        ));

        let untouched = svc.get(owner, note.id).await.unwrap();
        assert_eq!(untouched, note);
        assert!(svc
            .list(stranger, &NoteQuery::default())
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_update_set_if_truthy() {
        let svc = service();
        let owner = user();
        let note = svc
            .create(
                owner,
                CreateNoteRequest::new("Title", "Body")
                    .with_tags(vec!["a".to_string()])
                    .with_priority(Priority::Medium)
                    .with_background_color("#ffeeaa"),
            )
            .await
            .unwrap();

        let updated = svc
            .update(
                owner,
                note.id,
                UpdateNoteRequest {
                    title: Some(String::new()),
                    content: Some(String::new()),
                    priority: Some(String::new()),
                    background_color: Some(String::new()),
                    tags: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.title, "Title");
        assert_eq!(updated.content, "Body");
        assert_eq!(updated.priority, Priority::Medium);
        assert_eq!(updated.background_color, "#ffeeaa");
        assert_eq!(updated.tags, vec!["a".to_string()]);
        assert!(updated.updated_at > note.updated_at);
        assert_eq!(updated.created_at, note.created_at);
    }

    #[tokio::test]
    async fn test_update_overwrites_and_clears_tags() {
        let svc = service();
        let owner = user();
        let note = svc
            .create(
                owner,
                CreateNoteRequest::new("Title", "Body").with_tags(vec!["a".to_string()]),
            )
            .await
            .unwrap();

        let updated = svc
            .update(
                owner,
                note.id,
                UpdateNoteRequest {
                    title: Some(" New ".to_string()),
                    priority: Some("High".to_string()),
                    tags: Some(vec![]),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.title, "New");
        assert_eq!(updated.priority, Priority::High);
        assert!(updated.tags.is_empty());
    }

    #[tokio::test]
    async fn test_update_rejects_blank_title_and_bad_priority() {
        let svc = service();
        let owner = user();
        let note = svc
            .create(owner, CreateNoteRequest::new("Title", "Body"))
            .await
            .unwrap();

        let blank = UpdateNoteRequest {
            title: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            svc.update(owner, note.id, blank).await,
            Err(Error::InvalidInput(_))
        ));

        let bad = UpdateNoteRequest {
            priority: Some("low".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            svc.update(owner, note.id, bad).await,
            Err(Error::InvalidInput(_))
        ));

        assert_eq!(svc.get(owner, note.id).await.unwrap(), note);
    }

    #[tokio::test]
    async fn test_toggles_are_involutions_and_stamp_updated_at() {
        let svc = service();
        let owner = user();
        let note = svc
            .create(owner, CreateNoteRequest::new("t", "c"))
            .await
            .unwrap();

        let pinned = svc.toggle_pin(owner, note.id).await.unwrap();
        assert!(pinned.is_pinned);
        let unpinned = svc.toggle_pin(owner, note.id).await.unwrap();
        assert!(!unpinned.is_pinned);
        assert!(unpinned.updated_at > pinned.updated_at);

        let archived = svc.toggle_archive(owner, note.id).await.unwrap();
        assert!(archived.is_archived);
        let unarchived = svc.toggle_archive(owner, note.id).await.unwrap();
        assert!(!unarchived.is_archived);

        let back = svc.get(owner, note.id).await.unwrap();
        assert_eq!(
            (back.title, back.content, back.tags, back.priority),
            (note.title, note.content, note.tags, note.priority)
        );
        assert!(back.updated_at > note.updated_at);
    }

    #[tokio::test]
    async fn test_get_does_not_stamp_updated_at() {
        let svc = service();
        let owner = user();
        let note = svc
            .create(owner, CreateNoteRequest::new("t", "c"))
            .await
            .unwrap();
        svc.list(owner, &NoteQuery::default()).await.unwrap();
        assert_eq!(svc.get(owner, note.id).await.unwrap().updated_at, note.updated_at);
    }

    #[tokio::test]
    async fn test_pin_allowed_in_any_bucket() {
        let svc = service();
        let owner = user();
        let note = svc
            .create(owner, CreateNoteRequest::new("t", "c"))
            .await
            .unwrap();
        svc.soft_delete(owner, note.id).await.unwrap();

        let pinned = svc.toggle_pin(owner, note.id).await.unwrap();
        assert!(pinned.is_pinned);
        assert_eq!(pinned.bucket(), NoteBucket::Trashed);
    }

    #[tokio::test]
    async fn test_soft_delete_and_restore_keep_archive_flag() {
        let svc = service();
        let owner = user();
        let note = svc
            .create(owner, CreateNoteRequest::new("t", "c"))
            .await
            .unwrap();
        svc.toggle_archive(owner, note.id).await.unwrap();

        let trashed = svc.soft_delete(owner, note.id).await.unwrap();
        assert!(trashed.is_deleted && trashed.is_archived);

        let (active, archived, trash) = views(&svc, owner).await;
        assert!(!contains(&active, note.id));
        assert!(!contains(&archived, note.id));
        assert!(contains(&trash, note.id));

        let restored = svc.restore(owner, note.id).await.unwrap();
        assert!(!restored.is_deleted && restored.is_archived);

        let (active, archived, trash) = views(&svc, owner).await;
        assert!(!contains(&active, note.id));
        assert!(contains(&archived, note.id));
        assert!(!contains(&trash, note.id));
    }

    #[tokio::test]
    async fn test_soft_delete_is_idempotent() {
        let svc = service();
        let owner = user();
        let note = svc
            .create(owner, CreateNoteRequest::new("t", "c"))
            .await
            .unwrap();

        let first = svc.soft_delete(owner, note.id).await.unwrap();
        let second = svc.soft_delete(owner, note.id).await.unwrap();
        assert!(second.is_deleted);
        assert!(second.updated_at > first.updated_at);
    }

    #[tokio::test]
    async fn test_archive_while_trashed_changes_restore_target() {
        let svc = service();
        let owner = user();
        let note = svc
            .create(owner, CreateNoteRequest::new("t", "c"))
            .await
            .unwrap();
        svc.soft_delete(owner, note.id).await.unwrap();
        svc.toggle_archive(owner, note.id).await.unwrap();

        let restored = svc.restore(owner, note.id).await.unwrap();
        assert_eq!(restored.bucket(), NoteBucket::Archived);
    }

    #[tokio::test]
    async fn test_permanent_delete_removes_from_every_view() {
        let svc = service();
        let owner = user();
        let note = svc
            .create(owner, CreateNoteRequest::new("t", "c"))
            .await
            .unwrap();

        svc.permanent_delete(owner, note.id).await.unwrap();
        assert!(matches!(svc.get(owner, note.id).await, Err(Error::NotFound(_))));
        assert!(matches!(
            svc.permanent_delete(owner, note.id).await,
            Err(Error::NotFound(_))
        ));

        let (active, archived, trash) = views(&svc, owner).await;
        assert!(active.is_empty() && archived.is_empty() && trash.is_empty());
    }

    #[tokio::test]
    async fn test_list_ordering_pinned_then_recent() {
        let svc = service();
        let owner = user();
        let a = svc.create(owner, CreateNoteRequest::new("a", "c")).await.unwrap();
        let b = svc.create(owner, CreateNoteRequest::new("b", "c")).await.unwrap();
        let c = svc.create(owner, CreateNoteRequest::new("c", "c")).await.unwrap();
        svc.toggle_pin(owner, a.id).await.unwrap();

        let ids: Vec<Uuid> = svc
            .list(owner, &NoteQuery::default())
            .await
            .unwrap()
            .iter()
            .map(|n| n.id)
            .collect();
        assert_eq!(ids, vec![a.id, c.id, b.id]);
    }

    #[tokio::test]
    async fn test_groceries_and_work_scenario() {
        let svc = service();
        let owner = user();

        let groceries = svc
            .create(owner, CreateNoteRequest::new("Groceries", "milk, eggs"))
            .await
            .unwrap();
        let work = svc
            .create(
                owner,
                CreateNoteRequest::new("Work", "quarterly slides")
                    .with_tags(vec!["work".to_string()])
                    .with_priority(Priority::High),
            )
            .await
            .unwrap();

        let active = svc.list(owner, &NoteQuery::default()).await.unwrap();
        assert_eq!(active.iter().map(|n| n.id).collect::<Vec<_>>(), vec![work.id, groceries.id]);

        svc.toggle_pin(owner, groceries.id).await.unwrap();
        let active = svc.list(owner, &NoteQuery::default()).await.unwrap();
        assert_eq!(active[0].id, groceries.id);

        let milk = svc
            .list(owner, &NoteQuery::default().with_search("MILK"))
            .await
            .unwrap();
        assert_eq!(milk.len(), 1);
        assert_eq!(milk[0].id, groceries.id);

        let tagged = svc
            .list(owner, &NoteQuery::default().with_tag("work"))
            .await
            .unwrap();
        assert_eq!(tagged.len(), 1);
        assert_eq!(tagged[0].id, work.id);

        let high = svc
            .list(owner, &NoteQuery::default().with_priority("High"))
            .await
            .unwrap();
        assert_eq!(high.len(), 1);

        svc.toggle_archive(owner, work.id).await.unwrap();
        let (active, archived, _) = views(&svc, owner).await;
        assert_eq!(active.len(), 1);
        assert_eq!(archived.len(), 1);
        assert_eq!(archived[0].id, work.id);

        svc.soft_delete(owner, groceries.id).await.unwrap();
        let (active, _, trash) = views(&svc, owner).await;
        assert!(active.is_empty());
        assert_eq!(trash[0].id, groceries.id);
    }

    #[tokio::test]
    async fn test_empty_trash_deletes_only_trashed_notes() {
        let svc = service();
        let owner = user();
        let keep = svc.create(owner, CreateNoteRequest::new("keep", "c")).await.unwrap();
        for title in ["x", "y", "z"] {
            let n = svc.create(owner, CreateNoteRequest::new(title, "c")).await.unwrap();
            svc.soft_delete(owner, n.id).await.unwrap();
        }
        let other = user();
        let theirs = svc.create(other, CreateNoteRequest::new("theirs", "c")).await.unwrap();
        svc.soft_delete(other, theirs.id).await.unwrap();

        assert_eq!(svc.empty_trash(owner).await.unwrap(), 3);
        assert!(svc.list(owner, &NoteQuery::trashed()).await.unwrap().is_empty());
        assert!(svc.get(owner, keep.id).await.is_ok());
        assert!(svc.get(other, theirs.id).await.is_ok());
        assert_eq!(svc.empty_trash(owner).await.unwrap(), 0);
    }

    /// Store whose deletes fail after a fixed number of successes.
    struct FlakyStore {
        inner: InMemoryNoteRepository,
        deletes_left: AtomicI64,
    }

    #[async_trait]
    impl NoteStore for FlakyStore {
        async fn insert(&self, note: Note) -> Result<Note> {
            self.inner.insert(note).await
        }
        async fn find(&self, filter: &NoteFilter) -> Result<Vec<Note>> {
            self.inner.find(filter).await
        }
        async fn find_one(&self, id: Uuid, owner: UserId) -> Result<Option<Note>> {
            self.inner.find_one(id, owner).await
        }
        async fn update(&self, note: &Note) -> Result<Option<Note>> {
            self.inner.update(note).await
        }
        async fn delete(&self, id: Uuid, owner: UserId) -> Result<bool> {
            if self.deletes_left.fetch_sub(1, Ordering::SeqCst) <= 0 {
                return Err(Error::Internal("store unavailable".to_string()));
            }
            self.inner.delete(id, owner).await
        }
    }

    #[tokio::test]
    async fn test_empty_trash_stops_at_first_failure() {
        let store = Arc::new(FlakyStore {
            inner: InMemoryNoteRepository::new(),
            deletes_left: AtomicI64::new(2),
        });
        let svc = NoteService::new(store.clone(), Arc::new(SteppingClock::new()));
        let owner = user();
        for title in ["a", "b", "c", "d"] {
            let n = svc.create(owner, CreateNoteRequest::new(title, "c")).await.unwrap();
            svc.soft_delete(owner, n.id).await.unwrap();
        }

        let err = svc.empty_trash(owner).await.unwrap_err();
        assert_eq!(err.deleted, 2);
        assert!(matches!(err.source, Error::Internal(_)));
        assert_eq!(svc.list(owner, &NoteQuery::trashed()).await.unwrap().len(), 2);
    }
}
