//! Core traits for jotter abstractions.

use async_trait::async_trait;
use chrono::{DateTime, DurationRound, TimeDelta, Utc};
use uuid::Uuid;

use crate::error::Result;
use crate::models::{Note, UserId};
use crate::note_filter::NoteFilter;

// =============================================================================
// STORE TRAITS
// =============================================================================

/// Storage adapter for notes.
///
/// Implementations hold no business logic. Every lookup and mutation is
/// scoped by owner: a note owned by someone else is indistinguishable from a
/// missing one.
#[async_trait]
pub trait NoteStore: Send + Sync {
    /// Persist a new note and return it as stored.
    async fn insert(&self, note: Note) -> Result<Note>;

    /// Return every note matching the filter, pinned first, then by
    /// `updated_at` descending.
    async fn find(&self, filter: &NoteFilter) -> Result<Vec<Note>>;

    /// Fetch one note by id, only if owned by `owner`.
    async fn find_one(&self, id: Uuid, owner: UserId) -> Result<Option<Note>>;

    /// Replace the mutable fields of the note matching `note.id` and
    /// `note.owner_id`. Returns `None` when no such note exists.
    async fn update(&self, note: &Note) -> Result<Option<Note>>;

    /// Remove the note matching id and owner. Returns whether a row was
    /// removed.
    async fn delete(&self, id: Uuid, owner: UserId) -> Result<bool>;
}

// =============================================================================
// IDENTITY
// =============================================================================

/// Resolves an opaque bearer token into a user id.
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    /// `None` for unknown, expired or revoked tokens.
    async fn resolve(&self, token: &str) -> Result<Option<UserId>>;
}

// =============================================================================
// TIME
// =============================================================================

/// Source of timestamps for `created_at` / `updated_at`.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock, truncated to microseconds so values survive a round trip
/// through PostgreSQL `TIMESTAMPTZ` unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        truncate_to_micros(Utc::now())
    }
}

/// Drop sub-microsecond precision from a timestamp.
pub fn truncate_to_micros(ts: DateTime<Utc>) -> DateTime<Utc> {
    ts.duration_trunc(TimeDelta::microseconds(1)).unwrap_or(ts)
}
