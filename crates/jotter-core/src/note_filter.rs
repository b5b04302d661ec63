//! Owner-scoped view filter for listing notes.
//!
//! A [`NoteQuery`] carries the raw view parameters of `GET /api/notes`.
//! [`NoteFilter::build`] turns them, together with the caller's identity,
//! into the predicate every store evaluates:
//!
//! - the owner predicate, always present;
//! - exactly one bucket, chosen with `archived` checked before `deleted`;
//! - optional search, tag and priority predicates, ANDed.
//!
//! # Example
//!
//! ```
//! use jotter_core::{BucketFilter, NoteFilter, NoteQuery, UserId};
//! use uuid::Uuid;
//!
//! let owner = UserId(Uuid::nil());
//! let query = NoteQuery {
//!     archived: Some("true".to_string()),
//!     deleted: Some("true".to_string()),
//!     ..Default::default()
//! };
//!
//! // archived takes precedence over deleted
//! let filter = NoteFilter::build(owner, &query);
//! assert_eq!(filter.bucket, BucketFilter::Archived);
//! ```

use serde::{Deserialize, Serialize};

use crate::defaults::VIEW_FLAG_TRUE;
use crate::models::{Note, NoteBucket, UserId};

/// Raw view parameters, exactly as received on the query string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct NoteQuery {
    /// Case-insensitive substring of title or content
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    /// Exact tag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    /// `Low`, `Medium` or `High`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    /// `true` selects the archived view
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archived: Option<String>,
    /// `true` selects the trash view (ignored when `archived=true`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted: Option<String>,
}

impl NoteQuery {
    /// Query for the archived view.
    pub fn archived() -> Self {
        Self {
            archived: Some(VIEW_FLAG_TRUE.to_string()),
            ..Default::default()
        }
    }

    /// Query for the trash view.
    pub fn trashed() -> Self {
        Self {
            deleted: Some(VIEW_FLAG_TRUE.to_string()),
            ..Default::default()
        }
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn with_priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = Some(priority.into());
        self
    }
}

/// Bucket predicate on (`is_archived`, `is_deleted`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BucketFilter {
    /// `NOT is_archived AND NOT is_deleted`
    Active,
    /// `is_archived AND NOT is_deleted`
    Archived,
    /// `is_deleted`; archive flag unconstrained
    Trashed,
}

impl BucketFilter {
    /// Pick the bucket from the raw flags. Only the exact string `"true"`
    /// selects a non-default view, and `archived` is checked first.
    pub fn from_flags(archived: Option<&str>, deleted: Option<&str>) -> Self {
        if archived == Some(VIEW_FLAG_TRUE) {
            BucketFilter::Archived
        } else if deleted == Some(VIEW_FLAG_TRUE) {
            BucketFilter::Trashed
        } else {
            BucketFilter::Active
        }
    }

    pub fn matches(&self, note: &Note) -> bool {
        match self {
            BucketFilter::Active => !note.is_archived && !note.is_deleted,
            BucketFilter::Archived => note.is_archived && !note.is_deleted,
            BucketFilter::Trashed => note.is_deleted,
        }
    }

    pub fn as_bucket(&self) -> NoteBucket {
        match self {
            BucketFilter::Active => NoteBucket::Active,
            BucketFilter::Archived => NoteBucket::Archived,
            BucketFilter::Trashed => NoteBucket::Trashed,
        }
    }
}

/// Constructed predicate for one list request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteFilter {
    pub owner: UserId,
    pub bucket: BucketFilter,
    /// Case-insensitive substring of title OR content.
    pub search: Option<String>,
    /// Exact membership in `tags`.
    pub tag: Option<String>,
    /// Exact match on the priority name; an unknown name matches nothing.
    pub priority: Option<String>,
}

impl NoteFilter {
    /// Filter selecting one bucket of the owner's notes, with no other
    /// predicates.
    pub fn for_bucket(owner: UserId, bucket: BucketFilter) -> Self {
        Self {
            owner,
            bucket,
            search: None,
            tag: None,
            priority: None,
        }
    }

    /// Build the filter for `owner` from raw view parameters. Empty strings
    /// count as absent.
    pub fn build(owner: UserId, query: &NoteQuery) -> Self {
        Self {
            owner,
            bucket: BucketFilter::from_flags(query.archived.as_deref(), query.deleted.as_deref()),
            search: non_empty(&query.search),
            tag: non_empty(&query.tag),
            priority: non_empty(&query.priority),
        }
    }

    /// Evaluate the predicate against a note.
    pub fn matches(&self, note: &Note) -> bool {
        if note.owner_id != self.owner || !self.bucket.matches(note) {
            return false;
        }

        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            if !note.title.to_lowercase().contains(&needle)
                && !note.content.to_lowercase().contains(&needle)
            {
                return false;
            }
        }

        if let Some(tag) = &self.tag {
            if !note.tags.iter().any(|t| t == tag) {
                return false;
            }
        }

        if let Some(priority) = &self.priority {
            if note.priority.as_str() != priority {
                return false;
            }
        }

        true
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|s| !s.is_empty()).cloned()
}

/// Sort notes pinned first, then by `updated_at` descending. The sort is
/// stable, so notes with equal `updated_at` keep their input order; callers
/// must not rely on that order.
pub fn sort_for_listing(notes: &mut [Note]) {
    notes.sort_by(|a, b| {
        b.is_pinned
            .cmp(&a.is_pinned)
            .then_with(|| b.updated_at.cmp(&a.updated_at))
    });
}
