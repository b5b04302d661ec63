//! Core data models for jotter.
//!
//! These types are shared across all jotter crates: the stored note, its
//! request payloads, and the JSON envelopes the API answers with.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Error;

// =============================================================================
// IDENTITY
// =============================================================================

/// Identifier of a user, as resolved from a bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub Uuid);

impl UserId {
    pub fn new(id: Uuid) -> Self {
        Self(id)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<Uuid> for UserId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

/// Authenticated principal attached to a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthPrincipal {
    User { user_id: UserId },
    Anonymous,
}

impl AuthPrincipal {
    /// The caller's user id, if authenticated.
    pub fn user_id(&self) -> Option<UserId> {
        match self {
            AuthPrincipal::User { user_id } => Some(*user_id),
            AuthPrincipal::Anonymous => None,
        }
    }
}

// =============================================================================
// NOTE TYPES
// =============================================================================

/// Note priority.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema,
)]
pub enum Priority {
    #[default]
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = Error;

    /// Names are matched exactly; "high" is not "High".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Low" => Ok(Priority::Low),
            "Medium" => Ok(Priority::Medium),
            "High" => Ok(Priority::High),
            other => Err(Error::InvalidInput(format!(
                "Priority must be one of Low, Medium, High (got '{}')",
                other
            ))),
        }
    }
}

/// View partition a note falls into, derived from its flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteBucket {
    Active,
    Archived,
    Trashed,
}

impl NoteBucket {
    pub fn as_str(&self) -> &'static str {
        match self {
            NoteBucket::Active => "active",
            NoteBucket::Archived => "archived",
            NoteBucket::Trashed => "trashed",
        }
    }
}

/// A note, as stored and as returned by the API.
///
/// `is_pinned`, `is_archived` and `is_deleted` are independent bits. The view
/// bucket is computed from the last two; `is_pinned` only affects ordering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: Uuid,
    #[schema(value_type = String, format = Uuid)]
    pub owner_id: UserId,
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
    pub priority: Priority,
    pub background_color: String,
    pub is_pinned: bool,
    pub is_archived: bool,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Note {
    /// Bucket this note is listed under.
    pub fn bucket(&self) -> NoteBucket {
        if self.is_deleted {
            NoteBucket::Trashed
        } else if self.is_archived {
            NoteBucket::Archived
        } else {
            NoteBucket::Active
        }
    }

    pub fn is_owned_by(&self, owner: UserId) -> bool {
        self.owner_id == owner
    }
}

// =============================================================================
// REQUEST TYPES
// =============================================================================

/// Body of `POST /api/notes`.
///
/// `title` and `content` are optional at the type level so that a missing
/// field is reported as a validation error rather than a JSON rejection.
#[derive(Debug, Clone, Default, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateNoteRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
}

impl CreateNoteRequest {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            content: Some(content.into()),
            ..Default::default()
        }
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = Some(tags);
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority.as_str().to_string());
        self
    }

    pub fn with_background_color(mut self, color: impl Into<String>) -> Self {
        self.background_color = Some(color.into());
        self
    }
}

/// Body of `PUT /api/notes/:id`.
///
/// String fields overwrite only when present and non-empty; `tags`
/// overwrites whenever present, so `[]` clears them.
#[derive(Debug, Clone, Default, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateNoteRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
}

// =============================================================================
// RESPONSE ENVELOPES
// =============================================================================

/// `{success, message?, note}`
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct NoteResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub note: Note,
}

/// `{success, count, notes}`
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct NoteListResponse {
    pub success: bool,
    pub count: usize,
    pub notes: Vec<Note>,
}

/// `{success, message}`; also the shape of every error body.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

/// `{success, message, count}` returned after emptying the trash.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct TrashEmptiedResponse {
    pub success: bool,
    pub message: String,
    pub count: usize,
}
