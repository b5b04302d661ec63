//! PostgreSQL note store.

use std::str::FromStr;
use std::time::Instant;

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{Pool, Postgres, Row};
use tracing::debug;
use uuid::Uuid;

use jotter_core::{Error, Note, NoteFilter, NoteStore, Priority, Result, UserId};

use crate::note_filter::{NoteFilterQueryBuilder, QueryParam};

const NOTE_COLUMNS: &str = "n.id, n.owner_id, n.title, n.content, n.tags, n.priority, \
     n.background_color, n.is_pinned, n.is_archived, n.is_deleted, n.created_at, n.updated_at";

/// PostgreSQL implementation of [`NoteStore`].
pub struct PgNoteRepository {
    pool: Pool<Postgres>,
}

impl PgNoteRepository {
    /// Create a new PgNoteRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    fn row_to_note(row: &PgRow) -> Result<Note> {
        let priority: String = row.get("priority");
        Ok(Note {
            id: row.get("id"),
            owner_id: UserId(row.get("owner_id")),
            title: row.get("title"),
            content: row.get("content"),
            tags: row.get("tags"),
            priority: Priority::from_str(&priority)
                .map_err(|_| Error::Internal(format!("Stored priority '{}' is invalid", priority)))?,
            background_color: row.get("background_color"),
            is_pinned: row.get("is_pinned"),
            is_archived: row.get("is_archived"),
            is_deleted: row.get("is_deleted"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        })
    }
}

#[async_trait]
impl NoteStore for PgNoteRepository {
    async fn insert(&self, note: Note) -> Result<Note> {
        let row = sqlx::query(&format!(
            "INSERT INTO note AS n (id, owner_id, title, content, tags, priority, background_color,
                                    is_pinned, is_archived, is_deleted, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
             RETURNING {}",
            NOTE_COLUMNS
        ))
        .bind(note.id)
        .bind(note.owner_id.as_uuid())
        .bind(&note.title)
        .bind(&note.content)
        .bind(&note.tags)
        .bind(note.priority.as_str())
        .bind(&note.background_color)
        .bind(note.is_pinned)
        .bind(note.is_archived)
        .bind(note.is_deleted)
        .bind(note.created_at)
        .bind(note.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(Error::Database)?;

        Self::row_to_note(&row)
    }

    async fn find(&self, filter: &NoteFilter) -> Result<Vec<Note>> {
        let start = Instant::now();
        let (where_clause, params) = NoteFilterQueryBuilder::new(filter, 0).build();
        let sql = format!(
            "SELECT {} FROM note n WHERE {} ORDER BY n.is_pinned DESC, n.updated_at DESC",
            NOTE_COLUMNS, where_clause
        );

        let mut q = sqlx::query(&sql);
        for param in params {
            q = match param {
                QueryParam::Uuid(id) => q.bind(id),
                QueryParam::String(s) => q.bind(s),
            };
        }

        let rows = q.fetch_all(&self.pool).await.map_err(Error::Database)?;
        let notes = rows
            .iter()
            .map(Self::row_to_note)
            .collect::<Result<Vec<_>>>()?;

        debug!(
            subsystem = "db",
            component = "notes",
            op = "find",
            bucket = filter.bucket.as_bucket().as_str(),
            result_count = notes.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Listed notes"
        );
        Ok(notes)
    }

    async fn find_one(&self, id: Uuid, owner: UserId) -> Result<Option<Note>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM note n WHERE n.id = $1 AND n.owner_id = $2",
            NOTE_COLUMNS
        ))
        .bind(id)
        .bind(owner.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        row.as_ref().map(Self::row_to_note).transpose()
    }

    async fn update(&self, note: &Note) -> Result<Option<Note>> {
        let row = sqlx::query(&format!(
            "UPDATE note AS n SET
                title = $3,
                content = $4,
                tags = $5,
                priority = $6,
                background_color = $7,
                is_pinned = $8,
                is_archived = $9,
                is_deleted = $10,
                updated_at = $11
             WHERE n.id = $1 AND n.owner_id = $2
             RETURNING {}",
            NOTE_COLUMNS
        ))
        .bind(note.id)
        .bind(note.owner_id.as_uuid())
        .bind(&note.title)
        .bind(&note.content)
        .bind(&note.tags)
        .bind(note.priority.as_str())
        .bind(&note.background_color)
        .bind(note.is_pinned)
        .bind(note.is_archived)
        .bind(note.is_deleted)
        .bind(note.updated_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        row.as_ref().map(Self::row_to_note).transpose()
    }

    async fn delete(&self, id: Uuid, owner: UserId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM note WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        Ok(result.rows_affected() > 0)
    }
}
