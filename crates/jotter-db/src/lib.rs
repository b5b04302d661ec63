//! # jotter-db
//!
//! Storage layer for jotter.
//!
//! This crate provides:
//! - Connection pool management
//! - [`PgNoteRepository`], the PostgreSQL [`NoteStore`]
//! - [`InMemoryNoteRepository`] for development mode and tests
//! - [`PgSessionRepository`], bearer-token issuance and resolution
//!
//! ## Example
//!
//! ```rust,ignore
//! use jotter_db::{Database, NoteFilter, NoteQuery, NoteStore, UserId};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("postgres://localhost/jotter", 10).await?;
//!     db.migrate().await?;
//!
//!     let owner = UserId(uuid::Uuid::new_v4());
//!     let notes = db.notes.find(&NoteFilter::build(owner, &NoteQuery::default())).await?;
//!     println!("{} active notes", notes.len());
//!     Ok(())
//! }
//! ```
pub mod memory;
pub mod note_filter;
pub mod notes;
pub mod pool;
pub mod sessions;

// Always compiled so integration tests (in tests/) can use it
pub mod test_fixtures;

// Re-export core types
pub use jotter_core::*;

/// Escape LIKE/ILIKE wildcard characters (`%`, `_`, `\`) in user input.
pub fn escape_like(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

pub use memory::InMemoryNoteRepository;
pub use note_filter::{NoteFilterQueryBuilder, QueryParam};
pub use notes::PgNoteRepository;
pub use pool::{connect_pool, log_pool_metrics};
pub use sessions::{IssuedSession, PgSessionRepository};

/// Combined database context with all repositories.
pub struct Database {
    /// The underlying connection pool.
    pub pool: sqlx::Pool<sqlx::Postgres>,
    /// Note store.
    pub notes: PgNoteRepository,
    /// Bearer session repository.
    pub sessions: PgSessionRepository,
}

impl Database {
    /// Create a new Database instance from a connection pool.
    pub fn new(pool: sqlx::Pool<sqlx::Postgres>) -> Self {
        Self {
            notes: PgNoteRepository::new(pool.clone()),
            sessions: PgSessionRepository::new(pool.clone()),
            pool,
        }
    }

    /// Connect with a pool capped at `max_connections`.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self> {
        let pool = connect_pool(url, max_connections).await?;
        Ok(Self::new(pool))
    }

    /// Run pending migrations.
    #[cfg(feature = "migrations")]
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| Error::Database(sqlx::Error::Migrate(Box::new(e))))?;
        Ok(())
    }

    /// Get the underlying connection pool.
    pub fn pool(&self) -> &sqlx::Pool<sqlx::Postgres> {
        &self.pool
    }
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self::new(self.pool.clone())
    }
}
