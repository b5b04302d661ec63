//! # jotter-client
//!
//! Async HTTP client for the jotter notes API.
//!
//! ```no_run
//! use jotter_client::{NotesClient, Session};
//! use jotter_core::{CreateNoteRequest, NoteQuery};
//!
//! # async fn run() -> jotter_client::Result<()> {
//! let client = NotesClient::new(Session::new("http://localhost:5000", "jt_token"))?;
//! client.create(&CreateNoteRequest::new("Groceries", "milk, eggs")).await?;
//! let milk = client.list(&NoteQuery::default().with_search("milk")).await?;
//! assert_eq!(milk.len(), 1);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;

pub use client::{NotesClient, Session};
pub use error::{ClientError, Result};
