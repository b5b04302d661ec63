//! # jotter-core
//!
//! Core types, traits, and abstractions for the jotter note service.
//!
//! This crate provides the note data model, the owner-scoped view filter,
//! and the trait seams (store adapter, identity resolution, clock) that the
//! other jotter crates depend on.

pub mod defaults;
pub mod error;
pub mod logging;
pub mod models;
pub mod note_filter;
pub mod traits;
pub mod uuid_utils;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use models::*;
pub use note_filter::{BucketFilter, NoteFilter, NoteQuery};
pub use traits::*;
pub use uuid_utils::new_v7;
