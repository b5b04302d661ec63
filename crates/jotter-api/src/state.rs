//! Shared application state.

use std::sync::Arc;

use jotter_core::IdentityResolver;

use crate::services::NoteService;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Note lifecycle operations.
    pub notes: NoteService,
    /// Bearer token resolution.
    pub identity: Arc<dyn IdentityResolver>,
}

impl AppState {
    pub fn new(notes: NoteService, identity: Arc<dyn IdentityResolver>) -> Self {
        Self { notes, identity }
    }
}
