//! # jotter-api
//!
//! HTTP API for jotter: the note lifecycle service, bearer authentication,
//! handlers, and the router with its middleware stack. The `jotter-api`
//! binary wires these to a configured store.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod openapi;
pub mod router;
pub mod services;
pub mod state;

pub use auth::{Auth, RequireAuth, StaticTokenResolver};
pub use config::{ServerConfig, StoreBackend};
pub use error::ApiError;
pub use router::build_router;
pub use services::{EmptyTrashError, NoteService};
pub use state::AppState;
