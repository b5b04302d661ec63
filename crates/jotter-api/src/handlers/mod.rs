//! HTTP handlers for jotter-api.

pub mod notes;
pub mod system;
