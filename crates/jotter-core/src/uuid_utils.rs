//! UUID v7 utilities for time-ordered identifiers.
//!
//! Note ids are UUIDv7 so that ids generated later sort after earlier ones,
//! which keeps b-tree inserts append-only in the store.

use uuid::Uuid;

/// Generate a new UUIDv7 identifier.
///
/// # Example
///
/// ```
/// use jotter_core::uuid_utils::new_v7;
///
/// let id = new_v7();
/// assert_eq!(id.get_version_num(), 7);
/// ```
#[inline]
pub fn new_v7() -> Uuid {
    Uuid::now_v7()
}
