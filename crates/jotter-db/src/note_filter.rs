//! SQL generation for owner-scoped note listing.
//!
//! Converts a [`NoteFilter`] into a parameterised `WHERE` clause. The owner
//! predicate is always the first clause, so no listing query can be built
//! without it.

use uuid::Uuid;

use jotter_core::{BucketFilter, NoteFilter};

use crate::escape_like;

/// Type-safe parameter binding for SQL queries.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryParam {
    /// Single UUID parameter.
    Uuid(Uuid),
    /// String parameter.
    String(String),
}

/// Generates the `WHERE` clause and bind parameters for a [`NoteFilter`].
///
/// # Example
///
/// ```
/// use jotter_core::{NoteFilter, NoteQuery, UserId};
/// use jotter_db::note_filter::NoteFilterQueryBuilder;
/// use uuid::Uuid;
///
/// let owner = UserId(Uuid::nil());
/// let filter = NoteFilter::build(owner, &NoteQuery::default().with_tag("work"));
/// let (sql, params) = NoteFilterQueryBuilder::new(&filter, 0).build();
///
/// assert_eq!(
///     sql,
///     "n.owner_id = $1 AND NOT n.is_archived AND NOT n.is_deleted AND n.tags @> ARRAY[$2]::text[]"
/// );
/// assert_eq!(params.len(), 2);
/// ```
pub struct NoteFilterQueryBuilder<'a> {
    filter: &'a NoteFilter,
    param_offset: usize,
}

impl<'a> NoteFilterQueryBuilder<'a> {
    /// Create a new builder.
    ///
    /// * `param_offset` - number of parameters already bound in the query
    pub fn new(filter: &'a NoteFilter, param_offset: usize) -> Self {
        Self {
            filter,
            param_offset,
        }
    }

    /// Build the clause fragment and the parameters in placeholder order.
    pub fn build(&self) -> (String, Vec<QueryParam>) {
        let mut clauses = Vec::new();
        let mut params = Vec::new();
        let mut param_idx = self.param_offset;

        param_idx += 1;
        clauses.push(format!("n.owner_id = ${}", param_idx));
        params.push(QueryParam::Uuid(self.filter.owner.as_uuid()));

        clauses.push(
            match self.filter.bucket {
                BucketFilter::Active => "NOT n.is_archived AND NOT n.is_deleted",
                BucketFilter::Archived => "n.is_archived AND NOT n.is_deleted",
                BucketFilter::Trashed => "n.is_deleted",
            }
            .to_string(),
        );

        if let Some(search) = &self.filter.search {
            param_idx += 1;
            clauses.push(format!(
                "(n.title ILIKE ${0} ESCAPE '\\' OR n.content ILIKE ${0} ESCAPE '\\')",
                param_idx
            ));
            params.push(QueryParam::String(format!("%{}%", escape_like(search))));
        }

        if let Some(tag) = &self.filter.tag {
            param_idx += 1;
            clauses.push(format!("n.tags @> ARRAY[${}]::text[]", param_idx));
            params.push(QueryParam::String(tag.clone()));
        }

        if let Some(priority) = &self.filter.priority {
            param_idx += 1;
            clauses.push(format!("n.priority = ${}", param_idx));
            params.push(QueryParam::String(priority.clone()));
        }

        (clauses.join(" AND "), params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jotter_core::{NoteQuery, UserId};

    fn owner() -> UserId {
        UserId(Uuid::new_v4())
    }

    #[test]
    fn test_active_bucket_only_owner_param() {
        let user = owner();
        let filter = NoteFilter::build(user, &NoteQuery::default());
        let (sql, params) = NoteFilterQueryBuilder::new(&filter, 0).build();

        assert_eq!(sql, "n.owner_id = $1 AND NOT n.is_archived AND NOT n.is_deleted");
        assert_eq!(params, vec![QueryParam::Uuid(user.as_uuid())]);
    }

    #[test]
    fn test_archived_bucket() {
        let filter = NoteFilter::build(owner(), &NoteQuery::archived());
        let (sql, _) = NoteFilterQueryBuilder::new(&filter, 0).build();
        assert!(sql.ends_with("n.is_archived AND NOT n.is_deleted"));
        assert!(!sql.contains("NOT n.is_archived"));
    }

    #[test]
    fn test_trashed_bucket_leaves_archive_unconstrained() {
        let filter = NoteFilter::build(owner(), &NoteQuery::trashed());
        let (sql, _) = NoteFilterQueryBuilder::new(&filter, 0).build();
        assert!(sql.ends_with("AND n.is_deleted"));
        assert!(!sql.contains("is_archived"));
    }

    #[test]
    fn test_search_is_escaped_substring() {
        let filter = NoteFilter::build(owner(), &NoteQuery::default().with_search("50%_off"));
        let (sql, params) = NoteFilterQueryBuilder::new(&filter, 0).build();

        assert!(sql.contains("n.title ILIKE $2 ESCAPE '\\' OR n.content ILIKE $2 ESCAPE '\\'"));
        assert_eq!(params[1], QueryParam::String("%50\\%\\_off%".to_string()));
    }

    #[test]
    fn test_all_predicates_number_sequentially() {
        let query = NoteQuery::default()
            .with_search("milk")
            .with_tag("home")
            .with_priority("High");
        let filter = NoteFilter::build(owner(), &query);
        let (sql, params) = NoteFilterQueryBuilder::new(&filter, 0).build();

        assert!(sql.contains("ILIKE $2"));
        assert!(sql.contains("ARRAY[$3]"));
        assert!(sql.contains("n.priority = $4"));
        assert_eq!(params.len(), 4);
        assert_eq!(params[3], QueryParam::String("High".to_string()));
    }

    #[test]
    fn test_param_offset() {
        let filter = NoteFilter::build(owner(), &NoteQuery::default().with_tag("x"));
        let (sql, _) = NoteFilterQueryBuilder::new(&filter, 3).build();
        assert!(sql.starts_with("n.owner_id = $4"));
        assert!(sql.contains("ARRAY[$5]"));
    }
}
