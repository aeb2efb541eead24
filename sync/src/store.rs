//! The seam between view models and the hosted data store.
//!
//! The store is consumed as a set of opaque remote calls returning records
//! or an error; nothing here depends on the wire format. Implementations:
//! the REST client in the frontend and [`crate::memory::MemoryStore`] for
//! tests and local development.

use chrono::NaiveDate;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use crate::session::UserId;

/// Column every table scopes rows by.
pub const OWNER_COLUMN: &str = "user_id";

/// Failure taxonomy for remote store calls.
///
/// `Network` and `Unavailable` are transient: the driver retries them once
/// before surfacing a notice. Everything else is permanent for the attempt.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("network error: {0}")]
    Network(String),

    #[error("remote store unavailable: {0}")]
    Unavailable(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("malformed record: {0}")]
    Decode(String),

    #[error("rejected by remote store: {0}")]
    Rejected(String),
}

impl StoreError {
    /// Whether a retry of the same call may plausibly succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, StoreError::Network(_) | StoreError::Unavailable(_))
    }
}

/// Sort direction for the ordering column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

/// A value an equality filter can compare against.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Text(String),
    Int(i64),
    Bool(bool),
    Uuid(Uuid),
    Date(NaiveDate),
}

impl FilterValue {
    /// JSON form, matching how the value appears in a serialized record.
    pub fn to_json(&self) -> Value {
        match self {
            FilterValue::Text(s) => Value::String(s.clone()),
            FilterValue::Int(n) => Value::from(*n),
            FilterValue::Bool(b) => Value::Bool(*b),
            FilterValue::Uuid(id) => Value::String(id.to_string()),
            FilterValue::Date(d) => Value::String(d.format("%Y-%m-%d").to_string()),
        }
    }

    /// Literal form for URL query strings (`col=eq.<literal>`).
    pub fn to_query_literal(&self) -> String {
        match self {
            FilterValue::Text(s) => s.clone(),
            FilterValue::Int(n) => n.to_string(),
            FilterValue::Bool(b) => b.to_string(),
            FilterValue::Uuid(id) => id.to_string(),
            FilterValue::Date(d) => d.format("%Y-%m-%d").to_string(),
        }
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        FilterValue::Text(value.to_owned())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        FilterValue::Text(value)
    }
}

impl From<i64> for FilterValue {
    fn from(value: i64) -> Self {
        FilterValue::Int(value)
    }
}

impl From<bool> for FilterValue {
    fn from(value: bool) -> Self {
        FilterValue::Bool(value)
    }
}

impl From<Uuid> for FilterValue {
    fn from(value: Uuid) -> Self {
        FilterValue::Uuid(value)
    }
}

impl From<NaiveDate> for FilterValue {
    fn from(value: NaiveDate) -> Self {
        FilterValue::Date(value)
    }
}

/// Column-equality filter.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub column: &'static str,
    pub value: FilterValue,
}

/// A scoped list query: owner filter plus optional refinements.
///
/// Constructed through [`Query::owned_by`], so an unscoped list is not
/// expressible from the driver side.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub filters: Vec<Filter>,
    pub order: Option<(&'static str, Direction)>,
    pub limit: Option<u32>,
}

impl Query {
    pub fn owned_by(user: &UserId) -> Self {
        Self {
            filters: vec![Filter {
                column: OWNER_COLUMN,
                value: FilterValue::Text(user.as_str().to_owned()),
            }],
            order: None,
            limit: None,
        }
    }

    pub fn and_eq(mut self, column: &'static str, value: impl Into<FilterValue>) -> Self {
        self.filters.push(Filter {
            column,
            value: value.into(),
        });
        self
    }

    pub fn order_by(mut self, column: &'static str, direction: Direction) -> Self {
        self.order = Some((column, direction));
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// A user-owned record that participates in scoped-list synchronization.
pub trait Entity: Clone + PartialEq + Serialize + DeserializeOwned + 'static {
    /// Partial-update payload accepted by [`EntityStore::update`].
    type Patch: Serialize;

    /// Remote table the records live in.
    const TABLE: &'static str;

    /// Column the scoped list is ordered by.
    const ORDER_COLUMN: &'static str = "created_at";

    /// Display order; newest-first for every observed page.
    const ORDER: Direction = Direction::Desc;

    fn id(&self) -> Uuid;

    fn owner(&self) -> &UserId;
}

/// Patch type for entities that are never partially updated.
///
/// Uninhabited, so `update` is uncallable for such entities; journal entries
/// are immutable after creation and daily check-ins only go through upsert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Immutable {}

/// Remote operations the hosted store exposes per entity table.
///
/// Native async fns; implementors are used generically, never as trait
/// objects.
#[allow(async_fn_in_trait)]
pub trait EntityStore {
    /// Fetch records matching `query`, in query order.
    async fn list<E: Entity>(&self, query: &Query) -> Result<Vec<E>, StoreError>;

    /// Insert a full record; returns the stored representation.
    async fn create<E: Entity>(&self, record: &E) -> Result<E, StoreError>;

    /// Partially update the record with `id`.
    async fn update<E: Entity>(&self, id: Uuid, patch: &E::Patch) -> Result<E, StoreError>;

    /// Delete the record with `id`; `NotFound` if it is already gone.
    async fn delete<E: Entity>(&self, id: Uuid) -> Result<(), StoreError>;

    /// Insert, or update the row whose `conflict_columns` all match.
    async fn upsert<E: Entity>(&self, record: &E, conflict_columns: &[&str])
        -> Result<E, StoreError>;

    /// Count records matching `query` without fetching them.
    async fn count<E: Entity>(&self, query: &Query) -> Result<u64, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owned_by_scopes_to_the_user() {
        let query = Query::owned_by(&UserId::from("u1"));
        assert_eq!(query.filters.len(), 1);
        assert_eq!(query.filters[0].column, OWNER_COLUMN);
        assert_eq!(query.filters[0].value, FilterValue::Text("u1".into()));
    }

    #[test]
    fn filters_compose() {
        let query = Query::owned_by(&UserId::from("u1"))
            .and_eq("status", "scheduled")
            .order_by("date", Direction::Desc)
            .limit(10);
        assert_eq!(query.filters.len(), 2);
        assert_eq!(query.order, Some(("date", Direction::Desc)));
        assert_eq!(query.limit, Some(10));
    }

    #[test]
    fn transient_classification() {
        assert!(StoreError::Network("timeout".into()).is_transient());
        assert!(StoreError::Unavailable("503".into()).is_transient());
        assert!(!StoreError::NotFound("topics").is_transient());
        assert!(!StoreError::Rejected("bad row".into()).is_transient());
    }

    #[test]
    fn filter_values_serialize_like_records() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(FilterValue::from(date).to_json(), Value::from("2024-03-09"));
        assert_eq!(FilterValue::from(true).to_query_literal(), "true");
    }
}
