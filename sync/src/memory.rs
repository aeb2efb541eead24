//! In-memory [`EntityStore`] for tests and local development.
//!
//! Rows are kept as serialized JSON objects per table, which keeps the
//! store generic over entities and makes partial updates a value merge,
//! the same shape the hosted store applies them in.

use std::cell::RefCell;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::rc::Rc;

use serde_json::{Map, Value};
use uuid::Uuid;

use crate::store::{Direction, Entity, EntityStore, Query, StoreError};

#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Rc<RefCell<HashMap<&'static str, Vec<Value>>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows currently stored for `E`, unfiltered.
    pub fn table_len<E: Entity>(&self) -> usize {
        self.tables
            .borrow()
            .get(E::TABLE)
            .map_or(0, |rows| rows.len())
    }

    fn encode<E: Entity>(record: &E) -> Result<Map<String, Value>, StoreError> {
        match serde_json::to_value(record) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Err(StoreError::Decode(format!(
                "{} records must serialize to objects",
                E::TABLE
            ))),
            Err(err) => Err(StoreError::Decode(err.to_string())),
        }
    }

    fn decode<E: Entity>(row: &Value) -> Result<E, StoreError> {
        serde_json::from_value(row.clone()).map_err(|err| StoreError::Decode(err.to_string()))
    }

    fn row_id(row: &Value) -> Option<Uuid> {
        row.get("id")?.as_str()?.parse().ok()
    }

    fn matches(row: &Value, query: &Query) -> bool {
        query
            .filters
            .iter()
            .all(|filter| row.get(filter.column) == Some(&filter.value.to_json()))
    }

    fn compare(a: &Value, b: &Value) -> Ordering {
        match (a, b) {
            (Value::Number(x), Value::Number(y)) => x
                .as_f64()
                .partial_cmp(&y.as_f64())
                .unwrap_or(Ordering::Equal),
            (Value::String(x), Value::String(y)) => x.cmp(y),
            (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
            (Value::Null, Value::Null) => Ordering::Equal,
            (Value::Null, _) => Ordering::Less,
            (_, Value::Null) => Ordering::Greater,
            _ => Ordering::Equal,
        }
    }

    fn merge(row: &mut Value, changes: &Map<String, Value>, skip: &[&str]) {
        if let Value::Object(fields) = row {
            for (key, value) in changes {
                if skip.contains(&key.as_str()) {
                    continue;
                }
                fields.insert(key.clone(), value.clone());
            }
        }
    }
}

impl EntityStore for MemoryStore {
    async fn list<E: Entity>(&self, query: &Query) -> Result<Vec<E>, StoreError> {
        let tables = self.tables.borrow();
        let mut rows: Vec<Value> = tables
            .get(E::TABLE)
            .map(|rows| {
                rows.iter()
                    .filter(|row| Self::matches(row, query))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        if let Some((column, direction)) = query.order {
            rows.sort_by(|a, b| {
                let ordering = Self::compare(
                    a.get(column).unwrap_or(&Value::Null),
                    b.get(column).unwrap_or(&Value::Null),
                );
                match direction {
                    Direction::Asc => ordering,
                    Direction::Desc => ordering.reverse(),
                }
            });
        }
        if let Some(limit) = query.limit {
            rows.truncate(limit as usize);
        }

        rows.iter().map(Self::decode).collect()
    }

    async fn create<E: Entity>(&self, record: &E) -> Result<E, StoreError> {
        let row = Value::Object(Self::encode(record)?);
        let mut tables = self.tables.borrow_mut();
        let rows = tables.entry(E::TABLE).or_default();
        if rows.iter().any(|r| Self::row_id(r) == Some(record.id())) {
            return Err(StoreError::Conflict(format!(
                "duplicate id in {}",
                E::TABLE
            )));
        }
        rows.push(row.clone());
        Self::decode(&row)
    }

    async fn update<E: Entity>(&self, id: Uuid, patch: &E::Patch) -> Result<E, StoreError> {
        let changes = match serde_json::to_value(patch) {
            Ok(Value::Object(map)) => map,
            Ok(_) => {
                return Err(StoreError::Decode(format!(
                    "{} patches must serialize to objects",
                    E::TABLE
                )))
            }
            Err(err) => return Err(StoreError::Decode(err.to_string())),
        };

        let mut tables = self.tables.borrow_mut();
        let rows = tables.entry(E::TABLE).or_default();
        let row = rows
            .iter_mut()
            .find(|r| Self::row_id(r) == Some(id))
            .ok_or(StoreError::NotFound(E::TABLE))?;
        Self::merge(row, &changes, &["id"]);
        Self::decode(row)
    }

    async fn delete<E: Entity>(&self, id: Uuid) -> Result<(), StoreError> {
        let mut tables = self.tables.borrow_mut();
        let rows = tables.entry(E::TABLE).or_default();
        let before = rows.len();
        rows.retain(|r| Self::row_id(r) != Some(id));
        if rows.len() == before {
            return Err(StoreError::NotFound(E::TABLE));
        }
        Ok(())
    }

    async fn upsert<E: Entity>(
        &self,
        record: &E,
        conflict_columns: &[&str],
    ) -> Result<E, StoreError> {
        let incoming = Self::encode(record)?;
        let mut tables = self.tables.borrow_mut();
        let rows = tables.entry(E::TABLE).or_default();

        let existing = rows.iter_mut().find(|row| {
            conflict_columns
                .iter()
                .all(|column| row.get(*column) == incoming.get(*column))
        });

        match existing {
            Some(row) => {
                // Conflict keys and the row's identity survive the update.
                let mut skip = vec!["id"];
                skip.extend_from_slice(conflict_columns);
                Self::merge(row, &incoming, &skip);
                Self::decode(row)
            }
            None => {
                let row = Value::Object(incoming);
                rows.push(row.clone());
                Self::decode(&row)
            }
        }
    }

    async fn count<E: Entity>(&self, query: &Query) -> Result<u64, StoreError> {
        let tables = self.tables.borrow();
        Ok(tables
            .get(E::TABLE)
            .map(|rows| rows.iter().filter(|row| Self::matches(row, query)).count())
            .unwrap_or(0) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::UserId;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Note {
        id: Uuid,
        user_id: UserId,
        body: String,
        pinned: bool,
        created_at: String,
    }

    #[derive(Debug, Clone, Default, Serialize)]
    struct NotePatch {
        #[serde(skip_serializing_if = "Option::is_none")]
        body: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pinned: Option<bool>,
    }

    impl Entity for Note {
        type Patch = NotePatch;
        const TABLE: &'static str = "notes";

        fn id(&self) -> Uuid {
            self.id
        }

        fn owner(&self) -> &UserId {
            &self.user_id
        }
    }

    fn note(user: &str, body: &str, created_at: &str) -> Note {
        Note {
            id: Uuid::new_v4(),
            user_id: UserId::from(user),
            body: body.into(),
            pinned: false,
            created_at: created_at.into(),
        }
    }

    fn scoped(user: &str) -> Query {
        Query::owned_by(&UserId::from(user)).order_by("created_at", Direction::Desc)
    }

    #[tokio::test]
    async fn list_is_scoped_and_ordered_newest_first() {
        let store = MemoryStore::new();
        store.create(&note("u1", "a", "2024-01-01T10:00:00Z")).await.unwrap();
        store.create(&note("u2", "other", "2024-01-02T10:00:00Z")).await.unwrap();
        store.create(&note("u1", "b", "2024-01-03T10:00:00Z")).await.unwrap();

        let rows: Vec<Note> = store.list(&scoped("u1")).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].body, "b");
        assert_eq!(rows[1].body, "a");
        assert!(rows.iter().all(|n| n.user_id.as_str() == "u1"));
    }

    #[tokio::test]
    async fn update_merges_patch_and_keeps_other_fields() {
        let store = MemoryStore::new();
        let created = store.create(&note("u1", "a", "t1")).await.unwrap();

        let updated: Note = store
            .update::<Note>(
                created.id,
                &NotePatch {
                    pinned: Some(true),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(updated.pinned);
        assert_eq!(updated.body, "a");
    }

    #[tokio::test]
    async fn missing_rows_surface_not_found() {
        let store = MemoryStore::new();
        store.create(&note("u1", "a", "t1")).await.unwrap();

        let err = store.delete::<Note>(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound("notes")));

        let err = store
            .update::<Note>(Uuid::new_v4(), &NotePatch::default())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound("notes")));
    }

    #[tokio::test]
    async fn duplicate_create_conflicts() {
        let store = MemoryStore::new();
        let row = note("u1", "a", "t1");
        store.create(&row).await.unwrap();
        let err = store.create(&row).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn upsert_updates_the_conflicting_row_in_place() {
        let store = MemoryStore::new();
        let first = note("u1", "first", "2024-01-01");
        store.upsert(&first, &["user_id", "created_at"]).await.unwrap();

        let mut second = note("u1", "second", "2024-01-01");
        second.pinned = true;
        let stored = store
            .upsert(&second, &["user_id", "created_at"])
            .await
            .unwrap();

        assert_eq!(store.table_len::<Note>(), 1);
        assert_eq!(stored.body, "second");
        assert!(stored.pinned);
        // The original row's identity wins over the incoming one.
        assert_eq!(stored.id, first.id);
    }

    #[tokio::test]
    async fn count_honors_filters() {
        let store = MemoryStore::new();
        let mut pinned = note("u1", "a", "t1");
        pinned.pinned = true;
        store.create(&pinned).await.unwrap();
        store.create(&note("u1", "b", "t2")).await.unwrap();
        store.create(&note("u2", "c", "t3")).await.unwrap();

        let count = store
            .count::<Note>(&Query::owned_by(&UserId::from("u1")).and_eq("pinned", true))
            .await
            .unwrap();
        assert_eq!(count, 1);
    }
}
