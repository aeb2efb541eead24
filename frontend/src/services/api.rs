//! REST client for the hosted data store.
//!
//! The hosted store speaks a PostgREST-style dialect: one resource per
//! table, equality filters as `?column=eq.value` query parameters, and
//! `Prefer` headers controlling representation, upsert resolution, and
//! exact counts.

use gloo_net::http::{Request, RequestBuilder, Response};
use sync::{Entity, EntityStore, Query, StoreError};
use uuid::Uuid;

const STORE_BASE_URL: &str = "https://api.therapy-companion.app";

/// `EntityStore` implementation over the hosted REST interface.
///
/// Cheap to clone; every page's view model carries its own copy.
#[derive(Clone, PartialEq)]
pub struct RestStore {
    base: String,
    token: Option<String>,
}

impl RestStore {
    pub fn new(token: Option<String>) -> Self {
        Self::with_base(STORE_BASE_URL, token)
    }

    pub fn with_base(base: impl Into<String>, token: Option<String>) -> Self {
        Self {
            base: base.into(),
            token,
        }
    }

    fn table_url<E: Entity>(&self) -> String {
        format!("{}/rest/v1/{}", self.base, E::TABLE)
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => builder.header("Authorization", &format!("Bearer {token}")),
            None => builder,
        }
    }

    /// Filter/order/limit parameters in the dialect the store expects.
    fn query_pairs(query: &Query) -> Vec<(String, String)> {
        let mut pairs: Vec<(String, String)> = query
            .filters
            .iter()
            .map(|filter| {
                (
                    filter.column.to_owned(),
                    format!("eq.{}", filter.value.to_query_literal()),
                )
            })
            .collect();
        if let Some((column, direction)) = query.order {
            let keyword = match direction {
                sync::Direction::Asc => "asc",
                sync::Direction::Desc => "desc",
            };
            pairs.push(("order".to_owned(), format!("{column}.{keyword}")));
        }
        if let Some(limit) = query.limit {
            pairs.push(("limit".to_owned(), limit.to_string()));
        }
        pairs
    }

    fn check(response: Response, table: &'static str) -> Result<Response, StoreError> {
        match response.status() {
            200..=299 => Ok(response),
            404 => Err(StoreError::NotFound(table)),
            409 => Err(StoreError::Conflict(format!("conflict writing {table}"))),
            status @ 500..=599 => Err(StoreError::Unavailable(format!("status {status}"))),
            status => Err(StoreError::Rejected(format!("status {status}"))),
        }
    }

    async fn rows<E: Entity>(response: Response) -> Result<Vec<E>, StoreError> {
        response
            .json::<Vec<E>>()
            .await
            .map_err(|err| StoreError::Decode(err.to_string()))
    }

    async fn single<E: Entity>(response: Response) -> Result<E, StoreError> {
        Self::rows::<E>(response)
            .await?
            .into_iter()
            .next()
            .ok_or(StoreError::NotFound(E::TABLE))
    }
}

fn send_error(err: gloo_net::Error) -> StoreError {
    StoreError::Network(err.to_string())
}

impl EntityStore for RestStore {
    async fn list<E: Entity>(&self, query: &Query) -> Result<Vec<E>, StoreError> {
        let pairs = Self::query_pairs(query);
        let request = self
            .authorized(Request::get(&self.table_url::<E>()))
            .query(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        let response = request.send().await.map_err(send_error)?;
        Self::rows(Self::check(response, E::TABLE)?).await
    }

    async fn create<E: Entity>(&self, record: &E) -> Result<E, StoreError> {
        let request = self
            .authorized(Request::post(&self.table_url::<E>()))
            .header("Prefer", "return=representation")
            .json(record)
            .map_err(|err| StoreError::Decode(err.to_string()))?;
        let response = request.send().await.map_err(send_error)?;
        Self::single(Self::check(response, E::TABLE)?).await
    }

    async fn update<E: Entity>(&self, id: Uuid, patch: &E::Patch) -> Result<E, StoreError> {
        let request = self
            .authorized(Request::patch(&self.table_url::<E>()))
            .query([("id", format!("eq.{id}").as_str())])
            .header("Prefer", "return=representation")
            .json(patch)
            .map_err(|err| StoreError::Decode(err.to_string()))?;
        let response = request.send().await.map_err(send_error)?;
        Self::single(Self::check(response, E::TABLE)?).await
    }

    async fn delete<E: Entity>(&self, id: Uuid) -> Result<(), StoreError> {
        let request = self
            .authorized(Request::delete(&self.table_url::<E>()))
            .query([("id", format!("eq.{id}").as_str())])
            .header("Prefer", "return=representation");
        let response = request.send().await.map_err(send_error)?;
        // An empty representation means the filter matched nothing.
        let deleted: Vec<E> = Self::rows(Self::check(response, E::TABLE)?).await?;
        if deleted.is_empty() {
            return Err(StoreError::NotFound(E::TABLE));
        }
        Ok(())
    }

    async fn upsert<E: Entity>(
        &self,
        record: &E,
        conflict_columns: &[&str],
    ) -> Result<E, StoreError> {
        let request = self
            .authorized(Request::post(&self.table_url::<E>()))
            .query([("on_conflict", conflict_columns.join(",").as_str())])
            .header("Prefer", "resolution=merge-duplicates,return=representation")
            .json(record)
            .map_err(|err| StoreError::Decode(err.to_string()))?;
        let response = request.send().await.map_err(send_error)?;
        Self::single(Self::check(response, E::TABLE)?).await
    }

    async fn count<E: Entity>(&self, query: &Query) -> Result<u64, StoreError> {
        let pairs = Self::query_pairs(query);
        let request = self
            .authorized(Request::get(&self.table_url::<E>()))
            .query(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .header("Prefer", "count=exact")
            .header("Range", "0-0");
        let response = request.send().await.map_err(send_error)?;
        let response = Self::check(response, E::TABLE)?;

        // Total row count rides in `Content-Range: 0-0/<total>`.
        let content_range = response
            .headers()
            .get("Content-Range")
            .ok_or_else(|| StoreError::Decode("missing Content-Range".into()))?;
        content_range
            .rsplit('/')
            .next()
            .and_then(|total| total.parse().ok())
            .ok_or_else(|| StoreError::Decode(format!("bad Content-Range: {content_range}")))
    }
}
