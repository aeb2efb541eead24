//! Write-then-refetch driver for one scoped list.
//!
//! Mutations never patch local state from their own response; every
//! successful write is followed by a full reload, sequenced strictly after
//! the write is acknowledged. One fetch is in flight per instance at most;
//! a load requested meanwhile queues exactly one follow-up reload instead
//! of being dropped.

use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;

use uuid::Uuid;

use crate::cancel::CancelToken;
use crate::session::{SessionHandle, UserId};
use crate::state::{ListEvent, ListState};
use crate::store::{Entity, EntityStore, Query, StoreError};

type QueryHook = Rc<dyn Fn(Query) -> Query>;

struct Inner<E> {
    state: ListState<E>,
    load_in_flight: bool,
    reload_queued: bool,
}

impl<E> Default for Inner<E> {
    fn default() -> Self {
        Self {
            state: ListState::default(),
            load_in_flight: false,
            reload_queued: false,
        }
    }
}

/// View model for "all records of `E` owned by the current user".
pub struct ListSync<E: Entity, S: EntityStore> {
    store: S,
    session: SessionHandle,
    cancel: CancelToken,
    refine: QueryHook,
    inner: Rc<RefCell<Inner<E>>>,
}

impl<E: Entity, S: EntityStore + Clone> Clone for ListSync<E, S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            session: self.session.clone(),
            cancel: self.cancel.clone(),
            refine: self.refine.clone(),
            inner: self.inner.clone(),
        }
    }
}

impl<E: Entity, S: EntityStore + Clone> ListSync<E, S> {
    pub fn new(store: S, session: SessionHandle) -> Self {
        Self {
            store,
            session,
            cancel: CancelToken::new(),
            refine: Rc::new(|query| query),
            inner: Rc::new(RefCell::new(Inner::default())),
        }
    }

    /// Refine the scoped query on every load (extra filters, limits).
    ///
    /// The hook runs per fetch, so filters derived from the wall clock
    /// (the daily check-in's `date = today`) are recomputed each time.
    pub fn with_query(mut self, refine: impl Fn(Query) -> Query + 'static) -> Self {
        self.refine = Rc::new(refine);
        self
    }

    /// Snapshot of the current list state.
    pub fn state(&self) -> ListState<E> {
        self.inner.borrow().state.clone()
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub fn session(&self) -> &SessionHandle {
        &self.session
    }

    /// The underlying store, for page flows that sit outside plain CRUD.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Drop all local state, back to `Idle`. Used on sign-out.
    pub fn clear(&self) {
        self.inner.borrow_mut().state.apply(ListEvent::Cleared);
    }

    fn scoped_query(&self, user: &UserId) -> Query {
        let base = Query::owned_by(user).order_by(E::ORDER_COLUMN, E::ORDER);
        (self.refine)(base)
    }

    /// Run `op`, retrying once when the failure is transient.
    async fn with_retry<T, F, Fut>(&self, op: F) -> Result<T, StoreError>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, StoreError>>,
    {
        let mut result = op().await;
        if let Err(err) = &result {
            if err.is_transient() && !self.cancel.is_cancelled() {
                tracing::debug!(table = E::TABLE, error = %err, "transient store failure, retrying once");
                result = op().await;
            }
        }
        result
    }

    /// Replace `items` with the freshly fetched, owner-scoped sequence.
    ///
    /// A no-op while no identity is resolved. If a load is already in
    /// flight the call queues a follow-up reload. Results arriving after
    /// cancellation are discarded without touching state.
    pub async fn load(&self) {
        if self.session.current().is_none() {
            return;
        }

        {
            let mut inner = self.inner.borrow_mut();
            if inner.load_in_flight {
                inner.reload_queued = true;
                return;
            }
            inner.load_in_flight = true;
            inner.state.apply(ListEvent::LoadStarted);
        }

        loop {
            // Re-resolved each pass: a queued reload after an identity
            // change must fetch the new user's rows, never the old one's.
            let Some(user) = self.session.current() else {
                let mut inner = self.inner.borrow_mut();
                inner.load_in_flight = false;
                inner.reload_queued = false;
                inner.state.apply(ListEvent::Cleared);
                return;
            };
            let query = self.scoped_query(&user.id);
            let result = self.with_retry(|| self.store.list::<E>(&query)).await;

            if self.cancel.is_cancelled() {
                let mut inner = self.inner.borrow_mut();
                inner.load_in_flight = false;
                inner.reload_queued = false;
                return;
            }

            // The identity may have changed while the fetch was pending;
            // never apply rows scoped to a previous user.
            if self.session.current().map(|u| u.id) != Some(user.id.clone()) {
                continue;
            }

            let mut inner = self.inner.borrow_mut();
            match result {
                Ok(items) => inner.state.apply(ListEvent::Loaded(items)),
                Err(err) => {
                    tracing::error!(table = E::TABLE, error = %err, "failed to load records");
                    inner.state.apply(ListEvent::LoadFailed(err.to_string()));
                }
            }

            if inner.reload_queued {
                inner.reload_queued = false;
                inner.state.apply(ListEvent::LoadStarted);
                continue;
            }
            inner.load_in_flight = false;
            return;
        }
    }

    pub async fn create(&self, record: &E) -> Result<(), StoreError> {
        if self.session.current().is_none() {
            return Ok(());
        }
        let result = self.with_retry(|| self.store.create(record)).await;
        self.after_write(result.map(drop)).await
    }

    pub async fn update(&self, id: Uuid, patch: &E::Patch) -> Result<(), StoreError> {
        if self.session.current().is_none() {
            return Ok(());
        }
        let result = self.with_retry(|| self.store.update::<E>(id, patch)).await;
        self.after_write(result.map(drop)).await
    }

    pub async fn remove(&self, id: Uuid) -> Result<(), StoreError> {
        if self.session.current().is_none() {
            return Ok(());
        }
        let result = self.with_retry(|| self.store.delete::<E>(id)).await;
        self.after_write(result).await
    }

    pub async fn upsert(&self, record: &E, conflict_columns: &[&str]) -> Result<(), StoreError> {
        if self.session.current().is_none() {
            return Ok(());
        }
        let result = self
            .with_retry(|| self.store.upsert(record, conflict_columns))
            .await;
        self.after_write(result.map(drop)).await
    }

    /// Reload after an acknowledged write; surface a notice on failure.
    async fn after_write(&self, result: Result<(), StoreError>) -> Result<(), StoreError> {
        match result {
            Ok(()) => {
                if !self.cancel.is_cancelled() {
                    self.load().await;
                }
                Ok(())
            }
            Err(err) => {
                if !self.cancel.is_cancelled() {
                    tracing::warn!(table = E::TABLE, error = %err, "write failed");
                    self.inner
                        .borrow_mut()
                        .state
                        .apply(ListEvent::MutationFailed(err.to_string()));
                }
                Err(err)
            }
        }
    }
}
