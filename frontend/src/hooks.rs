//! Glue between the scoped-list view model and Yew's render cycle.

use std::future::Future;
use std::rc::Rc;

use sync::{Entity, EntityStore, ListState, ListSync};
use yew::prelude::*;

/// A page's handle to its scoped list.
///
/// The view model mutates its state internally; the handle mirrors a
/// snapshot into Yew state so the page re-renders after every settled
/// operation.
pub struct SyncHandle<E: Entity, S: EntityStore + Clone + 'static> {
    vm: Rc<ListSync<E, S>>,
    mirror: UseStateHandle<ListState<E>>,
}

impl<E: Entity, S: EntityStore + Clone + 'static> Clone for SyncHandle<E, S> {
    fn clone(&self) -> Self {
        Self {
            vm: self.vm.clone(),
            mirror: self.mirror.clone(),
        }
    }
}

impl<E: Entity, S: EntityStore + Clone + 'static> SyncHandle<E, S> {
    pub fn state(&self) -> ListState<E> {
        (*self.mirror).clone()
    }

    pub fn view_model(&self) -> ListSync<E, S> {
        (*self.vm).clone()
    }

    /// Push the view model's current state into the render cycle.
    pub fn publish(&self) {
        self.mirror.set(self.vm.state());
    }

    /// Reload the list in the background and re-render when it settles.
    pub fn refresh(&self) {
        let handle = self.clone();
        wasm_bindgen_futures::spawn_local(async move {
            handle.vm.load().await;
            handle.publish();
        });
    }

    /// Drive one async operation against the view model, then re-render.
    ///
    /// Errors have already been folded into the list state as a notice by
    /// the driver, so the result is dropped here.
    pub fn run<Fut, T>(&self, operation: Fut)
    where
        Fut: Future<Output = T> + 'static,
        T: 'static,
    {
        let handle = self.clone();
        wasm_bindgen_futures::spawn_local(async move {
            let _ = operation.await;
            handle.publish();
        });
    }
}

/// Build the page's list view model, load it on mount, and cancel its
/// token on unmount so a late result is discarded.
#[hook]
pub fn use_list_sync<E, S>(init: impl FnOnce() -> ListSync<E, S>) -> SyncHandle<E, S>
where
    E: Entity,
    S: EntityStore + Clone + 'static,
{
    let vm = use_memo((), move |_| init());
    let mirror = use_state(ListState::<E>::default);
    let handle = SyncHandle {
        vm: vm.clone(),
        mirror,
    };

    {
        let handle = handle.clone();
        use_effect_with((), move |_| {
            let token = handle.vm.cancel_token();
            handle.refresh();
            move || token.cancel()
        });
    }

    handle
}
