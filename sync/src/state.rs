//! The per-page list lifecycle state machine.
//!
//! `Idle → Loading → Ready | Errored`, with `Ready` and `Errored` both
//! re-entering `Loading`. Loads replace the item sequence wholesale; a
//! failed load keeps the last good items visible and only surfaces a
//! notice.

/// Lifecycle phase of a scoped list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Loading,
    Ready,
    Errored,
}

/// Snapshot of one page's list: phase, items, and a user-visible notice.
#[derive(Debug, Clone, PartialEq)]
pub struct ListState<E> {
    pub phase: Phase,
    pub items: Vec<E>,
    pub notice: Option<String>,
}

impl<E> Default for ListState<E> {
    fn default() -> Self {
        Self {
            phase: Phase::Idle,
            items: Vec::new(),
            notice: None,
        }
    }
}

impl<E> ListState<E> {
    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Loading
    }

    /// True once at least one load has settled, successfully or not.
    pub fn is_settled(&self) -> bool {
        matches!(self.phase, Phase::Ready | Phase::Errored)
    }
}

/// State transitions applied by the driver.
#[derive(Debug, Clone, PartialEq)]
pub enum ListEvent<E> {
    LoadStarted,
    /// Full replacement with the freshly fetched sequence.
    Loaded(Vec<E>),
    /// Read failure: keep the last good items, surface the notice.
    LoadFailed(String),
    /// Write failure: phase and items untouched, surface the notice.
    MutationFailed(String),
    /// Identity change or sign-out; back to the initial state.
    Cleared,
}

impl<E> ListState<E> {
    pub fn apply(&mut self, event: ListEvent<E>) {
        match event {
            ListEvent::LoadStarted => {
                self.phase = Phase::Loading;
                self.notice = None;
            }
            ListEvent::Loaded(items) => {
                self.phase = Phase::Ready;
                self.items = items;
                self.notice = None;
            }
            ListEvent::LoadFailed(message) => {
                self.phase = Phase::Errored;
                self.notice = Some(message);
            }
            ListEvent::MutationFailed(message) => {
                self.notice = Some(message);
            }
            ListEvent::Cleared => {
                *self = Self::default();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_idle_and_empty() {
        let state = ListState::<u32>::default();
        assert_eq!(state.phase, Phase::Idle);
        assert!(state.items.is_empty());
        assert!(state.notice.is_none());
        assert!(!state.is_settled());
    }

    #[test]
    fn load_replaces_items_wholesale() {
        let mut state = ListState::default();
        state.apply(ListEvent::LoadStarted);
        state.apply(ListEvent::Loaded(vec![1, 2, 3]));
        state.apply(ListEvent::LoadStarted);
        state.apply(ListEvent::Loaded(vec![9]));
        assert_eq!(state.items, vec![9]);
        assert_eq!(state.phase, Phase::Ready);
    }

    #[test]
    fn failed_load_keeps_last_good_items() {
        let mut state = ListState::default();
        state.apply(ListEvent::Loaded(vec![1, 2]));
        state.apply(ListEvent::LoadStarted);
        state.apply(ListEvent::LoadFailed("network error".into()));
        assert_eq!(state.phase, Phase::Errored);
        assert_eq!(state.items, vec![1, 2]);
        assert_eq!(state.notice.as_deref(), Some("network error"));
    }

    #[test]
    fn errored_reenters_loading() {
        let mut state = ListState::<u32>::default();
        state.apply(ListEvent::LoadFailed("boom".into()));
        state.apply(ListEvent::LoadStarted);
        assert_eq!(state.phase, Phase::Loading);
        assert!(state.notice.is_none());
    }

    #[test]
    fn mutation_failure_leaves_phase_alone() {
        let mut state = ListState::default();
        state.apply(ListEvent::Loaded(vec![1]));
        state.apply(ListEvent::MutationFailed("write failed".into()));
        assert_eq!(state.phase, Phase::Ready);
        assert_eq!(state.items, vec![1]);
        assert_eq!(state.notice.as_deref(), Some("write failed"));
    }

    #[test]
    fn cleared_resets_everything() {
        let mut state = ListState::default();
        state.apply(ListEvent::Loaded(vec![1]));
        state.apply(ListEvent::Cleared);
        assert_eq!(state, ListState::default());
    }
}
