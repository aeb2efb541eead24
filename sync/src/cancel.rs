//! Cancellation for in-flight loads.
//!
//! A page that unmounts while a fetch is pending must discard the result
//! rather than apply it to a torn-down view model. The driver checks its
//! token after every await; the page cancels it from the unmount cleanup.

use std::cell::Cell;
use std::rc::Rc;

/// Clonable one-way cancellation flag.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    cancelled: Rc<Cell<bool>>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancel_is_visible_through_clones() {
        let token = CancelToken::new();
        let clone = token.clone();
        assert!(!clone.is_cancelled());
        token.cancel();
        assert!(clone.is_cancelled());
    }
}
