//! Ambient identity for the current user.
//!
//! Authentication itself is delegated to the hosted service; the shell
//! resolves the identity (or its absence) and pushes it into a
//! [`SessionHandle`]. View models receive the handle explicitly at
//! construction so there is no hidden global and tests stay deterministic.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

/// Opaque user identifier assigned by the hosted auth service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

/// The resolved identity of the signed-in user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub id: UserId,
    pub email: Option<String>,
}

type Listener = Rc<dyn Fn(Option<&UserIdentity>)>;

#[derive(Default)]
struct SessionInner {
    user: Option<UserIdentity>,
    listeners: Vec<(u64, Listener)>,
    next_listener_id: u64,
}

/// Shared handle to the current identity, with change notification.
///
/// Cloning the handle shares the underlying state. Identity changes
/// (sign-in, sign-out, token refresh resolving a different user) notify
/// subscribers so every list instance can reload or clear itself.
#[derive(Clone, Default)]
pub struct SessionHandle {
    inner: Rc<RefCell<SessionInner>>,
}

impl SessionHandle {
    /// A session with no identity resolved yet.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// A session pre-resolved to `identity`. Convenient in tests.
    pub fn authenticated(identity: UserIdentity) -> Self {
        let handle = Self::default();
        handle.set_identity(Some(identity));
        handle
    }

    pub fn current(&self) -> Option<UserIdentity> {
        self.inner.borrow().user.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.borrow().user.is_some()
    }

    /// Replace the current identity, notifying subscribers when it changed.
    pub fn set_identity(&self, user: Option<UserIdentity>) {
        let listeners: Vec<Listener> = {
            let mut inner = self.inner.borrow_mut();
            if inner.user == user {
                return;
            }
            inner.user = user;
            inner.listeners.iter().map(|(_, l)| l.clone()).collect()
        };
        // Borrow released before callbacks run; a listener may read the
        // session again.
        let current = self.current();
        for listener in listeners {
            listener(current.as_ref());
        }
    }

    /// Register a change listener; returns a token for [`unsubscribe`].
    ///
    /// [`unsubscribe`]: SessionHandle::unsubscribe
    pub fn subscribe(&self, listener: impl Fn(Option<&UserIdentity>) + 'static) -> u64 {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_listener_id;
        inner.next_listener_id += 1;
        inner.listeners.push((id, Rc::new(listener)));
        id
    }

    pub fn unsubscribe(&self, id: u64) {
        self.inner
            .borrow_mut()
            .listeners
            .retain(|(listener_id, _)| *listener_id != id);
    }
}

impl PartialEq for SessionHandle {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for SessionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionHandle")
            .field("user", &self.inner.borrow().user)
            .finish()
    }
}
