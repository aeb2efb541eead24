//! Client for the hosted auth service.
//!
//! The app never runs the OAuth dance itself. `sign_in` redirects to the
//! hosted flow; the service redirects back with an access token in the URL
//! fragment, which we capture once on startup and keep in local storage.

use gloo::storage::{LocalStorage, Storage};
use gloo_net::http::Request;
use serde::Deserialize;
use sync::{UserId, UserIdentity};

const AUTH_BASE_URL: &str = "https://api.therapy-companion.app";
const TOKEN_KEY: &str = "therapy_companion.access_token";

#[derive(Clone, PartialEq)]
pub struct AuthClient {
    base: String,
}

#[derive(Deserialize)]
struct MeResponse {
    id: String,
    email: Option<String>,
}

impl AuthClient {
    pub fn new() -> Self {
        Self::with_base(AUTH_BASE_URL)
    }

    pub fn with_base(base: impl Into<String>) -> Self {
        Self { base: base.into() }
    }

    /// Pull an access token out of the redirect fragment, persist it, and
    /// scrub the fragment from the address bar. Call once on startup,
    /// before the first `me()`.
    pub fn capture_redirect_token() {
        let Some(window) = web_sys::window() else {
            return;
        };
        let location = window.location();
        let Ok(hash) = location.hash() else {
            return;
        };
        let fragment = hash.trim_start_matches('#');
        let token = fragment.split('&').find_map(|pair| {
            pair.strip_prefix("access_token=")
                .filter(|value| !value.is_empty())
        });
        if let Some(token) = token {
            if let Err(err) = LocalStorage::set(TOKEN_KEY, token) {
                tracing::warn!("could not persist access token: {err:?}");
            }
            let _ = location.set_hash("");
        }
    }

    pub fn token(&self) -> Option<String> {
        LocalStorage::get(TOKEN_KEY).ok()
    }

    /// Resolve the signed-in user, if any. An unauthorized answer clears
    /// the stale token so the landing page shows instead of an error.
    pub async fn me(&self) -> Option<UserIdentity> {
        let token = self.token()?;
        let response = Request::get(&format!("{}/auth/v1/user", self.base))
            .header("Authorization", &format!("Bearer {token}"))
            .send()
            .await;
        let response = match response {
            Ok(response) => response,
            Err(err) => {
                tracing::error!("auth lookup failed: {err}");
                return None;
            }
        };
        if response.status() == 401 || response.status() == 403 {
            LocalStorage::delete(TOKEN_KEY);
            return None;
        }
        match response.json::<MeResponse>().await {
            Ok(me) => Some(UserIdentity {
                id: UserId::from(me.id.as_str()),
                email: me.email,
            }),
            Err(err) => {
                tracing::error!("auth response malformed: {err}");
                None
            }
        }
    }

    /// Hand off to the hosted sign-in flow; it redirects back here with a
    /// token fragment.
    pub fn sign_in(&self) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let origin = window.location().origin().unwrap_or_default();
        let target = format!("{}/auth/v1/authorize?redirect_to={origin}", self.base);
        if let Err(err) = window.location().set_href(&target) {
            tracing::error!("sign-in redirect failed: {err:?}");
        }
    }

    pub fn sign_out(&self) {
        LocalStorage::delete(TOKEN_KEY);
    }
}

impl Default for AuthClient {
    fn default() -> Self {
        Self::new()
    }
}
