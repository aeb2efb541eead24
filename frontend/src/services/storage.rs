//! File uploads to the hosted storage bucket.

use gloo_net::http::Request;
use sync::UserId;

const STORAGE_BASE_URL: &str = "https://api.therapy-companion.app";
const AVATAR_BUCKET: &str = "avatars";

#[derive(Clone, PartialEq)]
pub struct StorageClient {
    base: String,
    token: Option<String>,
}

impl StorageClient {
    pub fn new(token: Option<String>) -> Self {
        Self {
            base: STORAGE_BASE_URL.to_owned(),
            token,
        }
    }

    /// Upload the user's avatar and return its public URL.
    ///
    /// The object path is keyed by user id, so a new upload replaces the
    /// previous avatar instead of accumulating files.
    pub async fn upload_avatar(
        &self,
        owner: &UserId,
        file: web_sys::File,
    ) -> Result<String, String> {
        let path = format!("{AVATAR_BUCKET}/{}", owner.as_str());
        let url = format!("{}/storage/v1/object/{path}", self.base);

        let mut builder = Request::post(&url).header("x-upsert", "true");
        if let Some(token) = &self.token {
            builder = builder.header("Authorization", &format!("Bearer {token}"));
        }
        let response = builder
            .body(file)
            .map_err(|err| format!("could not attach file: {err}"))?
            .send()
            .await
            .map_err(|err| format!("upload failed: {err}"))?;

        if !response.ok() {
            return Err(format!("upload rejected: status {}", response.status()));
        }
        Ok(format!(
            "{}/storage/v1/object/public/{path}",
            self.base
        ))
    }
}
