use sync::SessionHandle;

use crate::services::api::RestStore;
use crate::services::auth::AuthClient;
use crate::services::storage::StorageClient;

/// Shared handles every page reaches through the Yew context.
#[derive(Clone, PartialEq)]
pub struct AppContext {
    pub session: SessionHandle,
    pub store: RestStore,
    pub auth: AuthClient,
    pub storage: StorageClient,
}

impl AppContext {
    pub fn bootstrap() -> Self {
        let auth = AuthClient::new();
        let token = auth.token();
        Self {
            session: SessionHandle::anonymous(),
            store: RestStore::new(token.clone()),
            auth,
            storage: StorageClient::new(token),
        }
    }
}
