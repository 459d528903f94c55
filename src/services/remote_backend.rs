use media_backend::{BackendClient, BackendClientError};

/// The extraction backend as seen by the session: one HTTP client shared by
/// authentication, metadata and downloads.
pub(crate) struct RemoteBackend {
    pub(crate) client: BackendClient,
}

impl RemoteBackend {
    pub(crate) fn create(endpoint: &str) -> Result<Self, BackendClientError> {
        Ok(Self {
            client: BackendClient::create(endpoint)?,
        })
    }
}
