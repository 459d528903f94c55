use crate::traits::{BackendError, MediaBackend};
use crate::types::{Credential, MediaMetadata};
use std::sync::Arc;
use tracing::{debug, warn};

pub const GENERIC_FETCH_FAILURE: &str = "Failed to fetch video info";
pub const NOT_AUTHENTICATED: &str = "Not authenticated";

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum FetchError {
    #[error("{0}")]
    NotAuthenticated(String),
    #[error("{0}")]
    InvalidUrl(String),
    #[error("{0}")]
    UpstreamFailure(String),
}

impl FetchError {
    pub fn detail(&self) -> &str {
        match self {
            FetchError::NotAuthenticated(detail)
            | FetchError::InvalidUrl(detail)
            | FetchError::UpstreamFailure(detail) => detail,
        }
    }
}

impl From<BackendError> for FetchError {
    fn from(error: BackendError) -> Self {
        match error {
            BackendError::Unauthorized { detail } => FetchError::NotAuthenticated(
                detail.unwrap_or_else(|| NOT_AUTHENTICATED.to_string()),
            ),
            other => FetchError::UpstreamFailure(
                other
                    .detail()
                    .map(ToString::to_string)
                    .unwrap_or_else(|| GENERIC_FETCH_FAILURE.to_string()),
            ),
        }
    }
}

pub struct MetadataFetcher {
    media_backend: Arc<dyn MediaBackend>,
}

impl MetadataFetcher {
    pub fn new(media_backend: Arc<dyn MediaBackend>) -> Self {
        Self { media_backend }
    }

    pub async fn fetch_info(
        &self,
        url: &str,
        credential: Option<&Credential>,
    ) -> Result<MediaMetadata, FetchError> {
        let url = url.trim();

        if url.is_empty() {
            return Err(FetchError::InvalidUrl("URL must not be empty".to_string()));
        }

        let credential = credential
            .ok_or_else(|| FetchError::NotAuthenticated(NOT_AUTHENTICATED.to_string()))?;

        debug!(url, "Fetching media metadata");

        match self.media_backend.fetch_info(url, credential).await {
            Ok(metadata) => {
                debug!(
                    url,
                    title = %metadata.title,
                    formats = metadata.formats.len(),
                    "Media metadata received"
                );
                Ok(metadata)
            }
            Err(error) => {
                warn!(url, %error, "Unable to fetch media metadata");
                Err(error.into())
            }
        }
    }
}
