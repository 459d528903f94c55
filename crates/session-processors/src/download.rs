use crate::filename::derive_filename;
use crate::metadata::NOT_AUTHENTICATED;
use crate::traits::{ArtifactSink, BackendError, MediaBackend};
use crate::types::{Credential, DownloadArtifact, DownloadRequest, SavedArtifact};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

pub const GENERIC_DOWNLOAD_FAILURE: &str = "Download failed. Please try again.";
const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum DownloadError {
    #[error("{0}")]
    NotAuthenticated(String),
    #[error("{0}")]
    TransferFailure(String),
}

impl From<BackendError> for DownloadError {
    fn from(error: BackendError) -> Self {
        match error {
            BackendError::Unauthorized { detail } => DownloadError::NotAuthenticated(
                detail.unwrap_or_else(|| NOT_AUTHENTICATED.to_string()),
            ),
            other => DownloadError::TransferFailure(
                other
                    .detail()
                    .map(ToString::to_string)
                    .unwrap_or_else(|| GENERIC_DOWNLOAD_FAILURE.to_string()),
            ),
        }
    }
}

pub struct DownloadOrchestrator {
    media_backend: Arc<dyn MediaBackend>,
    artifact_sink: Arc<dyn ArtifactSink>,
}

impl DownloadOrchestrator {
    pub fn new(media_backend: Arc<dyn MediaBackend>, artifact_sink: Arc<dyn ArtifactSink>) -> Self {
        Self {
            media_backend,
            artifact_sink,
        }
    }

    /// Retrieves the binary artifact and names it.
    pub async fn fetch_artifact(
        &self,
        request: &DownloadRequest,
        credential: Option<&Credential>,
    ) -> Result<DownloadArtifact, DownloadError> {
        let credential = credential
            .ok_or_else(|| DownloadError::NotAuthenticated(NOT_AUTHENTICATED.to_string()))?;

        debug!(url = %request.source_url, format_id = %request.format_id, "Requesting artifact");

        let response = match self.media_backend.download(request, credential).await {
            Ok(response) => response,
            Err(error) => {
                warn!(url = %request.source_url, %error, "Artifact transfer failed");
                return Err(error.into());
            }
        };

        let suggested_filename =
            derive_filename(response.content_disposition.as_deref(), &request.format_id);
        let mime_type = response
            .content_type
            .unwrap_or_else(|| DEFAULT_MIME_TYPE.to_string());

        Ok(DownloadArtifact {
            bytes: response.bytes,
            mime_type,
            suggested_filename,
        })
    }

    /// Retrieves the artifact and commits it to local storage.
    pub async fn download(
        &self,
        request: &DownloadRequest,
        credential: Option<&Credential>,
    ) -> Result<SavedArtifact, DownloadError> {
        let artifact = self.fetch_artifact(request, credential).await?;

        self.commit(artifact).await
    }

    /// Saves the artifact under its derived name. The bytes are dropped once
    /// the save attempt is over; a failed save is not retried.
    pub async fn commit(&self, artifact: DownloadArtifact) -> Result<SavedArtifact, DownloadError> {
        let location = match self.artifact_sink.save(&artifact).await {
            Ok(location) => location,
            Err(error) => {
                error!(filename = %artifact.suggested_filename, %error, "Unable to save artifact");
                return Err(DownloadError::TransferFailure(format!(
                    "Unable to save {}: {}",
                    artifact.suggested_filename, error
                )));
            }
        };

        let DownloadArtifact {
            bytes,
            mime_type,
            suggested_filename,
        } = artifact;

        info!(
            filename = %suggested_filename,
            location = %location.display(),
            size = bytes.len(),
            "Artifact saved"
        );

        Ok(SavedArtifact {
            filename: suggested_filename,
            mime_type,
            location,
            size: bytes.len(),
        })
    }
}
