use crate::types::{
    Credential, DownloadArtifact, DownloadRequest, DownloadResponse, MediaMetadata,
};
use async_trait::async_trait;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
#[error("Credential storage is unavailable: {0}")]
pub struct CredentialStoreError(pub Box<dyn std::error::Error + Send + Sync>);

#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn save(&self, credential: &Credential) -> Result<(), CredentialStoreError>;
    async fn load(&self) -> Result<Option<Credential>, CredentialStoreError>;
    async fn clear(&self) -> Result<(), CredentialStoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("Credential has not been accepted by the backend")]
    Unauthorized { detail: Option<String> },
    #[error("Backend responded with status {status}")]
    Rejected { status: u16, detail: Option<String> },
    #[error("Unable to reach the backend: {0}")]
    Transport(String),
    #[error("Malformed backend response: {0}")]
    MalformedResponse(String),
}

impl BackendError {
    /// Message the backend attached to the failure, if any.
    pub fn detail(&self) -> Option<&str> {
        match self {
            BackendError::Unauthorized { detail } | BackendError::Rejected { detail, .. } => {
                detail.as_deref()
            }
            BackendError::Transport(_) | BackendError::MalformedResponse(_) => None,
        }
    }
}

#[async_trait]
pub trait AuthBackend: Send + Sync {
    async fn check_credential(&self, credential: &Credential) -> Result<(), BackendError>;
}

#[async_trait]
pub trait MediaBackend: Send + Sync {
    async fn fetch_info(
        &self,
        url: &str,
        credential: &Credential,
    ) -> Result<MediaMetadata, BackendError>;
    async fn download(
        &self,
        request: &DownloadRequest,
        credential: &Credential,
    ) -> Result<DownloadResponse, BackendError>;
}

#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct ArtifactSinkError(pub Box<dyn std::error::Error + Send + Sync>);

#[async_trait]
pub trait ArtifactSink: Send + Sync {
    /// Commits the artifact and returns where it ended up.
    async fn save(&self, artifact: &DownloadArtifact) -> Result<PathBuf, ArtifactSinkError>;
}
