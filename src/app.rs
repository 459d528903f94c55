use crate::config::Config;
use crate::services::{DownloadDirectory, RemoteBackend};
use crate::storage::{InMemoryStorage, OnDiskStorage};
use media_backend::BackendClientError;
use session_processors::{
    ArtifactSink, AuthBackend, AuthGate, CredentialStore, DownloadOrchestrator, MediaBackend,
    MetadataFetcher, SessionStateMachine,
};
use std::sync::Arc;
use tracing::info;

#[derive(Debug, thiserror::Error)]
pub(crate) enum AppError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] envy::Error),
    #[error("Unable to create backend client: {0}")]
    Backend(#[from] BackendClientError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Everything one client session needs, wired together from the config.
pub(crate) struct App {
    pub(crate) auth_gate: Arc<AuthGate>,
    pub(crate) session: SessionStateMachine,
    pub(crate) download_directory: Arc<DownloadDirectory>,
}

impl App {
    pub(crate) fn create(config: &Config) -> Result<Self, AppError> {
        let credential_store: Arc<dyn CredentialStore> = if config.ephemeral_credentials {
            info!("Access code will not be persisted");
            Arc::new(InMemoryStorage::new())
        } else {
            Arc::new(OnDiskStorage::create(&config.state_storage_directory))
        };

        let backend = Arc::new(RemoteBackend::create(&config.backend_url)?);
        let download_directory = Arc::new(DownloadDirectory::create(&config.download_directory));

        let auth_gate = Arc::new(AuthGate::new(
            credential_store,
            Arc::clone(&backend) as Arc<dyn AuthBackend>,
        ));

        let session = SessionStateMachine::new(
            Arc::clone(&auth_gate),
            MetadataFetcher::new(Arc::clone(&backend) as Arc<dyn MediaBackend>),
            DownloadOrchestrator::new(
                backend as Arc<dyn MediaBackend>,
                Arc::clone(&download_directory) as Arc<dyn ArtifactSink>,
            ),
        );

        Ok(Self {
            auth_gate,
            session,
            download_directory,
        })
    }
}
