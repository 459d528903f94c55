use crate::services::DownloadDirectory;
use async_trait::async_trait;
use session_processors::{ArtifactSink, ArtifactSinkError, DownloadArtifact};
use std::path::PathBuf;

#[async_trait]
impl ArtifactSink for DownloadDirectory {
    async fn save(&self, artifact: &DownloadArtifact) -> Result<PathBuf, ArtifactSinkError> {
        DownloadDirectory::save(
            self,
            &artifact.suggested_filename,
            &artifact.mime_type,
            &artifact.bytes,
        )
        .await
        .map_err(|error| ArtifactSinkError(Box::new(error)))
    }
}
