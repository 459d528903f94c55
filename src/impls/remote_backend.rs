use crate::services::RemoteBackend;
use async_trait::async_trait;
use media_backend::{BackendClientError, VideoInfo};
use session_processors::{
    AuthBackend, BackendError, Credential, DownloadRequest, DownloadResponse, FormatOption,
    MediaBackend, MediaMetadata,
};

fn to_backend_error(error: BackendClientError) -> BackendError {
    match error {
        BackendClientError::Status { status, detail } if status.as_u16() == 401 => {
            BackendError::Unauthorized { detail }
        }
        BackendClientError::Status { status, detail } => BackendError::Rejected {
            status: status.as_u16(),
            detail,
        },
        BackendClientError::Reqwest(error) if error.is_decode() => {
            BackendError::MalformedResponse(error.to_string())
        }
        BackendClientError::Reqwest(error) => BackendError::Transport(error.to_string()),
    }
}

fn to_media_metadata(info: VideoInfo) -> MediaMetadata {
    MediaMetadata {
        title: info.title,
        thumbnail_url: info.thumbnail.unwrap_or_default(),
        duration_seconds: info.duration,
        canonical_url: info.webpage_url,
        extractor: info.extractor,
        formats: info
            .formats
            .into_iter()
            .map(|format| FormatOption {
                format_id: format.format_id.into(),
                display_label: format.label,
                container_ext: format.ext,
            })
            .collect(),
    }
}

#[async_trait]
impl AuthBackend for RemoteBackend {
    async fn check_credential(&self, credential: &Credential) -> Result<(), BackendError> {
        self.client
            .check_auth(credential.expose())
            .await
            .map_err(to_backend_error)
    }
}

#[async_trait]
impl MediaBackend for RemoteBackend {
    async fn fetch_info(
        &self,
        url: &str,
        credential: &Credential,
    ) -> Result<MediaMetadata, BackendError> {
        let info = self
            .client
            .get_info(url, credential.expose())
            .await
            .map_err(to_backend_error)?;

        Ok(to_media_metadata(info))
    }

    async fn download(
        &self,
        request: &DownloadRequest,
        credential: &Credential,
    ) -> Result<DownloadResponse, BackendError> {
        let file = self
            .client
            .download(
                &request.source_url,
                request.format_id.as_str(),
                credential.expose(),
            )
            .await
            .map_err(to_backend_error)?;

        Ok(DownloadResponse {
            bytes: file.bytes,
            content_type: file.content_type,
            content_disposition: file.content_disposition,
        })
    }
}
