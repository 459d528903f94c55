use crate::traits::{
    ArtifactSink, ArtifactSinkError, AuthBackend, BackendError, CredentialStore,
    CredentialStoreError, MediaBackend,
};
use crate::types::{
    Credential, DownloadArtifact, DownloadRequest, DownloadResponse, FormatOption, MediaMetadata,
};
use async_trait::async_trait;
use std::io::{Error, ErrorKind};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio::sync::Notify;

pub(crate) const VALID_CODE: &str = "123456";
pub(crate) const UNREACHABLE_CODE: &str = "unreachable";
pub(crate) const SLOW_CODE: &str = "slow";
pub(crate) const SLOW_VALID_CODE: &str = "slow-valid";

/// Lets a test hold a mocked call until it decides to let it go.
#[derive(Default)]
pub(crate) struct Gate {
    entered: Notify,
    release: Notify,
}

impl Gate {
    async fn pass(&self) {
        self.entered.notify_one();
        self.release.notified().await;
    }

    pub(crate) async fn wait_entered(&self) {
        self.entered.notified().await;
    }

    pub(crate) fn release(&self) {
        self.release.notify_one();
    }
}

#[derive(Default)]
pub(crate) struct CredentialStoreMock {
    pub(crate) value: Mutex<Option<String>>,
    pub(crate) unavailable: bool,
}

impl CredentialStoreMock {
    pub(crate) fn with_value(value: &str) -> Self {
        Self {
            value: Mutex::new(Some(value.to_string())),
            unavailable: false,
        }
    }

    pub(crate) fn unavailable() -> Self {
        Self {
            value: Mutex::new(None),
            unavailable: true,
        }
    }

    pub(crate) fn stored(&self) -> Option<String> {
        self.value.lock().unwrap().clone()
    }

    fn check_available(&self) -> Result<(), CredentialStoreError> {
        if self.unavailable {
            return Err(CredentialStoreError(Box::new(Error::from(
                ErrorKind::PermissionDenied,
            ))));
        }

        Ok(())
    }
}

#[async_trait]
impl CredentialStore for CredentialStoreMock {
    async fn save(&self, credential: &Credential) -> Result<(), CredentialStoreError> {
        self.check_available()?;
        *self.value.lock().unwrap() = Some(credential.expose().to_string());
        Ok(())
    }

    async fn load(&self) -> Result<Option<Credential>, CredentialStoreError> {
        self.check_available()?;
        Ok(self.value.lock().unwrap().as_deref().map(Credential::new))
    }

    async fn clear(&self) -> Result<(), CredentialStoreError> {
        self.check_available()?;
        self.value.lock().unwrap().take();
        Ok(())
    }
}

#[derive(Default)]
pub(crate) struct AuthBackendMock {
    pub(crate) calls: AtomicUsize,
    pub(crate) slow: Gate,
}

#[async_trait]
impl AuthBackend for AuthBackendMock {
    async fn check_credential(&self, credential: &Credential) -> Result<(), BackendError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        match credential.expose() {
            VALID_CODE => Ok(()),
            UNREACHABLE_CODE => Err(BackendError::Transport("connection refused".into())),
            SLOW_CODE => {
                self.slow.pass().await;
                Err(BackendError::Unauthorized {
                    detail: Some("Invalid Access Code".into()),
                })
            }
            SLOW_VALID_CODE => {
                self.slow.pass().await;
                Ok(())
            }
            _ => Err(BackendError::Unauthorized {
                detail: Some("Invalid Access Code".into()),
            }),
        }
    }
}

pub(crate) const FIRST_URL: &str = "https://example.com/v/1";
pub(crate) const SECOND_URL: &str = "https://example.com/v/2";
pub(crate) const SLOW_URL: &str = "https://example.com/v/slow";
pub(crate) const RATE_LIMITED_URL: &str = "https://example.com/v/limited";
pub(crate) const EXPIRED_URL: &str = "https://example.com/v/expired";
pub(crate) const UNREACHABLE_URL: &str = "https://example.com/v/unreachable";

pub(crate) const SLOW_FORMAT: &str = "slow";
pub(crate) const BROKEN_FORMAT: &str = "720p";
pub(crate) const EXPIRED_FORMAT: &str = "expired";
pub(crate) const REVOKED_FORMAT: &str = "revoked";
pub(crate) const SLOW_SAVE_FORMAT: &str = "slow-save";

fn format(format_id: &str, display_label: &str, container_ext: &str) -> FormatOption {
    FormatOption {
        format_id: format_id.into(),
        display_label: display_label.into(),
        container_ext: container_ext.into(),
    }
}

pub(crate) fn first_video() -> MediaMetadata {
    MediaMetadata {
        title: "First video".into(),
        thumbnail_url: "https://example.com/v/1.jpg".into(),
        duration_seconds: Some(212.0),
        canonical_url: FIRST_URL.into(),
        extractor: Some("generic".into()),
        formats: vec![
            format("bestaudio", "Audio Only (MP3/M4A)", "mp3"),
            format("best", "Best Quality (Auto)", "mp4"),
            format(SLOW_FORMAT, "Slow Mirror", "mp4"),
            format(BROKEN_FORMAT, "720p", "mp4"),
            format(EXPIRED_FORMAT, "Expired Mirror", "mp4"),
            format(REVOKED_FORMAT, "Revoked Mirror", "mp4"),
            format(SLOW_SAVE_FORMAT, "Large File", "mp4"),
        ],
    }
}

pub(crate) fn second_video() -> MediaMetadata {
    MediaMetadata {
        title: "Second video".into(),
        canonical_url: SECOND_URL.into(),
        formats: vec![format("best", "Best Quality (Auto)", "mp4")],
        ..MediaMetadata::default()
    }
}

#[derive(Default)]
pub(crate) struct MediaBackendMock {
    pub(crate) info_calls: AtomicUsize,
    pub(crate) download_calls: AtomicUsize,
    pub(crate) slow: Gate,
}

#[async_trait]
impl MediaBackend for MediaBackendMock {
    async fn fetch_info(
        &self,
        url: &str,
        credential: &Credential,
    ) -> Result<MediaMetadata, BackendError> {
        self.info_calls.fetch_add(1, Ordering::SeqCst);

        if credential.expose() != VALID_CODE {
            return Err(BackendError::Unauthorized {
                detail: Some("Invalid Access Code".into()),
            });
        }

        match url {
            FIRST_URL => Ok(first_video()),
            SECOND_URL => Ok(second_video()),
            SLOW_URL => {
                self.slow.pass().await;
                Ok(MediaMetadata {
                    title: "Slow video".into(),
                    ..first_video()
                })
            }
            RATE_LIMITED_URL => Err(BackendError::Rejected {
                status: 403,
                detail: Some("rate limited".into()),
            }),
            EXPIRED_URL => Err(BackendError::Unauthorized {
                detail: Some("Invalid Access Code".into()),
            }),
            UNREACHABLE_URL => Err(BackendError::Transport("connection reset".into())),
            _ => Err(BackendError::Rejected {
                status: 400,
                detail: Some("Unsupported URL".into()),
            }),
        }
    }

    async fn download(
        &self,
        request: &DownloadRequest,
        credential: &Credential,
    ) -> Result<DownloadResponse, BackendError> {
        self.download_calls.fetch_add(1, Ordering::SeqCst);

        if credential.expose() != VALID_CODE {
            return Err(BackendError::Unauthorized { detail: None });
        }

        match request.format_id.as_str() {
            "best" => Ok(DownloadResponse {
                bytes: vec![0, 0, 0, 24, 102, 116, 121, 112],
                content_type: Some("video/mp4".into()),
                content_disposition: Some(r#"attachment; filename="clip.mp4""#.into()),
            }),
            "bestaudio" => Ok(DownloadResponse {
                bytes: vec![73, 68, 51],
                content_type: Some("audio/mpeg".into()),
                content_disposition: None,
            }),
            SLOW_FORMAT => {
                self.slow.pass().await;
                Ok(DownloadResponse {
                    bytes: vec![1, 2, 3],
                    content_type: Some("video/mp4".into()),
                    content_disposition: Some(r#"attachment; filename="slow.mp4""#.into()),
                })
            }
            SLOW_SAVE_FORMAT => Ok(DownloadResponse {
                bytes: vec![4, 5, 6],
                content_type: Some("video/mp4".into()),
                content_disposition: Some(r#"attachment; filename="large.mp4""#.into()),
            }),
            EXPIRED_FORMAT => Err(BackendError::Unauthorized { detail: None }),
            REVOKED_FORMAT => Err(BackendError::Unauthorized {
                detail: Some("Invalid Access Code".into()),
            }),
            _ => Err(BackendError::Rejected {
                status: 500,
                detail: None,
            }),
        }
    }
}

pub(crate) const SLOW_SAVE_FILENAME: &str = "large.mp4";

#[derive(Default)]
pub(crate) struct ArtifactSinkMock {
    pub(crate) saved: Mutex<Vec<(String, String, usize)>>,
    pub(crate) failing: bool,
    pub(crate) slow: Gate,
}

impl ArtifactSinkMock {
    pub(crate) fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub(crate) fn saved(&self) -> Vec<(String, String, usize)> {
        self.saved.lock().unwrap().clone()
    }
}

#[async_trait]
impl ArtifactSink for ArtifactSinkMock {
    async fn save(&self, artifact: &DownloadArtifact) -> Result<PathBuf, ArtifactSinkError> {
        if self.failing {
            return Err(ArtifactSinkError(Box::new(Error::new(
                ErrorKind::Other,
                "disk full",
            ))));
        }

        if artifact.suggested_filename == SLOW_SAVE_FILENAME {
            self.slow.pass().await;
        }

        self.saved.lock().unwrap().push((
            artifact.suggested_filename.clone(),
            artifact.mime_type.clone(),
            artifact.bytes.len(),
        ));

        Ok(PathBuf::from("downloads").join(&artifact.suggested_filename))
    }
}
