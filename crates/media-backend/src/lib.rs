mod types;

use reqwest::header::{HeaderName, CONTENT_DISPOSITION, CONTENT_TYPE};
use reqwest::{Client, Response, StatusCode};
use tracing::debug;

pub use types::*;

const ACCESS_CODE_HEADER: &str = "x-access-code";

#[derive(Debug, thiserror::Error)]
pub enum BackendClientError {
    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),
    #[error("Backend responded with status {status}")]
    Status {
        status: StatusCode,
        detail: Option<String>,
    },
}

impl BackendClientError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, BackendClientError::Status { status, .. } if *status == StatusCode::UNAUTHORIZED)
    }

    /// Error message the backend put into the `detail` field of its response.
    pub fn detail(&self) -> Option<&str> {
        match self {
            BackendClientError::Status { detail, .. } => detail.as_deref(),
            BackendClientError::Reqwest(_) => None,
        }
    }
}

/// HTTP client of the media extraction backend.
pub struct BackendClient {
    client: Client,
    endpoint: String,
}

impl BackendClient {
    pub fn create(endpoint: &str) -> Result<Self, BackendClientError> {
        let client = Client::builder().build()?;

        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Succeeds only when the backend accepts the access code.
    pub async fn check_auth(&self, code: &str) -> Result<(), BackendClientError> {
        let response = self
            .client
            .post(format!("{}/api/auth", self.endpoint))
            .json(&AuthBody { code })
            .send()
            .await?;

        ensure_success(response).await?;

        Ok(())
    }

    pub async fn get_info(
        &self,
        url: &str,
        access_code: &str,
    ) -> Result<VideoInfo, BackendClientError> {
        let response = self
            .client
            .post(format!("{}/api/info", self.endpoint))
            .header(ACCESS_CODE_HEADER, access_code)
            .json(&InfoBody { url })
            .send()
            .await?;

        let info = ensure_success(response).await?.json::<VideoInfo>().await?;

        debug!(title = %info.title, formats = info.formats.len(), "Got video info");

        Ok(info)
    }

    pub async fn download(
        &self,
        url: &str,
        format_id: &str,
        access_code: &str,
    ) -> Result<DownloadedFile, BackendClientError> {
        let response = self
            .client
            .post(format!("{}/api/download", self.endpoint))
            .header(ACCESS_CODE_HEADER, access_code)
            .json(&DownloadBody { url, format_id })
            .send()
            .await?;

        let response = ensure_success(response).await?;

        let header = |name: HeaderName| {
            response
                .headers()
                .get(name)
                .and_then(|value| value.to_str().ok())
                .map(ToString::to_string)
        };
        let content_type = header(CONTENT_TYPE);
        let content_disposition = header(CONTENT_DISPOSITION);

        let bytes = response.bytes().await?.to_vec();

        debug!(size = bytes.len(), format_id, "Downloaded file");

        Ok(DownloadedFile {
            bytes,
            content_type,
            content_disposition,
        })
    }
}

async fn ensure_success(response: Response) -> Result<Response, BackendClientError> {
    let status = response.status();

    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let detail = parse_detail(&body);

    debug!(%status, ?detail, "Backend rejected the request");

    Err(BackendClientError::Status { status, detail })
}

/// Extracts `{"detail": "..."}` from an error body. Anything else, including
/// a non-string `detail`, is ignored.
fn parse_detail(body: &str) -> Option<String> {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()?
        .get("detail")?
        .as_str()
        .map(ToString::to_string)
}
