use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct VideoInfo {
    pub title: String,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub duration: Option<f64>,
    pub webpage_url: String,
    #[serde(default)]
    pub extractor: Option<String>,
    #[serde(default)]
    pub formats: Vec<VideoFormat>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct VideoFormat {
    pub format_id: String,
    pub label: String,
    pub ext: String,
}

/// Binary body of a successful download together with the headers needed
/// to name and type it.
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadedFile {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
    pub content_disposition: Option<String>,
}

#[derive(Serialize)]
pub(crate) struct AuthBody<'a> {
    pub(crate) code: &'a str,
}

#[derive(Serialize)]
pub(crate) struct InfoBody<'a> {
    pub(crate) url: &'a str,
}

#[derive(Serialize)]
pub(crate) struct DownloadBody<'a> {
    pub(crate) url: &'a str,
    pub(crate) format_id: &'a str,
}
