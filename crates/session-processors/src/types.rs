use secrecy::{ExposeSecret, SecretString};
use std::ops::Deref;
use std::path::PathBuf;

pub const DEFAULT_FORMAT_ID: &str = "best";
pub const AUDIO_ONLY_FORMAT_ID: &str = "bestaudio";

// Credential
#[derive(Clone, Debug)]
pub struct Credential(SecretString);

impl Credential {
    pub fn new(value: impl Into<String>) -> Self {
        Self(SecretString::new(value.into()))
    }

    /// Raw token, for the auth body or the `x-access-code` header only.
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthState {
    Unauthenticated,
    Verifying,
    Authenticated,
}

// Generation
#[derive(Eq, PartialEq, Clone, Copy, Hash, Debug, PartialOrd, Ord)]
pub struct Generation(pub(crate) u64);

impl Deref for Generation {
    type Target = u64;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<u64> for Generation {
    fn from(value: u64) -> Self {
        Generation(value)
    }
}

impl std::fmt::Display for Generation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// FormatId
#[derive(Eq, PartialEq, Clone, Hash, Debug)]
pub struct FormatId(pub(crate) String);

impl FormatId {
    pub fn is_audio_only(&self) -> bool {
        self.0 == AUDIO_ONLY_FORMAT_ID
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for FormatId {
    fn default() -> Self {
        FormatId(DEFAULT_FORMAT_ID.to_string())
    }
}

impl Deref for FormatId {
    type Target = String;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<&str> for FormatId {
    fn from(value: &str) -> Self {
        FormatId(value.to_string())
    }
}

impl From<String> for FormatId {
    fn from(value: String) -> Self {
        FormatId(value)
    }
}

impl std::fmt::Display for FormatId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FormatOption {
    pub format_id: FormatId,
    pub display_label: String,
    pub container_ext: String,
}

impl FormatOption {
    /// Label-based hint used only to pick an icon.
    pub fn is_audio(&self) -> bool {
        self.display_label.contains("Audio")
    }
}

#[derive(Clone, Debug, PartialEq, Default)]
pub struct MediaMetadata {
    pub title: String,
    pub thumbnail_url: String,
    pub duration_seconds: Option<f64>,
    pub canonical_url: String,
    pub extractor: Option<String>,
    pub formats: Vec<FormatOption>,
}

impl MediaMetadata {
    pub fn find_format(&self, format_id: &FormatId) -> Option<&FormatOption> {
        self.formats.iter().find(|f| &f.format_id == format_id)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct DownloadRequest {
    pub source_url: String,
    pub format_id: FormatId,
}

impl DownloadRequest {
    pub fn new(source_url: impl Into<String>, format_id: FormatId) -> Self {
        Self {
            source_url: source_url.into(),
            format_id,
        }
    }
}

/// Raw answer of the download endpoint, before any filename policy applies.
#[derive(Debug, Default)]
pub struct DownloadResponse {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
    pub content_disposition: Option<String>,
}

pub struct DownloadArtifact {
    pub bytes: Vec<u8>,
    pub mime_type: String,
    pub suggested_filename: String,
}

impl std::fmt::Debug for DownloadArtifact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DownloadArtifact")
            .field("size", &self.bytes.len())
            .field("mime_type", &self.mime_type)
            .field("suggested_filename", &self.suggested_filename)
            .finish()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SavedArtifact {
    pub filename: String,
    pub mime_type: String,
    pub location: PathBuf,
    pub size: usize,
}
