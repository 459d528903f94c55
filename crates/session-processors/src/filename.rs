use crate::types::FormatId;
use once_cell::sync::Lazy;
use regex::Regex;

const FALLBACK_STEM: &str = "download";

static QUOTED_FILENAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"filename="(.+)""#).expect("Invalid filename pattern"));

static EXTENDED_FILENAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"filename\*=([^']*)'[^']*'([^;\s]+)"#).expect("Invalid filename* pattern")
});

/// Picks the name under which a downloaded artifact is saved.
///
/// A quoted `filename="..."` parameter wins and is used verbatim. Without it
/// an RFC 5987 `filename*=` parameter is percent-decoded. Anything else falls
/// back to `download.mp3` for the audio-only format and `download.mp4`
/// otherwise. Never fails.
pub fn derive_filename(content_disposition: Option<&str>, format_id: &FormatId) -> String {
    content_disposition
        .and_then(|header| quoted_filename(header).or_else(|| extended_filename(header)))
        .unwrap_or_else(|| fallback_filename(format_id))
}

pub fn fallback_filename(format_id: &FormatId) -> String {
    let ext = if format_id.is_audio_only() { "mp3" } else { "mp4" };

    format!("{}.{}", FALLBACK_STEM, ext)
}

fn quoted_filename(header: &str) -> Option<String> {
    QUOTED_FILENAME
        .captures(header)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str().to_string())
}

fn extended_filename(header: &str) -> Option<String> {
    let captures = EXTENDED_FILENAME.captures(header)?;
    let encoded = captures.get(2)?.as_str();

    match urlencoding::decode(encoded) {
        Ok(decoded) if !decoded.is_empty() => Some(decoded.into_owned()),
        _ => None,
    }
}
