use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs::create_dir_all;
use tracing::{debug, warn};
use uuid::Uuid;

const FALLBACK_NAME: &str = "download";
const MAX_SUFFIX: u32 = 9999;

/// Local directory the downloaded artifacts end up in.
pub(crate) struct DownloadDirectory {
    path: PathBuf,
}

impl DownloadDirectory {
    pub(crate) fn create(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    /// Writes `bytes` under a name derived from `filename`. Existing files are
    /// never replaced: a ` (n)` suffix is added to the stem instead.
    ///
    /// The bytes go to a `.part` file first, which is then hard linked under
    /// the first free name. Linking fails when the name is taken, so claiming
    /// a name and publishing the file are one step.
    pub(crate) async fn save(
        &self,
        filename: &str,
        mime_type: &str,
        bytes: &[u8],
    ) -> Result<PathBuf, std::io::Error> {
        create_dir_all(&self.path).await?;

        let filename = local_filename(filename, mime_type);
        let part_path = self.path.join(format!(".{}.part", Uuid::new_v4()));

        if let Err(error) = tokio::fs::write(&part_path, bytes).await {
            remove_part(&part_path).await;
            return Err(error);
        }

        let result = self.link_to_vacant_name(&part_path, &filename).await;
        remove_part(&part_path).await;
        let target = result?;

        debug!(path = %target.display(), size = bytes.len(), "File written");

        Ok(target)
    }

    async fn link_to_vacant_name(
        &self,
        part_path: &Path,
        filename: &str,
    ) -> Result<PathBuf, std::io::Error> {
        let (stem, extension) = split_extension(filename);
        let candidates = std::iter::once(filename.to_string())
            .chain((1..=MAX_SUFFIX).map(|n| format!("{} ({}){}", stem, n, extension)));

        for candidate in candidates {
            let candidate = self.path.join(candidate);

            match tokio::fs::hard_link(part_path, &candidate).await {
                Ok(()) => return Ok(candidate),
                Err(error) if error.kind() == ErrorKind::AlreadyExists => continue,
                Err(error) => return Err(error),
            }
        }

        Err(std::io::Error::new(
            ErrorKind::AlreadyExists,
            format!("No free name left for {}", filename),
        ))
    }
}

async fn remove_part(path: &Path) {
    if let Err(error) = tokio::fs::remove_file(path).await {
        warn!(path = %path.display(), %error, "Unable to remove partial file");
    }
}

/// Drops directory components from a server supplied name and adds an
/// extension guessed from the mime type when the name has none.
pub(crate) fn local_filename(filename: &str, mime_type: &str) -> String {
    let name = filename
        .rsplit(|c: char| c == '/' || c == '\\')
        .next()
        .map(str::trim)
        .filter(|name| !name.is_empty() && *name != "." && *name != "..")
        .unwrap_or(FALLBACK_NAME);

    if Path::new(name).extension().is_some() {
        return name.to_string();
    }

    match mime_guess::get_mime_extensions_str(mime_type).and_then(|exts| exts.first()) {
        Some(ext) => format!("{}.{}", name, ext),
        None => name.to_string(),
    }
}

fn split_extension(filename: &str) -> (&str, &str) {
    match filename.rfind('.') {
        Some(index) if index > 0 => filename.split_at(index),
        _ => (filename, ""),
    }
}
