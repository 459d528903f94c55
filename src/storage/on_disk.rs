use std::io::ErrorKind;
use std::path::PathBuf;
use tokio::fs::create_dir_all;
use tokio::io::AsyncWriteExt;

/// Small key-value store keeping one file per key under `path/prefix/key`.
pub(crate) struct OnDiskStorage {
    path: PathBuf,
}

impl OnDiskStorage {
    pub(crate) fn create(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn key_path(&self, prefix: &str, key: &str) -> PathBuf {
        self.path.join(prefix).join(key)
    }

    pub(crate) async fn get(
        &self,
        prefix: &str,
        key: &str,
    ) -> Result<Option<String>, std::io::Error> {
        match tokio::fs::read_to_string(self.key_path(prefix, key)).await {
            Ok(value) => Ok(Some(value)),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(None),
            Err(error) => Err(error),
        }
    }

    pub(crate) async fn save(
        &self,
        prefix: &str,
        key: &str,
        value: &str,
    ) -> Result<(), std::io::Error> {
        create_dir_all(self.path.join(prefix)).await?;

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(self.key_path(prefix, key))
            .await?;

        file.write_all(value.as_bytes()).await?;
        file.flush().await?;

        Ok(())
    }

    /// Deleting a key that was never saved is not an error.
    pub(crate) async fn delete(&self, prefix: &str, key: &str) -> Result<(), std::io::Error> {
        match tokio::fs::remove_file(self.key_path(prefix, key)).await {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(()),
            Err(error) => Err(error),
        }
    }
}
