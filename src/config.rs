use serde::Deserialize;

fn default_backend_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

fn default_state_storage_directory() -> String {
    ".media-grabber".to_string()
}

fn default_download_directory() -> String {
    "downloads".to_string()
}

#[derive(Clone, Debug, Deserialize)]
pub(crate) struct Config {
    #[serde(default = "default_backend_url")]
    pub(crate) backend_url: String,
    #[serde(default = "default_state_storage_directory")]
    pub(crate) state_storage_directory: String,
    #[serde(default = "default_download_directory")]
    pub(crate) download_directory: String,
    /// Keep the access code in memory only, forgetting it on exit.
    #[serde(default)]
    pub(crate) ephemeral_credentials: bool,
}

impl Config {
    pub(crate) fn from_env() -> Result<Self, envy::Error> {
        envy::from_env::<Self>()
    }

    #[cfg(test)]
    fn from_vars<I>(vars: I) -> Result<Self, envy::Error>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter(vars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_use_defaults_when_nothing_is_set() {
        let config = Config::from_vars(vec![]).unwrap();

        assert_eq!(config.backend_url, "http://127.0.0.1:8000");
        assert_eq!(config.state_storage_directory, ".media-grabber");
        assert_eq!(config.download_directory, "downloads");
        assert!(!config.ephemeral_credentials);
    }

    #[test]
    fn should_read_overrides() {
        let config = Config::from_vars(vec![
            ("BACKEND_URL".to_string(), "https://grabber.example.com".to_string()),
            ("DOWNLOAD_DIRECTORY".to_string(), "/tmp/media".to_string()),
            ("EPHEMERAL_CREDENTIALS".to_string(), "true".to_string()),
        ])
        .unwrap();

        assert_eq!(config.backend_url, "https://grabber.example.com");
        assert_eq!(config.download_directory, "/tmp/media");
        assert!(config.ephemeral_credentials);
    }

    #[test]
    fn should_reject_malformed_flag() {
        let result = Config::from_vars(vec![(
            "EPHEMERAL_CREDENTIALS".to_string(),
            "sometimes".to_string(),
        )]);

        assert!(result.is_err());
    }
}
