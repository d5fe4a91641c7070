use anyhow::anyhow;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

const CONFIG_DIRECTORY_NAME: &str = ".genshell";
const CONFIG_FILE_NAME: &str = "genshell_config.json";

/// Which hosted completion API to call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    #[default]
    OpenAi,
    Gemini,
}

impl FromStr for Provider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openai" | "chatgpt" => Ok(Provider::OpenAi),
            "gemini" => Ok(Provider::Gemini),
            other => Err(anyhow!(
                "Unknown provider '{}'. Supported providers: openai, gemini",
                other
            )),
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provider::OpenAi => write!(f, "openai"),
            Provider::Gemini => write!(f, "gemini"),
        }
    }
}

/// Persisted configuration, written by `genshell config` and read before
/// every generation attempt. The `openai_api_token` key name is kept for
/// compatibility with config files written by earlier versions, even when
/// the token belongs to another provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub openai_api_token: String,

    #[serde(default)]
    pub model: String,

    #[serde(default)]
    pub provider: Provider,
}

impl Config {
    pub fn new(api_token: String, model: String, provider: Provider) -> Self {
        Self {
            openai_api_token: api_token,
            model,
            provider,
        }
    }
}

/// Failure conditions of the configuration store. `NotFound` is distinct
/// so callers can tell "never configured" apart from a corrupt file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no configuration found; run 'genshell config --api-token <token>' first")]
    NotFound,

    #[error("failed to parse configuration file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("configuration I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Invalid(String),
}

/// File-backed configuration store. The path is held as a value so tests
/// can point the store at a temporary directory instead of the real home.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    /// Store rooted at `<home>/.genshell/genshell_config.json`.
    pub fn new() -> Result<Self, ConfigError> {
        let home = dirs::home_dir().ok_or_else(|| {
            ConfigError::Invalid("could not resolve the home directory".to_string())
        })?;
        Ok(Self {
            path: home.join(CONFIG_DIRECTORY_NAME).join(CONFIG_FILE_NAME),
        })
    }

    /// Store backed by an arbitrary file path.
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Serialize the configuration as indented JSON and overwrite the
    /// backing file, creating the parent directory if needed. Plain
    /// overwrite, no locking: concurrent invocations race and the last
    /// write wins.
    pub fn save(&self, config: &Config) -> Result<(), ConfigError> {
        if config.openai_api_token.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "API token must not be empty".to_string(),
            ));
        }

        if let Some(parent) = self.path.parent() {
            create_private_dir(parent)?;
        }

        let content = serde_json::to_string_pretty(config)?;
        write_private_file(&self.path, &content)?;
        Ok(())
    }

    /// Read and deserialize the backing file.
    pub fn load(&self) -> Result<Config, ConfigError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ConfigError::NotFound)
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };

        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }
}

#[cfg(unix)]
fn create_private_dir(path: &std::path::Path) -> std::io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;
    if path.exists() {
        return Ok(());
    }
    fs::DirBuilder::new().recursive(true).mode(0o700).create(path)
}

#[cfg(not(unix))]
fn create_private_dir(path: &std::path::Path) -> std::io::Result<()> {
    fs::create_dir_all(path)
}

#[cfg(unix)]
fn write_private_file(path: &std::path::Path, content: &str) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::write(path, content)?;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn write_private_file(path: &std::path::Path, content: &str) -> std::io::Result<()> {
    fs::write(path, content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn test_store() -> (tempfile::TempDir, ConfigStore) {
        let dir = tempdir().unwrap();
        let store = ConfigStore::with_path(dir.path().join(".genshell").join("config.json"));
        (dir, store)
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let (_dir, store) = test_store();
        let config = Config::new(
            "sk-test-token".to_string(),
            "gpt-4".to_string(),
            Provider::OpenAi,
        );

        store.save(&config).unwrap();
        let loaded = store.load().unwrap();

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_round_trip_with_empty_model() {
        let (_dir, store) = test_store();
        let config = Config::new("tok".to_string(), String::new(), Provider::Gemini);

        store.save(&config).unwrap();
        assert_eq!(store.load().unwrap(), config);
    }

    #[test]
    fn test_empty_token_rejected_before_write() {
        let (_dir, store) = test_store();
        let config = Config::new("   ".to_string(), "gpt-4".to_string(), Provider::OpenAi);

        let result = store.save(&config);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
        assert!(
            !store.path().exists(),
            "no file may be written for an empty token"
        );
    }

    #[test]
    fn test_load_missing_file_is_not_found() {
        let (_dir, store) = test_store();

        let result = store.load();
        assert!(matches!(result, Err(ConfigError::NotFound)));
    }

    #[test]
    fn test_load_malformed_file_is_parse_error() {
        let (_dir, store) = test_store();
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), "{ not json").unwrap();

        let result = store.load();
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_legacy_file_without_provider_field() {
        // Files written by earlier versions only carry the token and model.
        let (_dir, store) = test_store();
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(
            store.path(),
            r#"{ "openai_api_token": "tok", "model": "gpt-3.5-turbo" }"#,
        )
        .unwrap();

        let config = store.load().unwrap();
        assert_eq!(config.provider, Provider::OpenAi);
        assert_eq!(config.model, "gpt-3.5-turbo");
    }

    #[test]
    fn test_save_overwrites_existing_file() {
        let (_dir, store) = test_store();
        let first = Config::new("first".to_string(), String::new(), Provider::OpenAi);
        let second = Config::new(
            "second".to_string(),
            "gemini-pro".to_string(),
            Provider::Gemini,
        );

        store.save(&first).unwrap();
        store.save(&second).unwrap();

        assert_eq!(store.load().unwrap(), second);
    }

    #[cfg(unix)]
    #[test]
    fn test_file_permissions_are_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let (_dir, store) = test_store();
        let config = Config::new("tok".to_string(), String::new(), Provider::OpenAi);
        store.save(&config).unwrap();

        let file_mode = fs::metadata(store.path()).unwrap().permissions().mode() & 0o777;
        assert_eq!(file_mode, 0o600);

        let dir_mode = fs::metadata(store.path().parent().unwrap())
            .unwrap()
            .permissions()
            .mode()
            & 0o777;
        assert_eq!(dir_mode, 0o700);
    }

    #[test]
    fn test_provider_parsing() {
        assert_eq!("openai".parse::<Provider>().unwrap(), Provider::OpenAi);
        assert_eq!("chatgpt".parse::<Provider>().unwrap(), Provider::OpenAi);
        assert_eq!("GEMINI".parse::<Provider>().unwrap(), Provider::Gemini);
        assert!("claude".parse::<Provider>().is_err());
    }

    #[test]
    fn test_serialized_key_names() {
        let config = Config::new("tok".to_string(), "m".to_string(), Provider::OpenAi);
        let json = serde_json::to_string_pretty(&config).unwrap();

        assert!(json.contains("\"openai_api_token\""));
        assert!(json.contains("\"model\""));
        assert!(json.contains("\"provider\": \"openai\""));
    }
}
