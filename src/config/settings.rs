use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::crypto::hasher::Pbkdf2Params;
use crate::errors::{MqttCredError, Result};
use crate::policy::PasswordPolicy;
use crate::store::DEFAULT_FILE_NAME;

/// Project-level configuration, loaded from `.mqttcred.toml`.
///
/// Every field has a sensible default so mqttcred works out-of-the-box
/// without any config file at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Credentials file, relative to the config directory unless absolute.
    #[serde(default = "default_credentials_file")]
    pub credentials_file: String,

    /// PBKDF2-SHA512 round count for new hashes (default: 100 000).
    #[serde(default = "default_pbkdf2_rounds")]
    pub pbkdf2_rounds: u32,

    /// Salt size in bytes for new hashes (default: 16).
    #[serde(default = "default_salt_size")]
    pub salt_size: usize,

    /// Shortest accepted password (default: 8).
    #[serde(default = "default_password_min_len")]
    pub password_min_len: usize,

    /// Longest accepted password (default: 16).
    #[serde(default = "default_password_max_len")]
    pub password_max_len: usize,

    /// SQLite change history, relative to the config directory unless
    /// absolute.  Unset means no history is kept.
    #[serde(default)]
    pub history_file: Option<String>,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_credentials_file() -> String {
    DEFAULT_FILE_NAME.to_string()
}

fn default_pbkdf2_rounds() -> u32 {
    100_000
}

fn default_salt_size() -> usize {
    16
}

fn default_password_min_len() -> usize {
    8
}

fn default_password_max_len() -> usize {
    16
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            credentials_file: default_credentials_file(),
            pbkdf2_rounds: default_pbkdf2_rounds(),
            salt_size: default_salt_size(),
            password_min_len: default_password_min_len(),
            password_max_len: default_password_max_len(),
            history_file: None,
        }
    }
}

impl Settings {
    /// Name of the config file we look for in the config directory.
    pub const FILE_NAME: &'static str = ".mqttcred.toml";

    /// Load settings from `<config_dir>/.mqttcred.toml`.
    ///
    /// If the file does not exist, sensible defaults are returned.
    /// If the file exists but cannot be parsed or holds inconsistent
    /// values, an error is returned.
    pub fn load(config_dir: &Path) -> Result<Self> {
        let config_path = config_dir.join(Self::FILE_NAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)?;

        let settings: Settings = toml::from_str(&contents).map_err(|e| {
            MqttCredError::ConfigError(format!("Failed to parse {}: {e}", config_path.display()))
        })?;

        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        if self.credentials_file.trim().is_empty() {
            return Err(MqttCredError::ConfigError(
                "credentials_file cannot be empty".into(),
            ));
        }
        if self.password_min_len == 0 || self.password_min_len > self.password_max_len {
            return Err(MqttCredError::ConfigError(format!(
                "password length bounds are inconsistent (min {}, max {})",
                self.password_min_len, self.password_max_len
            )));
        }
        if matches!(&self.history_file, Some(f) if f.trim().is_empty()) {
            return Err(MqttCredError::ConfigError(
                "history_file cannot be empty (omit it to turn history off)".into(),
            ));
        }
        self.hasher_params()
            .validate()
            .map_err(|e| MqttCredError::ConfigError(e.to_string()))
    }

    /// Resolve the credentials file against the config directory.
    ///
    /// Example: `config_dir/mqtt_user_credentials.txt`
    pub fn credentials_path(&self, config_dir: &Path) -> PathBuf {
        config_dir.join(&self.credentials_file)
    }

    /// Resolve the history database against the config directory, if one
    /// is configured.
    pub fn history_path(&self, config_dir: &Path) -> Option<PathBuf> {
        self.history_file
            .as_deref()
            .map(|file| config_dir.join(file))
    }

    /// Convert the hashing settings into crypto-layer params.
    pub fn hasher_params(&self) -> Pbkdf2Params {
        Pbkdf2Params {
            rounds: self.pbkdf2_rounds,
            salt_len: self.salt_size,
        }
    }

    /// Build the password policy from the configured bounds.
    pub fn password_policy(&self) -> PasswordPolicy {
        PasswordPolicy {
            min_len: self.password_min_len,
            max_len: self.password_max_len,
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn default_settings_are_sensible() {
        let s = Settings::default();
        assert_eq!(s.credentials_file, "mqtt_user_credentials.txt");
        assert_eq!(s.pbkdf2_rounds, 100_000);
        assert_eq!(s.salt_size, 16);
        assert_eq!(s.password_min_len, 8);
        assert_eq!(s.password_max_len, 16);
        assert!(s.history_file.is_none());
    }

    #[test]
    fn load_returns_defaults_when_no_config_file() {
        let tmp = TempDir::new().unwrap();
        let settings = Settings::load(tmp.path()).unwrap();
        assert_eq!(settings.credentials_file, "mqtt_user_credentials.txt");
    }

    #[test]
    fn load_parses_toml_file() {
        let tmp = TempDir::new().unwrap();
        let config = r#"
credentials_file = "broker/passwd"
pbkdf2_rounds = 200000
salt_size = 32
password_min_len = 10
password_max_len = 64
history_file = "changes.db"
"#;
        fs::write(tmp.path().join(".mqttcred.toml"), config).unwrap();

        let settings = Settings::load(tmp.path()).unwrap();
        assert_eq!(settings.credentials_file, "broker/passwd");
        assert_eq!(settings.pbkdf2_rounds, 200_000);
        assert_eq!(settings.salt_size, 32);
        assert_eq!(settings.password_min_len, 10);
        assert_eq!(settings.password_max_len, 64);
        assert_eq!(
            settings.history_path(tmp.path()),
            Some(tmp.path().join("changes.db"))
        );
    }

    #[test]
    fn load_uses_defaults_for_missing_fields() {
        let tmp = TempDir::new().unwrap();
        let config = "credentials_file = \"users.txt\"\n";
        fs::write(tmp.path().join(".mqttcred.toml"), config).unwrap();

        let settings = Settings::load(tmp.path()).unwrap();
        assert_eq!(settings.credentials_file, "users.txt");
        // Rest should be defaults
        assert_eq!(settings.pbkdf2_rounds, 100_000);
        assert_eq!(settings.password_max_len, 16);
    }

    #[test]
    fn load_errors_on_invalid_toml() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(".mqttcred.toml"), "not valid {{toml").unwrap();

        let result = Settings::load(tmp.path());
        assert!(result.is_err());
    }

    #[test]
    fn load_rejects_weak_hashing_params() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(".mqttcred.toml"), "pbkdf2_rounds = 1000\n").unwrap();
        assert!(Settings::load(tmp.path()).is_err());

        fs::write(tmp.path().join(".mqttcred.toml"), "salt_size = 8\n").unwrap();
        assert!(Settings::load(tmp.path()).is_err());
    }

    #[test]
    fn load_rejects_inverted_length_bounds() {
        let tmp = TempDir::new().unwrap();
        let config = "password_min_len = 20\npassword_max_len = 10\n";
        fs::write(tmp.path().join(".mqttcred.toml"), config).unwrap();
        assert!(Settings::load(tmp.path()).is_err());
    }

    #[test]
    fn credentials_path_builds_correct_path() {
        let s = Settings::default();
        let dir = Path::new("/etc/mosquitto");
        assert_eq!(
            s.credentials_path(dir),
            PathBuf::from("/etc/mosquitto/mqtt_user_credentials.txt")
        );
    }

    #[test]
    fn credentials_path_keeps_absolute_file() {
        let s = Settings {
            credentials_file: "/var/lib/broker/passwd".to_string(),
            ..Settings::default()
        };
        assert_eq!(
            s.credentials_path(Path::new("/home/op")),
            PathBuf::from("/var/lib/broker/passwd")
        );
    }

    #[test]
    fn history_is_off_by_default() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(".mqttcred.toml"), "credentials_file = \"x.txt\"\n").unwrap();

        let settings = Settings::load(tmp.path()).unwrap();
        assert_eq!(settings.history_path(tmp.path()), None);
    }

    #[test]
    fn policy_and_params_follow_settings() {
        let s = Settings {
            pbkdf2_rounds: 150_000,
            password_min_len: 12,
            ..Settings::default()
        };
        assert_eq!(s.hasher_params().rounds, 150_000);
        assert_eq!(s.password_policy().min_len, 12);
        assert_eq!(s.password_policy().max_len, 16);
    }
}
