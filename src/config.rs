use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Top-level configuration, read from `config.toml` and overridden by CLI flags / env.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub ai: AiConfig,
    pub network: NetworkConfig,
}

/// Remote campaign table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Project URL, e.g. `https://xyz.supabase.co`.
    pub url: String,
    /// Anon/service key sent as `apikey` and bearer token.
    pub api_key: String,
    pub table: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    /// Without a key, AI-assisted authoring is unavailable.
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Unset means requests may wait indefinitely.
    #[serde(with = "humantime_serde")]
    pub request_timeout: Option<Duration>,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            api_key: String::new(),
            table: "campaigns".to_string(),
        }
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "gemini-2.5-flash".to_string(),
            base_url: "https://generativelanguage.googleapis.com".to_string(),
        }
    }
}

impl AppConfig {
    /// Load from `path`, or from the default location when `path` is `None`.
    /// A missing default file yields defaults; an explicit path must exist.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, explicit) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (Self::default_path(), false),
        };
        let contents = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if !explicit && e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(e).with_context(|| format!("read config {}", path.display()));
            }
        };
        let cfg: AppConfig = toml::from_str(&contents)
            .with_context(|| format!("parse config {}", path.display()))?;
        tracing::info!(path = %path.display(), "loaded config");
        Ok(cfg)
    }

    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .map(|d| d.join("tribe-points").join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }

    /// Fail early when the database cannot be addressed.
    pub fn validate(&self) -> Result<()> {
        if self.database.url.trim().is_empty() {
            bail!(
                "database URL is not configured (use --supabase-url, SUPABASE_URL or [database].url in {})",
                Self::default_path().display()
            );
        }
        if self.database.api_key.trim().is_empty() {
            bail!("database API key is not configured (use --supabase-key or SUPABASE_ANON_KEY)");
        }
        if self.database.table.trim().is_empty() {
            bail!("database table name must not be empty");
        }
        Ok(())
    }

    /// AI key, if one is configured and non-blank.
    pub fn ai_key(&self) -> Option<&str> {
        self.ai
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.database.table, "campaigns");
        assert_eq!(cfg.ai.model, "gemini-2.5-flash");
        assert!(cfg.network.request_timeout.is_none());
        assert!(cfg.ai_key().is_none());
    }

    #[test]
    fn parses_partial_file() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            f,
            r#"
[database]
url = "https://example.supabase.co"
api_key = "anon"

[network]
request_timeout = "15s"
"#
        )
        .unwrap();
        let cfg = AppConfig::load(Some(f.path())).unwrap();
        assert_eq!(cfg.database.url, "https://example.supabase.co");
        assert_eq!(cfg.database.table, "campaigns");
        assert_eq!(cfg.network.request_timeout, Some(Duration::from_secs(15)));
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(AppConfig::load(Some(&dir.path().join("nope.toml"))).is_err());
    }

    #[test]
    fn garbage_file_is_an_error() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "database = 3").unwrap();
        assert!(AppConfig::load(Some(f.path())).is_err());
    }

    #[test]
    fn validate_requires_url_and_key() {
        let mut cfg = AppConfig::default();
        assert!(cfg.validate().is_err());
        cfg.database.url = "https://x".into();
        assert!(cfg.validate().is_err());
        cfg.database.api_key = "k".into();
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn blank_ai_key_counts_as_missing() {
        let mut cfg = AppConfig::default();
        cfg.ai.api_key = Some("   ".into());
        assert!(cfg.ai_key().is_none());
    }
}
