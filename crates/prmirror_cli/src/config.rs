//! Configuration file support for prmirror.
//!
//! Configuration is loaded with the following precedence (highest to lowest):
//! 1. CLI flags
//! 2. Environment variables (prefixed with `PRMIRROR_`, e.g.
//!    `PRMIRROR_DATABASE_URL`)
//! 3. Config file (~/.config/prmirror/config.toml or ./prmirror.toml)
//! 4. Built-in defaults
//!
//! The database URL defaults to `sqlite://~/.local/state/prmirror/prmirror.db`
//! on Linux (using the XDG state directory) if not explicitly configured.
//!
//! Example config file:
//! ```toml
//! [database]
//! url = "sqlite://~/.local/state/prmirror/prmirror.db"  # optional, the default
//!
//! [github]
//! token = "ghp_..."  # or use PRMIRROR_GITHUB_TOKEN env var
//!
//! [sync]
//! batch_size = 10
//! newest_first = false
//! ```

use std::path::PathBuf;

use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use directories::ProjectDirs;
use serde::Deserialize;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Database configuration.
    pub database: DatabaseConfig,
    /// GitHub configuration.
    pub github: GitHubConfig,
    /// Default scan options.
    pub sync: SyncConfig,
}

/// Database configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Database connection URL. Supports sqlite:// and postgres:// schemes.
    /// Defaults to `sqlite://~/.local/state/prmirror/prmirror.db` if not set.
    pub url: Option<String>,
}

/// GitHub configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct GitHubConfig {
    /// GitHub personal access token.
    /// Can also be set via the PRMIRROR_GITHUB_TOKEN environment variable.
    pub token: Option<String>,
}

/// Default scan options.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Pull requests per checkpoint batch.
    pub batch_size: usize,
    /// Scan in descending update order by default.
    pub newest_first: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            batch_size: prmirror::sync::DEFAULT_BATCH_SIZE,
            newest_first: false,
        }
    }
}

impl Config {
    /// Load configuration using the config crate's layered approach.
    ///
    /// Sources are loaded in order (later sources override earlier):
    /// 1. Built-in defaults
    /// 2. XDG config file (~/.config/prmirror/config.toml)
    /// 3. Local config file (./prmirror.toml)
    /// 4. Environment variables with PRMIRROR_ prefix
    pub fn load() -> Self {
        let mut builder = ConfigBuilder::builder();

        if let Some(proj_dirs) = ProjectDirs::from("", "", "prmirror") {
            let xdg_config = proj_dirs.config_dir().join("config.toml");
            if xdg_config.exists() {
                tracing::debug!("Loading config from {:?}", xdg_config);
                builder = builder.add_source(
                    File::from(xdg_config)
                        .format(FileFormat::Toml)
                        .required(false),
                );
            }
        }

        let local_config = PathBuf::from("prmirror.toml");
        if local_config.exists() {
            tracing::debug!("Loading config from ./prmirror.toml");
            builder = builder.add_source(
                File::from(local_config)
                    .format(FileFormat::Toml)
                    .required(false),
            );
        }

        builder = builder.add_source(
            Environment::with_prefix("PRMIRROR")
                .separator("_")
                .try_parsing(true),
        );

        match builder.build() {
            Ok(settings) => match settings.try_deserialize::<Config>() {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!("Failed to deserialize config: {}", e);
                    Config::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to build config: {}", e);
                Config::default()
            }
        }
    }

    /// Get the database URL, falling back to the default state directory
    /// path. The `mode=rwc` parameter creates the file if it doesn't exist.
    pub fn database_url(&self) -> Option<String> {
        self.database.url.clone().or_else(|| {
            Self::default_state_dir().map(|state_dir| {
                let db_path = state_dir.join("prmirror.db");
                format!("sqlite://{}?mode=rwc", db_path.display())
            })
        })
    }

    /// Get the GitHub token.
    pub fn github_token(&self) -> Option<String> {
        self.github.token.clone()
    }

    /// Get the default state directory path.
    ///
    /// On Linux, `$XDG_STATE_HOME/prmirror` or `~/.local/state/prmirror`.
    /// On macOS/Windows, falls back to the data directory.
    pub fn default_state_dir() -> Option<PathBuf> {
        ProjectDirs::from("", "", "prmirror").map(|dirs| {
            dirs.state_dir()
                .map(|p| p.to_path_buf())
                .unwrap_or_else(|| dirs.data_dir().to_path_buf())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert!(config.database.url.is_none());
        assert!(config.github.token.is_none());
        assert_eq!(config.sync.batch_size, prmirror::sync::DEFAULT_BATCH_SIZE);
        assert!(!config.sync.newest_first);
    }

    #[test]
    fn toml_values_override_defaults() {
        let toml_content = r#"
            [database]
            url = "sqlite:///tmp/test.db"

            [github]
            token = "ghp_test123"

            [sync]
            batch_size = 25
            newest_first = true
        "#;

        let settings = ConfigBuilder::builder()
            .add_source(config::File::from_str(toml_content, FileFormat::Toml))
            .build()
            .expect("config should build");
        let config: Config = settings.try_deserialize().expect("config should parse");

        assert_eq!(
            config.database.url,
            Some("sqlite:///tmp/test.db".to_string())
        );
        assert_eq!(config.github.token, Some("ghp_test123".to_string()));
        assert_eq!(config.sync.batch_size, 25);
        assert!(config.sync.newest_first);
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let toml_content = r#"
            [sync]
            batch_size = 3
        "#;

        let settings = ConfigBuilder::builder()
            .add_source(config::File::from_str(toml_content, FileFormat::Toml))
            .build()
            .expect("config should build");
        let config: Config = settings.try_deserialize().expect("config should parse");

        assert_eq!(config.sync.batch_size, 3);
        assert!(!config.sync.newest_first);
        assert!(config.database.url.is_none());
    }

    #[test]
    fn database_url_defaults_to_state_dir() {
        let config = Config::default();
        let url = config.database_url().expect("default url");
        assert!(url.starts_with("sqlite://"));
        assert!(url.contains("prmirror.db"));
        assert!(url.ends_with("?mode=rwc"));
    }

    #[test]
    fn database_url_respects_configured_value() {
        let toml_content = r#"
            [database]
            url = "postgres://localhost/prmirror"
        "#;

        let settings = ConfigBuilder::builder()
            .add_source(config::File::from_str(toml_content, FileFormat::Toml))
            .build()
            .expect("config should build");
        let config: Config = settings.try_deserialize().expect("config should parse");

        assert_eq!(
            config.database_url(),
            Some("postgres://localhost/prmirror".to_string())
        );
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let toml_content = r#"
            [sync]
            batch_size = 10
            unknown_field = "ignored"
        "#;

        let settings = ConfigBuilder::builder()
            .add_source(config::File::from_str(toml_content, FileFormat::Toml))
            .build()
            .expect("config should build");
        let config: Config = settings.try_deserialize().expect("config should parse");
        assert_eq!(config.sync.batch_size, 10);
    }
}
