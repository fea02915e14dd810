//! Layered configuration and message catalog for the x2j toolchain.
//!
//! `defaults/x2j.default.toml` is embedded into every binary so that the
//! documented defaults and runtime behavior stay in sync. User files are layered
//! on top through [`Loader`] before deserializing into [`X2jConfig`].
//!
//! The `[messages]` table is the error catalog: one entry per error code. A
//! [`Catalog`] built from it is what the CLI uses to print failures.

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use x2j::{ErrorKind, X2jError};

const DEFAULT_TOML: &str = include_str!("../defaults/x2j.default.toml");

/// Per-user configuration file, looked up in the home directory.
pub const USER_CONFIG_FILE: &str = ".x2j.toml";

/// Per-project configuration file, looked up in the working directory.
pub const PROJECT_CONFIG_FILE: &str = "x2j.toml";

/// Top-level configuration consumed by x2j applications.
#[derive(Debug, Clone, Deserialize)]
pub struct X2jConfig {
    pub messages: BTreeMap<String, String>,
    pub output: OutputConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    pub indent: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<X2jConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<X2jConfig, ConfigError> {
    Loader::new().build()
}

/// Files layered over the defaults, in increasing precedence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigSources {
    /// Skipped when absent.
    pub optional: Vec<PathBuf>,
    /// Must exist; layered last.
    pub explicit: Option<PathBuf>,
}

impl ConfigSources {
    /// `~/.x2j.toml`, then `./x2j.toml`, then the explicit file if any.
    pub fn discover(explicit: Option<PathBuf>) -> Self {
        let mut optional = Vec::new();
        if let Some(home) = dirs::home_dir() {
            optional.push(home.join(USER_CONFIG_FILE));
        }
        optional.push(PathBuf::from(PROJECT_CONFIG_FILE));
        Self { optional, explicit }
    }

    /// A loader with every source layered in order.
    pub fn loader(&self) -> Loader {
        let mut loader = Loader::new();
        for path in &self.optional {
            loader = loader.with_optional_file(path);
        }
        if let Some(path) = &self.explicit {
            loader = loader.with_file(path);
        }
        loader
    }
}

/// Build the layered configuration, reporting failures as fatal.
pub fn load_config(sources: &ConfigSources) -> Result<X2jConfig, X2jError> {
    sources.loader().build().map_err(fatal)
}

/// Build the message catalog from the layered configuration.
pub fn load_catalog(sources: &ConfigSources) -> Result<Catalog, X2jError> {
    load_config(sources).map(|config| Catalog::from_config(&config))
}

/// Map a configuration failure onto the fatal configuration error.
pub fn fatal(error: ConfigError) -> X2jError {
    X2jError::new(ErrorKind::FatalConfiguration, error.to_string())
}

/// Error text by kind, with the compiled-in text as fallback.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    messages: BTreeMap<String, String>,
}

impl Catalog {
    pub fn from_config(config: &X2jConfig) -> Self {
        Self::from_messages(config.messages.clone())
    }

    /// Codes are matched case-insensitively.
    pub fn from_messages(messages: BTreeMap<String, String>) -> Self {
        let messages = messages
            .into_iter()
            .map(|(code, text)| (code.to_ascii_uppercase(), text))
            .collect();
        Self { messages }
    }

    pub fn message(&self, kind: ErrorKind) -> &str {
        self.messages
            .get(kind.code())
            .map(String::as_str)
            .unwrap_or_else(|| kind.default_message())
    }

    /// `CODE: message (detail)`
    pub fn describe(&self, error: &X2jError) -> String {
        let kind = error.kind();
        if error.detail.is_empty() {
            format!("{}: {}", kind.code(), self.message(kind))
        } else {
            format!("{}: {} ({})", kind.code(), self.message(kind), error.detail)
        }
    }

    /// Every kind with its effective message, in code order.
    pub fn entries(&self) -> impl Iterator<Item = (ErrorKind, &str)> + '_ {
        ErrorKind::ALL
            .into_iter()
            .map(move |kind| (kind, self.message(kind)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn loads_default_config() {
        let config = load_defaults().expect("defaults to deserialize");
        assert_eq!(config.output.indent, 4);
        assert_eq!(config.logging.level, "warn");
        assert_eq!(config.messages.len(), ErrorKind::ALL.len());
    }

    #[test]
    fn default_messages_match_compiled_in_text() {
        let catalog = Catalog::from_config(&load_defaults().expect("defaults to deserialize"));
        for kind in ErrorKind::ALL {
            assert_eq!(catalog.message(kind), kind.default_message(), "{}", kind.code());
        }
    }

    #[test]
    fn supports_overrides() {
        let config = Loader::new()
            .set_override("output.indent", 2_i64)
            .expect("override to apply")
            .build()
            .expect("config to build");
        assert_eq!(config.output.indent, 2);
    }

    #[test]
    fn later_files_win() {
        let dir = tempfile::tempdir().unwrap();
        let user = dir.path().join("user.toml");
        let project = dir.path().join("project.toml");
        fs::write(&user, "[output]\nindent = 8\n[logging]\nlevel = \"info\"\n").unwrap();
        fs::write(&project, "[output]\nindent = 1\n").unwrap();

        let sources = ConfigSources {
            optional: vec![user, dir.path().join("absent.toml"), project],
            explicit: None,
        };
        let config = load_config(&sources).expect("config to build");
        assert_eq!(config.output.indent, 1);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn catalog_overrides_single_messages() {
        let dir = tempfile::tempdir().unwrap();
        let custom = dir.path().join("messages.toml");
        fs::write(&custom, "[messages]\nX2J_ERR_011 = \"Bad substring.\"\n").unwrap();

        let sources = ConfigSources {
            optional: Vec::new(),
            explicit: Some(custom),
        };
        let catalog = load_catalog(&sources).expect("catalog to load");
        assert_eq!(catalog.message(ErrorKind::StringOperation), "Bad substring.");
        assert_eq!(
            catalog.message(ErrorKind::MarkupParse),
            ErrorKind::MarkupParse.default_message()
        );

        let err = X2jError::new(ErrorKind::StringOperation, "start 5 is after end 1");
        assert_eq!(
            catalog.describe(&err),
            "X2J_ERR_011: Bad substring. (start 5 is after end 1)"
        );
    }

    #[test]
    fn missing_explicit_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let sources = ConfigSources {
            optional: Vec::new(),
            explicit: Some(dir.path().join("missing.toml")),
        };
        let err = load_catalog(&sources).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FatalConfiguration);
    }

    #[test]
    fn malformed_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let broken = dir.path().join("broken.toml");
        fs::write(&broken, "[output]\nindent = \"wide\"\n").unwrap();
        let sources = ConfigSources {
            optional: vec![broken],
            explicit: None,
        };
        assert_eq!(
            load_config(&sources).unwrap_err().kind(),
            ErrorKind::FatalConfiguration
        );
    }

    #[test]
    fn empty_catalog_falls_back_to_defaults() {
        let catalog = Catalog::default();
        let err = X2jError::new(ErrorKind::Persist, "");
        assert_eq!(catalog.describe(&err), "X2J_ERR_008: Error while writing JSON to file.");
        assert_eq!(catalog.entries().count(), 12);
    }

    #[test]
    fn discovery_ends_with_project_file() {
        let sources = ConfigSources::discover(Some(PathBuf::from("custom.toml")));
        assert_eq!(sources.optional.last(), Some(&PathBuf::from(PROJECT_CONFIG_FILE)));
        assert_eq!(sources.explicit, Some(PathBuf::from("custom.toml")));
    }
}
