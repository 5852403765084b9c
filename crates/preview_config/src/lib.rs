use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config file {}: {source}", .path.display())]
    Toml {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Default location of the config file.
///
/// Linux: ~/.config/mdpreview/config.toml
/// macOS: ~/Library/Application\ Support/org.mdpreview.mdpreview/config.toml
/// Windows: ~\AppData\Roaming\mdpreview\mdpreview\config\config.toml
pub fn default_config_file() -> Option<PathBuf> {
    ProjectDirs::from("org", "mdpreview", "mdpreview")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

#[derive(Debug)]
pub struct LoadedConfig {
    pub config: Config,
    pub file_path: Option<PathBuf>,
    /// Error in the config file at the default location, the default config is used instead.
    pub maybe_error: Option<ConfigError>,
}

/// Loads the config from `specified_config_file` or the default location.
///
/// An explicitly specified file must exist and be valid. The file at the default
/// location is optional and a broken one falls back to the default config.
pub fn load_config(specified_config_file: Option<PathBuf>) -> Result<LoadedConfig, ConfigError> {
    if let Some(config_file) = specified_config_file {
        let config = read_config_file(&config_file)?;
        return Ok(LoadedConfig {
            config,
            file_path: Some(config_file),
            maybe_error: None,
        });
    }

    let Some(config_file) = default_config_file() else {
        return Ok(LoadedConfig {
            config: Config::default(),
            file_path: None,
            maybe_error: None,
        });
    };

    if !config_file.exists() {
        return Ok(LoadedConfig {
            config: Config::default(),
            file_path: Some(config_file),
            maybe_error: None,
        });
    }

    let (config, maybe_error) = match read_config_file(&config_file) {
        Ok(config) => (config, None),
        Err(err) => {
            tracing::warn!(?err, "Falling back to the default config");
            (Config::default(), Some(err))
        }
    };

    Ok(LoadedConfig {
        config,
        file_path: Some(config_file),
        maybe_error,
    })
}

fn read_config_file(path: &Path) -> Result<Config, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&contents).map_err(|source| ConfigError::Toml {
        path: path.to_path_buf(),
        source,
    })
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct LogConfig {
    /// Specify the log file path.
    ///
    /// This path must be an absolute path.
    pub log_file: Option<String>,

    /// Specify the max log level.
    pub max_level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            log_file: None,
            max_level: "debug".into(),
        }
    }
}

/// Options of the preview service itself.
#[derive(Serialize, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct PreviewOptions {
    /// Directory containing `markdown.css` and `highlight.css`.
    ///
    /// Defaults to `media` next to the directory of the executable.
    pub media_dir: Option<PathBuf>,

    /// Syntect theme used when writing `highlight.css`.
    pub highlight_theme: String,
}

impl Default for PreviewOptions {
    fn default() -> Self {
        Self {
            media_dir: None,
            highlight_theme: "InspiredGitHub".into(),
        }
    }
}

/// The `markdown` configuration section.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct MarkdownConfig {
    /// Extra stylesheets, either URLs or paths relative to the previewed file.
    pub styles: Vec<String>,
}

impl MarkdownConfig {
    /// Builds the config from the section reported by the editor.
    ///
    /// The editor section carries settings of other markdown tooling as well, only
    /// `styles` is looked at. A malformed `styles` is treated as empty.
    pub fn from_host_value(value: Value) -> Self {
        #[derive(Deserialize)]
        struct HostSection {
            #[serde(default)]
            styles: Option<Vec<String>>,
        }

        if value.is_null() {
            return Self::default();
        }

        match serde_json::from_value::<HostSection>(value) {
            Ok(section) => Self {
                styles: section.styles.unwrap_or_default(),
            },
            Err(err) => {
                tracing::warn!(?err, "Ignoring malformed `markdown` configuration");
                Self::default()
            }
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Default, PartialEq)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct Config {
    /// Log configuration.
    pub log: LogConfig,

    /// Preview service configuration.
    pub preview: PreviewOptions,

    /// Markdown configuration used when no editor supplies one.
    pub markdown: MarkdownConfig,
}
