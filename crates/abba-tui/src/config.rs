// Configuration loading and parsing (explorer.toml).

use std::path::{Path, PathBuf};

use abba_core::AnalysisParams;
use serde::Deserialize;
use thiserror::Error;

use crate::ranks::parse_ranks;

/// File name of the explorer settings under `config/` and `defaults/`.
pub const CONFIG_FILE: &str = "explorer.toml";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Config structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for explorer.toml.
#[derive(Debug, Clone, Deserialize)]
struct ExplorerFile {
    analysis: AnalysisSection,
    #[serde(default)]
    bounds: PickBounds,
}

/// Assembled explorer configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub analysis: AnalysisSection,
    pub bounds: PickBounds,
}

/// Initial analysis state.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisSection {
    pub max_picks: usize,
    pub prefix_len: usize,
    /// Free-form rank list, parsed with [`parse_ranks`].
    #[serde(default)]
    pub included: String,
    #[serde(default)]
    pub excluded: String,
}

/// Range of the "territories considered" slider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PickBounds {
    pub min_picks: usize,
    pub max_picks: usize,
}

impl Default for PickBounds {
    fn default() -> Self {
        PickBounds {
            min_picks: 3,
            max_picks: 12,
        }
    }
}

impl PickBounds {
    pub fn clamp(&self, picks: usize) -> usize {
        picks.clamp(self.min_picks, self.max_picks)
    }

    pub fn contains(&self, picks: usize) -> bool {
        (self.min_picks..=self.max_picks).contains(&picks)
    }
}

impl Config {
    /// Analysis parameters the explorer starts with.
    pub fn initial_params(&self) -> AnalysisParams {
        AnalysisParams::new(self.analysis.max_picks, self.analysis.prefix_len)
            .with_included(parse_ranks(&self.analysis.included))
            .with_excluded(parse_ranks(&self.analysis.excluded))
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            analysis: AnalysisSection {
                max_picks: 8,
                prefix_len: 4,
                included: String::new(),
                excluded: String::new(),
            },
            bounds: PickBounds::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate `config/explorer.toml` relative to `base_dir`.
///
/// Does not copy defaults; prefer `load_config()` which does.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join(CONFIG_FILE);
    let text = read_file(&path)?;
    let file: ExplorerFile = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        source: e,
    })?;

    let config = Config {
        analysis: file.analysis,
        bounds: file.bounds,
    };

    validate(&config)?;

    Ok(config)
}

/// Ensure all config files exist by copying missing ones from `defaults/`.
/// Returns the list of files that were copied. Skips `.example` files.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");

    if !defaults_dir.exists() {
        if !config_dir.exists() {
            return Err(ConfigError::DefaultsCopyError {
                message: format!(
                    "neither defaults/ nor config/ directory found in {}; \
                     run from the crate root or ensure defaults/ is present",
                    base_dir.display()
                ),
            });
        }
        return Ok(vec![]);
    }

    std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to create config directory: {e}"),
    })?;

    let entries = std::fs::read_dir(&defaults_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to read defaults directory: {e}"),
    })?;

    let mut copied = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to read defaults entry: {e}"),
        })?;
        let path = entry.path();

        if !path.is_file() {
            continue;
        }
        let Some(file_name) = path.file_name() else {
            continue;
        };
        if file_name.to_str().is_some_and(|n| n.ends_with(".example")) {
            continue;
        }
        let target = config_dir.join(file_name);

        match std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&target)
        {
            Ok(mut dest) => {
                let content = std::fs::read(&path).map_err(|e| ConfigError::DefaultsCopyError {
                    message: format!("failed to read {}: {e}", path.display()),
                })?;
                std::io::Write::write_all(&mut dest, &content).map_err(|e| {
                    ConfigError::DefaultsCopyError {
                        message: format!("failed to write {}: {e}", target.display()),
                    }
                })?;
                copied.push(target);
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {}
            Err(e) => {
                return Err(ConfigError::DefaultsCopyError {
                    message: format!("failed to create {}: {e}", target.display()),
                });
            }
        }
    }

    Ok(copied)
}

/// Convenience wrapper: loads config relative to the current working directory.
/// Ensures default config files are copied before loading.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_files(&cwd)?;
    load_config_from(&cwd)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

fn validation(field: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError {
        field: field.to_string(),
        message: message.into(),
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    let bounds = &config.bounds;
    if bounds.min_picks == 0 {
        return Err(validation("bounds.min_picks", "must be greater than 0"));
    }
    if bounds.min_picks > bounds.max_picks {
        return Err(validation(
            "bounds.max_picks",
            format!(
                "must be >= bounds.min_picks ({}), got {}",
                bounds.min_picks, bounds.max_picks
            ),
        ));
    }

    let analysis = &config.analysis;
    if !bounds.contains(analysis.max_picks) {
        return Err(validation(
            "analysis.max_picks",
            format!(
                "must be between {} and {} inclusive, got {}",
                bounds.min_picks, bounds.max_picks, analysis.max_picks
            ),
        ));
    }
    if analysis.prefix_len == 0 || analysis.prefix_len > analysis.max_picks {
        return Err(validation(
            "analysis.prefix_len",
            format!(
                "must be between 1 and analysis.max_picks ({}), got {}",
                analysis.max_picks, analysis.prefix_len
            ),
        ));
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
