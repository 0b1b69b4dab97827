//! Configuration types for pantry.
//!
//! [`Config::load`] layers an optional TOML file on top of the embedded
//! defaults. [`Config::defaults`] returns the same defaults without touching
//! the filesystem (useful in tests).

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::types::DEFAULT_NA_VALUES;

// ---------------------------------------------------------------------------
// Embedded defaults
// ---------------------------------------------------------------------------

const DEFAULT_CONFIG: &str = r#"
[data]
path       = "data/foods.csv"
delimiter  = ","
chunk_rows = 5000

[cache]
staleness_secs = 1800

[query]
default_per_page     = 20
skip_numeric_columns = true

[server]
host = "0.0.0.0"
port = 5000
"#;

/// Looked up in the working directory when no `--config` is given.
pub const LOCAL_CONFIG_FILE: &str = "pantry.toml";

// ---------------------------------------------------------------------------
// Public config types
// ---------------------------------------------------------------------------

/// Top-level application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub query: QueryConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// `[data]` section: where the table lives and how to read it.
#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_path")]
    pub path: PathBuf,
    /// Single ASCII character separating fields.
    #[serde(default = "default_delimiter")]
    pub delimiter: String,
    /// Rows read per increment before the increments are concatenated.
    #[serde(default = "default_chunk_rows")]
    pub chunk_rows: usize,
    /// Cell texts normalised to the empty string.
    #[serde(default = "default_na_values")]
    pub na_values: Vec<String>,
}

fn default_data_path() -> PathBuf { PathBuf::from("data/foods.csv") }
fn default_delimiter() -> String { ",".to_string() }
fn default_chunk_rows() -> usize { 5000 }
fn default_na_values() -> Vec<String> {
    DEFAULT_NA_VALUES.iter().map(|s| s.to_string()).collect()
}

impl DataConfig {
    /// The delimiter as a byte. Falls back to `,` for anything that is not a
    /// single ASCII character; [`Config::load`] rejects those up front.
    pub fn delimiter_byte(&self) -> u8 {
        match self.delimiter.as_bytes() {
            [b] if b.is_ascii() => *b,
            _ => b',',
        }
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: default_data_path(),
            delimiter: default_delimiter(),
            chunk_rows: default_chunk_rows(),
            na_values: default_na_values(),
        }
    }
}

/// `[cache]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// Maximum snapshot age before a read triggers a reload.
    #[serde(default = "default_staleness_secs")]
    pub staleness_secs: u64,
}

fn default_staleness_secs() -> u64 { 30 * 60 }

impl CacheConfig {
    pub fn staleness(&self) -> Duration {
        Duration::from_secs(self.staleness_secs)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { staleness_secs: default_staleness_secs() }
    }
}

/// `[query]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct QueryConfig {
    #[serde(default = "default_per_page")]
    pub default_per_page: usize,
    /// Leave numeric columns out of free-text matching.
    #[serde(default = "default_skip_numeric_columns")]
    pub skip_numeric_columns: bool,
}

fn default_per_page() -> usize { 20 }
fn default_skip_numeric_columns() -> bool { true }

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            default_per_page: default_per_page(),
            skip_numeric_columns: default_skip_numeric_columns(),
        }
    }
}

/// `[server]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 5000 }

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: default_host(), port: default_port() }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::defaults()
    }
}

impl Config {
    /// Load `path` (or `./pantry.toml` when `None`), layered on top of the
    /// built-in defaults. A missing explicit file is an error; a missing
    /// local file is not.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let builder = config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml));

        let builder = match path {
            Some(path) => builder.add_source(config::File::from(path).required(true)),
            None => builder.add_source(config::File::from(Path::new(LOCAL_CONFIG_FILE)).required(false)),
        };

        let cfg: Self = builder.build()?.try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Return the built-in defaults without touching the filesystem.
    pub fn defaults() -> Self {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .build()
            .expect("built-in default config must be valid TOML")
            .try_deserialize()
            .expect("built-in default config must deserialize correctly")
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            matches!(self.data.delimiter.as_bytes(), [b] if b.is_ascii()),
            "data.delimiter must be a single ASCII character, got {:?}",
            self.data.delimiter
        );
        anyhow::ensure!(self.data.chunk_rows > 0, "data.chunk_rows must be positive");
        anyhow::ensure!(self.query.default_per_page > 0, "query.default_per_page must be positive");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
