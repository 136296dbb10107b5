use config::{Config as ConfigBuilder, ConfigError, File};
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

/// Configuration for a search run.
///
/// # Configuration Locations
///
/// The configuration can be loaded from multiple locations in order of
/// precedence:
/// 1. Custom config file specified via `--config` flag
/// 2. Local `.linescout.yaml` in the current directory
/// 3. Global `$HOME/.config/linescout/config.yaml`
///
/// # Configuration Format
///
/// The configuration uses YAML format. Example:
/// ```yaml
/// # Files to search
/// files:
///   - "server.log"
///
/// # Literal substring to look for
/// query: "timeout"
///
/// # Regular expression to look for
/// pattern: "^ERROR"
///
/// # Write matched lines here instead of the console
/// output: "matches.txt"
///
/// # Thread count (default: CPU cores). The CLI always supplies a
/// # thread count, so this value only takes effect for library callers
/// thread_count: 4
///
/// # Log level (trace, debug, info, warn, error)
/// log_level: "info"
/// ```
///
/// Command-line arguments take precedence over config file values; the
/// merging behavior is defined in [`SearchConfig::merge_with_cli`].
///
/// Leaving both `query` and `pattern` unset is not an error: every line
/// is scanned and nothing matches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Files to search
    #[serde(default)]
    pub files: Vec<PathBuf>,

    /// Literal substring a line must contain to match
    #[serde(default)]
    pub query: Option<String>,

    /// Regular expression a line must match
    #[serde(default)]
    pub pattern: Option<String>,

    /// When set, matched lines are collected into this file instead of
    /// being highlighted on the console
    #[serde(default)]
    pub output: Option<PathBuf>,

    /// Number of worker threads, which is also the number of chunks a
    /// file is split into. Defaults to the number of CPU cores
    #[serde(default = "default_thread_count")]
    pub thread_count: NonZeroUsize,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_thread_count() -> NonZeroUsize {
    NonZeroUsize::new(num_cpus::get()).unwrap_or(NonZeroUsize::MIN)
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            files: Vec::new(),
            query: None,
            pattern: None,
            output: None,
            thread_count: default_thread_count(),
            log_level: default_log_level(),
        }
    }
}

impl SearchConfig {
    /// Loads configuration from the default locations
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Loads configuration from a specific file, falling back to the
    /// default locations
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder();

        let config_files = [
            // Global config
            dirs::config_dir().map(|p| p.join("linescout/config.yaml")),
            // Local config
            Some(PathBuf::from(".linescout.yaml")),
            // Custom config
            config_path.map(PathBuf::from),
        ];

        for path in config_files.iter().flatten() {
            if path.exists() {
                builder = builder.add_source(File::from(path.as_path()));
            }
        }

        builder.build()?.try_deserialize()
    }

    /// Merges CLI arguments with configuration file values. CLI values
    /// take precedence; the thread count is always taken from the CLI
    /// side, which fills in the CPU-core default when `-j` is not given.
    pub fn merge_with_cli(mut self, cli_config: SearchConfig) -> Self {
        if !cli_config.files.is_empty() {
            self.files = cli_config.files;
        }
        if cli_config.query.is_some() {
            self.query = cli_config.query;
        }
        if cli_config.pattern.is_some() {
            self.pattern = cli_config.pattern;
        }
        if cli_config.output.is_some() {
            self.output = cli_config.output;
        }
        // Always use the CLI thread count
        self.thread_count = cli_config.thread_count;
        if cli_config.log_level != default_log_level() {
            self.log_level = cli_config.log_level;
        }
        self
    }
}
