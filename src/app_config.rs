use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Resource locations (lexicon, model, lemmatizer exceptions)
    #[serde(default)]
    pub resources: ResourceConfig,

    /// Subtitle parsing settings
    #[serde(default)]
    pub subtitles: SubtitleConfig,

    /// Folder processing settings
    #[serde(default)]
    pub batch: BatchConfig,

    /// Report output format
    #[serde(default)]
    pub output_format: OutputFormat,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Paths of the process-lifetime resources
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ResourceConfig {
    // @field: JSON lexicon mapping A1..C1 to word lists
    #[serde(default = "default_lexicon_path")]
    pub lexicon_path: String,

    // @field: JSON export of the trained classifier
    #[serde(default = "default_model_path")]
    pub model_path: String,

    // @field: Optional lemmatizer exceptions file
    #[serde(default)]
    pub exceptions_path: Option<String>,
}

impl Default for ResourceConfig {
    fn default() -> Self {
        Self {
            lexicon_path: default_lexicon_path(),
            model_path: default_model_path(),
            exceptions_path: None,
        }
    }
}

/// How malformed SRT blocks are treated
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ParseMode {
    /// Any malformed block fails the file
    #[default]
    Strict,
    /// Malformed blocks are skipped with a warning
    Lenient,
}

/// Configuration for subtitle processing
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SubtitleConfig {
    /// Number of leading cues dropped as non-dialogue (ads, credits)
    #[serde(default = "default_skip_leading_cues")]
    pub skip_leading_cues: usize,

    /// Strict or lenient SRT parsing
    #[serde(default)]
    pub parse_mode: ParseMode,
}

impl Default for SubtitleConfig {
    fn default() -> Self {
        Self {
            skip_leading_cues: default_skip_leading_cues(),
            parse_mode: ParseMode::default(),
        }
    }
}

/// Settings for analysing a whole directory
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct BatchConfig {
    /// Maximum number of files analysed at the same time
    #[serde(default = "default_concurrent_files")]
    pub concurrent_files: usize,

    /// File extension of subtitle files to pick up
    #[serde(default = "default_subtitle_extension")]
    pub extension: String,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            concurrent_files: default_concurrent_files(),
            extension: default_subtitle_extension(),
        }
    }
}

/// Report rendering format
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Matching filter for the `log` facade
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_lexicon_path() -> String {
    "resources/lexicon.json".to_string()
}

fn default_model_path() -> String {
    "resources/model_naive_bayes.json".to_string()
}

fn default_skip_leading_cues() -> usize {
    1 // Most distributed subtitle files open with an advertisement cue
}

fn default_concurrent_files() -> usize {
    4
}

fn default_subtitle_extension() -> String {
    "srt".to_string()
}

impl Config {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open config file: {}", path.display()))?;

        let reader = BufReader::new(file);
        serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Write configuration as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;

        std::fs::write(path, json)
            .with_context(|| format!("Failed to write config to file: {}", path.display()))
    }

    /// Load the config file, or create it with defaults when it does not exist
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            return Self::from_file(path);
        }

        log::warn!("Config file not found at '{}', creating default config.", path.display());
        let config = Config::default();
        config.save(path)?;
        Ok(config)
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.resources.lexicon_path.trim().is_empty() {
            return Err(anyhow!("Lexicon path must not be empty"));
        }

        if self.resources.model_path.trim().is_empty() {
            return Err(anyhow!("Model path must not be empty"));
        }

        if let Some(exceptions) = &self.resources.exceptions_path {
            if exceptions.trim().is_empty() {
                return Err(anyhow!("Exceptions path must not be empty when set"));
            }
        }

        if self.batch.concurrent_files == 0 {
            return Err(anyhow!("batch.concurrent_files must be at least 1"));
        }

        if self.batch.extension.trim_start_matches('.').is_empty() {
            return Err(anyhow!("batch.extension must not be empty"));
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            resources: ResourceConfig::default(),
            subtitles: SubtitleConfig::default(),
            batch: BatchConfig::default(),
            output_format: OutputFormat::default(),
            log_level: LogLevel::default(),
        }
    }
}
