/*!
 * Tests for application configuration functionality
 */

use anyhow::Result;
use subcefr::app_config::{Config, LogLevel, OutputFormat, ParseMode};
use crate::common;

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.resources.lexicon_path, "resources/lexicon.json");
    assert_eq!(config.resources.model_path, "resources/model_naive_bayes.json");
    assert!(config.resources.exceptions_path.is_none());
    assert_eq!(config.subtitles.skip_leading_cues, 1);
    assert_eq!(config.subtitles.parse_mode, ParseMode::Strict);
    assert_eq!(config.batch.concurrent_files, 4);
    assert_eq!(config.batch.extension, "srt");
    assert_eq!(config.output_format, OutputFormat::Text);
    assert_eq!(config.log_level, LogLevel::Info);
}

/// Test configuration validation
#[test]
fn test_config_validation_withVariousConfigs_shouldValidateCorrectly() {
    let mut config = Config::default();
    assert!(config.validate().is_ok());

    config.resources.lexicon_path = "  ".to_string();
    assert!(config.validate().is_err());
    config.resources.lexicon_path = "lexicon.json".to_string();

    config.resources.model_path = String::new();
    assert!(config.validate().is_err());
    config.resources.model_path = "model.json".to_string();

    config.resources.exceptions_path = Some(String::new());
    assert!(config.validate().is_err());
    config.resources.exceptions_path = None;

    config.batch.concurrent_files = 0;
    assert!(config.validate().is_err());
    config.batch.concurrent_files = 1;

    config.batch.extension = ".".to_string();
    assert!(config.validate().is_err());
    config.batch.extension = ".srt".to_string();

    assert!(config.validate().is_ok());
}

/// Test that a partial config file is completed with defaults
#[test]
fn test_from_file_withPartialJson_shouldFillDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(
        temp_dir.path(),
        "conf.json",
        r#"{"subtitles": {"parse_mode": "lenient"}, "output_format": "json", "log_level": "debug"}"#,
    )?;

    let config = Config::from_file(&path)?;
    assert_eq!(config.subtitles.parse_mode, ParseMode::Lenient);
    assert_eq!(config.subtitles.skip_leading_cues, 1);
    assert_eq!(config.output_format, OutputFormat::Json);
    assert_eq!(config.log_level, LogLevel::Debug);
    assert_eq!(config.batch.concurrent_files, 4);
    Ok(())
}

/// Test that an unreadable config file is reported
#[test]
fn test_from_file_withInvalidJson_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "conf.json", "{ not json")?;

    assert!(Config::from_file(&path).is_err());
    assert!(Config::from_file(temp_dir.path().join("missing.json")).is_err());
    Ok(())
}

/// Test that a missing config file is created with defaults
#[test]
fn test_load_or_create_withMissingFile_shouldWriteDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("conf.json");

    let created = Config::load_or_create(&path)?;
    assert!(path.exists());
    assert_eq!(created.batch.concurrent_files, 4);

    let reloaded = Config::load_or_create(&path)?;
    assert_eq!(reloaded.resources.lexicon_path, created.resources.lexicon_path);
    Ok(())
}

/// Test saving and loading a modified config
#[test]
fn test_save_withCustomValues_shouldPersistThem() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("custom.json");

    let mut config = Config::default();
    config.subtitles.skip_leading_cues = 0;
    config.resources.exceptions_path = Some("exc.txt".to_string());
    config.save(&path)?;

    let loaded = Config::from_file(&path)?;
    assert_eq!(loaded.subtitles.skip_leading_cues, 0);
    assert_eq!(loaded.resources.exceptions_path.as_deref(), Some("exc.txt"));
    Ok(())
}

/// Test the log level mapping
#[test]
fn test_log_level_to_level_filter_shouldMatchNames() {
    assert_eq!(LogLevel::Error.to_level_filter(), log::LevelFilter::Error);
    assert_eq!(LogLevel::Trace.to_level_filter(), log::LevelFilter::Trace);
}
