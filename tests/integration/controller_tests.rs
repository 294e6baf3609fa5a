/*!
 * Integration tests for the application controller
 */

use std::fs;
use std::sync::Arc;
use anyhow::Result;
use subcefr::app_config::{OutputFormat, SubtitleConfig};
use subcefr::app_controller::Controller;
use subcefr::errors::GENERIC_FAILURE_MESSAGE;
use subcefr::lexicon::CefrLevel;
use crate::common;
use crate::common::mock_components::{FixedPredictor, IdentityLemmatizer, PanickingPredictor};

/// Test the controller initialization with the fixture resources
#[test]
fn test_controller_initialization_withFixtureConfig_shouldLoadResources() -> Result<()> {
    let controller = Controller::with_config(common::fixture_config())?;

    assert_eq!(controller.analyzer().lexicon().len(), common::fixture_lexicon().len());
    assert_eq!(controller.config().subtitles.skip_leading_cues, 1);
    Ok(())
}

/// Test that missing or broken resources stop initialization
#[test]
fn test_controller_initialization_withBadResources_shouldFail() -> Result<()> {
    let mut config = common::fixture_config();
    config.resources.lexicon_path = common::test_resource_path("missing.json").display().to_string();
    assert!(Controller::with_config(config).is_err());

    let temp_dir = common::create_temp_dir()?;
    let bad_model = common::create_test_file(temp_dir.path(), "model.json", r#"{"classes": []}"#)?;
    let mut config = common::fixture_config();
    config.resources.model_path = bad_model.display().to_string();
    assert!(Controller::with_config(config).is_err());

    let mut config = common::fixture_config();
    config.resources.exceptions_path = Some(temp_dir.path().join("none.exc").display().to_string());
    assert!(Controller::with_config(config).is_err());
    Ok(())
}

/// Test analysing a single file with the real components
#[test]
fn test_analyze_file_withSampleSubtitle_shouldPredictFromFixtures() -> Result<()> {
    let controller = Controller::with_config(common::fixture_config())?;
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_subtitle(temp_dir.path(), "sample.srt")?;

    let report = controller.analyze_file(&path)?;
    assert_eq!(report.source, "sample.srt");
    assert_eq!(report.encoding, "UTF-8");
    assert_eq!(report.level, CefrLevel::B1);
    Ok(())
}

/// Test the text rendering of a report
#[test]
fn test_render_report_asText_shouldListEveryLevel() -> Result<()> {
    let controller = Controller::with_config(common::fixture_config())?;
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_subtitle(temp_dir.path(), "sample.srt")?;
    let report = controller.analyze_file(&path)?;

    let text = Controller::render_report(&report, OutputFormat::Text)?;
    assert!(text.contains("sample.srt: B1"));
    for level in CefrLevel::ALL {
        assert!(text.contains(&format!("{} words:", level)), "missing {} in {}", level, text);
    }
    assert!(text.contains("50.0%"));
    Ok(())
}

/// Test the JSON rendering of a report
#[test]
fn test_render_report_asJson_shouldSerializeCountsAndLevel() -> Result<()> {
    let controller = Controller::with_config(common::fixture_config())?;
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_subtitle(temp_dir.path(), "sample.srt")?;
    let report = controller.analyze_file(&path)?;

    let json: serde_json::Value = serde_json::from_str(&Controller::render_report(&report, OutputFormat::Json)?)?;
    assert_eq!(json["level"], "B1");
    assert_eq!(json["counts"]["b1"], 2);
    assert_eq!(json["dialogue_cues"], 1);
    Ok(())
}

/// Test the message shown when no lexicon word was found
#[test]
fn test_render_report_withNoLexiconWords_shouldSayso() -> Result<()> {
    let controller = Controller::with_config(common::fixture_config())?;
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "ad.srt", &common::srt_from_cues(&["ADVERT"]))?;
    let report = controller.analyze_file(&path)?;

    let text = Controller::render_report(&report, OutputFormat::Text)?;
    assert!(text.contains("No lexicon words found"));
    assert!(!text.contains('%'));
    Ok(())
}

/// Test a folder with good and bad files
#[tokio::test]
async fn test_run_folder_withMixedFiles_shouldCountSuccessesAndFailures() -> Result<()> {
    common::init_test_logging();
    let controller = Controller::with_config(common::fixture_config())?;
    let temp_dir = common::create_temp_dir()?;

    common::create_test_subtitle(temp_dir.path(), "a.srt")?;
    common::create_test_file(temp_dir.path(), "b.srt", &common::srt_from_cues(&["AD", "It is ubiquitous."]))?;
    common::create_test_file(temp_dir.path(), "c.srt", "this is not a subtitle file")?;
    common::create_test_file(temp_dir.path(), "ignored.txt", "1")?;

    let summary = controller.run_folder(temp_dir.path().to_path_buf()).await?;

    assert_eq!(summary.files.len(), 3);
    assert_eq!(summary.analyzed, 2);
    assert_eq!(summary.failed, 1);
    assert!(summary.files[0].file.ends_with("a.srt"));
    assert!(summary.files[2].report.is_none());
    assert_eq!(summary.files[2].error.as_deref(), Some(GENERIC_FAILURE_MESSAGE));
    assert_eq!(summary.by_level.values().sum::<usize>(), 2);

    let text = Controller::render_summary(&summary, OutputFormat::Text)?;
    assert!(text.contains("2 analysed, 1 failed"));
    Ok(())
}

/// Test that a file with an out-of-range timestamp fails on its own
#[tokio::test]
async fn test_run_folder_withOverflowingTimestamp_shouldKeepOtherResults() -> Result<()> {
    let controller = Controller::with_config(common::fixture_config())?;
    let temp_dir = common::create_temp_dir()?;

    common::create_test_subtitle(temp_dir.path(), "a_good.srt")?;
    common::create_test_file(
        temp_dir.path(),
        "b_bad.srt",
        "1\n99999999999999:00:00,000 --> 99999999999999:00:01,000\nAD\n\n2\n00:00:01,000 --> 00:00:02,000\nHi\n",
    )?;

    let summary = controller.run_folder(temp_dir.path().to_path_buf()).await?;

    assert_eq!(summary.analyzed, 1);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.files[0].report.as_ref().map(|r| r.level), Some(CefrLevel::B1));
    assert_eq!(summary.files[1].error.as_deref(), Some(GENERIC_FAILURE_MESSAGE));
    Ok(())
}

/// Test that a panic while analysing one file is counted as a failure
#[tokio::test]
async fn test_run_folder_withPanickingAnalysis_shouldCountFailureAndContinue() -> Result<()> {
    let analyzer = common::analyzer_with(
        Arc::new(IdentityLemmatizer),
        Arc::new(PanickingPredictor),
        SubtitleConfig::default(),
    );
    let controller = Controller::with_analyzer(common::fixture_config(), analyzer);
    let temp_dir = common::create_temp_dir()?;

    common::create_test_subtitle(temp_dir.path(), "a_easy.srt")?;
    common::create_test_file(temp_dir.path(), "b_hard.srt", &common::srt_from_cues(&["AD", "ubiquitous"]))?;

    let summary = controller.run_folder(temp_dir.path().to_path_buf()).await?;

    assert_eq!(summary.files.len(), 2);
    assert_eq!(summary.analyzed, 1);
    assert_eq!(summary.failed, 1);
    assert!(summary.files[0].report.is_some());
    assert!(summary.files[1].file.ends_with("b_hard.srt"));
    assert!(summary.files[1].report.is_none());
    Ok(())
}

/// Test a folder with no subtitle files
#[tokio::test]
async fn test_run_folder_withNoSubtitles_shouldFail() -> Result<()> {
    let controller = Controller::with_config(common::fixture_config())?;
    let temp_dir = common::create_temp_dir()?;
    common::create_test_file(temp_dir.path(), "readme.txt", "nothing here")?;

    assert!(controller.run_folder(temp_dir.path().to_path_buf()).await.is_err());
    Ok(())
}

/// Test that a single-file run writes the JSON report
#[tokio::test]
async fn test_run_withReportPath_shouldWriteJsonReport() -> Result<()> {
    let mut config = common::fixture_config();
    config.output_format = OutputFormat::Json;
    let controller = Controller::with_config(config)?;

    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_subtitle(temp_dir.path(), "sample.srt")?;
    let report_path = temp_dir.path().join("out").join("report.json");

    controller.run(path, Some(report_path.clone())).await?;

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&report_path)?)?;
    assert_eq!(json["source"], "sample.srt");
    Ok(())
}

/// Test that a run on a missing path fails
#[test]
fn test_run_withMissingInput_shouldFail() -> Result<()> {
    let controller = Controller::with_config(common::fixture_config())?;
    let temp_dir = common::create_temp_dir()?;

    let result = tokio_test::block_on(async {
        controller.run(temp_dir.path().join("nope.srt"), None).await
    });
    assert!(result.is_err());
    Ok(())
}

/// Test a controller built around injected components
#[test]
fn test_with_analyzer_withMockComponents_shouldUseThem() -> Result<()> {
    let config = common::fixture_config();
    let analyzer = common::analyzer_with(
        Arc::new(IdentityLemmatizer),
        Arc::new(FixedPredictor::new(CefrLevel::C1)),
        SubtitleConfig::default(),
    );
    let controller = Controller::with_analyzer(config, analyzer);

    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_subtitle(temp_dir.path(), "sample.srt")?;
    assert_eq!(controller.analyze_file(&path)?.level, CefrLevel::C1);
    Ok(())
}
