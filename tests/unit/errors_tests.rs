/*!
 * Tests for error types and conversions
 */

use subcefr::errors::{AppError, PipelineError, ResourceError, SubtitleError, GENERIC_FAILURE_MESSAGE};

#[test]
fn test_subtitleError_parseError_shouldDisplayLine() {
    let error = SubtitleError::ParseError {
        line: 12,
        message: "expected cue index".to_string(),
    };
    let display = format!("{}", error);
    assert!(display.contains("line 12"));
    assert!(display.contains("expected cue index"));
}

#[test]
fn test_subtitleError_decodeError_shouldDisplayCorrectly() {
    let error = SubtitleError::DecodeError("bad bytes".to_string());
    assert!(error.to_string().contains("bad bytes"));
}

#[test]
fn test_resourceError_io_shouldDisplayPath() {
    let error = ResourceError::Io {
        path: "lexicon.json".to_string(),
        message: "not found".to_string(),
    };
    let display = error.to_string();
    assert!(display.contains("lexicon.json"));
    assert!(display.contains("not found"));
}

#[test]
fn test_pipelineError_fromSubtitleError_shouldWrap() {
    let error: PipelineError = SubtitleError::DecodeError("x".to_string()).into();
    assert!(matches!(error, PipelineError::Subtitle(SubtitleError::DecodeError(_))));
}

#[test]
fn test_appError_conversions_shouldPickMatchingVariant() {
    let from_subtitle: AppError = SubtitleError::DecodeError("x".to_string()).into();
    assert!(matches!(from_subtitle, AppError::Pipeline(PipelineError::Subtitle(_))));

    let from_resource: AppError = ResourceError::InvalidModel("x".to_string()).into();
    assert!(matches!(from_resource, AppError::Resource(_)));

    let from_io: AppError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
    assert!(matches!(from_io, AppError::File(_)));

    let from_anyhow: AppError = anyhow::anyhow!("odd").into();
    assert!(matches!(from_anyhow, AppError::Unknown(_)));
}

#[test]
fn test_appError_userMessage_shouldHideDetails() {
    let error: AppError = PipelineError::PredictionError("NaN scores".to_string()).into();

    assert_eq!(error.user_message(), GENERIC_FAILURE_MESSAGE);
    assert!(!error.user_message().contains("NaN"));
    assert!(error.to_string().contains("NaN scores"));
}
