/*!
 * Error types for the subcefr application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Message shown to the end user whenever analysis fails, whatever the cause.
pub const GENERIC_FAILURE_MESSAGE: &str = "Something went wrong. Try loading the file again!";

/// Errors that can occur while decoding and parsing a subtitle file
#[derive(Error, Debug)]
pub enum SubtitleError {
    /// The byte buffer's encoding could not be determined or decoded
    #[error("Failed to decode subtitle bytes: {0}")]
    DecodeError(String),

    /// The content does not follow the SRT cue structure
    #[error("Malformed subtitle content at line {line}: {message}")]
    ParseError {
        /// 1-based line number where parsing failed
        line: usize,
        /// What was wrong with the block
        message: String,
    },
}

/// Errors raised while loading the process-lifetime resources
#[derive(Error, Debug)]
pub enum ResourceError {
    /// The resource file could not be read
    #[error("Failed to read resource {path}: {message}")]
    Io {
        /// Path of the resource
        path: String,
        /// Underlying I/O error text
        message: String,
    },

    /// The lexicon file has an unexpected shape
    #[error("Invalid lexicon: {0}")]
    InvalidLexicon(String),

    /// The model file has an unexpected shape or inconsistent parameters
    #[error("Invalid model: {0}")]
    InvalidModel(String),

    /// The lemmatizer exceptions file is malformed
    #[error("Invalid exceptions file: {0}")]
    InvalidExceptions(String),
}

/// Errors that can occur while running the analysis pipeline on one file
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Error with subtitle decoding or parsing
    #[error("Subtitle error: {0}")]
    Subtitle(#[from] SubtitleError),

    /// The lemmatizer failed on the normalized text
    #[error("Lemmatizer error: {0}")]
    LemmatizerError(String),

    /// The predictor could not produce a level
    #[error("Prediction error: {0}")]
    PredictionError(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error loading the lexicon, model or exceptions
    #[error("Resource error: {0}")]
    Resource(#[from] ResourceError),

    /// Error from the analysis pipeline
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl AppError {
    /// The text shown to the end user; internal detail stays in the logs
    pub fn user_message(&self) -> &'static str {
        GENERIC_FAILURE_MESSAGE
    }
}

impl From<SubtitleError> for AppError {
    fn from(error: SubtitleError) -> Self {
        Self::Pipeline(PipelineError::Subtitle(error))
    }
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
