/*!
 * # subcefr - CEFR difficulty levels for English subtitles
 *
 * A Rust library that estimates how hard the English of a film or series is,
 * from its SRT subtitle file, on the CEFR scale (A2, B1, B2, C1).
 *
 * ## Features
 *
 * - Decode subtitle files in any common encoding (BOM or statistical detection)
 * - Parse SRT cues strictly or leniently
 * - Normalize dialogue text with an ordered list of cleaning rules
 * - Lemmatize with a vocabulary-checked rule lemmatizer
 * - Count distinct lexicon words per CEFR level
 * - Predict the level with a pre-trained Gaussian naive Bayes model
 * - Analyse whole folders concurrently
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `subtitle_processor`: Encoding detection and SRT parsing
 * - `text_normalizer`: Dialogue text cleanup
 * - `lemmatizer`: Lemmatizer interface and the rule-based implementation
 * - `lexicon`: CEFR levels and the reference word lists
 * - `profiler`: Per-level lemma counts and ratios
 * - `predictor`: Predictor interface and the naive Bayes model
 * - `analysis`: The end-to-end pipeline for one file
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod file_utils;
pub mod subtitle_processor;
pub mod text_normalizer;
pub mod lemmatizer;
pub mod lexicon;
pub mod profiler;
pub mod predictor;
pub mod analysis;
pub mod app_controller;
pub mod errors;

// Re-export main types for easier usage
pub use app_config::Config;
pub use subtitle_processor::{SubtitleCollection, SubtitleEntry};
pub use text_normalizer::normalize;
pub use lemmatizer::{Lemmatizer, RuleLemmatizer};
pub use lexicon::{CefrLevel, ReferenceLexicon};
pub use profiler::{LevelCounts, LevelRatios};
pub use predictor::{NaiveBayesModel, Predictor};
pub use analysis::{AnalysisReport, LevelAnalyzer};
pub use app_controller::Controller;
pub use errors::{AppError, PipelineError, ResourceError, SubtitleError};
