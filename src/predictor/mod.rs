/*!
 * Level prediction from lexical profiles.
 *
 * The classifier is an external, pre-trained artifact; the pipeline only
 * sees the `Predictor` trait. Implementations:
 * - `naive_bayes`: Gaussian naive Bayes model loaded from exported parameters
 */

use std::fmt::Debug;

use crate::errors::PipelineError;
use crate::lexicon::CefrLevel;
use crate::profiler::LevelCounts;

/// Maps a level count vector to one of the predictable CEFR levels
pub trait Predictor: Send + Sync + Debug {
    /// Predict the level needed to follow the dialogue
    ///
    /// # Arguments
    /// * `counts` - Distinct-lemma counts per lexicon level
    ///
    /// # Returns
    /// * `Result<CefrLevel, PipelineError>` - One of A2, B1, B2, C1, or an error
    fn predict(&self, counts: &LevelCounts) -> Result<CefrLevel, PipelineError>;
}

pub mod naive_bayes;

pub use naive_bayes::NaiveBayesModel;
