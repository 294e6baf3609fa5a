/*!
 * Mock lemmatizers and predictors for testing
 *
 * These stand in for the real components so pipeline tests can pin the
 * predicted level, inspect the counts the predictor receives, or force a
 * stage to fail.
 */

use std::sync::Mutex;

use subcefr::errors::PipelineError;
use subcefr::lemmatizer::{tokenize, Lemmatizer};
use subcefr::lexicon::CefrLevel;
use subcefr::predictor::Predictor;
use subcefr::profiler::LevelCounts;

/// Lemmatizer that returns the tokens unchanged
#[derive(Debug, Default)]
pub struct IdentityLemmatizer;

impl Lemmatizer for IdentityLemmatizer {
    fn lemmatize(&self, text: &str) -> Result<Vec<String>, PipelineError> {
        Ok(tokenize(text).into_iter().map(str::to_string).collect())
    }
}

/// Lemmatizer that always fails
#[derive(Debug, Default)]
pub struct FailingLemmatizer;

impl Lemmatizer for FailingLemmatizer {
    fn lemmatize(&self, _text: &str) -> Result<Vec<String>, PipelineError> {
        Err(PipelineError::LemmatizerError("mock lemmatizer failure".to_string()))
    }
}

/// Predictor that always answers the same level and remembers what it was asked
#[derive(Debug)]
pub struct FixedPredictor {
    level: CefrLevel,
    calls: Mutex<Vec<LevelCounts>>,
}

impl FixedPredictor {
    pub fn new(level: CefrLevel) -> Self {
        Self {
            level,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Counts received so far, in call order
    pub fn calls(&self) -> Vec<LevelCounts> {
        self.calls.lock().unwrap().clone()
    }

    pub fn last_counts(&self) -> Option<LevelCounts> {
        self.calls().last().copied()
    }
}

impl Predictor for FixedPredictor {
    fn predict(&self, counts: &LevelCounts) -> Result<CefrLevel, PipelineError> {
        self.calls.lock().unwrap().push(*counts);
        Ok(self.level)
    }
}

/// Predictor that answers C1 once enough C1 words are present, A2 otherwise
#[derive(Debug)]
pub struct ThresholdPredictor {
    pub c1_threshold: usize,
}

impl Predictor for ThresholdPredictor {
    fn predict(&self, counts: &LevelCounts) -> Result<CefrLevel, PipelineError> {
        if counts.c1 >= self.c1_threshold {
            Ok(CefrLevel::C1)
        } else {
            Ok(CefrLevel::A2)
        }
    }
}

/// Predictor that always fails
#[derive(Debug, Default)]
pub struct FailingPredictor;

impl Predictor for FailingPredictor {
    fn predict(&self, _counts: &LevelCounts) -> Result<CefrLevel, PipelineError> {
        Err(PipelineError::PredictionError("mock predictor failure".to_string()))
    }
}

/// Predictor that panics when the dialogue holds any C1 word
#[derive(Debug, Default)]
pub struct PanickingPredictor;

impl Predictor for PanickingPredictor {
    fn predict(&self, counts: &LevelCounts) -> Result<CefrLevel, PipelineError> {
        if counts.c1 > 0 {
            panic!("mock predictor panic");
        }
        Ok(CefrLevel::A2)
    }
}
