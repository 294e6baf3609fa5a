/*!
 * End-to-end level analysis of one subtitle file.
 *
 * raw bytes -> cues -> dialogue text -> normalized text -> lemmas
 *   -> level counts -> predicted level (+ display ratios)
 *
 * The analyzer owns nothing mutable: the lexicon, lemmatizer and predictor
 * are loaded once and shared behind `Arc`, so one analyzer can serve any
 * number of threads.
 */

use std::collections::HashSet;
use std::sync::Arc;

use log::debug;
use serde::Serialize;

use crate::app_config::SubtitleConfig;
use crate::errors::PipelineError;
use crate::lemmatizer::Lemmatizer;
use crate::lexicon::{CefrLevel, ReferenceLexicon};
use crate::predictor::Predictor;
use crate::profiler::{self, LevelCounts, LevelRatios};
use crate::subtitle_processor::SubtitleCollection;
use crate::text_normalizer;

/// Result of analysing one subtitle file
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    /// File name or other label of the input
    pub source: String,
    /// Encoding the bytes were decoded with
    pub encoding: String,
    /// Cues found in the file
    pub total_cues: usize,
    /// Cues left after dropping the leading ones
    pub dialogue_cues: usize,
    /// Length of the normalized dialogue text in bytes
    pub normalized_length: usize,
    /// Number of lemmas, punctuation included
    pub lemma_count: usize,
    /// Number of distinct lemmas
    pub distinct_lemmas: usize,
    /// Distinct lexicon lemmas per level
    pub counts: LevelCounts,
    /// Share of each level, absent when no lexicon word was found
    pub ratios: Option<LevelRatios>,
    /// Predicted level
    pub level: CefrLevel,
}

impl AnalysisReport {
    /// True when the dialogue contained no lexicon word at all
    pub fn no_lexicon_words(&self) -> bool {
        self.ratios.is_none()
    }
}

/// Intermediate products of the text stages, useful for inspection
#[derive(Debug, Clone)]
pub struct LexicalProfile {
    pub normalized_text: String,
    pub lemmas: Vec<String>,
    pub counts: LevelCounts,
}

/// The analysis pipeline with its injected resources
#[derive(Debug, Clone)]
pub struct LevelAnalyzer {
    lexicon: Arc<ReferenceLexicon>,
    lemmatizer: Arc<dyn Lemmatizer>,
    predictor: Arc<dyn Predictor>,
    options: SubtitleConfig,
}

impl LevelAnalyzer {
    pub fn new(
        lexicon: Arc<ReferenceLexicon>,
        lemmatizer: Arc<dyn Lemmatizer>,
        predictor: Arc<dyn Predictor>,
        options: SubtitleConfig,
    ) -> Self {
        Self {
            lexicon,
            lemmatizer,
            predictor,
            options,
        }
    }

    pub fn lexicon(&self) -> &ReferenceLexicon {
        &self.lexicon
    }

    pub fn options(&self) -> &SubtitleConfig {
        &self.options
    }

    /// Normalize, lemmatize and profile already-extracted dialogue text
    pub fn profile_text(&self, dialogue: &str) -> Result<LexicalProfile, PipelineError> {
        let normalized_text = text_normalizer::normalize(dialogue);
        debug!("Normalized dialogue: {} -> {} bytes", dialogue.len(), normalized_text.len());

        let lemmas = self.lemmatizer.lemmatize(&normalized_text)?;
        debug!("Lemmatizer produced {} lemmas", lemmas.len());

        let counts = profiler::profile(&lemmas, &self.lexicon);
        debug!("Level counts: {}", counts);

        Ok(LexicalProfile {
            normalized_text,
            lemmas,
            counts,
        })
    }

    /// Analyse parsed cues
    pub fn analyze_collection(&self, collection: &SubtitleCollection) -> Result<AnalysisReport, PipelineError> {
        let skip = self.options.skip_leading_cues;
        let dialogue_cues = collection.dialogue_entries(skip).len();
        if dialogue_cues == 0 {
            debug!(
                "{} has {} cue(s), none left after skipping {}",
                collection.source_name,
                collection.entries.len(),
                skip
            );
        }

        let profile = self.profile_text(&collection.dialogue_text(skip))?;
        let level = self.predictor.predict(&profile.counts)?;
        let distinct_lemmas = profile.lemmas.iter().collect::<HashSet<_>>().len();

        Ok(AnalysisReport {
            source: collection.source_name.clone(),
            encoding: collection.encoding.clone(),
            total_cues: collection.entries.len(),
            dialogue_cues,
            normalized_length: profile.normalized_text.len(),
            lemma_count: profile.lemmas.len(),
            distinct_lemmas,
            ratios: profile.counts.ratios(),
            counts: profile.counts,
            level,
        })
    }

    /// Analyse decoded SRT text
    pub fn analyze_text(&self, source: &str, content: &str) -> Result<AnalysisReport, PipelineError> {
        let mut collection = SubtitleCollection::new(source, "utf-8");
        collection.entries = SubtitleCollection::parse_srt_string(content, self.options.parse_mode)?;
        self.analyze_collection(&collection)
    }

    /// Analyse a raw subtitle file
    pub fn analyze_bytes(&self, source: &str, bytes: &[u8]) -> Result<AnalysisReport, PipelineError> {
        let collection = SubtitleCollection::from_bytes(source, bytes, self.options.parse_mode)?;
        self.analyze_collection(&collection)
    }
}
