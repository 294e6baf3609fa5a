/*!
 * Lemmatization of normalized subtitle text.
 *
 * The pipeline only depends on the `Lemmatizer` trait, so any tokenizer and
 * lemmatizer honouring the same contract can be plugged in:
 * - `rules`: built-in rule-based lemmatizer checked against a known vocabulary
 */

use std::fmt::Debug;

use crate::errors::PipelineError;

/// Turns normalized text into an ordered sequence of lemmas
///
/// Implementations return one lemma per token, in text order. Punctuation
/// tokens yield punctuation "lemmas"; filtering is left to the profiler.
pub trait Lemmatizer: Send + Sync + Debug {
    /// Tokenize and lemmatize `text`
    ///
    /// # Arguments
    /// * `text` - Normalized subtitle text
    ///
    /// # Returns
    /// * `Result<Vec<String>, PipelineError>` - Lemmas in text order, or an error
    fn lemmatize(&self, text: &str) -> Result<Vec<String>, PipelineError>;
}

/// Split text into word tokens (runs of letters) and single punctuation characters
pub fn tokenize(text: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut word_start: Option<usize> = None;

    for (idx, ch) in text.char_indices() {
        if ch.is_alphabetic() {
            if word_start.is_none() {
                word_start = Some(idx);
            }
            continue;
        }

        if let Some(start) = word_start.take() {
            tokens.push(&text[start..idx]);
        }
        if !ch.is_whitespace() {
            tokens.push(&text[idx..idx + ch.len_utf8()]);
        }
    }

    if let Some(start) = word_start {
        tokens.push(&text[start..]);
    }

    tokens
}

pub mod rules;

pub use rules::RuleLemmatizer;
