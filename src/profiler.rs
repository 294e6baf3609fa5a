/*!
 * Lexical level profiling.
 *
 * Counts how many distinct lemmas of a subtitle fall into each CEFR level's
 * word list. Counts depend only on the set of lemmas, never on their order
 * or repetition.
 */

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::lexicon::{CefrLevel, ReferenceLexicon};

/// Number of distinct lemmas found in each level's word list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LevelCounts {
    pub a1: usize,
    pub a2: usize,
    pub b1: usize,
    pub b2: usize,
    pub c1: usize,
}

impl LevelCounts {
    /// Build counts from an array indexed A1..C1
    pub fn from_array(counts: [usize; 5]) -> Self {
        let [a1, a2, b1, b2, c1] = counts;
        Self { a1, a2, b1, b2, c1 }
    }

    /// Counts as an array indexed A1..C1
    pub fn as_array(&self) -> [usize; 5] {
        [self.a1, self.a2, self.b1, self.b2, self.c1]
    }

    pub fn get(&self, level: CefrLevel) -> usize {
        self.as_array()[level.index()]
    }

    /// Sum over all five levels
    pub fn total(&self) -> usize {
        self.as_array().iter().sum()
    }

    /// Feature values for the given levels, in the given order
    pub fn features(&self, order: &[CefrLevel]) -> Vec<f64> {
        order.iter().map(|level| self.get(*level) as f64).collect()
    }

    /// Display proportions, or `None` when no lexicon word was found
    pub fn ratios(&self) -> Option<LevelRatios> {
        LevelRatios::from_counts(self)
    }
}

impl fmt::Display for LevelCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "A1={} A2={} B1={} B2={} C1={}",
            self.a1, self.a2, self.b1, self.b2, self.c1
        )
    }
}

/// Share of each level among all lexicon-matching lemmas
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelRatios {
    pub a1: f64,
    pub a2: f64,
    pub b1: f64,
    pub b2: f64,
    pub c1: f64,
}

impl LevelRatios {
    /// Compute ratios; a zero total yields `None` instead of dividing by zero
    pub fn from_counts(counts: &LevelCounts) -> Option<Self> {
        let total = counts.total();
        if total == 0 {
            return None;
        }

        let total = total as f64;
        let [a1, a2, b1, b2, c1] = counts.as_array().map(|c| c as f64 / total);
        Some(Self { a1, a2, b1, b2, c1 })
    }

    pub fn get(&self, level: CefrLevel) -> f64 {
        [self.a1, self.a2, self.b1, self.b2, self.c1][level.index()]
    }
}

/// Number of distinct lemmas that belong to `level` in the lexicon
pub fn lemma_count<S: AsRef<str>>(lemmas: &[S], lexicon: &ReferenceLexicon, level: CefrLevel) -> usize {
    let words = lexicon.words(level);
    let matching: HashSet<&str> = lemmas
        .iter()
        .map(|lemma| lemma.as_ref())
        .filter(|lemma| words.contains(*lemma))
        .collect();
    matching.len()
}

/// Distinct-lemma counts for every level
pub fn profile<S: AsRef<str>>(lemmas: &[S], lexicon: &ReferenceLexicon) -> LevelCounts {
    let distinct: HashSet<&str> = lemmas.iter().map(|lemma| lemma.as_ref()).collect();

    let mut counts = [0usize; 5];
    for lemma in distinct {
        if let Some(level) = lexicon.level_of(lemma) {
            counts[level.index()] += 1;
        }
    }

    LevelCounts::from_array(counts)
}
