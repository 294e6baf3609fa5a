/*!
 * CEFR levels and the reference word lexicon.
 *
 * The lexicon maps each of the five levels A1..C1 to the set of dictionary
 * words officially associated with it. It is loaded once from a JSON artifact
 * and shared read-only for the lifetime of the process.
 */

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::errors::ResourceError;

/// CEFR proficiency level covered by the lexicon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CefrLevel {
    A1,
    A2,
    B1,
    B2,
    C1,
}

impl CefrLevel {
    /// All lexicon levels in ascending order
    pub const ALL: [CefrLevel; 5] = [Self::A1, Self::A2, Self::B1, Self::B2, Self::C1];

    /// Levels a prediction may return
    pub const PREDICTABLE: [CefrLevel; 4] = [Self::A2, Self::B1, Self::B2, Self::C1];

    /// Position of the level in `ALL`
    pub fn index(self) -> usize {
        self as usize
    }

    /// Level name as written in the lexicon and reports
    pub fn as_str(self) -> &'static str {
        match self {
            Self::A1 => "A1",
            Self::A2 => "A2",
            Self::B1 => "B1",
            Self::B2 => "B2",
            Self::C1 => "C1",
        }
    }

    /// Whether the classifier can output this level
    pub fn is_predictable(self) -> bool {
        self != Self::A1
    }

    /// Map a classifier class code (1=A2, 2=B1, 3=B2, 4=C1) to a level
    pub fn from_class_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(Self::A2),
            2 => Some(Self::B1),
            3 => Some(Self::B2),
            4 => Some(Self::C1),
            _ => None,
        }
    }
}

impl fmt::Display for CefrLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CefrLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "A1" => Ok(Self::A1),
            "A2" => Ok(Self::A2),
            "B1" => Ok(Self::B1),
            "B2" => Ok(Self::B2),
            "C1" => Ok(Self::C1),
            _ => Err(format!("Unknown CEFR level: {}", s)),
        }
    }
}

/// On-disk lexicon layouts: keyed by level name, or a five-element array indexed A1..C1
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum LexiconFile {
    Keyed(HashMap<String, String>),
    Indexed(Vec<String>),
}

/// Immutable mapping from CEFR level to its word set
#[derive(Debug, Clone, Default)]
pub struct ReferenceLexicon {
    levels: [HashSet<String>; 5],
}

impl ReferenceLexicon {
    /// Build a lexicon from whitespace-separated word lists per level
    ///
    /// Words are lowercased. A word listed under several levels is kept only
    /// in the lowest one, so every word belongs to exactly one level.
    pub fn from_word_lists<I, S>(lists: I) -> Self
    where
        I: IntoIterator<Item = (CefrLevel, S)>,
        S: AsRef<str>,
    {
        let mut raw: [Vec<String>; 5] = Default::default();
        for (level, words) in lists {
            raw[level.index()].extend(words.as_ref().split_whitespace().map(str::to_lowercase));
        }

        let mut assigned: HashMap<String, CefrLevel> = HashMap::new();
        let mut levels: [HashSet<String>; 5] = Default::default();
        let mut duplicates = 0usize;

        for level in CefrLevel::ALL {
            for word in raw[level.index()].drain(..) {
                match assigned.get(&word) {
                    Some(existing) if *existing != level => {
                        duplicates += 1;
                        debug!("Word '{}' already listed under {}, ignoring {} entry", word, existing, level);
                    }
                    Some(_) => {}
                    None => {
                        assigned.insert(word.clone(), level);
                        levels[level.index()].insert(word);
                    }
                }
            }
        }

        if duplicates > 0 {
            warn!("Lexicon lists {} word(s) under more than one level; kept the lowest level", duplicates);
        }

        Self { levels }
    }

    /// Parse a lexicon from its JSON representation
    pub fn from_json_str(json: &str) -> Result<Self, ResourceError> {
        let file: LexiconFile = serde_json::from_str(json)
            .map_err(|e| ResourceError::InvalidLexicon(e.to_string()))?;

        match file {
            LexiconFile::Keyed(map) => {
                let mut lists = Vec::with_capacity(map.len());
                for (key, words) in map {
                    let level = key.parse::<CefrLevel>().map_err(ResourceError::InvalidLexicon)?;
                    lists.push((level, words));
                }
                if lists.is_empty() {
                    return Err(ResourceError::InvalidLexicon("no levels defined".to_string()));
                }
                Ok(Self::from_word_lists(lists))
            }
            LexiconFile::Indexed(lists) => {
                if lists.len() != CefrLevel::ALL.len() {
                    return Err(ResourceError::InvalidLexicon(format!(
                        "expected {} word lists (A1..C1), found {}",
                        CefrLevel::ALL.len(),
                        lists.len()
                    )));
                }
                Ok(Self::from_word_lists(CefrLevel::ALL.into_iter().zip(lists)))
            }
        }
    }

    /// Load a lexicon from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ResourceError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| ResourceError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let lexicon = Self::from_json_str(&content)?;
        debug!(
            "Loaded lexicon from {}: {} words ({})",
            path.display(),
            lexicon.len(),
            CefrLevel::ALL
                .iter()
                .map(|l| format!("{}={}", l, lexicon.words(*l).len()))
                .collect::<Vec<_>>()
                .join(", ")
        );
        Ok(lexicon)
    }

    /// Word set for one level
    pub fn words(&self, level: CefrLevel) -> &HashSet<String> {
        &self.levels[level.index()]
    }

    /// Whether `word` is listed under `level`
    pub fn contains(&self, level: CefrLevel, word: &str) -> bool {
        self.levels[level.index()].contains(word)
    }

    /// Level a word is listed under, if any
    pub fn level_of(&self, word: &str) -> Option<CefrLevel> {
        CefrLevel::ALL.into_iter().find(|level| self.contains(*level, word))
    }

    /// Union of all levels' words
    pub fn vocabulary(&self) -> HashSet<String> {
        self.levels.iter().flatten().cloned().collect()
    }

    /// Total number of words across levels
    pub fn len(&self) -> usize {
        self.levels.iter().map(HashSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
