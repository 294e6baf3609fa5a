/*!
 * Rule-based lemmatizer in the spirit of WordNet's morphy.
 *
 * For every word token the lemma is picked in this order:
 * 1. the surface form, when the vocabulary knows it;
 * 2. a known irregular-form exception (built-in table, optionally extended
 *    from a `surface lemma...` exceptions file);
 * 3. the first suffix-rule candidate the vocabulary knows;
 * 4. the first exception lemma, even if unknown;
 * 5. the surface form itself.
 */

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use log::debug;
use once_cell::sync::Lazy;

use crate::errors::{PipelineError, ResourceError};
use crate::lemmatizer::{tokenize, Lemmatizer};
use crate::lexicon::ReferenceLexicon;

// Common English irregular inflections
static IRREGULAR_FORMS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    [
        ("am", "be"), ("is", "be"), ("are", "be"), ("was", "be"), ("were", "be"), ("been", "be"),
        ("has", "have"), ("had", "have"),
        ("does", "do"), ("did", "do"), ("done", "do"),
        ("goes", "go"), ("went", "go"), ("gone", "go"),
        ("said", "say"), ("got", "get"), ("gotten", "get"), ("made", "make"),
        ("knew", "know"), ("known", "know"), ("thought", "think"),
        ("took", "take"), ("taken", "take"), ("saw", "see"), ("seen", "see"),
        ("came", "come"), ("gave", "give"), ("given", "give"), ("found", "find"),
        ("told", "tell"), ("felt", "feel"), ("left", "leave"), ("brought", "bring"),
        ("bought", "buy"), ("kept", "keep"), ("held", "hold"), ("stood", "stand"),
        ("heard", "hear"), ("meant", "mean"), ("met", "meet"), ("paid", "pay"),
        ("sat", "sit"), ("spoke", "speak"), ("spoken", "speak"), ("lost", "lose"),
        ("fell", "fall"), ("fallen", "fall"), ("sent", "send"), ("built", "build"),
        ("understood", "understand"), ("wrote", "write"), ("written", "write"),
        ("ate", "eat"), ("eaten", "eat"), ("drank", "drink"), ("drunk", "drink"),
        ("drove", "drive"), ("driven", "drive"), ("ran", "run"), ("began", "begin"),
        ("begun", "begin"), ("broke", "break"), ("broken", "break"), ("chose", "choose"),
        ("chosen", "choose"), ("forgot", "forget"), ("forgotten", "forget"),
        ("wore", "wear"), ("worn", "wear"), ("slept", "sleep"), ("taught", "teach"),
        ("caught", "catch"), ("fought", "fight"), ("sold", "sell"), ("won", "win"),
        ("rode", "ride"), ("ridden", "ride"), ("rose", "rise"), ("risen", "rise"),
        ("flew", "fly"), ("flown", "fly"), ("grew", "grow"), ("grown", "grow"),
        ("threw", "throw"), ("thrown", "throw"), ("drew", "draw"), ("drawn", "draw"),
        ("sang", "sing"), ("sung", "sing"), ("swam", "swim"), ("swum", "swim"),
        ("became", "become"), ("hid", "hide"), ("hidden", "hide"), ("woke", "wake"),
        ("woken", "wake"), ("shot", "shoot"), ("led", "lead"), ("fed", "feed"),
        ("men", "man"), ("women", "woman"), ("children", "child"), ("feet", "foot"),
        ("teeth", "tooth"), ("mice", "mouse"), ("geese", "goose"), ("lives", "life"),
        ("wives", "wife"), ("knives", "knife"), ("wolves", "wolf"), ("halves", "half"),
        ("better", "good"), ("best", "good"), ("worse", "bad"), ("worst", "bad"),
    ]
    .into_iter()
    .collect()
});

// Suffix rules: nouns, then verbs, then adjectives
const SUFFIX_RULES: &[(&str, &str)] = &[
    ("s", ""),
    ("ses", "s"),
    ("xes", "x"),
    ("zes", "z"),
    ("ches", "ch"),
    ("shes", "sh"),
    ("men", "man"),
    ("ies", "y"),
    ("es", "e"),
    ("es", ""),
    ("ed", "e"),
    ("ed", ""),
    ("ing", "e"),
    ("ing", ""),
    ("er", ""),
    ("er", "e"),
    ("est", ""),
    ("est", "e"),
];

/// Lemmatizer driven by irregular forms and suffix rules, verified against a vocabulary
#[derive(Debug, Clone)]
pub struct RuleLemmatizer {
    vocabulary: HashSet<String>,
    exceptions: HashMap<String, Vec<String>>,
}

impl RuleLemmatizer {
    /// Create a lemmatizer that knows `vocabulary` and the built-in irregular forms
    pub fn new(vocabulary: HashSet<String>) -> Self {
        let exceptions = IRREGULAR_FORMS
            .iter()
            .map(|(surface, lemma)| (surface.to_string(), vec![lemma.to_string()]))
            .collect();

        Self { vocabulary, exceptions }
    }

    /// Create a lemmatizer whose vocabulary is every word of the lexicon
    pub fn for_lexicon(lexicon: &ReferenceLexicon) -> Self {
        Self::new(lexicon.vocabulary())
    }

    /// Add exceptions; entries replace built-in ones for the same surface form
    pub fn with_exceptions<I>(mut self, exceptions: I) -> Self
    where
        I: IntoIterator<Item = (String, Vec<String>)>,
    {
        for (surface, lemmas) in exceptions {
            self.exceptions.insert(surface, lemmas);
        }
        self
    }

    /// Add exceptions from a file with one `surface lemma [lemma...]` entry per line
    pub fn with_exceptions_file<P: AsRef<Path>>(self, path: P) -> Result<Self, ResourceError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| ResourceError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let exceptions = parse_exceptions(&content)?;
        debug!("Loaded {} lemmatizer exceptions from {}", exceptions.len(), path.display());
        Ok(self.with_exceptions(exceptions))
    }

    /// Lemma for a single word token
    pub fn lemma_for(&self, word: &str) -> String {
        let word = word.to_lowercase();

        if self.vocabulary.contains(&word) {
            return word;
        }

        let exceptions = self.exceptions.get(&word);
        if let Some(known) = exceptions
            .into_iter()
            .flatten()
            .find(|lemma| self.vocabulary.contains(*lemma))
        {
            return known.clone();
        }

        for (suffix, replacement) in SUFFIX_RULES {
            for candidate in apply_rule(&word, suffix, replacement) {
                if self.vocabulary.contains(&candidate) {
                    return candidate;
                }
            }
        }

        // Unknown to the vocabulary: an irregular form still maps to its base
        exceptions
            .and_then(|lemmas| lemmas.first())
            .cloned()
            .unwrap_or(word)
    }
}

impl Lemmatizer for RuleLemmatizer {
    fn lemmatize(&self, text: &str) -> Result<Vec<String>, PipelineError> {
        Ok(tokenize(text)
            .into_iter()
            .map(|token| {
                if token.chars().all(char::is_alphabetic) {
                    self.lemma_for(token)
                } else {
                    token.to_string()
                }
            })
            .collect())
    }
}

fn parse_exceptions(content: &str) -> Result<Vec<(String, Vec<String>)>, ResourceError> {
    let mut entries = Vec::new();
    for (lineno, line) in content.lines().enumerate() {
        let mut parts = line.split_whitespace();
        let surface = match parts.next() {
            Some(s) => s.to_lowercase(),
            None => continue,
        };
        let lemmas: Vec<String> = parts.map(str::to_lowercase).collect();
        if lemmas.is_empty() {
            return Err(ResourceError::InvalidExceptions(format!(
                "line {}: '{}' has no lemma",
                lineno + 1,
                surface
            )));
        }
        entries.push((surface, lemmas));
    }
    Ok(entries)
}

/// Candidates for `surface` with `suffix` swapped for `replacement`
///
/// Dropping a suffix can leave a doubled final consonant ("running" ->
/// "runn"), so the undoubled stem is offered after the plain one.
fn apply_rule(surface: &str, suffix: &str, replacement: &str) -> Vec<String> {
    let Some(stem) = surface.strip_suffix(suffix) else {
        return Vec::new();
    };
    if stem.is_empty() {
        return Vec::new();
    }

    let candidate = format!("{stem}{replacement}");
    let mut candidates = vec![candidate.clone()];

    if replacement.is_empty() {
        let mut chars = candidate.chars();
        let last = chars.next_back();
        let prev = chars.next_back();
        if let (Some(a), Some(b)) = (last, prev)
            && a == b
        {
            let mut undoubled = candidate.clone();
            undoubled.pop();
            candidates.push(undoubled);
        }
    }

    candidates
}
