/*!
 * Subtitle text normalization.
 *
 * Dialogue text is cleaned by a fixed, ordered list of steps. Later steps
 * assume the cleanup done by earlier ones (dots are collapsed before spaces,
 * the non-letter filter runs before the ASCII filter), so the order of
 * `NORMALIZATION_STEPS` is part of the contract:
 *
 * 1. markup tags `<...>` / `{...}` -> space
 * 2. bracketed all-letter annotations `(laughs)` / `[MUSIC]` -> space
 * 3. anything but letters, `.`, `,`, `!`, `?`, space -> space
 * 4. runs of `.` -> single `.`
 * 5. runs of 2+ spaces -> single space
 * 6. literal `www` -> removed
 * 7. leading whitespace stripped
 * 8. non-ASCII characters dropped
 * 9. lowercased
 */

use once_cell::sync::Lazy;
use regex::{NoExpand, Regex};

/// A pattern-replacement rule applied to the whole text
#[derive(Debug)]
pub struct NormalizationRule {
    /// Short rule identifier, used in debug logs
    pub name: &'static str,
    pattern: Regex,
    replacement: &'static str,
}

impl NormalizationRule {
    fn new(name: &'static str, pattern: &str, replacement: &'static str) -> Self {
        Self {
            name,
            // Patterns are compile-time constants
            pattern: Regex::new(pattern).unwrap(),
            replacement,
        }
    }

    /// Source of the underlying regular expression
    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    /// Replacement text inserted for every match
    pub fn replacement(&self) -> &str {
        self.replacement
    }

    /// Apply this rule to `text`
    pub fn apply(&self, text: &str) -> String {
        self.pattern.replace_all(text, NoExpand(self.replacement)).into_owned()
    }
}

/// One step of the normalization sequence
#[derive(Debug)]
pub enum NormalizationStep {
    /// Regex substitution
    Replace(NormalizationRule),
    /// Remove leading whitespace
    StripLeading,
    /// Drop every character outside 7-bit ASCII
    DropNonAscii,
    /// Lowercase the whole string
    Lowercase,
}

impl NormalizationStep {
    /// Human-readable step name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Replace(rule) => rule.name,
            Self::StripLeading => "strip_leading",
            Self::DropNonAscii => "drop_non_ascii",
            Self::Lowercase => "lowercase",
        }
    }

    /// Apply the step to `text`
    pub fn apply(&self, text: &str) -> String {
        match self {
            Self::Replace(rule) => rule.apply(text),
            Self::StripLeading => text.trim_start().to_string(),
            Self::DropNonAscii => text.chars().filter(char::is_ascii).collect(),
            Self::Lowercase => text.to_lowercase(),
        }
    }
}

/// The ordered normalization sequence
pub static NORMALIZATION_STEPS: Lazy<Vec<NormalizationStep>> = Lazy::new(|| {
    vec![
        NormalizationStep::Replace(NormalizationRule::new("markup", r"<.*?>|\{.*?\}", " ")),
        NormalizationStep::Replace(NormalizationRule::new("annotations", r"[\(\[][A-Za-z ]+[\)\]]", " ")),
        NormalizationStep::Replace(NormalizationRule::new("non_letters", r"[^a-zA-Z.,!? ]", " ")),
        NormalizationStep::Replace(NormalizationRule::new("dots", r"\.+", ".")),
        NormalizationStep::Replace(NormalizationRule::new("spaces", r" {2,}", " ")),
        NormalizationStep::Replace(NormalizationRule::new("www", r"www", "")),
        NormalizationStep::StripLeading,
        NormalizationStep::DropNonAscii,
        NormalizationStep::Lowercase,
    ]
});

/// Normalize raw dialogue text into a lowercase ASCII string
pub fn normalize(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    NORMALIZATION_STEPS
        .iter()
        .fold(text.to_string(), |current, step| step.apply(&current))
}
