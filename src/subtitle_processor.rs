use std::borrow::Cow;
use std::fmt;
use anyhow::{Result, Context, anyhow};
use chardetng::EncodingDetector;
use encoding_rs::Encoding;
use log::{warn, debug};
use serde::Serialize;
use crate::app_config::ParseMode;
use crate::errors::SubtitleError;

// @module: Subtitle decoding and SRT parsing

// @struct: Single subtitle entry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubtitleEntry {
    // @field: Sequence number as written in the file
    pub seq_num: usize,

    // @field: Start time in ms
    pub start_time_ms: u64,

    // @field: End time in ms
    pub end_time_ms: u64,

    // @field: Subtitle text, lines joined with '\n'
    pub text: String,
}

impl SubtitleEntry {
    /// Creates a new subtitle entry
    pub fn new(seq_num: usize, start_time_ms: u64, end_time_ms: u64, text: String) -> Self {
        SubtitleEntry {
            seq_num,
            start_time_ms,
            end_time_ms,
            text,
        }
    }

    /// Parse an SRT timestamp (HH:MM:SS,mmm) to milliseconds
    pub fn parse_timestamp(timestamp: &str) -> Result<u64> {
        let parts: Vec<&str> = timestamp.trim().split(&[':', ',', '.'][..]).collect();

        if parts.len() != 4 {
            return Err(anyhow!("Invalid timestamp format: {}", timestamp));
        }

        let hours: u64 = parts[0].parse().context("Failed to parse hours")?;
        let minutes: u64 = parts[1].parse().context("Failed to parse minutes")?;
        let seconds: u64 = parts[2].parse().context("Failed to parse seconds")?;
        let millis: u64 = parts[3].parse().context("Failed to parse milliseconds")?;

        if minutes >= 60 || seconds >= 60 || millis >= 1000 {
            return Err(anyhow!("Invalid time components in timestamp: {}", timestamp));
        }

        hours
            .checked_mul(3_600_000)
            .and_then(|ms| ms.checked_add(minutes * 60_000 + seconds * 1_000 + millis))
            .ok_or_else(|| anyhow!("Timestamp out of range: {}", timestamp))
    }

    /// Format a timestamp in milliseconds to SRT format (HH:MM:SS,mmm)
    pub fn format_timestamp(ms: u64) -> String {
        let hours = ms / 3_600_000;
        let minutes = (ms % 3_600_000) / 60_000;
        let seconds = (ms % 60_000) / 1_000;
        let millis = ms % 1_000;

        format!("{:02}:{:02}:{:02},{:03}", hours, minutes, seconds, millis)
    }
}

impl fmt::Display for SubtitleEntry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.seq_num)?;
        writeln!(
            f,
            "{} --> {}",
            Self::format_timestamp(self.start_time_ms),
            Self::format_timestamp(self.end_time_ms)
        )?;
        writeln!(f, "{}", self.text)?;
        writeln!(f)
    }
}

/// Text decoded from a subtitle byte buffer
#[derive(Debug, Clone)]
pub struct DecodedText {
    /// Decoded content without any byte-order mark
    pub text: String,
    /// WHATWG name of the encoding used
    pub encoding: &'static str,
}

/// Detect the encoding of `bytes` and decode them
///
/// A byte-order mark decides the encoding when present; otherwise the
/// detector guesses among UTF-8 and the common legacy encodings.
pub fn decode_bytes(bytes: &[u8]) -> Result<DecodedText, SubtitleError> {
    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        debug!("Byte-order mark found: {}", encoding.name());
        return decode_with(encoding, &bytes[bom_len..]);
    }

    // Binary data (or BOM-less UTF-16) is not something we can read as subtitles
    if bytes.contains(&0) {
        return Err(SubtitleError::DecodeError(
            "buffer contains NUL bytes and does not look like a text subtitle file".to_string(),
        ));
    }

    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    let encoding = detector.guess(None, true);
    debug!("Detected subtitle encoding: {}", encoding.name());

    decode_with(encoding, bytes)
}

fn decode_with(encoding: &'static Encoding, bytes: &[u8]) -> Result<DecodedText, SubtitleError> {
    let text: Cow<'_, str> = encoding
        .decode_without_bom_handling_and_without_replacement(bytes)
        .ok_or_else(|| {
            SubtitleError::DecodeError(format!("content is not valid {}", encoding.name()))
        })?;

    Ok(DecodedText {
        text: text.into_owned(),
        encoding: encoding.name(),
    })
}

/// Ordered collection of subtitle cues with metadata
#[derive(Debug, Clone)]
pub struct SubtitleCollection {
    /// Name of the file the cues came from
    pub source_name: String,

    /// Cues in file order
    pub entries: Vec<SubtitleEntry>,

    /// Encoding the content was decoded with
    pub encoding: String,
}

impl SubtitleCollection {
    /// Create an empty subtitle collection
    pub fn new(source_name: impl Into<String>, encoding: impl Into<String>) -> Self {
        SubtitleCollection {
            source_name: source_name.into(),
            entries: Vec::new(),
            encoding: encoding.into(),
        }
    }

    /// Decode and parse a raw subtitle file
    pub fn from_bytes(source_name: &str, bytes: &[u8], mode: ParseMode) -> Result<Self, SubtitleError> {
        let decoded = decode_bytes(bytes)?;
        let mut collection = Self::new(source_name, decoded.encoding);
        collection.entries = Self::parse_srt_string(&decoded.text, mode)?;

        debug!("Parsed {} cues from {} ({})", collection.entries.len(), source_name, decoded.encoding);
        Ok(collection)
    }

    /// Parse SRT format string into subtitle entries, preserving file order
    ///
    /// In strict mode the first malformed block fails the whole parse; in
    /// lenient mode malformed blocks are skipped with a warning. Content with
    /// no cues at all is an error in both modes.
    pub fn parse_srt_string(content: &str, mode: ParseMode) -> Result<Vec<SubtitleEntry>, SubtitleError> {
        let content = content.trim_start_matches('\u{feff}');
        let mut entries = Vec::new();
        let mut lines = content.lines().enumerate().peekable();
        let mut skipped = 0;

        loop {
            // Blank lines separate blocks
            while lines.next_if(|(_, line)| line.trim().is_empty()).is_some() {}

            let Some(first) = lines.next() else {
                break;
            };

            let mut block = vec![(first.0 + 1, first.1)];
            while let Some((idx, line)) = lines.next_if(|(_, line)| !line.trim().is_empty()) {
                block.push((idx + 1, line));
            }

            match Self::parse_block(&block) {
                Ok(entry) => entries.push(entry),
                Err(e) => match mode {
                    ParseMode::Strict => return Err(e),
                    ParseMode::Lenient => {
                        warn!("Skipping malformed subtitle block: {}", e);
                        skipped += 1;
                    }
                },
            }
        }

        if entries.is_empty() {
            return Err(SubtitleError::ParseError {
                line: content.lines().count().max(1),
                message: "no subtitle cues found".to_string(),
            });
        }

        if skipped > 0 {
            warn!("Skipped {} malformed subtitle block(s), kept {}", skipped, entries.len());
        }

        Ok(entries)
    }

    /// Parse one blank-line separated block: index, timing line, text lines
    fn parse_block(block: &[(usize, &str)]) -> Result<SubtitleEntry, SubtitleError> {
        let (index_line_no, index_line) = block[0];
        let seq_num = index_line.trim().parse::<usize>().map_err(|_| SubtitleError::ParseError {
            line: index_line_no,
            message: format!("expected cue index, found '{}'", index_line.trim()),
        })?;

        let (timing_line_no, timing_line) = block.get(1).copied().ok_or_else(|| SubtitleError::ParseError {
            line: index_line_no,
            message: format!("cue {} has no timing line", seq_num),
        })?;

        let (start_time_ms, end_time_ms) = Self::parse_timing_line(timing_line).map_err(|e| {
            SubtitleError::ParseError {
                line: timing_line_no,
                message: format!("cue {}: {}", seq_num, e),
            }
        })?;

        if end_time_ms < start_time_ms {
            debug!("Cue {} ends before it starts ({} < {})", seq_num, end_time_ms, start_time_ms);
        }

        let text = block[2..]
            .iter()
            .map(|(_, line)| line.trim())
            .collect::<Vec<_>>()
            .join("\n");

        Ok(SubtitleEntry::new(seq_num, start_time_ms, end_time_ms, text))
    }

    /// Parse `start --> end`, ignoring any trailing position coordinates
    fn parse_timing_line(line: &str) -> Result<(u64, u64)> {
        let (start, rest) = line
            .split_once("-->")
            .ok_or_else(|| anyhow!("invalid timing line '{}'", line.trim()))?;
        let end = rest
            .split_whitespace()
            .next()
            .ok_or_else(|| anyhow!("missing end time in '{}'", line.trim()))?;

        Ok((SubtitleEntry::parse_timestamp(start)?, SubtitleEntry::parse_timestamp(end)?))
    }

    /// Cues left after dropping the first `skip` ones
    pub fn dialogue_entries(&self, skip: usize) -> &[SubtitleEntry] {
        self.entries.get(skip..).unwrap_or(&[])
    }

    /// Text of the remaining cues in order, one `\n` between cues
    pub fn dialogue_text(&self, skip: usize) -> String {
        self.dialogue_entries(skip)
            .iter()
            .map(|entry| entry.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl fmt::Display for SubtitleCollection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Subtitle Collection")?;
        writeln!(f, "Source: {}", self.source_name)?;
        writeln!(f, "Encoding: {}", self.encoding)?;
        writeln!(f, "Entries: {}", self.entries.len())?;
        Ok(())
    }
}
