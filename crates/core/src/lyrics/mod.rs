//! Parser for line based, timestamped lyric files.
//!
//! Each line may carry one or more `[MM:SS.mmm]` time tags followed by free
//! text. A line whose only content is a bracketed section label such as
//! `[Verse 1]` displays the label itself. Anything that does not fit the
//! format is dropped silently: an empty track is a valid "no lyrics" state.

use std::{path::Path, sync::LazyLock};

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::Result;

static TIME_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[([0-9]{2}):([0-9]{2})\.([0-9]{3})\]").expect("time tag pattern is valid")
});

static SECTION_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[([A-Za-z0-9_]+\s*[0-9]*)\]").expect("section label pattern is valid")
});

/// A single timestamped lyric entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LyricLine {
    /// Offset from the start of the track, in seconds.
    pub time: f64,
    pub text: String,
}

impl LyricLine {
    pub fn new(time: f64, text: impl Into<String>) -> Self {
        Self {
            time,
            text: text.into(),
        }
    }
}

/// Parses lyric source text into entries sorted ascending by time.
///
/// One entry is emitted per time tag, so `[00:10.000][00:20.000]Echo` yields
/// two entries sharing the same text. Ties keep their source order.
pub fn parse_lrc(source: &str) -> Vec<LyricLine> {
    let mut lines = Vec::new();

    for raw in source.lines() {
        if raw.trim().is_empty() {
            continue;
        }

        let times: Vec<f64> = TIME_TAG.captures_iter(raw).map(|caps| tag_seconds(&caps)).collect();
        if times.is_empty() {
            continue;
        }

        let Some(text) = resolve_text(raw) else {
            continue;
        };

        for time in times {
            lines.push(LyricLine::new(time, text.clone()));
        }
    }

    lines.sort_by(|a, b| a.time.total_cmp(&b.time));
    lines
}

fn tag_seconds(caps: &regex::Captures<'_>) -> f64 {
    let field = |index: usize| {
        caps.get(index)
            .and_then(|m| m.as_str().parse::<u32>().ok())
            .unwrap_or(0)
    };

    f64::from(field(1)) * 60.0 + f64::from(field(2)) + f64::from(field(3)) / 1000.0
}

/// Text shown for a tagged line once its time tags are removed.
fn resolve_text(raw: &str) -> Option<String> {
    let stripped = TIME_TAG.replace_all(raw, "");
    let content = stripped.trim();

    // A bare `[Verse 1]` after the tags is promoted to its label.
    if let Some(caps) = SECTION_LABEL.captures(content) {
        if caps.get(0).map(|m| m.len()) == Some(content.len()) {
            return caps.get(1).map(|m| m.as_str().trim().to_string());
        }
    }

    if !content.is_empty() {
        return Some(content.to_string());
    }

    SECTION_LABEL
        .captures(raw)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|label| !label.is_empty())
}

/// An immutable, time-ordered lyric sequence for one loaded track.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LyricTrack {
    lines: Vec<LyricLine>,
}

impl LyricTrack {
    /// Parses lyric source text.
    pub fn parse(source: &str) -> Self {
        let lines = parse_lrc(source);
        tracing::debug!(lines = lines.len(), "parsed lyric track");
        Self { lines }
    }

    /// Reads and parses a lyric file from disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let source = std::fs::read_to_string(path.as_ref())?;
        Ok(Self::parse(&source))
    }

    /// Builds a track from already-timed lines, sorting them by time.
    pub fn from_lines(mut lines: Vec<LyricLine>) -> Self {
        lines.sort_by(|a, b| a.time.total_cmp(&b.time));
        Self { lines }
    }

    pub fn lines(&self) -> &[LyricLine] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&LyricLine> {
        self.lines.get(index)
    }

    pub fn first_time(&self) -> Option<f64> {
        self.lines.first().map(|line| line.time)
    }

    pub fn last_time(&self) -> Option<f64> {
        self.lines.last().map(|line| line.time)
    }

    /// Time between line `index` and the next one. `None` for the last line
    /// or an out-of-range index.
    pub fn duration_after(&self, index: usize) -> Option<f64> {
        let current = self.lines.get(index)?;
        let next = self.lines.get(index.checked_add(1)?)?;
        Some(next.time - current.time)
    }
}

/// Formats a playback position as `MM:SS` for progress displays.
pub fn format_timestamp(seconds: f64) -> String {
    if !seconds.is_finite() || seconds < 0.0 {
        return "00:00".to_string();
    }

    let whole = seconds.floor() as u64;
    format!("{:02}:{:02}", whole / 60, whole % 60)
}

/// Formats a position as a `[MM:SS.mmm]` time tag.
pub fn format_tag(seconds: f64) -> String {
    let millis = if seconds.is_finite() && seconds > 0.0 {
        (seconds * 1000.0).round() as u64
    } else {
        0
    };

    format!(
        "[{:02}:{:02}.{:03}]",
        millis / 60_000,
        (millis / 1000) % 60,
        millis % 1000
    )
}
