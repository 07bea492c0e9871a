//! # Free-Text Note Entry
//!
//! The alternate entry path: a freeform string of note tokens is parsed
//! into the same token model the staff-click path produces.
//!
//! ## Grammar
//!
//! Tokens are separated by whitespace or commas. Each token is either a
//! literal `|` (bar line) or a note: one letter `A`..`H` (case-insensitive,
//! German `H` is B natural), an optional `#`/`b` accidental and an optional
//! signed integer octave. A lowercase letter without an explicit octave
//! sits one octave above the session default. Anything else is dropped,
//! not reported; callers who need validation feedback diff the input token
//! count against the accepted count via [`ParseOutcome::dropped`].
//!
//! An optional YAML front-matter block between `---` markers at the top of
//! the input carries the session settings (title, meter, key signature,
//! instrument and entry preferences).

use serde::Deserialize;

use crate::abc::{Meter, Settings};
use crate::error::NotationError;
use crate::score::{Duration, Token};
use crate::theory::{AccidentalType, KeySignature, Mode};
use crate::transpose::Instrument;

/// Result of tokenizing a free-text input line. Unknown tokens land in
/// `dropped` instead of raising an error.
#[derive(Debug, Clone, Default)]
pub struct ParseOutcome {
    pub tokens: Vec<Token>,
    pub dropped: Vec<String>,
}

/// Raw front-matter fields before validation and clamping.
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", default)]
struct RawConfig {
    title: Option<String>,
    meter: Option<String>,
    accidental_type: Option<String>,
    accidental_count: Option<serde_yaml::Value>,
    mode: Option<String>,
    instrument: Option<String>,
    auto_bars: Option<bool>,
    wrap_width: Option<i64>,
    pitch_shift: Option<i64>,
    default_octave: Option<i64>,
}

/// A parsed input: the session settings from the front matter (or the
/// defaults) and the tokenized note line.
#[derive(Debug, Clone)]
pub struct ParsedSource {
    pub settings: Settings,
    pub outcome: ParseOutcome,
}

fn letter_semitone(letter: char) -> Option<i32> {
    match letter.to_ascii_uppercase() {
        'C' => Some(0),
        'D' => Some(2),
        'E' => Some(4),
        'F' => Some(5),
        'G' => Some(7),
        'A' => Some(9),
        'B' | 'H' => Some(11),
        _ => None,
    }
}

fn parse_note(token: &str, default_octave: i32) -> Option<i32> {
    let mut chars = token.chars();
    let letter = chars.next()?;
    let semitone = letter_semitone(letter)?;
    let is_lower = letter.is_ascii_lowercase();

    let rest = chars.as_str();
    let (accidental, rest) = match rest.bytes().next() {
        Some(b'#') => (1, &rest[1..]),
        Some(b'b') => (-1, &rest[1..]),
        _ => (0, rest),
    };

    let octave = if rest.is_empty() {
        // Lowercase input shifts up one octave when no octave is written.
        default_octave + i32::from(is_lower)
    } else {
        if rest.starts_with('+') {
            return None;
        }
        rest.parse::<i32>().ok()?
    };

    // Pitch 60 = octave 4, semitone 0.
    Some(12 * (octave + 1) + semitone + accidental)
}

/// Tokenize a free-text note line. Note durations default to the base unit.
pub fn parse_tokens(input: &str, default_octave: i32) -> ParseOutcome {
    let mut outcome = ParseOutcome::default();

    for raw in input
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
    {
        if raw == "|" {
            outcome.tokens.push(Token::Bar);
            continue;
        }
        match parse_note(raw, default_octave) {
            Some(midi) => outcome.tokens.push(Token::Note {
                midi,
                duration: Duration::default(),
                slur_start: false,
                slur_stop: false,
            }),
            None => outcome.dropped.push(raw.to_string()),
        }
    }

    outcome
}

/// Split an optional front-matter block (between `---` markers at the top)
/// from the note text.
fn extract_front_matter(source: &str) -> (Option<String>, &str) {
    let trimmed = source.trim_start();
    let Some(after_open) = trimmed.strip_prefix("---") else {
        return (None, source);
    };
    let Some((block, rest)) = after_open.split_once("\n---") else {
        return (None, source);
    };
    let rest = rest.strip_prefix('\n').unwrap_or(rest);
    (Some(block.trim_start_matches('\n').to_string()), rest)
}

/// The lenient integer rule applied to every count-like input: parse as an
/// integer, snap failures to the lower bound, clamp the rest.
fn clamped_count(value: &serde_yaml::Value) -> i32 {
    let parsed = match value {
        serde_yaml::Value::Number(n) => n.as_i64().unwrap_or(0),
        serde_yaml::Value::String(s) => s.trim().parse::<i64>().unwrap_or(0),
        _ => 0,
    };
    parsed.clamp(0, 7) as i32
}

fn settings_from_config(raw: RawConfig) -> Settings {
    let mut settings = Settings::default();

    if let Some(title) = raw.title {
        settings.title = title;
    }
    if let Some(meter) = &raw.meter {
        settings.meter = Meter::parse_or_default(meter);
    }

    let accidental_type = raw
        .accidental_type
        .as_deref()
        .and_then(AccidentalType::from_str)
        .unwrap_or_default();
    let mode = raw
        .mode
        .as_deref()
        .and_then(Mode::from_str)
        .unwrap_or_default();
    let count = raw.accidental_count.as_ref().map(clamped_count).unwrap_or(0);
    settings.signature = KeySignature::new(accidental_type, count, mode);

    if let Some(instrument) = &raw.instrument {
        // Unknown identifiers transpose by 0, same as "none".
        settings.instrument = Instrument::from_str(instrument).unwrap_or(Instrument::Concert);
    }
    if let Some(auto_bars) = raw.auto_bars {
        settings.auto_bars = auto_bars;
    }
    if let Some(wrap_width) = raw.wrap_width {
        settings.wrap_width = wrap_width.max(0) as usize;
    }
    if let Some(pitch_shift) = raw.pitch_shift {
        settings.pitch_shift = pitch_shift as i32;
    }
    if let Some(default_octave) = raw.default_octave {
        settings.default_octave = default_octave.clamp(1, 8) as i32;
    }

    settings
}

/// Parse a complete text input: optional front matter followed by the note
/// line(s). A malformed front-matter block is a metadata error; everything
/// after it degrades silently per the token grammar.
pub fn parse_source(source: &str) -> Result<ParsedSource, NotationError> {
    let (front_matter, body) = extract_front_matter(source);

    let settings = match front_matter {
        Some(block) => {
            let raw: RawConfig = serde_yaml::from_str(&block)
                .map_err(|e| NotationError::MetadataError(e.to_string()))?;
            settings_from_config(raw)
        }
        None => Settings::default(),
    };

    let outcome = parse_tokens(body, settings.default_octave);
    Ok(ParsedSource { settings, outcome })
}
