//! # ABC Encoder
//!
//! Converts a token sequence plus the derived render context into the ABC
//! text consumed by the external renderer, together with a human-readable
//! note-name line for the status display.
//!
//! Output shape:
//!
//! ```text
//! X:1
//! T:<title>
//! M:<meter>
//! L:1/8
//! K:<written key>
//! <body lines>
//! ```
//!
//! All durations are expressed against `L:1/8`, so the unit duration is an
//! eighth note and carries no length suffix. Accidentals are always written
//! explicitly (`^`/`_`), never implied by the key signature.

use std::fmt;

use crate::score::{Duration, Token};
use crate::theory::{KeyName, KeySignature};
use crate::transpose::{key_info, Instrument};

// ABC spellings per pitch class, accidental glyph included.
const ABC_SHARP: [&str; 12] = [
    "C", "^C", "D", "^D", "E", "F", "^F", "G", "^G", "A", "^A", "B",
];
const ABC_FLAT: [&str; 12] = [
    "C", "_D", "D", "_E", "E", "F", "_G", "G", "_A", "A", "_B", "B",
];

/// Meter signature. Falls back to 4/4 wherever input is malformed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Meter {
    pub beats: u32,
    pub beat_type: u32,
}

impl Default for Meter {
    fn default() -> Self {
        Self {
            beats: 4,
            beat_type: 4,
        }
    }
}

impl Meter {
    /// Parse `"n/d"`. Returns `None` for anything malformed or zero.
    pub fn parse(s: &str) -> Option<Self> {
        let (num, den) = s.trim().split_once('/')?;
        let beats: u32 = num.trim().parse().ok()?;
        let beat_type: u32 = den.trim().parse().ok()?;
        if beats == 0 || beat_type == 0 {
            return None;
        }
        Some(Self { beats, beat_type })
    }

    /// Malformed or missing input snaps to 4/4.
    pub fn parse_or_default(s: &str) -> Self {
        Self::parse(s).unwrap_or_default()
    }

    /// Measure length on the sixteenth grid. Exact for the power-of-two
    /// beat types the tool accepts (2, 4, 8, 16).
    pub fn measure_sixteenths(&self) -> u32 {
        self.beats * 16 / self.beat_type
    }
}

impl fmt::Display for Meter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.beats, self.beat_type)
    }
}

/// User-facing session settings, as collected by the surrounding UI.
#[derive(Debug, Clone)]
pub struct Settings {
    pub signature: KeySignature,
    pub instrument: Instrument,
    /// Additional semitone shift on top of the instrument transposition.
    pub pitch_shift: i32,
    pub meter: Meter,
    pub title: String,
    pub auto_bars: bool,
    /// Tokens per output line before wrapping. 0 disables wrapping.
    pub wrap_width: usize,
    /// Octave assumed by the free-text entry path when a token carries none.
    pub default_octave: i32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            signature: KeySignature::default(),
            instrument: Instrument::default(),
            pitch_shift: 0,
            meter: Meter::default(),
            title: String::new(),
            auto_bars: true,
            wrap_width: 16,
            default_octave: 4,
        }
    }
}

/// Everything the encoder needs, derived from [`Settings`]. Recomputed on
/// every change; cheap to build.
#[derive(Debug, Clone)]
pub struct RenderContext {
    pub written_key: KeyName,
    pub concert_key: KeyName,
    pub prefer_sharps: bool,
    /// Total concert-to-written shift: instrument plus user pitch shift.
    pub semitones: i32,
    pub meter: Meter,
    pub title: String,
    pub auto_bars: bool,
    pub wrap_width: usize,
}

impl RenderContext {
    pub fn new(settings: &Settings) -> Self {
        let info = key_info(
            &settings.signature,
            settings.instrument,
            settings.pitch_shift,
        );
        Self {
            written_key: info.written,
            concert_key: info.concert,
            prefer_sharps: info.prefer_sharps,
            semitones: info.semitones,
            meter: settings.meter,
            title: settings.title.clone(),
            auto_bars: settings.auto_bars,
            wrap_width: settings.wrap_width,
        }
    }
}

/// Encoder result: the full ABC text and the note-name display line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbcOutput {
    pub abc: String,
    pub names: String,
}

/// ABC length string for a duration on the sixteenth grid, against `L:1/8`.
/// The eighth (2 sixteenths) is the unit and carries no suffix.
fn length_text(sixteenths: u32) -> String {
    match sixteenths {
        1 => "/".to_string(),
        2 => String::new(),
        s if s % 2 == 0 => (s / 2).to_string(),
        s => format!("{}/2", s),
    }
}

fn length_suffix(duration: Duration) -> String {
    length_text(duration.sixteenths())
}

/// ABC note token (no duration) for an absolute note number. 60 maps to the
/// bare uppercase `C`; octave 5 is lowercase; further octaves add `'` above
/// and `,` below.
pub fn midi_to_abc(midi: i32, use_sharps: bool) -> String {
    let pc = midi.rem_euclid(12) as usize;
    let octave = midi.div_euclid(12) - 1;
    let name = if use_sharps {
        ABC_SHARP[pc]
    } else {
        ABC_FLAT[pc]
    };

    let (prefix, letter) = if let Some(rest) = name.strip_prefix('^') {
        ("^", rest)
    } else if let Some(rest) = name.strip_prefix('_') {
        ("_", rest)
    } else {
        ("", name)
    };

    let mut out = String::from(prefix);
    if octave >= 5 {
        out.push_str(&letter.to_ascii_lowercase());
    } else {
        out.push_str(letter);
    }
    if octave > 5 {
        for _ in 0..(octave - 5) {
            out.push('\'');
        }
    } else if octave < 4 {
        for _ in 0..(4 - octave) {
            out.push(',');
        }
    }
    out
}

/// Encode a token sequence to ABC. Pure and idempotent: identical inputs
/// produce byte-identical output.
pub fn to_abc(tokens: &[Token], ctx: &RenderContext) -> AbcOutput {
    let measure_len = match ctx.meter.measure_sixteenths() {
        0 => 16,
        len => len,
    };

    let mut body: Vec<String> = Vec::new();
    let mut names: Vec<String> = Vec::new();
    // Elapsed sixteenths within the current measure.
    let mut elapsed: u32 = 0;

    for token in tokens {
        match *token {
            Token::Bar => {
                body.push("|".to_string());
                names.push("|".to_string());
                elapsed = 0;
                continue;
            }
            Token::Newline => {
                body.push("\n".to_string());
                names.push("\n".to_string());
                elapsed = 0;
                continue;
            }
            Token::Rest { duration } => {
                let text = format!("z{}", length_suffix(duration));
                body.push(text.clone());
                names.push(text);
                elapsed += duration.sixteenths();
            }
            Token::Note {
                midi,
                duration,
                slur_start,
                slur_stop,
            } => {
                let written = midi + ctx.semitones;
                let note_text = midi_to_abc(written, ctx.prefer_sharps);
                let mut text = String::new();
                if slur_start {
                    text.push('(');
                }
                text.push_str(&note_text);
                text.push_str(&length_suffix(duration));
                if slur_stop {
                    text.push(')');
                }
                body.push(text);
                names.push(note_text);
                elapsed += duration.sixteenths();
            }
        }

        // A single long note may overflow one or more implicit bar lines;
        // no splitting or tying is performed.
        if ctx.auto_bars {
            while elapsed >= measure_len {
                body.push("|".to_string());
                names.push("|".to_string());
                elapsed -= measure_len;
            }
        }
    }

    if body.is_empty() {
        // Invisible full-measure rest so the renderer draws a blank system
        // instead of failing on an empty body.
        body.push(format!("x{}", length_text(measure_len)));
    }

    let mut lines: Vec<String> = Vec::new();
    let mut line: Vec<String> = Vec::new();
    for tok in body {
        if tok == "\n" {
            lines.push(line.join(" "));
            line.clear();
            continue;
        }
        line.push(tok);
        if ctx.wrap_width > 0 && line.len() >= ctx.wrap_width {
            lines.push(line.join(" "));
            line.clear();
        }
    }
    if !line.is_empty() {
        lines.push(line.join(" "));
    }

    let mut abc = String::new();
    abc.push_str("X:1\n");
    abc.push_str(&format!("T:{}\n", ctx.title));
    abc.push_str(&format!("M:{}\n", ctx.meter));
    abc.push_str("L:1/8\n");
    abc.push_str(&format!("K:{}\n", ctx.written_key.spelled()));
    abc.push_str(&lines.join("\n"));

    AbcOutput {
        abc,
        names: names.join(" "),
    }
}
