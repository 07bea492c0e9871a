//! # Token Model
//!
//! The ordered sequence of musical events collected during note entry,
//! shared between the staff-click path and the free-text parser, and
//! consumed by the ABC encoder.
//!
//! ## Key Concepts
//!
//! ### Duration
//! A closed five-value grid in eighth-note units (sixteenth through whole).
//! Anything outside the grid never enters the model; the lossy constructor
//! applies the defined base-unit fallback at the numeric boundary.
//!
//! ### Pending accidental
//! A transient flat/natural/sharp set by the UI is consumed by exactly the
//! next pushed note and then reset. It adjusts the concert pitch directly
//! and is independent of the key signature's implied accidentals.

/// Note duration on the eighth-note grid (`L:1/8`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Duration {
    Sixteenth,
    #[default]
    Eighth,
    Quarter,
    Half,
    Whole,
}

impl Duration {
    /// Duration in eighth-note units.
    pub fn units(self) -> f64 {
        match self {
            Duration::Sixteenth => 0.5,
            Duration::Eighth => 1.0,
            Duration::Quarter => 2.0,
            Duration::Half => 4.0,
            Duration::Whole => 8.0,
        }
    }

    /// Duration on the integer sixteenth grid, used for bar arithmetic.
    pub fn sixteenths(self) -> u32 {
        match self {
            Duration::Sixteenth => 1,
            Duration::Eighth => 2,
            Duration::Quarter => 4,
            Duration::Half => 8,
            Duration::Whole => 16,
        }
    }

    /// Exact match against the five grid values.
    pub fn from_units(units: f64) -> Option<Self> {
        if units == 0.5 {
            Some(Duration::Sixteenth)
        } else if units == 1.0 {
            Some(Duration::Eighth)
        } else if units == 2.0 {
            Some(Duration::Quarter)
        } else if units == 4.0 {
            Some(Duration::Half)
        } else if units == 8.0 {
            Some(Duration::Whole)
        } else {
            None
        }
    }

    /// Off-grid values render as the base unit. Defined fallback, not an
    /// error.
    pub fn from_units_lossy(units: f64) -> Self {
        Self::from_units(units).unwrap_or_default()
    }
}

/// Transient accidental override applied to the next entered note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Accidental {
    Flat,
    #[default]
    Natural,
    Sharp,
}

impl Accidental {
    pub fn semitones(self) -> i32 {
        match self {
            Accidental::Flat => -1,
            Accidental::Natural => 0,
            Accidental::Sharp => 1,
        }
    }
}

/// A single entered event. Note pitches are concert-pitch note numbers
/// (60 = middle C); transposition happens at encoding time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    Note {
        midi: i32,
        duration: Duration,
        slur_start: bool,
        slur_stop: bool,
    },
    Rest {
        duration: Duration,
    },
    Bar,
    /// Forces a line break in the output, independent of auto-bar logic.
    Newline,
}

/// The composition in entry order. Owned by one session; append, pop-last
/// and clear are the only mutations.
#[derive(Debug, Clone, Default)]
pub struct Score {
    tokens: Vec<Token>,
    pending_accidental: Accidental,
}

impl Score {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_tokens(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            pending_accidental: Accidental::Natural,
        }
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Arm an accidental for the next note. Replaces any previous pending
    /// accidental.
    pub fn set_pending_accidental(&mut self, accidental: Accidental) {
        self.pending_accidental = accidental;
    }

    pub fn pending_accidental(&self) -> Accidental {
        self.pending_accidental
    }

    /// Append a note at concert pitch. Consumes the pending accidental.
    pub fn push_note(&mut self, midi: i32, duration: Duration) {
        self.push_note_slurred(midi, duration, false, false);
    }

    /// Append a note carrying slur boundary flags.
    pub fn push_note_slurred(
        &mut self,
        midi: i32,
        duration: Duration,
        slur_start: bool,
        slur_stop: bool,
    ) {
        let midi = midi + self.pending_accidental.semitones();
        self.pending_accidental = Accidental::Natural;
        self.tokens.push(Token::Note {
            midi,
            duration,
            slur_start,
            slur_stop,
        });
    }

    pub fn push_rest(&mut self, duration: Duration) {
        self.tokens.push(Token::Rest { duration });
    }

    pub fn push_bar(&mut self) {
        self.tokens.push(Token::Bar);
    }

    pub fn push_newline(&mut self) {
        self.tokens.push(Token::Newline);
    }

    /// Remove the most recently appended token. No-op on an empty score.
    pub fn undo(&mut self) -> Option<Token> {
        self.tokens.pop()
    }

    pub fn clear(&mut self) {
        self.tokens.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_grid() {
        assert_eq!(Duration::from_units(0.5), Some(Duration::Sixteenth));
        assert_eq!(Duration::from_units(1.0), Some(Duration::Eighth));
        assert_eq!(Duration::from_units(8.0), Some(Duration::Whole));
        assert_eq!(Duration::from_units(3.0), None);
        assert_eq!(Duration::from_units(0.0), None);
    }

    #[test]
    fn test_off_grid_duration_falls_back_to_base_unit() {
        assert_eq!(Duration::from_units_lossy(3.0), Duration::Eighth);
        assert_eq!(Duration::from_units_lossy(-1.0), Duration::Eighth);
    }

    #[test]
    fn test_pending_accidental_consumed_once() {
        let mut score = Score::new();
        score.set_pending_accidental(Accidental::Sharp);
        score.push_note(60, Duration::Eighth);
        score.push_note(60, Duration::Eighth);

        assert_eq!(
            score.tokens()[0],
            Token::Note {
                midi: 61,
                duration: Duration::Eighth,
                slur_start: false,
                slur_stop: false,
            }
        );
        // The second note is unaffected.
        assert_eq!(
            score.tokens()[1],
            Token::Note {
                midi: 60,
                duration: Duration::Eighth,
                slur_start: false,
                slur_stop: false,
            }
        );
        assert_eq!(score.pending_accidental(), Accidental::Natural);
    }

    #[test]
    fn test_flat_override() {
        let mut score = Score::new();
        score.set_pending_accidental(Accidental::Flat);
        score.push_note(64, Duration::Quarter);
        assert!(matches!(score.tokens()[0], Token::Note { midi: 63, .. }));
    }

    #[test]
    fn test_undo_is_noop_on_empty() {
        let mut score = Score::new();
        assert_eq!(score.undo(), None);

        score.push_bar();
        assert_eq!(score.undo(), Some(Token::Bar));
        assert!(score.is_empty());
    }

    #[test]
    fn test_clear() {
        let mut score = Score::new();
        score.push_note(60, Duration::Eighth);
        score.push_rest(Duration::Half);
        score.push_newline();
        assert_eq!(score.len(), 3);
        score.clear();
        assert!(score.is_empty());
    }
}
