//! Instrument transposition and written-key derivation.
//!
//! Input pitches are concert pitch; the written part for a transposing
//! clarinet differs by a fixed interval. A Bb clarinet sounds a major 2nd
//! lower than written, so written = concert + 2, and so on for the A and Eb
//! instruments. The table is closed and not user-extensible.

use crate::theory::{KeyName, KeySignature};

/// The supported transposing instruments plus concert pitch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Instrument {
    Concert,
    #[default]
    Bb,
    A,
    Eb,
}

impl Instrument {
    /// Parse from string (case-insensitive). Unknown identifiers are not an
    /// instrument; callers treat them as concert pitch per the "else 0"
    /// rule in the transposition table.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "bb" => Some(Instrument::Bb),
            "a" => Some(Instrument::A),
            "eb" => Some(Instrument::Eb),
            "c" | "none" | "concert" => Some(Instrument::Concert),
            _ => None,
        }
    }

    /// Semitones added to a concert pitch to obtain the written pitch.
    pub fn semitones(self) -> i32 {
        match self {
            Instrument::Bb => 2,
            Instrument::A => 3,
            Instrument::Eb => -3,
            Instrument::Concert => 0,
        }
    }
}

/// Derived key information, recomputed on every settings change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyInfo {
    /// The concert key, for the reference display.
    pub concert: KeyName,
    /// The key as written in the transposed part.
    pub written: KeyName,
    pub prefer_sharps: bool,
    /// Total semitone shift from concert to written pitch, instrument plus
    /// user pitch shift.
    pub semitones: i32,
}

/// Derive the concert and written keys for a signature, instrument and
/// additional user pitch shift. Both names keep the signature's spelling
/// preference.
pub fn key_info(signature: &KeySignature, instrument: Instrument, pitch_shift: i32) -> KeyInfo {
    let concert = signature.key_name();
    let semitones = instrument.semitones() + pitch_shift;
    let written = KeyName::new(
        concert.root.shifted(semitones),
        concert.spelling,
        concert.mode,
    );
    KeyInfo {
        concert,
        written,
        prefer_sharps: signature.prefer_sharps(),
        semitones,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theory::{AccidentalType, Mode, PitchClass};

    #[test]
    fn test_transposition_table() {
        assert_eq!(Instrument::Bb.semitones(), 2);
        assert_eq!(Instrument::A.semitones(), 3);
        assert_eq!(Instrument::Eb.semitones(), -3);
        assert_eq!(Instrument::Concert.semitones(), 0);
    }

    #[test]
    fn test_from_str() {
        assert_eq!(Instrument::from_str("Bb"), Some(Instrument::Bb));
        assert_eq!(Instrument::from_str("eb"), Some(Instrument::Eb));
        assert_eq!(Instrument::from_str("none"), Some(Instrument::Concert));
        assert_eq!(Instrument::from_str("C"), Some(Instrument::Concert));
        assert_eq!(Instrument::from_str("tuba"), None);
    }

    #[test]
    fn test_transposition_round_trip() {
        // Shifting up by the instrument offset and back down again returns
        // the original pitch for every instrument.
        for instrument in [Instrument::Bb, Instrument::A, Instrument::Eb] {
            for midi in [48, 60, 72] {
                let written = midi + instrument.semitones();
                assert_eq!(written - instrument.semitones(), midi);
            }
        }
    }

    #[test]
    fn test_written_key_for_bb_clarinet() {
        // Concert D major for a Bb clarinet is written in E major.
        let sig = KeySignature::new(AccidentalType::Sharps, 2, Mode::Major);
        let info = key_info(&sig, Instrument::Bb, 0);
        assert_eq!(info.concert.root, PitchClass::new(2));
        assert_eq!(info.written.root, PitchClass::new(4));
        assert_eq!(info.written.spelled(), "E");
        assert_eq!(info.semitones, 2);
    }

    #[test]
    fn test_written_key_wraps_for_eb_clarinet() {
        // Concert C major down a minor 3rd lands on A.
        let sig = KeySignature::new(AccidentalType::Sharps, 0, Mode::Major);
        let info = key_info(&sig, Instrument::Eb, 0);
        assert_eq!(info.written.spelled(), "A");
    }

    #[test]
    fn test_pitch_shift_stacks_with_instrument() {
        let sig = KeySignature::new(AccidentalType::Sharps, 0, Mode::Major);
        let info = key_info(&sig, Instrument::Bb, -12);
        assert_eq!(info.semitones, -10);
        // An octave drop does not change the written key's pitch class.
        assert_eq!(info.written.spelled(), "D");
    }

    #[test]
    fn test_flat_signature_keeps_flat_spelling() {
        // Concert Bb major for Bb clarinet is written C major, spelled from
        // the flat table.
        let sig = KeySignature::new(AccidentalType::Flats, 2, Mode::Major);
        let info = key_info(&sig, Instrument::Bb, 0);
        assert!(!info.prefer_sharps);
        assert_eq!(info.concert.spelled(), "Bb");
        assert_eq!(info.written.spelled(), "C");
    }
}
