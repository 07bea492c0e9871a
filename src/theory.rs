//! # Key and Pitch-Class Theory
//!
//! Table-driven key-signature resolution and enharmonic naming.
//!
//! The mapping from (accidental count, type, mode) to a concrete key name has
//! irregular edge cases at the boundary (C#/Cb major, the German H/B swap),
//! so the tables are encoded exhaustively instead of being derived from
//! circle-of-fifths arithmetic.
//!
//! ## Key Concepts
//!
//! ### KeySignature
//! The externally supplied triple: accidental type (sharps/flats), count
//! (clamped to 0..=7) and mode (major/minor). This is the only key input the
//! engine accepts; key *names* are produced for display, never consumed from
//! the UI.
//!
//! ### KeyName
//! A structured record of root pitch class, spelling preference and mode.
//! The combined string form ("F#", "Ebm") exists only at the rendering
//! boundary via [`KeyName::spelled`] and the parsing boundary via
//! [`KeyName::parse`].

/// Chromatic pitch class, C = 0. Always reduced modulo 12 with a
/// non-negative representative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PitchClass(u8);

impl PitchClass {
    pub fn new(semitones: i32) -> Self {
        Self(semitones.rem_euclid(12) as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Shift by a signed semitone offset, wrapping within the octave.
    pub fn shifted(self, semitones: i32) -> Self {
        Self::new(self.0 as i32 + semitones)
    }
}

/// Accidental type of a key signature, doubling as the spelling preference
/// for enharmonic names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccidentalType {
    #[default]
    Sharps,
    Flats,
}

impl AccidentalType {
    /// Parse from string (case-insensitive). Accepts singular and plural.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "sharp" | "sharps" => Some(AccidentalType::Sharps),
            "flat" | "flats" => Some(AccidentalType::Flats),
            _ => None,
        }
    }
}

/// Mode of a key signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Major,
    Minor,
}

impl Mode {
    /// Parse from string (case-insensitive).
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "major" => Some(Mode::Major),
            "minor" => Some(Mode::Minor),
            _ => None,
        }
    }
}

// Canonical key names indexed by accidental count. The count-7 entries are
// the theoretical spellings (C# major, Cb major and relatives).
const KEYS_MAJOR_SHARPS: [&str; 8] = ["C", "G", "D", "A", "E", "B", "F#", "C#"];
const KEYS_MAJOR_FLATS: [&str; 8] = ["C", "F", "Bb", "Eb", "Ab", "Db", "Gb", "Cb"];
const KEYS_MINOR_SHARPS: [&str; 8] = ["Am", "Em", "Bm", "F#m", "C#m", "G#m", "D#m", "A#m"];
const KEYS_MINOR_FLATS: [&str; 8] = ["Am", "Dm", "Gm", "Cm", "Fm", "Bbm", "Ebm", "Abm"];

// Display spellings per pitch class. Flat index 11 is the theoretical Cb.
const NAMES_SHARP: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];
const NAMES_FLAT: [&str; 12] = [
    "C", "Db", "D", "Eb", "E", "F", "Gb", "G", "Ab", "A", "Bb", "Cb",
];

/// A key signature as selected in the UI: accidental type, count and mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeySignature {
    pub accidental_type: AccidentalType,
    count: u8,
    pub mode: Mode,
}

impl KeySignature {
    /// Build a signature, clamping the count to 0..=7.
    pub fn new(accidental_type: AccidentalType, count: i32, mode: Mode) -> Self {
        Self {
            accidental_type,
            count: count.clamp(0, 7) as u8,
            mode,
        }
    }

    pub fn count(&self) -> u8 {
        self.count
    }

    /// Canonical key name for this signature, straight from the tables.
    pub fn name(&self) -> &'static str {
        let idx = self.count.min(7) as usize;
        match (self.accidental_type, self.mode) {
            (AccidentalType::Sharps, Mode::Major) => KEYS_MAJOR_SHARPS[idx],
            (AccidentalType::Sharps, Mode::Minor) => KEYS_MINOR_SHARPS[idx],
            (AccidentalType::Flats, Mode::Major) => KEYS_MAJOR_FLATS[idx],
            (AccidentalType::Flats, Mode::Minor) => KEYS_MINOR_FLATS[idx],
        }
    }

    /// Sharp spelling is used unless the signature actually carries flats.
    /// C major / A minor (count 0) spell with sharps either way.
    pub fn prefer_sharps(&self) -> bool {
        !(self.accidental_type == AccidentalType::Flats && self.count > 0)
    }

    /// Spelling preference as an [`AccidentalType`].
    pub fn spelling(&self) -> AccidentalType {
        if self.prefer_sharps() {
            AccidentalType::Sharps
        } else {
            AccidentalType::Flats
        }
    }

    /// Root pitch class of this signature's key.
    pub fn pitch_class(&self) -> PitchClass {
        key_name_to_pitch_class(self.name())
    }

    /// Structured key name for this signature.
    pub fn key_name(&self) -> KeyName {
        KeyName {
            root: self.pitch_class(),
            spelling: self.spelling(),
            mode: self.mode,
        }
    }
}

/// Look up a root letter name (possibly with `#`/`b` suffix) in the closed
/// enharmonic table. Covers all twelve pitch classes plus the theoretical
/// spellings and German `H`. Returns `None` for anything else.
pub fn lookup_root(root: &str) -> Option<PitchClass> {
    let pc = match root {
        "C" | "B#" => 0,
        "C#" | "Db" => 1,
        "D" => 2,
        "D#" | "Eb" => 3,
        "E" | "Fb" => 4,
        "F" | "E#" => 5,
        "F#" | "Gb" => 6,
        "G" => 7,
        "G#" | "Ab" => 8,
        "A" => 9,
        "A#" | "Bb" => 10,
        "B" | "H" | "Cb" => 11,
        _ => return None,
    };
    Some(PitchClass(pc))
}

/// Pitch class of a key name, minor suffix tolerated. Unrecognized roots
/// snap to C; use [`lookup_root`] when the caller needs to observe the miss.
pub fn key_name_to_pitch_class(name: &str) -> PitchClass {
    let root = name.strip_suffix('m').unwrap_or(name);
    lookup_root(root).unwrap_or_default()
}

/// A key name split into its three concerns: root pitch class, enharmonic
/// spelling preference and mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyName {
    pub root: PitchClass,
    pub spelling: AccidentalType,
    pub mode: Mode,
}

impl KeyName {
    pub fn new(root: PitchClass, spelling: AccidentalType, mode: Mode) -> Self {
        Self {
            root,
            spelling,
            mode,
        }
    }

    /// Parse a combined key-name string ("F#", "Ebm", "H"). The spelling
    /// preference is taken from the written accidental; unknown roots snap
    /// to C like everywhere else.
    pub fn parse(name: &str) -> Self {
        let mode = if name.len() > 1 && name.ends_with('m') {
            Mode::Minor
        } else {
            Mode::Major
        };
        let root_str = if mode == Mode::Minor {
            &name[..name.len() - 1]
        } else {
            name
        };
        let spelling = if root_str.len() > 1 && root_str.ends_with('b') {
            AccidentalType::Flats
        } else {
            AccidentalType::Sharps
        };
        Self {
            root: lookup_root(root_str).unwrap_or_default(),
            spelling,
            mode,
        }
    }

    /// Combined string form for the external interface, e.g. "F#" or "Ebm".
    pub fn spelled(&self) -> String {
        let names = match self.spelling {
            AccidentalType::Sharps => &NAMES_SHARP,
            AccidentalType::Flats => &NAMES_FLAT,
        };
        let root = names[self.root.value() as usize];
        match self.mode {
            Mode::Major => root.to_string(),
            Mode::Minor => format!("{}m", root),
        }
    }

    /// German spelling convention: B natural becomes H, Bb becomes B. All
    /// other roots are unchanged. Independent of mode.
    pub fn german(&self) -> String {
        let spelled = self.spelled();
        let (root, suffix) = match self.mode {
            Mode::Minor => (&spelled[..spelled.len() - 1], "m"),
            Mode::Major => (spelled.as_str(), ""),
        };
        let mapped = match root {
            "B" => "H",
            "Bb" => "B",
            other => other,
        };
        format!("{}{}", mapped, suffix)
    }

    /// Human-readable German label, "D-Dur" or "Cm" -> "C-Moll".
    pub fn describe(&self) -> String {
        let german = self.german();
        let root = match self.mode {
            Mode::Minor => &german[..german.len() - 1],
            Mode::Major => german.as_str(),
        };
        match self.mode {
            Mode::Major => format!("{}-Dur", root),
            Mode::Minor => format!("{}-Moll", root),
        }
    }
}

/// Inverse of [`key_name_to_pitch_class`]: name a pitch class using the
/// given spelling preference, appending `m` for minor keys.
pub fn pitch_class_to_key_name(pc: PitchClass, mode: Mode, prefer_sharps: bool) -> KeyName {
    let spelling = if prefer_sharps {
        AccidentalType::Sharps
    } else {
        AccidentalType::Flats
    };
    KeyName::new(pc, spelling, mode)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_all_signatures() {
        for count in 0..=7 {
            for ty in [AccidentalType::Sharps, AccidentalType::Flats] {
                for mode in [Mode::Major, Mode::Minor] {
                    let sig = KeySignature::new(ty, count, mode);
                    let name = sig.name();
                    assert!(!name.is_empty());
                    assert_eq!(name.ends_with('m'), mode == Mode::Minor);
                }
            }
        }
    }

    #[test]
    fn test_count_clamps_instead_of_panicking() {
        let high = KeySignature::new(AccidentalType::Sharps, 99, Mode::Major);
        assert_eq!(high.count(), 7);
        assert_eq!(high.name(), "C#");

        let low = KeySignature::new(AccidentalType::Flats, -3, Mode::Minor);
        assert_eq!(low.count(), 0);
        assert_eq!(low.name(), "Am");
    }

    #[test]
    fn test_two_sharps_major_is_d() {
        let sig = KeySignature::new(AccidentalType::Sharps, 2, Mode::Major);
        assert_eq!(sig.name(), "D");
        assert_eq!(sig.pitch_class(), PitchClass::new(2));
    }

    #[test]
    fn test_pitch_class_round_trip_major() {
        for pc in 0..12 {
            for prefer_sharps in [true, false] {
                let name = pitch_class_to_key_name(PitchClass::new(pc), Mode::Major, prefer_sharps);
                assert_eq!(
                    key_name_to_pitch_class(&name.spelled()),
                    PitchClass::new(pc)
                );
            }
        }
    }

    #[test]
    fn test_pitch_class_round_trip_minor() {
        for pc in 0..12 {
            let name = pitch_class_to_key_name(PitchClass::new(pc), Mode::Minor, true);
            let spelled = name.spelled();
            assert!(spelled.ends_with('m'));
            assert_eq!(key_name_to_pitch_class(&spelled), PitchClass::new(pc));
        }
    }

    #[test]
    fn test_unknown_root_falls_back_to_c() {
        assert_eq!(lookup_root("X#"), None);
        assert_eq!(key_name_to_pitch_class("X#"), PitchClass::new(0));
        assert_eq!(key_name_to_pitch_class(""), PitchClass::new(0));
    }

    #[test]
    fn test_theoretical_spellings() {
        assert_eq!(lookup_root("B#"), Some(PitchClass::new(0)));
        assert_eq!(lookup_root("Fb"), Some(PitchClass::new(4)));
        assert_eq!(lookup_root("Cb"), Some(PitchClass::new(11)));
        assert_eq!(lookup_root("H"), Some(PitchClass::new(11)));
    }

    #[test]
    fn test_prefer_sharps() {
        assert!(KeySignature::new(AccidentalType::Sharps, 0, Mode::Major).prefer_sharps());
        assert!(KeySignature::new(AccidentalType::Sharps, 5, Mode::Major).prefer_sharps());
        // Flat type with count 0 is still C major, spelled with sharps.
        assert!(KeySignature::new(AccidentalType::Flats, 0, Mode::Major).prefer_sharps());
        assert!(!KeySignature::new(AccidentalType::Flats, 1, Mode::Major).prefer_sharps());
    }

    #[test]
    fn test_german_names() {
        assert_eq!(KeyName::parse("B").german(), "H");
        assert_eq!(KeyName::parse("Bb").german(), "B");
        assert_eq!(KeyName::parse("Bm").german(), "Hm");
        assert_eq!(KeyName::parse("F#").german(), "F#");
    }

    #[test]
    fn test_describe() {
        assert_eq!(KeyName::parse("D").describe(), "D-Dur");
        assert_eq!(KeyName::parse("Bb").describe(), "B-Dur");
        assert_eq!(KeyName::parse("B").describe(), "H-Dur");
        assert_eq!(KeyName::parse("Am").describe(), "A-Moll");
        assert_eq!(KeyName::parse("F#m").describe(), "F#-Moll");
    }

    #[test]
    fn test_flat_eleven_is_theoretical_cb() {
        let name = pitch_class_to_key_name(PitchClass::new(11), Mode::Major, false);
        assert_eq!(name.spelled(), "Cb");
        let sharp = pitch_class_to_key_name(PitchClass::new(11), Mode::Major, true);
        assert_eq!(sharp.spelled(), "B");
    }
}
