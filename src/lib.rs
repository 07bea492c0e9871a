pub mod abc;
pub mod error;
pub mod parser;
pub mod score;
pub mod theory;
pub mod transpose;

pub use abc::{midi_to_abc, to_abc, AbcOutput, Meter, RenderContext, Settings};
pub use error::NotationError;
pub use parser::{parse_source, parse_tokens, ParseOutcome, ParsedSource};
pub use score::{Accidental, Duration, Score, Token};
pub use theory::{
    key_name_to_pitch_class, lookup_root, pitch_class_to_key_name, AccidentalType, KeyName,
    KeySignature, Mode, PitchClass,
};
pub use transpose::{key_info, Instrument, KeyInfo};

/// Render an entered score to ABC with the given session settings.
/// This is the main entry point for the click-entry path.
pub fn render(score: &Score, settings: &Settings) -> AbcOutput {
    let ctx = RenderContext::new(settings);
    to_abc(score.tokens(), &ctx)
}

/// Render a free-text input (optional front matter plus note tokens) to ABC.
/// This is the main entry point for the text-entry path.
pub fn render_text(source: &str) -> Result<AbcOutput, NotationError> {
    let parsed = parse_source(source)?;
    let ctx = RenderContext::new(&parsed.settings);
    Ok(to_abc(&parsed.outcome.tokens, &ctx))
}

/// Render a free-text input for a specific instrument, overriding whatever
/// the front matter selects (e.g. from a CLI flag).
pub fn render_text_for(source: &str, instrument: Instrument) -> Result<AbcOutput, NotationError> {
    let mut parsed = parse_source(source)?;
    parsed.settings.instrument = instrument;
    let ctx = RenderContext::new(&parsed.settings);
    Ok(to_abc(&parsed.outcome.tokens, &ctx))
}
