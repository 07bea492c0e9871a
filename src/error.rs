//! # Error Types
//!
//! The core pipeline never raises errors for musical input: every invalid
//! or ambiguous value has a defined silent fallback (clamped counts,
//! dropped tokens, default meter). The only failure surfaced to callers is
//! a malformed front-matter block on the text-entry path.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum NotationError {
    /// Invalid YAML front matter in a text input.
    ///
    /// # Example
    /// ```
    /// # use claritrans::NotationError;
    /// let err = NotationError::MetadataError("meter must be in format N/D".to_string());
    /// assert_eq!(err.to_string(), "Invalid metadata: meter must be in format N/D");
    /// ```
    #[error("Invalid metadata: {0}")]
    MetadataError(String),
}
