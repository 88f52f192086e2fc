use std::num::ParseIntError;

use thiserror::Error;

use super::Section;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Found invalid timecode: {0:?}")]
    MalformedTimecode(String),

    #[error("Truncated line: expected {expected} fields, found {found}")]
    FieldCountMismatch { expected: usize, found: usize },

    #[error("Could not parse number in field `{field}` ({value:?}): {source}")]
    NumericField {
        field: &'static str,
        value: String,
        source: ParseIntError,
    },

    #[error("The active format does not declare the `{0}` field")]
    MissingField(&'static str),

    #[error("Event index {index} is out of range for {count} events")]
    IndexOutOfRange { index: usize, count: usize },
}

/// A fatal error encountered while decoding a script, together with where it happened.
#[derive(Error, Debug)]
#[error("{section}, line {line_number}: {source} (in {content:?})")]
pub struct DecodeError {
    /// 1-based line number within the input.
    pub line_number: usize,
    pub section: Section,

    /// The offending line, with trailing whitespace removed.
    pub content: String,
    pub source: Error,
}

impl DecodeError {
    #[must_use]
    pub const fn kind(&self) -> &Error {
        &self.source
    }
}
