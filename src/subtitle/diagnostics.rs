use std::fmt::{self, Display};

/// A non-fatal problem found while decoding. Decoding carries on regardless.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// 1-based line number the problem was found on, if it belongs to a single line.
    pub line_number: Option<usize>,
    pub kind: DiagnosticKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// A dialogue line referenced a style that was never declared (or no style at all),
    /// so its margins were left as given.
    UnknownStyle(String),

    /// A dialogue line's `ReadOrder` pointed past the end of the timeline, so the cue
    /// was appended instead.
    OrdinalClamped { ordinal: usize, position: usize },

    /// The `ReadOrder` of the dialogue lines did not match their start times. The
    /// timeline was sorted by start time.
    OutOfOrder,
}

impl Display for DiagnosticKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownStyle(name) => {
                write!(formatter, "unknown style {name:?}, margins are not inherited")
            }
            Self::OrdinalClamped { ordinal, position } => write!(
                formatter,
                "read order {ordinal} is past the end of the timeline, inserted at {position}"
            ),
            Self::OutOfOrder => write!(
                formatter,
                "read order does not match start times, cues were sorted by time"
            ),
        }
    }
}

impl Display for Diagnostic {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line_number {
            Some(line_number) => write!(formatter, "line {line_number}: {}", self.kind),
            None => self.kind.fmt(formatter),
        }
    }
}

/// Collects diagnostics for one decode call, forwarding each of them to the `log` facade.
#[derive(Debug, Default)]
pub(super) struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub(super) fn new() -> Self {
        Self::default()
    }

    pub(super) fn warn(&mut self, line_number: Option<usize>, kind: DiagnosticKind) {
        let diagnostic = Diagnostic { line_number, kind };
        log::warn!("{diagnostic}");
        self.entries.push(diagnostic);
    }

    pub(super) fn into_vec(self) -> Vec<Diagnostic> {
        self.entries
    }
}
