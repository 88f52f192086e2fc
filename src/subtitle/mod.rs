//! This module contains the types making up a decoded SSA/ASS script,
//! as well as the logic for decoding raw script bytes into them.

use indexmap::IndexMap;

mod diagnostics;
mod error;
pub mod event;
pub mod format;
pub mod parse;
pub mod style_table;
pub mod timecode;
pub mod timeline;

pub use diagnostics::{Diagnostic, DiagnosticKind};
pub use error::{DecodeError, Error};
pub use event::strip_override_tags;
pub use format::{FieldSchema, Fields};
pub use parse::{Section, decode, decode_script};
pub use style_table::{StyleTable, Styles};
pub use timecode::{format_timecode, parse_timecode};
pub use timeline::{Timeline, TimelineBuilder};

/// The time at which a cue starts to be shown, in microseconds.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Serialize,
    serde::Deserialize,
)]
pub struct StartTime(pub i64);

impl StartTime {
    #[must_use]
    pub const fn from_millis(millis: i64) -> Self {
        Self(millis * 1000)
    }

    #[must_use]
    pub const fn from_secs(secs: i64) -> Self {
        Self(secs * 1_000_000)
    }
}

/// Element- or style-specific left, right, and vertical margins
/// in pixels, corresponding to ASS `MarginL` etc.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct Margins {
    pub left: i32,
    pub right: i32,
    pub vertical: i32,
}

impl Margins {
    /// Replace every margin that is `0` (meaning “use the style's value”) with the
    /// corresponding margin of the given style.
    #[must_use]
    pub const fn inherit_from(self, style: Self) -> Self {
        Self {
            left: if self.left == 0 { style.left } else { self.left },
            right: if self.right == 0 {
                style.right
            } else {
                self.right
            },
            vertical: if self.vertical == 0 {
                style.vertical
            } else {
                self.vertical
            },
        }
    }
}

/// A style as declared by a `Style:` line. Only the attributes needed for
/// margin fallback are kept; everything visual is left to the renderer.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Style {
    pub name: String,
    pub margins: Margins,
}

/// One unit of displayable subtitle text.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Cue {
    /// The text to show, with override blocks removed and `\N` turned into
    /// real line breaks.
    pub text: String,

    /// The layer index on which this cue is shown. Higher layers are shown
    /// above lower ones.
    pub layer: i32,

    /// Effective margins, after falling back to the style for zero values.
    pub margins: Margins,

    /// Name of the referenced style, if the event format has a `Style` field.
    /// The style does not necessarily exist.
    pub style: Option<String>,

    /// Name a.k.a. Actor (does nothing)
    pub name: String,

    /// Opaque effect string, carried through as-is.
    pub effect: String,
}

impl Cue {
    /// Creates a cue showing only the given text, with everything else left
    /// at its default.
    #[must_use]
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }
}

/// Generic key/value content of the `[Script Info]` section. Keys keep the
/// order in which they were first seen; repeated keys collect all values.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ScriptInfo {
    entries: IndexMap<String, Vec<String>>,
}

impl ScriptInfo {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: &str, value: &str) {
        self.entries
            .entry(key.to_owned())
            .or_default()
            .push(value.to_owned());
    }

    /// The first value recorded for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .get(key)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// All values recorded for `key`, in order of appearance.
    #[must_use]
    pub fn get_all(&self, key: &str) -> &[String] {
        self.entries.get(key).map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(key, values)| (key.as_str(), values.as_slice()))
    }
}

/// Everything produced by decoding one script.
#[derive(Debug, Clone)]
pub struct Script {
    /// The cues, ordered by start time.
    pub timeline: Timeline,

    /// All styles declared in the script, in declaration order.
    pub styles: Styles,

    pub script_info: ScriptInfo,

    /// Non-fatal problems found while decoding, in the order they occurred.
    pub diagnostics: Vec<Diagnostic>,
}

static_assertions::assert_impl_all!(Timeline: Send, Sync);
static_assertions::assert_impl_all!(Script: Send, Sync);
