//! Decoding of individual `Dialogue:` lines into cues.

use std::sync::LazyLock;

use regex::Regex;

use super::diagnostics::{DiagnosticKind, Diagnostics};
use super::format::{self, DEFAULT_EVENT_FORMAT, FieldSchema};
use super::{Cue, Error, Margins, StartTime, StyleTable, timecode};

/// An event [`FieldSchema`] together with the positions of every field the decoder reads,
/// resolved once when the `Format:` line is seen.
#[derive(Debug, Clone)]
pub struct EventFormat {
    schema: FieldSchema,
    start: Option<usize>,
    read_order: Option<usize>,
    layer: Option<usize>,
    style: Option<usize>,
    name: Option<usize>,
    margin_l: Option<usize>,
    margin_r: Option<usize>,
    margin_v: Option<usize>,
    effect: Option<usize>,
    text: Option<usize>,
}

impl EventFormat {
    #[must_use]
    pub fn new(schema: FieldSchema) -> Self {
        Self {
            start: schema.position("start"),
            read_order: schema.position("readorder"),
            layer: schema.position("layer"),
            style: schema.position("style"),
            name: schema.position("name"),
            margin_l: schema.position("marginl"),
            margin_r: schema.position("marginr"),
            margin_v: schema.position("marginv"),
            effect: schema.position("effect"),
            text: schema.position("text"),
            schema,
        }
    }

    /// Build a format from the value of a `Format:` line.
    #[must_use]
    pub fn from_format(format: &str) -> Self {
        Self::new(FieldSchema::from_format(format))
    }
}

impl Default for EventFormat {
    fn default() -> Self {
        Self::from_format(DEFAULT_EVENT_FORMAT)
    }
}

/// A decoded dialogue line, ready to be inserted into a timeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct DecodedEvent {
    /// Position the script wants this cue at.
    pub read_order: usize,
    pub start: StartTime,
    pub cue: Cue,
}

/// Decode the value of a `Dialogue:` line (everything after the colon).
///
/// Margins that are `0` are taken from the referenced style. If the style cannot be
/// found, a [`DiagnosticKind::UnknownStyle`] diagnostic is emitted and the margins are
/// kept as they are.
///
/// # Errors
/// Errors if the line has fewer fields than the format, if the format lacks a field the
/// decoder needs, or if a number or timecode is malformed.
pub(super) fn decode_dialogue(
    line: &str,
    format: &EventFormat,
    styles: &StyleTable,
    line_number: usize,
    diagnostics: &mut Diagnostics,
) -> Result<DecodedEvent, Error> {
    let fields = format.schema.parse_fields(line.trim())?;

    let read_order = format::parse_int::<usize>(
        fields.required(format.read_order, "readorder")?,
        "readorder",
    )?;
    let start = timecode::parse_timecode(fields.required(format.start, "start")?)?;
    let layer = format::parse_int::<i32>(fields.required(format.layer, "layer")?, "layer")?;

    let own_margins = Margins {
        left: format::parse_int(fields.required(format.margin_l, "marginl")?, "marginl")?,
        right: format::parse_int(fields.required(format.margin_r, "marginr")?, "marginr")?,
        vertical: format::parse_int(fields.required(format.margin_v, "marginv")?, "marginv")?,
    };

    let style_name = fields.optional(format.style);
    let margins = match style_name.and_then(|name| styles.get(name)) {
        Some(style) => own_margins.inherit_from(style.margins),
        None => {
            diagnostics.warn(
                Some(line_number),
                DiagnosticKind::UnknownStyle(style_name.unwrap_or_default().to_owned()),
            );
            own_margins
        }
    };

    let text = strip_override_tags(fields.required(format.text, "text")?);

    Ok(DecodedEvent {
        read_order,
        start,
        cue: Cue {
            text,
            layer,
            margins,
            style: style_name.map(str::to_owned),
            name: fields.optional(format.name).unwrap_or_default().to_owned(),
            effect: fields.optional(format.effect).unwrap_or_default().to_owned(),
        },
    })
}

static OVERRIDE_BLOCK_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{[^{]*\}").unwrap());

/// Reduce dialogue text to what should be displayed: every `\N` becomes a line break, and
/// every override block (a `{` up to the last `}` before the next `{`) is removed.
/// The tags inside the blocks are not interpreted.
#[must_use]
pub fn strip_override_tags(text: &str) -> String {
    let with_breaks = text.replace("\\N", "\n");
    OVERRIDE_BLOCK_REGEX
        .replace_all(&with_breaks, "")
        .into_owned()
}
