//! Functions for decoding `.ass` scripts. Lines are dispatched by section to the
//! [`StyleTable`] and the event decoder; the resulting cues are collected into a [`Timeline`].

use std::fmt::{self, Display};

use super::diagnostics::{DiagnosticKind, Diagnostics};
use super::event::{self, EventFormat};
use super::{DecodeError, Error, Script, ScriptInfo, StyleTable, Timeline, TimelineBuilder};

const BYTE_ORDER_MARK: &[u8] = b"\xEF\xBB\xBF";

/// Decode the given script bytes into a [`Timeline`].
///
/// # Errors
/// Errors on the first line that cannot be decoded: malformed timecodes and numbers,
/// truncated style or event lines, and formats lacking a field that is needed.
pub fn decode(bytes: &[u8]) -> Result<Timeline, DecodeError> {
    decode_script(bytes).map(|script| script.timeline)
}

/// Decode the given script bytes, also returning the declared styles, the `[Script Info]`
/// contents, and any non-fatal problems found along the way.
///
/// # Errors
/// See [`decode`].
pub fn decode_script(bytes: &[u8]) -> Result<Script, DecodeError> {
    let bytes = bytes.strip_prefix(BYTE_ORDER_MARK).unwrap_or(bytes);
    let text = String::from_utf8_lossy(bytes);

    let mut decoder = Decoder::new();
    for (index, line) in split_lines(&text).enumerate() {
        decoder.feed_line(index + 1, line.trim_end())?;
    }

    Ok(decoder.finish())
}

/// Split on `\r\n`, `\n` and lone `\r`, each of which ends exactly one line.
fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split('\n')
        .flat_map(|line| line.strip_suffix('\r').unwrap_or(line).split('\r'))
}

/// The part of a script a line belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    /// Outside any known section: before the first header, after an unknown header, or after
    /// a line that ended the previous section.
    TopLevel,
    ScriptInfo,

    /// `[V4 Styles]` or `[V4+ Styles]`
    Styles,
    Events,
}

impl Section {
    /// The section started by the given header line, if it is one we know.
    #[must_use]
    pub fn from_header(line: &str) -> Option<Self> {
        match line {
            "[Script Info]" => Some(Self::ScriptInfo),
            "[V4 Styles]" | "[V4+ Styles]" => Some(Self::Styles),
            "[Events]" => Some(Self::Events),
            _ => None,
        }
    }
}

impl Display for Section {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(match self {
            Self::TopLevel => "top level",
            Self::ScriptInfo => "script info",
            Self::Styles => "styles",
            Self::Events => "events",
        })
    }
}

/// State of one decode call.
struct Decoder {
    section: Section,
    script_info: ScriptInfo,
    styles: StyleTable,
    event_format: EventFormat,
    timeline: TimelineBuilder,
    diagnostics: Diagnostics,
}

impl Decoder {
    fn new() -> Self {
        Self {
            section: Section::TopLevel,
            script_info: ScriptInfo::new(),
            styles: StyleTable::new(),
            event_format: EventFormat::default(),
            timeline: TimelineBuilder::new(),
            diagnostics: Diagnostics::new(),
        }
    }

    /// Process one line, with line terminators and trailing whitespace already removed.
    fn feed_line(&mut self, line_number: usize, line: &str) -> Result<(), DecodeError> {
        if line.is_empty() {
            return Ok(());
        }

        if self.section != Section::TopLevel {
            if line.starts_with(';') {
                // Comment
                return Ok(());
            }

            if let Some((key, value)) = parse_kv_generic(line) {
                return self
                    .section_line(line_number, key, value)
                    .map_err(|source| self.error(line_number, line, source));
            }

            // Do not return: the line may well be the header of the next section
            log::trace!("line {line_number} ends section {}", self.section);
            self.section = Section::TopLevel;
        }

        self.top_level_line(line_number, line)
            .map_err(|source| self.error(line_number, line, source))
    }

    fn top_level_line(&mut self, line_number: usize, line: &str) -> Result<(), Error> {
        if let Some(section) = Section::from_header(line) {
            log::debug!("line {line_number}: entering section {section}");
            self.section = section;
            return Ok(());
        }

        match parse_kv_generic(line) {
            Some(("Dialogue", value)) => self.dialogue(line_number, value),
            _ => {
                log::trace!("ignoring line {line_number} at top level");
                Ok(())
            }
        }
    }

    fn section_line(&mut self, line_number: usize, key: &str, value: &str) -> Result<(), Error> {
        match (self.section, key) {
            (Section::ScriptInfo, _) => self.script_info.push(key, value),
            (Section::Styles, "Format") => self.styles.define(value),
            (Section::Styles, "Style") => {
                let style = self.styles.record(value)?;
                log::trace!("line {line_number}: recorded style {:?}", style.name);
            }
            (Section::Events, "Format") => self.event_format = EventFormat::from_format(value),
            (Section::Events, "Dialogue") => self.dialogue(line_number, value)?,
            (section, _) => log::debug!("line {line_number}: ignoring {key:?} in {section}"),
        }

        Ok(())
    }

    fn dialogue(&mut self, line_number: usize, value: &str) -> Result<(), Error> {
        let event = event::decode_dialogue(
            value,
            &self.event_format,
            &self.styles,
            line_number,
            &mut self.diagnostics,
        )?;

        let position = self.timeline.insert(event.read_order, event.start, event.cue);
        if position != event.read_order {
            self.diagnostics.warn(
                Some(line_number),
                DiagnosticKind::OrdinalClamped {
                    ordinal: event.read_order,
                    position,
                },
            );
        }

        Ok(())
    }

    fn error(&self, line_number: usize, line: &str, source: Error) -> DecodeError {
        DecodeError {
            line_number,
            section: self.section,
            content: line.to_owned(),
            source,
        }
    }

    fn finish(mut self) -> Script {
        if !self.timeline.is_chronological() {
            self.diagnostics.warn(None, DiagnosticKind::OutOfOrder);
        }

        let styles = self.styles.finish();
        let timeline = self.timeline.finish();
        log::debug!(
            "decoded {} cue(s) and {} style(s)",
            timeline.event_count(),
            styles.len()
        );

        Script {
            timeline,
            styles,
            script_info: self.script_info,
            diagnostics: self.diagnostics.into_vec(),
        }
    }
}

/// Parse a generic key/value line of the form `Key: Value`.
fn parse_kv_generic(line: &str) -> Option<(&str, &str)> {
    let Some(colon_pos) = line.find(':') else {
        // ignore lines without a colon
        return None;
    };

    let key = line[0..colon_pos].trim();
    let value = line[(colon_pos + 1)..].trim_start();
    Some((key, value))
}
