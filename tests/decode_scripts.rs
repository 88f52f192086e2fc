//! Decode complete scripts from `test_files/` and query the resulting timelines.

use assert_matches2::assert_matches;

use ssa_cues::subtitle::Section;
use ssa_cues::{DecodeError, DiagnosticKind, Error, Margins, StartTime};

pub const BASIC_FILE: &str = include_str!("../test_files/basic.ass");
pub const LEGACY_FILE: &[u8] = include_bytes!("../test_files/legacy_v4.ssa");
pub const AEGISUB_LAYOUT_FILE: &str = include_str!("../test_files/aegisub_layout.ass");

fn texts(timeline: &ssa_cues::Timeline) -> Vec<&str> {
    timeline.iter().map(|(_, cue)| cue.text.as_str()).collect()
}

#[test]
fn basic_script() -> Result<(), DecodeError> {
    let script = ssa_cues::decode_script(BASIC_FILE.as_bytes())?;

    assert!(script.diagnostics.is_empty());
    assert_eq!(script.script_info.len(), 6);
    assert_eq!(script.script_info.get("PlayResX"), Some("1920"));

    assert_eq!(script.styles.len(), 2);
    assert_matches!(script.styles.get("Default"), Some(default));
    assert_eq!(
        default.margins,
        Margins {
            left: 30,
            right: 30,
            vertical: 50,
        }
    );

    let timeline = &script.timeline;
    assert_eq!(
        texts(timeline),
        [
            "Hello, world!",
            "First line\nSecond line",
            "SIGN TEXT",
            "Plain text with a {comment",
            "The end",
        ]
    );

    assert_matches!(timeline.cue_at_index(0), Some(hello));
    assert_eq!(hello.name, "Alice");
    assert_eq!(hello.margins, default.margins);

    assert_matches!(timeline.cue_at_index(2), Some(sign));
    assert_eq!(sign.layer, 1);
    assert_eq!(sign.style.as_deref(), Some("Sign"));
    assert_eq!(
        sign.margins,
        Margins {
            left: 60,
            right: 100,
            vertical: 15,
        }
    );

    assert_matches!(timeline.cue_at_index(3), Some(plain));
    assert_eq!(plain.effect, "Banner;0;0");
    assert_eq!(
        plain.margins,
        Margins {
            left: 5,
            right: 5,
            vertical: 5,
        }
    );

    Ok(())
}

#[test]
fn basic_script_queries() -> Result<(), DecodeError> {
    let timeline = ssa_cues::decode(BASIC_FILE.as_bytes())?;
    let text_at = |millis: i64| {
        timeline
            .active_cue_at(StartTime::from_millis(millis))
            .map(|cue| cue.text.as_str())
    };

    assert_eq!(text_at(0), None);
    assert_eq!(text_at(999), None);
    assert_eq!(text_at(1000), Some("Hello, world!"));
    assert_eq!(text_at(3499), Some("Hello, world!"));
    assert_eq!(text_at(3500), Some("First line\nSecond line"));
    assert_eq!(text_at(59_999), Some("Plain text with a {comment"));
    assert_eq!(text_at(3_600_000), Some("The end"));

    assert_eq!(timeline.cues_at(StartTime::from_secs(4)).len(), 2);

    assert_eq!(timeline.next_event_index_after(StartTime(0)), Some(0));
    assert_eq!(timeline.next_event_index_after(StartTime::from_millis(3500)), Some(3));
    assert_eq!(timeline.next_event_index_after(StartTime::from_secs(60)), None);

    assert_eq!(timeline.event_count(), 5);
    assert_matches!(timeline.event_time_at(3), Ok(start));
    assert_eq!(ssa_cues::format_timecode(start), "0:00:06.250");
    assert_matches!(
        timeline.event_time_at(5),
        Err(Error::IndexOutOfRange { index: 5, count: 5 })
    );

    let in_range: Vec<StartTime> = timeline
        .iter_range(&(StartTime::from_secs(3)..StartTime::from_secs(7)))
        .map(|(start, _)| start)
        .collect();
    assert_eq!(
        in_range,
        [
            StartTime::from_millis(3500),
            StartTime::from_millis(3500),
            StartTime::from_millis(6250),
        ]
    );

    Ok(())
}

#[test]
fn legacy_script() -> Result<(), DecodeError> {
    let script = ssa_cues::decode_script(LEGACY_FILE)?;

    assert_eq!(script.script_info.get("ScriptType"), Some("v4.00"));
    assert_eq!(texts(&script.timeline), ["first", "second", "third", "last"]);

    let diagnostics: Vec<(Option<usize>, &DiagnosticKind)> = script
        .diagnostics
        .iter()
        .map(|diagnostic| (diagnostic.line_number, &diagnostic.kind))
        .collect();
    assert_eq!(
        diagnostics,
        [
            (
                Some(13),
                &DiagnosticKind::UnknownStyle("Narrator".to_owned())
            ),
            (
                Some(14),
                &DiagnosticKind::OrdinalClamped {
                    ordinal: 7,
                    position: 3,
                }
            ),
            (None, &DiagnosticKind::OutOfOrder),
        ]
    );

    let margins: Vec<Margins> = script.timeline.iter().map(|(_, cue)| cue.margins).collect();
    let styled = Margins {
        left: 15,
        right: 15,
        vertical: 10,
    };
    assert_eq!(margins, [styled, Margins::default(), styled, styled]);

    Ok(())
}

#[test]
fn events_need_read_order() {
    let result = ssa_cues::decode(AEGISUB_LAYOUT_FILE.as_bytes());
    assert_matches!(result, Err(error));
    assert_eq!(error.line_number, 10);
    assert_eq!(error.section, Section::Events);
    assert_matches!(error.kind(), Error::MissingField("readorder"));
}
