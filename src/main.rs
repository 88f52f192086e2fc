use anyhow::{Context, bail};

use ssa_cues::{Cue, StartTime, Timeline, format_timecode, parse_timecode};

const USAGE: &str = "usage: ssa-cues <FILE> [TIMECODE]";

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let Some(path) = args.next() else {
        bail!(USAGE);
    };
    let timecode = args.next();
    if args.next().is_some() {
        bail!(USAGE);
    }

    let bytes = std::fs::read(&path).with_context(|| format!("Failed to read {path}"))?;
    let script =
        ssa_cues::decode_script(&bytes).with_context(|| format!("Failed to decode {path}"))?;

    for diagnostic in &script.diagnostics {
        eprintln!("warning: {diagnostic}");
    }

    match timecode {
        Some(timecode) => {
            let time = parse_timecode(&timecode)
                .with_context(|| format!("Invalid timecode argument {timecode:?}"))?;
            print_at(&script.timeline, time);
        }
        None => {
            println!(
                "{} cue(s), {} style(s)",
                script.timeline.event_count(),
                script.styles.len()
            );
            for (start, cue) in script.timeline.iter() {
                print_cue(start, cue);
            }
        }
    }

    Ok(())
}

fn print_at(timeline: &Timeline, time: StartTime) {
    let next_index = timeline.next_event_index_after(time);
    let active = timeline.cues_at(time);

    if active.is_empty() {
        println!("no cue active at {}", format_timecode(time));
    } else {
        // The active cues are the ones directly before the next event
        let first_active = next_index.unwrap_or(timeline.event_count()) - active.len();
        let start = timeline.event_time_at(first_active).unwrap_or(time);
        for cue in active {
            print_cue(start, cue);
        }
    }

    match next_index.map(|index| (index, timeline.event_time_at(index))) {
        Some((index, Ok(next))) => println!("next event: #{index} at {}", format_timecode(next)),
        _ => println!("no further events"),
    }
}

fn print_cue(start: StartTime, cue: &Cue) {
    println!(
        "{:>12}  layer {:<3} margins {}/{}/{}  {:?}",
        format_timecode(start),
        cue.layer,
        cue.margins.left,
        cue.margins.right,
        cue.margins.vertical,
        cue.text
    );
}
