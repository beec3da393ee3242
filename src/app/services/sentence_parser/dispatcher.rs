//! Sentence dispatch and the current position context
//!
//! The only state that crosses lines is the id of the most recently written
//! fix. It is passed into [`dispatch_line`] and handed back in [`Dispatch`];
//! [`ingest_lines`] threads it through a whole input stream.

use tracing::debug;

use super::sentence::{Sentence, SentenceKind};
use super::sink::RecordSink;
use super::stats::LoadStats;
use super::writers::{
    RecordOutcome, SkipReason, TripContext, write_depth, write_ground_speed_course,
    write_position, write_water_speed, write_wind,
};
use crate::models::PositionId;
use crate::{Error, Result};

/// Outcome of one line plus the position context for the next line
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dispatch {
    pub current: Option<PositionId>,
    pub outcome: RecordOutcome,
}

/// Route one line to its writer
///
/// `current` changes only when a fix is written; a fix sentence without
/// coordinates leaves it untouched.
pub fn dispatch_line<S: RecordSink + ?Sized>(
    sink: &mut S,
    trip: &TripContext,
    current: Option<PositionId>,
    line: &str,
) -> Result<Dispatch> {
    let sentence = Sentence::split(line);

    let Some(kind) = sentence.kind() else {
        return Ok(Dispatch {
            current,
            outcome: RecordOutcome::Ignored,
        });
    };

    let outcome = match kind {
        SentenceKind::Position => {
            return Ok(match write_position(sink, trip, &sentence)? {
                Some(position_id) => Dispatch {
                    current: Some(position_id),
                    outcome: RecordOutcome::Inserted(kind),
                },
                None => Dispatch {
                    current,
                    outcome: RecordOutcome::Skipped(kind, SkipReason::NoFix),
                },
            });
        }
        SentenceKind::Depth => write_depth(sink, current, &sentence)?,
        SentenceKind::Wind => write_wind(sink, current, &sentence)?,
        SentenceKind::WaterSpeed => write_water_speed(sink, current, &sentence)?,
        SentenceKind::GroundSpeedCourse => write_ground_speed_course(sink, current, &sentence)?,
    };

    Ok(Dispatch { current, outcome })
}

/// Feed a whole line stream through the dispatcher
///
/// Fatal errors are annotated with the 1-based line number. `on_line` is
/// called after every line with the number of lines read so far; an error
/// from it stops the stream and is returned unchanged.
pub fn ingest_lines<S, I, F>(
    sink: &mut S,
    trip: &TripContext,
    lines: I,
    mut on_line: F,
) -> Result<LoadStats>
where
    S: RecordSink + ?Sized,
    I: IntoIterator<Item = std::io::Result<String>>,
    F: FnMut(usize) -> Result<()>,
{
    let mut stats = LoadStats::new();
    let mut current = None;

    for (index, line) in lines.into_iter().enumerate() {
        let line_number = index + 1;
        let line = line
            .map_err(|e| Error::io("Failed to read input line", e).at_line(line_number))?;

        let dispatch = dispatch_line(sink, trip, current, &line)
            .map_err(|e| e.at_line(line_number))?;

        if let RecordOutcome::Skipped(kind, reason) = dispatch.outcome {
            debug!(
                "Line {}: skipped {} sentence {} ({:?})",
                line_number,
                kind.label(),
                kind.tag(),
                reason
            );
        }

        current = dispatch.current;
        stats.record(&dispatch.outcome);
        stats.lines_read = line_number;
        on_line(line_number)?;
    }

    Ok(stats)
}
