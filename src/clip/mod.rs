pub mod ffmpeg;
pub mod model;

use crate::error::SplitResult;
use crate::report::{FightRecord, TimeOffset};

pub use model::{ClipWindow, PaddingConfig, VideoBounds};

const MILLIS_PER_SECOND: u64 = 1000;
const MILLIS_PER_MINUTE: u64 = 60 * MILLIS_PER_SECOND;
const MILLIS_PER_HOUR: u64 = 60 * MILLIS_PER_MINUTE;

pub fn clamp(value: TimeOffset, min: TimeOffset, max: TimeOffset) -> TimeOffset {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

/// Renders milliseconds as `H:MM:SS`. Hours are unbounded and sub-second remainders are dropped.
pub fn format_duration(ms: u64) -> String {
    let hours = ms / MILLIS_PER_HOUR;
    let minutes = (ms / MILLIS_PER_MINUTE) % 60;
    let seconds = (ms / MILLIS_PER_SECOND) % 60;
    format!("{hours}:{minutes:02}:{seconds:02}")
}

/// Maps report-relative fight times onto the recording and keeps the fights that overlap it.
///
/// Each fight is shifted by `report_start` into wall-clock time, padded, and clamped to the
/// recording's bounds. Fights that end up with an empty window are dropped without an error.
/// Retained windows are expressed relative to `video.creation_time`, in input order.
pub fn plan(
    fights: &[FightRecord],
    report_start: TimeOffset,
    video: VideoBounds,
    padding: PaddingConfig,
) -> SplitResult<Vec<ClipWindow>> {
    let video = video.validate()?;
    let start_padding = padding_as_offset(padding.start_padding);
    let end_padding = padding_as_offset(padding.end_padding);

    let windows = fights
        .iter()
        .filter_map(|fight| plan_fight(fight, report_start, video, start_padding, end_padding))
        .collect();

    Ok(windows)
}

fn plan_fight(
    fight: &FightRecord,
    report_start: TimeOffset,
    video: VideoBounds,
    start_padding: TimeOffset,
    end_padding: TimeOffset,
) -> Option<ClipWindow> {
    let absolute_start = fight.start_time.saturating_add(report_start);
    let absolute_end = fight.end_time.saturating_add(report_start);

    let padded_start = absolute_start.saturating_sub(start_padding);
    let padded_end = absolute_end.saturating_add(end_padding);

    let clamped_start = clamp(padded_start, video.creation_time, video.modified_time);
    let clamped_end = clamp(padded_end, video.creation_time, video.modified_time);

    // The second check cannot fail after clamping; it is kept to match the historical filter.
    if !(clamped_start < clamped_end && clamped_end <= video.modified_time) {
        tracing::debug!(
            fight_id = fight.id,
            padded_start,
            padded_end,
            "Fight is outside the recording, skipping"
        );
        return None;
    }

    Some(ClipWindow {
        id: fight.id,
        start_time: clamped_start.saturating_sub(video.creation_time),
        end_time: clamped_end.saturating_sub(video.creation_time),
        duration: clamped_end.abs_diff(clamped_start),
    })
}

fn padding_as_offset(padding_ms: u64) -> TimeOffset {
    TimeOffset::try_from(padding_ms).unwrap_or(TimeOffset::MAX)
}
