use std::path::PathBuf;

use crate::clip::ffmpeg::{
    build_clip_commands, resolve_ffmpeg_binary_path, run_clip_commands, ClipCommand,
    FFMPEG_BINARY_NAME,
};
use crate::clip::{self, ClipWindow};
use crate::error::SplitResult;
use crate::report::{ReportSource, ReportTimeline};
use crate::settings::SplitSettings;
use crate::video_file::{describe_wall_clock, resolve_video_bounds};

/// Resolves all three time references and returns the clip windows that fall inside the
/// recording. Nothing is planned unless the report and the video bounds are both valid.
pub fn plan_clips(
    settings: &SplitSettings,
    source: &dyn ReportSource,
) -> SplitResult<Vec<ClipWindow>> {
    let video = resolve_video_bounds(
        &settings.input_path,
        settings.creation_time_override,
        settings.modified_time_override,
    )?
    .validate()?;
    tracing::info!(
        recording_start = %describe_wall_clock(video.creation_time),
        recording_end = %describe_wall_clock(video.modified_time),
        "Resolved recording bounds"
    );

    let timeline = ReportTimeline::fetch(source, &settings.report_id)?;
    let report_bounds = timeline.get_time_bounds()?;
    tracing::info!(
        report = %settings.report_id,
        report_start = %describe_wall_clock(report_bounds.start_time),
        report_end = %describe_wall_clock(report_bounds.end_time),
        "Fetched report"
    );

    if report_bounds.end_time < video.creation_time || report_bounds.start_time > video.modified_time {
        tracing::warn!(
            report = %settings.report_id,
            "Report does not overlap the recording, no clips will be produced"
        );
    }

    let fights = timeline.get_fight_times(settings.boss_only, settings.fight_whitelist.as_ref());
    let windows = clip::plan(&fights, report_bounds.start_time, video, settings.padding)?;
    for window in &windows {
        tracing::debug!(
            fight_id = window.id,
            start = %window.start_timestamp(),
            end = %window.end_timestamp(),
            duration = %window.duration_timestamp(),
            "Clip window"
        );
    }
    tracing::info!(
        selected_fights = fights.len(),
        planned_clips = windows.len(),
        "Planned clips"
    );

    Ok(windows)
}

pub fn clip_commands(settings: &SplitSettings, windows: &[ClipWindow]) -> Vec<ClipCommand> {
    build_clip_commands(
        windows,
        &settings.input_path,
        &settings.output_template,
        &settings.encode_options,
    )
}

/// Command lines as shown by `--print`. The binary is not looked up, so printing works
/// without ffmpeg installed.
pub fn printed_command_lines(settings: &SplitSettings, commands: &[ClipCommand]) -> Vec<String> {
    let program = settings
        .ffmpeg_binary
        .clone()
        .unwrap_or_else(|| PathBuf::from(FFMPEG_BINARY_NAME));

    commands
        .iter()
        .map(|command| command.display_line(&program))
        .collect()
}

/// Plans the clips, then prints or runs one transcoder command per clip.
pub fn split_recording(settings: &SplitSettings, source: &dyn ReportSource) -> SplitResult<()> {
    let windows = plan_clips(settings, source)?;
    let commands = clip_commands(settings, &windows);

    if settings.print_commands {
        for line in printed_command_lines(settings, &commands) {
            println!("{line}");
        }
        return Ok(());
    }

    let ffmpeg_binary_path = resolve_ffmpeg_binary_path(settings.ffmpeg_binary.as_deref())?;
    tracing::info!(clips = commands.len(), "Starting video split");
    let summary = run_clip_commands(&ffmpeg_binary_path, &commands)?;
    if summary.failed.is_empty() {
        tracing::info!(clips = summary.succeeded.len(), "Finished");
    } else {
        tracing::warn!(
            succeeded = summary.succeeded.len(),
            failed_fights = ?summary.failed,
            "Finished with failed clips"
        );
    }

    Ok(())
}
