use std::fs::Metadata;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::clip::VideoBounds;
use crate::error::{SplitError, SplitResult};
use crate::report::TimeOffset;

/// Resolves the recording's wall-clock bounds in milliseconds since the Unix epoch.
/// Each override replaces its own bound; the file is only inspected for the bounds that are missing.
pub fn resolve_video_bounds(
    path: &Path,
    creation_override: Option<TimeOffset>,
    modified_override: Option<TimeOffset>,
) -> SplitResult<VideoBounds> {
    if let (Some(creation_time), Some(modified_time)) = (creation_override, modified_override) {
        return Ok(VideoBounds {
            creation_time,
            modified_time,
        });
    }

    let metadata = read_metadata(path)?;
    let creation_time = match creation_override {
        Some(value) => value,
        None => creation_millis(path, &metadata)?,
    };
    let modified_time = match modified_override {
        Some(value) => value,
        None => modified_millis(path, &metadata)?,
    };

    Ok(VideoBounds {
        creation_time,
        modified_time,
    })
}

fn read_metadata(path: &Path) -> SplitResult<Metadata> {
    std::fs::metadata(path)
        .map_err(|error| SplitError::FileTimestamp(format!("'{}': {error}", path.display())))
}

fn creation_millis(path: &Path, metadata: &Metadata) -> SplitResult<TimeOffset> {
    let created = metadata.created().map_err(|error| {
        SplitError::FileTimestamp(format!(
            "creation time of '{}' is not available on this platform ({error}); pass --creation-time and --modified-time",
            path.display()
        ))
    })?;
    system_time_to_millis(created)
}

fn modified_millis(path: &Path, metadata: &Metadata) -> SplitResult<TimeOffset> {
    let modified = metadata.modified().map_err(|error| {
        SplitError::FileTimestamp(format!(
            "modified time of '{}' is not available ({error}); pass --modified-time",
            path.display()
        ))
    })?;
    system_time_to_millis(modified)
}

fn system_time_to_millis(time: SystemTime) -> SplitResult<TimeOffset> {
    let since_epoch = time
        .duration_since(UNIX_EPOCH)
        .map_err(|error| SplitError::FileTimestamp(format!("timestamp before Unix epoch: {error}")))?;

    TimeOffset::try_from(since_epoch.as_millis())
        .map_err(|error| SplitError::FileTimestamp(format!("timestamp out of range: {error}")))
}

pub fn describe_wall_clock(ms: TimeOffset) -> String {
    chrono::DateTime::from_timestamp_millis(ms)
        .map(|timestamp| timestamp.to_rfc3339())
        .unwrap_or_else(|| format!("{ms} ms"))
}
