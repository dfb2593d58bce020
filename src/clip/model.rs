use crate::error::{SplitError, SplitResult};
use crate::report::TimeOffset;

use super::format_duration;

/// Wall-clock span covered by the recording, in milliseconds since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VideoBounds {
    pub creation_time: TimeOffset,
    pub modified_time: TimeOffset,
}

impl VideoBounds {
    pub fn validate(self) -> SplitResult<Self> {
        if self.creation_time > self.modified_time {
            return Err(SplitError::InvalidVideoBounds {
                creation_time: self.creation_time,
                modified_time: self.modified_time,
            });
        }
        Ok(self)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PaddingConfig {
    pub start_padding: u64,
    pub end_padding: u64,
}

impl PaddingConfig {
    /// Combines the symmetric padding with the one-sided extras. All inputs are seconds.
    pub fn from_seconds(padding: u64, start_padding: u64, end_padding: u64) -> Self {
        Self {
            start_padding: padding.saturating_add(start_padding).saturating_mul(1000),
            end_padding: padding.saturating_add(end_padding).saturating_mul(1000),
        }
    }
}

/// A retained clip. `start_time` and `end_time` are relative to the start of the video file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClipWindow {
    pub id: u32,
    pub start_time: TimeOffset,
    pub end_time: TimeOffset,
    pub duration: u64,
}

impl ClipWindow {
    pub fn start_timestamp(&self) -> String {
        format_duration(self.start_time.unsigned_abs())
    }

    pub fn end_timestamp(&self) -> String {
        format_duration(self.end_time.unsigned_abs())
    }

    pub fn duration_timestamp(&self) -> String {
        format_duration(self.duration)
    }
}
