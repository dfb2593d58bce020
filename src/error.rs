use thiserror::Error;

#[derive(Error, Debug)]
pub enum SplitError {
    #[error("Malformed report data: {0}")]
    MalformedReport(String),

    #[error(
        "Invalid video bounds: creation time {creation_time} is after modified time {modified_time}"
    )]
    InvalidVideoBounds {
        creation_time: i64,
        modified_time: i64,
    },

    #[error("Failed to fetch report data: {0}")]
    Fetch(String),

    #[error("Failed to read video file timestamps: {0}")]
    FileTimestamp(String),

    #[error("Failed to run transcoder: {0}")]
    Transcoder(String),

    #[error(transparent)]
    Settings(#[from] SettingsError),
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SettingsError {
    #[error("Fights must be formatted as 1-5 or 1,2,3,4,5 (got '{0}')")]
    InvalidFights(String),

    #[error("Output file must contain exactly one %d, which will be the fight id (got '{0}')")]
    InvalidOutputTemplate(String),

    #[error("Invalid ffmpeg options: {0}")]
    InvalidFfmpegOptions(String),
}

pub type SplitResult<T> = Result<T, SplitError>;
