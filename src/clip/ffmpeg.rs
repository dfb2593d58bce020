use std::path::{Path, PathBuf};
use std::process::Command;

use regex::Regex;

use crate::error::{SettingsError, SplitError, SplitResult};

use super::model::ClipWindow;

#[cfg(target_os = "windows")]
pub(crate) const FFMPEG_BINARY_NAME: &str = "ffmpeg.exe";
#[cfg(not(target_os = "windows"))]
pub(crate) const FFMPEG_BINARY_NAME: &str = "ffmpeg";

lazy_static::lazy_static! {
    static ref OUTPUT_PLACEHOLDER: Regex =
        Regex::new(r"%(%|(0)?([0-9]*)d)").expect("output placeholder pattern is valid");
}

/// Encoder options placed between the input and the trim arguments of every clip command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipEncodeOptions {
    pub stream_map: String,
    pub video_codec: String,
    pub audio_codec: String,
    pub extra_args: Vec<String>,
}

impl Default for ClipEncodeOptions {
    fn default() -> Self {
        Self {
            stream_map: "0".to_string(),
            video_codec: "copy".to_string(),
            audio_codec: "copy".to_string(),
            extra_args: Vec::new(),
        }
    }
}

impl ClipEncodeOptions {
    fn to_args(&self) -> Vec<String> {
        let mut args = vec![
            "-map".to_string(),
            self.stream_map.clone(),
            "-c:v".to_string(),
            self.video_codec.clone(),
            "-c:a".to_string(),
            self.audio_codec.clone(),
        ];
        args.extend(self.extra_args.iter().cloned());
        args
    }
}

/// A ready-to-run transcoder invocation for one clip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipCommand {
    pub fight_id: u32,
    pub args: Vec<String>,
}

impl ClipCommand {
    pub fn display_line(&self, ffmpeg_binary_path: &Path) -> String {
        let program = ffmpeg_binary_path.to_string_lossy();
        let mut words: Vec<&str> = Vec::with_capacity(self.args.len() + 1);
        words.push(program.as_ref());
        words.extend(self.args.iter().map(String::as_str));
        shell_words::join(words)
    }
}

/// Checks that `template` holds exactly one integer placeholder (`%d`, `%3d`, `%03d`).
/// `%%` is an escaped percent sign.
pub fn validate_output_template(template: &str) -> Result<String, SettingsError> {
    let placeholder_count = OUTPUT_PLACEHOLDER
        .captures_iter(template)
        .filter(|captures| &captures[1] != "%")
        .count();

    if placeholder_count != 1 {
        return Err(SettingsError::InvalidOutputTemplate(template.to_string()));
    }

    Ok(template.to_string())
}

pub fn render_output_path(template: &str, fight_id: u32) -> String {
    OUTPUT_PLACEHOLDER
        .replace_all(template, |captures: &regex::Captures| {
            if &captures[1] == "%" {
                return "%".to_string();
            }

            let width = captures
                .get(3)
                .and_then(|value| value.as_str().parse::<usize>().ok())
                .unwrap_or(0);
            if captures.get(2).is_some() {
                format!("{fight_id:0width$}")
            } else {
                format!("{fight_id:>width$}")
            }
        })
        .into_owned()
}

/// Builds the argument list for one clip:
/// seek, input, encode options, trim, timestamp fix-up, output.
pub fn build_clip_args(
    window: &ClipWindow,
    input_path: &Path,
    output_template: &str,
    options: &ClipEncodeOptions,
) -> Vec<String> {
    let mut args = vec![
        "-ss".to_string(),
        window.start_timestamp(),
        "-i".to_string(),
        input_path.to_string_lossy().to_string(),
    ];
    args.extend(options.to_args());
    args.extend([
        "-t".to_string(),
        window.duration_timestamp(),
        "-avoid_negative_ts".to_string(),
        "1".to_string(),
        render_output_path(output_template, window.id),
    ]);
    args
}

pub fn build_clip_commands(
    windows: &[ClipWindow],
    input_path: &Path,
    output_template: &str,
    options: &ClipEncodeOptions,
) -> Vec<ClipCommand> {
    windows
        .iter()
        .map(|window| ClipCommand {
            fight_id: window.id,
            args: build_clip_args(window, input_path, output_template, options),
        })
        .collect()
}

pub fn resolve_ffmpeg_binary_path(explicit_path: Option<&Path>) -> SplitResult<PathBuf> {
    if let Some(path) = explicit_path {
        if path.exists() {
            return Ok(path.to_path_buf());
        }
        return which::which(path).map_err(|_| {
            SplitError::Transcoder(format!("FFmpeg binary '{}' was not found", path.display()))
        });
    }

    if let Ok(current_executable) = std::env::current_exe() {
        if let Some(executable_directory) = current_executable.parent() {
            let candidates = [
                executable_directory.join(FFMPEG_BINARY_NAME),
                executable_directory.join("bin").join(FFMPEG_BINARY_NAME),
            ];
            if let Some(found_path) = candidates.into_iter().find(|path| path.is_file()) {
                return Ok(found_path);
            }
        }
    }

    which::which(FFMPEG_BINARY_NAME).map_err(|_| {
        SplitError::Transcoder(format!(
            "FFmpeg binary was not found. Install ffmpeg on PATH, place {FFMPEG_BINARY_NAME} next to this executable, or pass --ffmpeg."
        ))
    })
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct ClipRunSummary {
    pub succeeded: Vec<u32>,
    pub failed: Vec<u32>,
}

/// Runs each command in order. A clip whose transcoder exits non-zero is recorded as failed and
/// the remaining clips still run; failing to start the transcoder at all aborts.
pub fn run_clip_commands(
    ffmpeg_binary_path: &Path,
    commands: &[ClipCommand],
) -> SplitResult<ClipRunSummary> {
    let mut summary = ClipRunSummary::default();

    for command in commands {
        tracing::info!(fight_id = command.fight_id, "Extracting clip");
        let status = Command::new(ffmpeg_binary_path)
            .args(&command.args)
            .status()
            .map_err(|error| {
                SplitError::Transcoder(format!(
                    "failed to start '{}': {error}",
                    ffmpeg_binary_path.display()
                ))
            })?;

        if status.success() {
            summary.succeeded.push(command.fight_id);
        } else {
            tracing::warn!(
                fight_id = command.fight_id,
                exit_status = %status,
                "FFmpeg exited with an error, continuing with next clip"
            );
            summary.failed.push(command.fight_id);
        }
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::{
        build_clip_args, build_clip_commands, render_output_path, run_clip_commands,
        validate_output_template, ClipEncodeOptions, ClipRunSummary,
    };
    use crate::clip::ClipWindow;
    use crate::error::{SettingsError, SplitError};
    use std::path::Path;

    fn window(id: u32) -> ClipWindow {
        ClipWindow {
            id,
            start_time: 72_000,
            end_time: 3_673_000,
            duration: 3_601_000,
        }
    }

    #[test]
    fn builds_arguments_in_transcoder_order() {
        let options = ClipEncodeOptions {
            extra_args: vec!["-preset".to_string(), "fast".to_string()],
            ..ClipEncodeOptions::default()
        };
        let args = build_clip_args(&window(3), Path::new("raid.mkv"), "clips/fight_%d.mkv", &options);

        assert_eq!(
            args,
            vec![
                "-ss", "0:01:12", "-i", "raid.mkv", "-map", "0", "-c:v", "copy", "-c:a", "copy",
                "-preset", "fast", "-t", "1:00:01", "-avoid_negative_ts", "1",
                "clips/fight_3.mkv",
            ]
        );
    }

    #[test]
    fn builds_one_command_per_window() {
        let commands = build_clip_commands(
            &[window(2), window(5)],
            Path::new("raid.mkv"),
            "%02d.mp4",
            &ClipEncodeOptions::default(),
        );

        assert_eq!(commands.len(), 2);
        assert_eq!(commands[0].fight_id, 2);
        assert_eq!(commands[0].args.last().map(String::as_str), Some("02.mp4"));
        assert_eq!(commands[1].args.last().map(String::as_str), Some("05.mp4"));
    }

    #[test]
    fn renders_printf_style_placeholders() {
        assert_eq!(render_output_path("fight_%d.mp4", 7), "fight_7.mp4");
        assert_eq!(render_output_path("fight_%03d.mp4", 7), "fight_007.mp4");
        assert_eq!(render_output_path("fight_%3d.mp4", 7), "fight_  7.mp4");
        assert_eq!(render_output_path("100%%_%d.mp4", 12), "100%_12.mp4");
    }

    #[test]
    fn validates_output_placeholder_count() {
        assert!(validate_output_template("out/%d.mp4").is_ok());
        assert!(validate_output_template("out/%%_%04d.mp4").is_ok());

        for template in ["out/fight.mp4", "out/%d_%d.mp4", "out/%s.mp4", "100%%.mp4"] {
            assert_eq!(
                validate_output_template(template),
                Err(SettingsError::InvalidOutputTemplate(template.to_string())),
                "Template should be rejected: {template}"
            );
        }
    }

    #[test]
    fn display_line_quotes_paths_with_spaces() {
        let commands = build_clip_commands(
            &[window(1)],
            Path::new("My Raid.mkv"),
            "%d.mp4",
            &ClipEncodeOptions::default(),
        );
        let line = commands[0].display_line(Path::new("ffmpeg"));
        assert!(line.contains("'My Raid.mkv'"));

        let words = shell_words::split(&line).expect("Expected printed command to be shell-parsable");
        assert_eq!(words[0], "ffmpeg");
        assert_eq!(words[1..], commands[0].args[..]);
    }

    #[test]
    fn missing_transcoder_aborts_the_run() {
        let commands = build_clip_commands(
            &[window(1)],
            Path::new("raid.mkv"),
            "%d.mp4",
            &ClipEncodeOptions::default(),
        );
        let result = run_clip_commands(Path::new("/nonexistent/fightclip/ffmpeg"), &commands);
        assert!(matches!(result, Err(SplitError::Transcoder(_))));
    }

    #[cfg(unix)]
    #[test]
    fn failing_clip_does_not_stop_later_clips() {
        let Ok(false_binary) = which::which("false") else {
            return;
        };
        let commands = build_clip_commands(
            &[window(1), window(2)],
            Path::new("raid.mkv"),
            "%d.mp4",
            &ClipEncodeOptions::default(),
        );

        let summary = run_clip_commands(&false_binary, &commands)
            .expect("Expected non-zero exits to be reported, not raised");
        assert_eq!(
            summary,
            ClipRunSummary {
                succeeded: Vec::new(),
                failed: vec![1, 2],
            }
        );
    }
}
