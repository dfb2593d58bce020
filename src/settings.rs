use std::collections::BTreeSet;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::clip::ffmpeg::{validate_output_template, ClipEncodeOptions};
use crate::clip::PaddingConfig;
use crate::error::SettingsError;
use crate::report::{FightWhitelist, TimeOffset};

/// Cut one clip per boss encounter of a Warcraft Logs report out of a raid recording.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Video file input
    #[arg(short, long)]
    pub input: PathBuf,

    /// Warcraft Logs report id
    #[arg(short, long)]
    pub report: String,

    /// Video file output, must contain %d which will be the fight id
    #[arg(short, long)]
    pub output: String,

    /// Warcraft Logs API key
    #[arg(short = 'k', long, alias = "api_key", env = "WCL_API_KEY", hide_env_values = true)]
    pub api_key: String,

    /// Whitelist of fights to export, formatted as 1-5 or 1,2,3
    #[arg(long)]
    pub fights: Option<String>,

    /// Include trash fights, not only boss encounters
    #[arg(long)]
    pub all_fights: bool,

    /// Override file creation time (milliseconds since the Unix epoch)
    #[arg(long, alias = "creation_time")]
    pub creation_time: Option<TimeOffset>,

    /// Override file modified time (milliseconds since the Unix epoch)
    #[arg(long, alias = "modified_time")]
    pub modified_time: Option<TimeOffset>,

    /// Number of seconds to include before and after the fight
    #[arg(long, default_value_t = 5)]
    pub padding: u64,

    /// Number of extra seconds to include before the fight
    #[arg(long, alias = "start_padding", default_value_t = 0)]
    pub start_padding: u64,

    /// Number of extra seconds to include after the fight
    #[arg(long, alias = "end_padding", default_value_t = 10)]
    pub end_padding: u64,

    /// Custom ffmpeg options, split like a shell command line
    #[arg(long, alias = "ffmpeg_options", allow_hyphen_values = true)]
    pub ffmpeg_options: Option<String>,

    /// ffmpeg video codec
    #[arg(long, default_value = "copy")]
    pub vcodec: String,

    /// ffmpeg audio codec
    #[arg(long, default_value = "copy")]
    pub acodec: String,

    /// ffmpeg stream map
    #[arg(long, alias = "ffmpeg_map", default_value = "0")]
    pub ffmpeg_map: String,

    /// Path to the ffmpeg binary
    #[arg(long)]
    pub ffmpeg: Option<PathBuf>,

    /// Print ffmpeg commands instead of running them
    #[arg(long)]
    pub print: bool,

    /// Seconds to wait for each Warcraft Logs request
    #[arg(long, default_value_t = 30)]
    pub timeout: u64,
}

/// Run configuration, validated once from the command line.
#[derive(Debug, Clone)]
pub struct SplitSettings {
    pub input_path: PathBuf,
    pub report_id: String,
    pub output_template: String,
    pub api_key: String,
    pub fight_whitelist: Option<FightWhitelist>,
    pub boss_only: bool,
    pub creation_time_override: Option<TimeOffset>,
    pub modified_time_override: Option<TimeOffset>,
    pub padding: PaddingConfig,
    pub encode_options: ClipEncodeOptions,
    pub ffmpeg_binary: Option<PathBuf>,
    pub print_commands: bool,
    pub request_timeout: Duration,
}

impl TryFrom<CliArgs> for SplitSettings {
    type Error = SettingsError;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        let fight_whitelist = args
            .fights
            .as_deref()
            .map(parse_fight_whitelist)
            .transpose()?;

        let extra_args = match args.ffmpeg_options.as_deref() {
            Some(options) => shell_words::split(options)
                .map_err(|error| SettingsError::InvalidFfmpegOptions(error.to_string()))?,
            None => Vec::new(),
        };

        Ok(Self {
            input_path: args.input,
            report_id: args.report,
            output_template: validate_output_template(&args.output)?,
            api_key: args.api_key,
            fight_whitelist,
            boss_only: !args.all_fights,
            creation_time_override: args.creation_time,
            modified_time_override: args.modified_time,
            padding: PaddingConfig::from_seconds(args.padding, args.start_padding, args.end_padding),
            encode_options: ClipEncodeOptions {
                stream_map: args.ffmpeg_map,
                video_codec: args.vcodec,
                audio_codec: args.acodec,
                extra_args,
            },
            ffmpeg_binary: args.ffmpeg,
            print_commands: args.print,
            request_timeout: Duration::from_secs(args.timeout),
        })
    }
}

/// Parses `A-B` (inclusive, either order) or `A,B,C` into a fight whitelist.
pub fn parse_fight_whitelist(value: &str) -> Result<FightWhitelist, SettingsError> {
    let invalid = || SettingsError::InvalidFights(value.to_string());
    let trimmed = value.trim();

    if let Some((first, last)) = trimmed.split_once('-') {
        let first = first.trim().parse::<u32>().map_err(|_| invalid())?;
        let last = last.trim().parse::<u32>().map_err(|_| invalid())?;
        let (low, high) = if first <= last { (first, last) } else { (last, first) };
        return Ok(FightWhitelist::Range(low..=high));
    }

    let ids = trimmed
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| token.parse::<u32>().map_err(|_| invalid()))
        .collect::<Result<BTreeSet<u32>, SettingsError>>()?;

    if ids.is_empty() {
        return Err(invalid());
    }

    Ok(FightWhitelist::Ids(ids))
}

#[cfg(test)]
mod tests {
    use super::{parse_fight_whitelist, CliArgs, SplitSettings};
    use crate::clip::PaddingConfig;
    use crate::error::SettingsError;
    use crate::report::FightWhitelist;
    use clap::Parser;
    use std::collections::BTreeSet;

    fn settings_from(extra: &[&str]) -> Result<SplitSettings, SettingsError> {
        let mut argv = vec![
            "fightclip", "-i", "raid.mkv", "-r", "aBcD1234", "-o", "clips/%d.mp4", "-k", "secret",
        ];
        argv.extend_from_slice(extra);
        let args = CliArgs::try_parse_from(argv).expect("Expected command line to parse");
        SplitSettings::try_from(args)
    }

    #[test]
    fn parses_fight_ranges_in_either_order() {
        assert_eq!(parse_fight_whitelist("1-5"), Ok(FightWhitelist::Range(1..=5)));
        assert_eq!(parse_fight_whitelist("5-3"), Ok(FightWhitelist::Range(3..=5)));
        assert_eq!(parse_fight_whitelist("7-7"), Ok(FightWhitelist::Range(7..=7)));
    }

    #[test]
    fn keeps_widest_range_lazy() {
        let whitelist = parse_fight_whitelist("1-4294967295").expect("Expected full range to parse");
        assert_eq!(whitelist, FightWhitelist::Range(1..=u32::MAX));
        assert!(whitelist.contains(u32::MAX));
        assert!(whitelist.contains(2_000_000_000));
        assert!(!whitelist.contains(0));
    }

    #[test]
    fn parses_fight_lists() {
        assert_eq!(
            parse_fight_whitelist("1,3,9"),
            Ok(FightWhitelist::Ids(BTreeSet::from([1, 3, 9])))
        );
        assert_eq!(
            parse_fight_whitelist(" 4, 2 ,"),
            Ok(FightWhitelist::Ids(BTreeSet::from([2, 4])))
        );
        assert_eq!(
            parse_fight_whitelist("12"),
            Ok(FightWhitelist::Ids(BTreeSet::from([12])))
        );
    }

    #[test]
    fn rejects_malformed_fight_whitelists() {
        for value in ["", ",", "a-b", "1-", "1,x", "1-2-3", "-4"] {
            assert_eq!(
                parse_fight_whitelist(value),
                Err(SettingsError::InvalidFights(value.to_string())),
                "Whitelist should be rejected: {value:?}"
            );
        }
    }

    #[test]
    fn applies_defaults() {
        let settings = settings_from(&[]).expect("Expected defaults to validate");

        assert!(settings.boss_only);
        assert!(!settings.print_commands);
        assert_eq!(settings.fight_whitelist, None);
        assert_eq!(
            settings.padding,
            PaddingConfig {
                start_padding: 5_000,
                end_padding: 15_000,
            }
        );
        assert_eq!(settings.encode_options.stream_map, "0");
        assert_eq!(settings.encode_options.video_codec, "copy");
        assert_eq!(settings.encode_options.audio_codec, "copy");
        assert!(settings.encode_options.extra_args.is_empty());
    }

    #[test]
    fn combines_padding_flags() {
        let settings = settings_from(&["--padding", "0", "--start-padding", "3", "--end-padding", "20"])
            .expect("Expected padding flags to validate");
        assert_eq!(
            settings.padding,
            PaddingConfig {
                start_padding: 3_000,
                end_padding: 20_000,
            }
        );
    }

    #[test]
    fn splits_ffmpeg_options_with_shell_quoting() {
        let settings = settings_from(&[
            "--ffmpeg-options",
            "-preset fast -metadata 'title=Queen Ansurek'",
            "--all-fights",
            "--fights",
            "2-4",
        ])
        .expect("Expected options to validate");

        assert_eq!(
            settings.encode_options.extra_args,
            vec!["-preset", "fast", "-metadata", "title=Queen Ansurek"]
        );
        assert!(!settings.boss_only);
        assert_eq!(settings.fight_whitelist, Some(FightWhitelist::Range(2..=4)));
    }

    #[test]
    fn rejects_output_without_fight_placeholder() {
        let args = CliArgs::try_parse_from([
            "fightclip", "-i", "raid.mkv", "-r", "aBcD1234", "-o", "clips/out.mp4", "-k", "secret",
        ])
        .expect("Expected command line to parse");

        assert_eq!(
            SplitSettings::try_from(args).map(|_| ()),
            Err(SettingsError::InvalidOutputTemplate("clips/out.mp4".to_string()))
        );
    }

    #[test]
    fn rejects_unbalanced_ffmpeg_option_quotes() {
        let result = settings_from(&["--ffmpeg-options", "-metadata 'title=unterminated"]);
        assert!(matches!(result, Err(SettingsError::InvalidFfmpegOptions(_))));
    }
}
