pub mod client;
pub mod model;

use regex::Regex;

use crate::error::{SplitError, SplitResult};
use model::FightsPayload;

pub use client::{ReportSource, WarcraftLogsClient};
pub use model::{FightRecord, FightWhitelist, ReportBounds, TimeOffset};

lazy_static::lazy_static! {
    static ref START_TIME_LINE: Regex =
        Regex::new(r"(?m)^var start_time = ([0-9]+);\r?$").expect("start_time pattern is valid");
    static ref END_TIME_LINE: Regex =
        Regex::new(r"(?m)^var end_time = ([0-9]+);\r?$").expect("end_time pattern is valid");
}

/// Raw report data normalized into its time bounds and fight list.
#[derive(Debug, Clone)]
pub struct ReportTimeline {
    page_text: String,
    fights: Vec<FightRecord>,
}

impl ReportTimeline {
    pub fn fetch(source: &dyn ReportSource, report_id: &str) -> SplitResult<Self> {
        let page_text = source.report_page(report_id)?;
        let fights_json = source.fights_payload(report_id)?;
        Self::from_parts(page_text, &fights_json)
    }

    /// Builds a timeline from already fetched documents. The fight list is parsed here, once.
    pub fn from_parts(page_text: String, fights_json: &str) -> SplitResult<Self> {
        let payload = serde_json::from_str::<FightsPayload>(fights_json).map_err(|error| {
            SplitError::MalformedReport(format!("fight list does not match expected shape: {error}"))
        })?;

        Ok(Self {
            page_text,
            fights: payload.fights.into_iter().map(FightRecord::from).collect(),
        })
    }

    pub fn get_time_bounds(&self) -> SplitResult<ReportBounds> {
        Ok(ReportBounds {
            start_time: parse_labeled_time(&self.page_text, &START_TIME_LINE, "start_time")?,
            end_time: parse_labeled_time(&self.page_text, &END_TIME_LINE, "end_time")?,
        })
    }

    /// Fights in source order. Duplicate ids are kept as given.
    pub fn get_fight_times(
        &self,
        boss_only: bool,
        id_whitelist: Option<&FightWhitelist>,
    ) -> Vec<FightRecord> {
        self.fights
            .iter()
            .filter(|fight| !boss_only || fight.is_boss_encounter)
            .filter(|fight| id_whitelist.map_or(true, |whitelist| whitelist.contains(fight.id)))
            .copied()
            .collect()
    }
}

fn parse_labeled_time(text: &str, line_pattern: &Regex, label: &str) -> SplitResult<TimeOffset> {
    let values: Vec<&str> = line_pattern
        .captures_iter(text)
        .filter_map(|captures| captures.get(1).map(|value| value.as_str()))
        .collect();

    let [value] = values.as_slice() else {
        return Err(SplitError::MalformedReport(format!(
            "expected exactly one 'var {label} = <int>;' line, found {}",
            values.len()
        )));
    };

    value.parse::<TimeOffset>().map_err(|error| {
        SplitError::MalformedReport(format!("'{label}' value '{value}' is not an integer: {error}"))
    })
}
