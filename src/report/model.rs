use std::collections::BTreeSet;
use std::ops::RangeInclusive;

use serde::Deserialize;

/// Milliseconds relative to an implicit zero point. Which zero point applies is carried by the
/// name of the field holding the value.
pub type TimeOffset = i64;

/// One encounter entry from a report. Times are relative to the start of the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FightRecord {
    pub id: u32,
    pub start_time: TimeOffset,
    pub end_time: TimeOffset,
    pub is_boss_encounter: bool,
}

/// Wall-clock span of the whole report, in milliseconds since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportBounds {
    pub start_time: TimeOffset,
    pub end_time: TimeOffset,
}

/// Fight ids selected on the command line. Ranges stay ranges so wide spans cost nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FightWhitelist {
    Range(RangeInclusive<u32>),
    Ids(BTreeSet<u32>),
}

impl FightWhitelist {
    pub fn contains(&self, id: u32) -> bool {
        match self {
            FightWhitelist::Range(range) => range.contains(&id),
            FightWhitelist::Ids(ids) => ids.contains(&id),
        }
    }
}

impl From<BTreeSet<u32>> for FightWhitelist {
    fn from(ids: BTreeSet<u32>) -> Self {
        FightWhitelist::Ids(ids)
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct FightsPayload {
    pub(crate) fights: Vec<RawFight>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawFight {
    pub(crate) id: u32,
    pub(crate) start_time: TimeOffset,
    pub(crate) end_time: TimeOffset,
    #[serde(default)]
    pub(crate) boss: Option<i64>,
}

impl From<RawFight> for FightRecord {
    fn from(raw: RawFight) -> Self {
        Self {
            id: raw.id,
            start_time: raw.start_time,
            end_time: raw.end_time,
            is_boss_encounter: raw.boss.map_or(false, |encounter_id| encounter_id != 0),
        }
    }
}
