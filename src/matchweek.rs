use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::{debug, trace};

use crate::match_record::MatchRecord;

const ROUND_KEY_PREFIX: &str = "MW";

/// A matchweek number. Always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Round(u32);

impl Round {
    pub fn new(number: u32) -> Option<Self> {
        (number > 0).then_some(Self(number))
    }

    pub fn number(self) -> u32 {
        self.0
    }

    pub fn key(self) -> String {
        self.to_string()
    }

    pub fn label(self) -> String {
        format!("Matchweek {}", self.0)
    }
}

impl fmt::Display for Round {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{ROUND_KEY_PREFIX}{}", self.0)
    }
}

impl FromStr for Round {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .trim()
            .strip_prefix(ROUND_KEY_PREFIX)
            .ok_or_else(|| anyhow::anyhow!("round key must start with {ROUND_KEY_PREFIX}: {s:?}"))?;
        let n = digits.parse::<u32>()?;
        Round::new(n).ok_or_else(|| anyhow::anyhow!("round number must be positive: {s:?}"))
    }
}

impl Serialize for Round {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Round {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchweekModel {
    pub rounds: Vec<Round>,
    pub matches_by_round: BTreeMap<Round, Vec<MatchRecord>>,
    pub default_round: Option<Round>,
}

impl MatchweekModel {
    pub fn is_empty(&self) -> bool {
        self.rounds.is_empty()
    }

    pub fn round_keys(&self) -> Vec<String> {
        self.rounds.iter().map(|r| r.key()).collect()
    }

    pub fn labels(&self) -> Vec<(String, String)> {
        self.rounds.iter().map(|r| (r.key(), r.label())).collect()
    }

    pub fn default_round_key(&self) -> Option<String> {
        self.default_round.map(Round::key)
    }

    /// Matches for a `"MW<n>"` key. Unknown or malformed keys give an empty slice.
    pub fn matches_for(&self, key: &str) -> &[MatchRecord] {
        key.parse::<Round>()
            .ok()
            .and_then(|r| self.matches_by_round.get(&r))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Matches for a key that pass the loose status/team filter.
    pub fn relevant_matches(&self, key: &str) -> Vec<&MatchRecord> {
        self.matches_for(key)
            .iter()
            .filter(|m| m.is_relevant())
            .collect()
    }
}

/// Group fixtures into matchweeks and pick the one a fixtures page should open on.
///
/// Records without a resolvable round are skipped. The default round is the
/// latest one still holding a scheduled fixture, else the last round.
pub fn build_rounds(matches: &[MatchRecord]) -> MatchweekModel {
    let mut grouped: BTreeMap<Round, Vec<MatchRecord>> = BTreeMap::new();
    let mut dropped = 0usize;

    for m in matches {
        let Some(round) = m.round_number().and_then(Round::new) else {
            dropped += 1;
            continue;
        };
        grouped.entry(round).or_default().push(m.clone());
    }
    if dropped > 0 {
        debug!(dropped, total = matches.len(), "matches without a round skipped");
    }

    for list in grouped.values_mut() {
        list.sort_by_cached_key(MatchRecord::kickoff_key);
    }

    let rounds: Vec<Round> = grouped.keys().copied().collect();
    let default_round = grouped
        .iter()
        .rev()
        .find(|(_, list)| list.iter().any(MatchRecord::is_scheduled))
        .map(|(round, _)| *round)
        .or_else(|| rounds.last().copied());
    trace!(rounds = rounds.len(), ?default_round, "matchweek model built");

    MatchweekModel {
        rounds,
        matches_by_round: grouped,
        default_round,
    }
}
