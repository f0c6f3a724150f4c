use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

const SCHEDULED_MARKERS: &[&str] = &["scheduled", "not started", "not-started", "fixture"];

const RELEVANT_MARKERS: &[&str] = &[
    "scheduled",
    "not started",
    "fixture",
    "ft",
    "full",
    "finished",
    "played",
    "half",
    "live",
];

const DATE_KEYS: &[&str] = &["date", "matchDate", "utcDate", "kickoff"];
const TIME_KEYS: &[&str] = &["time", "kickoffTime", "kickOffTime"];
const STATUS_KEYS: &[&str] = &["short", "long", "description", "type", "name"];
const HOME_KEYS: &[&str] = &["homeTeam", "home", "home_team"];
const AWAY_KEYS: &[&str] = &["awayTeam", "away", "away_team"];

static ROUND_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:matchweek|matchday|gameweek|round|week|mw|md|gw)\s*[-:#.]?\s*(\d+)")
        .expect("round token pattern compiles")
});

#[derive(Debug, Clone, Copy)]
enum RoundField {
    Number(&'static [&'static str]),
    Text(&'static [&'static str]),
}

// Numeric fields first, then the free-text names.
const ROUND_FIELDS: &[RoundField] = &[
    RoundField::Number(&["week"]),
    RoundField::Number(&["matchweek"]),
    RoundField::Number(&["matchday"]),
    RoundField::Number(&["gameweek"]),
    RoundField::Number(&["round"]),
    RoundField::Number(&["round", "number"]),
    RoundField::Number(&["roundNumber"]),
    RoundField::Text(&["roundName"]),
    RoundField::Text(&["round_name"]),
    RoundField::Text(&["round"]),
    RoundField::Text(&["round", "name"]),
    RoundField::Text(&["matchweekName"]),
    RoundField::Text(&["stage"]),
    RoundField::Text(&["tournamentStage"]),
    RoundField::Text(&["name"]),
];

impl RoundField {
    fn apply(self, value: &Value) -> Option<u32> {
        match self {
            RoundField::Number(path) => numeric_round(lookup(value, path)?),
            RoundField::Text(path) => text_round(lookup(value, path)?),
        }
    }
}

fn lookup<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(value, |v, key| v.get(*key))
}

/// One fixture as the upstream feed delivered it. No field is guaranteed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatchRecord(pub Value);

impl MatchRecord {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn raw(&self) -> &Value {
        &self.0
    }

    /// First accessor yielding a positive integer wins.
    pub fn round_number(&self) -> Option<u32> {
        ROUND_FIELDS.iter().find_map(|field| field.apply(&self.0))
    }

    pub fn status(&self) -> Option<String> {
        let status = self.0.get("status")?;
        match status {
            Value::String(s) => non_empty(s),
            Value::Object(_) => pick_string(status, STATUS_KEYS),
            _ => None,
        }
    }

    pub fn date(&self) -> Option<String> {
        pick_string(&self.0, DATE_KEYS)
    }

    pub fn time(&self) -> Option<String> {
        pick_string(&self.0, TIME_KEYS)
    }

    /// Sort key for ordering inside a round. Plain concatenation, so only
    /// zero-padded ISO dates order chronologically.
    pub fn kickoff_key(&self) -> String {
        let mut key = self.date().unwrap_or_default();
        key.push_str(&self.time().unwrap_or_default());
        key
    }

    pub fn home_team(&self) -> Option<String> {
        pick_string(&self.0, HOME_KEYS)
    }

    pub fn away_team(&self) -> Option<String> {
        pick_string(&self.0, AWAY_KEYS)
    }

    pub fn is_scheduled(&self) -> bool {
        status_has_marker(self.status().as_deref(), SCHEDULED_MARKERS)
    }

    /// Loose pool filter: any known status marker, or a team on either side.
    pub fn is_relevant(&self) -> bool {
        status_has_marker(self.status().as_deref(), RELEVANT_MARKERS)
            || self.home_team().is_some()
            || self.away_team().is_some()
    }
}

impl From<Value> for MatchRecord {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// Accepts a bare array, or an object wrapping one under `matches`,
/// `fixtures` or `data`. `null` and empty input give an empty list.
pub fn parse_matches_json(raw: &str) -> Result<Vec<MatchRecord>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    let root: Value = serde_json::from_str(trimmed).context("invalid matches json")?;
    let list = match &root {
        Value::Array(items) => Some(items),
        Value::Object(_) => ["matches", "fixtures", "data"]
            .iter()
            .find_map(|key| root.get(*key).and_then(|v| v.as_array())),
        _ => None,
    };
    Ok(list
        .map(|items| items.iter().cloned().map(MatchRecord).collect())
        .unwrap_or_default())
}

fn status_has_marker(status: Option<&str>, markers: &[&str]) -> bool {
    let Some(status) = status else {
        return false;
    };
    let s = status.to_lowercase();
    markers.iter().any(|m| s.contains(m))
}

fn numeric_round(value: &Value) -> Option<u32> {
    let n = match value {
        Value::Number(n) => {
            if let Some(u) = n.as_u64() {
                u
            } else {
                let f = n.as_f64()?;
                if f.fract() != 0.0 || f < 1.0 {
                    return None;
                }
                f as u64
            }
        }
        Value::String(s) => s.trim().parse::<u64>().ok()?,
        _ => return None,
    };
    u32::try_from(n).ok().filter(|n| *n > 0)
}

fn text_round(value: &Value) -> Option<u32> {
    let text = value.as_str()?;
    let caps = ROUND_TOKEN.captures(text)?;
    caps.get(1)?
        .as_str()
        .parse::<u32>()
        .ok()
        .filter(|n| *n > 0)
}

fn pick_string(value: &Value, keys: &[&str]) -> Option<String> {
    for key in keys {
        if let Some(v) = value.get(*key) {
            if let Some(s) = as_string(v) {
                return Some(s);
            }
        }
    }
    None
}

fn as_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => non_empty(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Object(map) => map
            .get("name")
            .or_else(|| map.get("shortName"))
            .and_then(|v| v.as_str())
            .and_then(non_empty),
        _ => None,
    }
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
