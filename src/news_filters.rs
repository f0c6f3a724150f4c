use chrono::{DateTime, Duration as ChronoDuration, Utc};
use serde::{Deserialize, Serialize};
use url::form_urlencoded;

use crate::normalize::is_valid_slug;

const MY_TEAMS_VALUE: &str = "my";
const LIST_SEPARATOR: char = ',';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CompFilter {
    #[default]
    All,
    Premiership,
    Championship,
    LeagueOne,
    LeagueTwo,
    Cups,
    Europe,
    International,
}

impl CompFilter {
    pub const ALL: [CompFilter; 8] = [
        CompFilter::All,
        CompFilter::Premiership,
        CompFilter::Championship,
        CompFilter::LeagueOne,
        CompFilter::LeagueTwo,
        CompFilter::Cups,
        CompFilter::Europe,
        CompFilter::International,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CompFilter::All => "all",
            CompFilter::Premiership => "premiership",
            CompFilter::Championship => "championship",
            CompFilter::LeagueOne => "league-one",
            CompFilter::LeagueTwo => "league-two",
            CompFilter::Cups => "cups",
            CompFilter::Europe => "europe",
            CompFilter::International => "international",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::ALL.into_iter().find(|c| c.as_str() == raw)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContentType {
    News,
    Transfers,
    Injuries,
    MatchReports,
    Previews,
    Opinion,
    Fantasy,
    Video,
}

impl ContentType {
    pub const ALL: [ContentType; 8] = [
        ContentType::News,
        ContentType::Transfers,
        ContentType::Injuries,
        ContentType::MatchReports,
        ContentType::Previews,
        ContentType::Opinion,
        ContentType::Fantasy,
        ContentType::Video,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ContentType::News => "news",
            ContentType::Transfers => "transfers",
            ContentType::Injuries => "injuries",
            ContentType::MatchReports => "match-reports",
            ContentType::Previews => "previews",
            ContentType::Opinion => "opinion",
            ContentType::Fantasy => "fantasy",
            ContentType::Video => "video",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::ALL.into_iter().find(|t| t.as_str() == raw)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SortOrder {
    #[default]
    Latest,
    Oldest,
    Popular,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Latest => "latest",
            SortOrder::Oldest => "oldest",
            SortOrder::Popular => "popular",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "latest" => Some(SortOrder::Latest),
            "oldest" => Some(SortOrder::Oldest),
            "popular" => Some(SortOrder::Popular),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DateRange {
    #[default]
    All,
    Today,
    Week,
    Month,
}

impl DateRange {
    pub fn as_str(self) -> &'static str {
        match self {
            DateRange::All => "all",
            DateRange::Today => "today",
            DateRange::Week => "week",
            DateRange::Month => "month",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "all" => Some(DateRange::All),
            "today" => Some(DateRange::Today),
            "week" => Some(DateRange::Week),
            "month" => Some(DateRange::Month),
            _ => None,
        }
    }

    /// Oldest publish time still inside the range. `All` has no cutoff.
    pub fn cutoff(self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            DateRange::All => None,
            DateRange::Today => Some(now - ChronoDuration::hours(24)),
            DateRange::Week => Some(now - ChronoDuration::days(7)),
            DateRange::Month => Some(now - ChronoDuration::days(30)),
        }
    }
}

/// News-list filter state. The query string is its only persisted form.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NewsFilters {
    pub comp: CompFilter,
    pub types: Vec<ContentType>,
    pub teams: Vec<String>,
    pub my_teams: bool,
    pub sort: SortOrder,
    pub range: DateRange,
    pub breaking: bool,
}

impl NewsFilters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode `?comp=&type=&teams=&sort=&range=&breaking=`. Unknown keys are
    /// ignored and invalid values fall back to their defaults.
    pub fn from_query_string(query: &str) -> Self {
        let query = query.trim().trim_start_matches('?');
        let mut out = Self::default();

        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            match &*key {
                "comp" => out.comp = CompFilter::parse(&value).unwrap_or_default(),
                "type" => {
                    let types = split_list(&value).filter_map(ContentType::parse).collect();
                    out.set_types(types);
                }
                "teams" => {
                    if value.trim() == MY_TEAMS_VALUE {
                        out.set_my_teams(true);
                    } else {
                        let teams = split_list(&value)
                            .filter(|s| is_valid_slug(s))
                            .map(str::to_string)
                            .collect();
                        out.set_teams(teams);
                    }
                }
                "sort" => out.sort = SortOrder::parse(&value).unwrap_or_default(),
                "range" => out.range = DateRange::parse(&value).unwrap_or_default(),
                "breaking" => out.breaking = parse_flag(&value),
                _ => {}
            }
        }
        out
    }

    /// Encode without the leading `?`. Defaults are left out, so the default
    /// state encodes to an empty string.
    pub fn to_query_string(&self) -> String {
        let mut ser = form_urlencoded::Serializer::new(String::new());
        if self.comp != CompFilter::All {
            ser.append_pair("comp", self.comp.as_str());
        }
        if !self.types.is_empty() {
            let joined = self
                .types
                .iter()
                .map(|t| t.as_str())
                .collect::<Vec<_>>()
                .join(",");
            ser.append_pair("type", &joined);
        }
        if self.my_teams {
            ser.append_pair("teams", MY_TEAMS_VALUE);
        } else if !self.teams.is_empty() {
            ser.append_pair("teams", &self.teams.join(","));
        }
        if self.sort != SortOrder::Latest {
            ser.append_pair("sort", self.sort.as_str());
        }
        if self.range != DateRange::All {
            ser.append_pair("range", self.range.as_str());
        }
        if self.breaking {
            ser.append_pair("breaking", "1");
        }
        ser.finish()
    }

    pub fn set_comp(&mut self, comp: CompFilter) {
        self.comp = comp;
    }

    /// Duplicates are dropped, first position kept.
    pub fn set_types(&mut self, types: Vec<ContentType>) {
        let mut out: Vec<ContentType> = Vec::with_capacity(types.len());
        for t in types {
            if !out.contains(&t) {
                out.push(t);
            }
        }
        self.types = out;
    }

    pub fn toggle_type(&mut self, t: ContentType) {
        if let Some(pos) = self.types.iter().position(|x| *x == t) {
            self.types.remove(pos);
        } else {
            self.types.push(t);
        }
    }

    /// A non-empty list switches "my teams" off. `my` is reserved for that facet.
    pub fn set_teams(&mut self, teams: Vec<String>) {
        let mut out: Vec<String> = Vec::with_capacity(teams.len());
        for slug in teams {
            if slug != MY_TEAMS_VALUE && is_valid_slug(&slug) && !out.contains(&slug) {
                out.push(slug);
            }
        }
        if !out.is_empty() {
            self.my_teams = false;
        }
        self.teams = out;
    }

    pub fn toggle_team(&mut self, slug: &str) {
        let mut teams = self.teams.clone();
        if let Some(pos) = teams.iter().position(|s| s == slug) {
            teams.remove(pos);
        } else {
            teams.push(slug.to_string());
        }
        self.set_teams(teams);
    }

    /// Turning "my teams" on clears the explicit team list.
    pub fn set_my_teams(&mut self, on: bool) {
        self.my_teams = on;
        if on {
            self.teams.clear();
        }
    }

    pub fn set_sort(&mut self, sort: SortOrder) {
        self.sort = sort;
    }

    pub fn set_range(&mut self, range: DateRange) {
        self.range = range;
    }

    pub fn set_breaking(&mut self, on: bool) {
        self.breaking = on;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Facets narrowing the list. Sort order is not a filter.
    pub fn active_filter_count(&self) -> usize {
        [
            self.comp != CompFilter::All,
            !self.types.is_empty(),
            self.my_teams || !self.teams.is_empty(),
            self.range != DateRange::All,
            self.breaking,
        ]
        .into_iter()
        .filter(|on| *on)
        .count()
    }

    pub fn has_active_filters(&self) -> bool {
        self.active_filter_count() > 0
    }

    pub fn matches_published(&self, published_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        self.range
            .cutoff(now)
            .is_none_or(|cutoff| published_at >= cutoff)
    }
}

fn split_list(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(LIST_SEPARATOR)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

fn parse_flag(raw: &str) -> bool {
    matches!(raw.trim().to_ascii_lowercase().as_str(), "1" | "true")
}

#[cfg(test)]
mod tests {
    use super::{CompFilter, ContentType, parse_flag};

    #[test]
    fn enum_strings_parse_back() {
        for c in CompFilter::ALL {
            assert_eq!(CompFilter::parse(c.as_str()), Some(c));
        }
        for t in ContentType::ALL {
            assert_eq!(ContentType::parse(t.as_str()), Some(t));
        }
        assert_eq!(CompFilter::parse("Premiership"), None);
    }

    #[test]
    fn flags() {
        assert!(parse_flag("1"));
        assert!(parse_flag("TRUE"));
        assert!(!parse_flag("0"));
        assert!(!parse_flag("yes"));
        assert!(!parse_flag(""));
    }
}
