use once_cell::sync::Lazy;
use regex::Regex;

use crate::normalize::normalize_label;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Competition {
    pub name: &'static str,
    pub slug: &'static str,
    pub short: &'static str,
}

const fn comp(name: &'static str, slug: &'static str, short: &'static str) -> Competition {
    Competition { name, slug, short }
}

pub const COMPETITIONS: &[Competition] = &[
    // Scotland
    comp("Scottish Premiership", "scottish-premiership", "SPL"),
    comp("Scottish Championship", "scottish-championship", "SCH"),
    comp("Scottish League One", "scottish-league-one", "SL1"),
    comp("Scottish League Two", "scottish-league-two", "SL2"),
    comp("Scottish Cup", "scottish-cup", "SC"),
    comp("Scottish League Cup", "scottish-league-cup", "SLC"),
    comp("Scottish Challenge Cup", "scottish-challenge-cup", "SCC"),
    comp("Highland League", "highland-league", "HFL"),
    comp("Lowland League", "lowland-league", "LFL"),
    comp("SWPL", "swpl", "SWPL"),
    // England
    comp("Premier League", "premier-league", "EPL"),
    comp("EFL Championship", "efl-championship", "ELC"),
    comp("EFL League One", "efl-league-one", "EL1"),
    comp("EFL League Two", "efl-league-two", "EL2"),
    comp("FA Cup", "fa-cup", "FAC"),
    comp("EFL Cup", "efl-cup", "EFLC"),
    comp("Community Shield", "community-shield", "CS"),
    comp("Women's Super League", "womens-super-league", "WSL"),
    // Elsewhere in Europe
    comp("La Liga", "la-liga", "LAL"),
    comp("Serie A", "serie-a", "SEA"),
    comp("Bundesliga", "bundesliga", "BUN"),
    comp("Ligue 1", "ligue-1", "L1"),
    comp("Eredivisie", "eredivisie", "ERE"),
    comp("Primeira Liga", "primeira-liga", "POR"),
    comp("Belgian Pro League", "belgian-pro-league", "BPL"),
    comp("League of Ireland Premier Division", "league-of-ireland", "LOI"),
    comp("NIFL Premiership", "nifl-premiership", "NIFL"),
    comp("Cymru Premier", "cymru-premier", "CYM"),
    // UEFA
    comp("Champions League", "champions-league", "UCL"),
    comp("Europa League", "europa-league", "UEL"),
    comp("Conference League", "conference-league", "UECL"),
    comp("UEFA Super Cup", "uefa-super-cup", "USC"),
    comp("Nations League", "nations-league", "UNL"),
    comp("Women's Champions League", "womens-champions-league", "UWCL"),
    // International
    comp("World Cup", "world-cup", "WC"),
    comp("World Cup Qualifiers", "world-cup-qualifiers", "WCQ"),
    comp("European Championship", "european-championship", "EURO"),
    comp("Euro Qualifiers", "euro-qualifiers", "EQ"),
    comp("International Friendly", "international-friendly", "INTL"),
    comp("Club Friendly", "club-friendly", "FRN"),
    comp("MLS", "mls", "MLS"),
];

static NORMALIZED_NAMES: Lazy<Vec<String>> =
    Lazy::new(|| COMPETITIONS.iter().map(|c| normalize_label(c.name)).collect());

// Most specific first: a tag only ever takes the first hit.
const PATTERN_SOURCES: &[(&str, &str)] = &[
    (r"\bspfl\s+premiership\b", "scottish-premiership"),
    (r"\bscottish\s+premiership\b", "scottish-premiership"),
    (r"\bspfl\s+championship\b", "scottish-championship"),
    (r"\bscottish\s+championship\b", "scottish-championship"),
    (r"\b(?:spfl|scottish)\s+league\s+(?:one|1)\b", "scottish-league-one"),
    (r"\b(?:spfl|scottish)\s+league\s+(?:two|2)\b", "scottish-league-two"),
    (r"\b(?:premier\s+sports|viaplay)\s+cup\b|\bscottish\s+league\s+cup\b", "scottish-league-cup"),
    (r"\bscottish\s+(?:fa\s+)?cup\b", "scottish-cup"),
    (r"\b(?:spfl\s+trust\s+trophy|challenge\s+cup)\b", "scottish-challenge-cup"),
    (r"\bwomen'?s\s+super\s+league\b|\bwsl\b", "womens-super-league"),
    (r"\b(?:women'?s\s+champions\s+league|uwcl)\b", "womens-champions-league"),
    (r"\b(?:english\s+)?premier\s+league\b|\bepl\b", "premier-league"),
    (r"\b(?:efl|english|sky\s+bet)\s+championship\b", "efl-championship"),
    (r"\b(?:efl|english)\s+league\s+(?:one|1)\b", "efl-league-one"),
    (r"\b(?:efl|english)\s+league\s+(?:two|2)\b", "efl-league-two"),
    (r"\b(?:carabao|efl|league)\s+cup\b", "efl-cup"),
    (r"\b(?:emirates\s+)?fa\s+cup\b", "fa-cup"),
    (r"\b(?:uefa\s+)?champions\s+league\b|\bucl\b", "champions-league"),
    (r"\b(?:uefa\s+)?europa\s+league\b|\buel\b", "europa-league"),
    (r"\b(?:uefa\s+)?(?:europa\s+)?conference\s+league\b|\buecl\b", "conference-league"),
    (r"\bnations\s+league\b", "nations-league"),
    (r"\bworld\s+cup\s+(?:qualifiers?|qualifying)\b", "world-cup-qualifiers"),
    (r"\b(?:fifa\s+)?world\s+cup\b", "world-cup"),
    (r"\beuro\s+(?:\d{4}\s+)?(?:qualifiers?|qualifying)\b", "euro-qualifiers"),
    (r"\b(?:euro\s*\d{4}|euros|european\s+championships?)\b", "european-championship"),
    (r"\bla\s*liga\b", "la-liga"),
    (r"\bserie\s+a\b", "serie-a"),
    (r"\bbundesliga\b", "bundesliga"),
    (r"\bligue\s+(?:1|un)\b", "ligue-1"),
    (r"\bnifl\s+premiership\b|\birish\s+premiership\b", "nifl-premiership"),
    (r"\bclub\s+friendl(?:y|ies)\b|\bpre-?season\s+friendl(?:y|ies)\b", "club-friendly"),
    (r"\b(?:international\s+)?friendl(?:y|ies)\b", "international-friendly"),
    (r"\bchampionship\b", "scottish-championship"),
    (r"\bpremiership\b", "scottish-premiership"),
];

static PATTERNS: Lazy<Vec<(Regex, &'static Competition)>> = Lazy::new(|| {
    PATTERN_SOURCES
        .iter()
        .filter_map(|(src, slug)| {
            let comp = competition_by_slug(slug)?;
            let re = Regex::new(&format!("(?i){src}")).expect("competition pattern compiles");
            Some((re, comp))
        })
        .collect()
});

/// Exact lookup on the normalized display name.
pub fn competition_by_name(name: &str) -> Option<&'static Competition> {
    let key = normalize_label(name);
    if key.is_empty() {
        return None;
    }
    NORMALIZED_NAMES
        .iter()
        .position(|n| *n == key)
        .map(|idx| &COMPETITIONS[idx])
}

pub fn competition_by_slug(slug: &str) -> Option<&'static Competition> {
    COMPETITIONS.iter().find(|c| c.slug == slug)
}

pub fn competition_by_short_code(code: &str) -> Option<&'static Competition> {
    let code = code.trim();
    COMPETITIONS
        .iter()
        .find(|c| c.short.eq_ignore_ascii_case(code))
}

/// First pattern that hits the raw tag text.
pub fn match_competition_pattern(tag: &str) -> Option<&'static Competition> {
    PATTERNS
        .iter()
        .find(|(re, _)| re.is_match(tag))
        .map(|(_, comp)| *comp)
}

/// Name lookup, then short code, then the alias patterns.
pub fn resolve_competition(raw: &str) -> Option<&'static Competition> {
    competition_by_name(raw)
        .or_else(|| competition_by_short_code(raw))
        .or_else(|| match_competition_pattern(raw))
}
