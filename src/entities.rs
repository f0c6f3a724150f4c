use std::cmp::Ordering;
use std::collections::HashSet;

use anyhow::{Context, Result};
use rayon::prelude::*;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::{debug, trace};

use crate::competitions::{COMPETITIONS, match_competition_pattern, resolve_competition};
use crate::config::with_scoring_pool;
use crate::normalize::{contains_label, normalize_label, slugify};

pub const TAG_BASE_SCORE: i32 = 100;
pub const MENTION_SCORE: i32 = 60;
pub const FALLBACK_SCORE: i32 = 10;

const TOP_TEAM_PILLS: usize = 2;

/// The article fields entity detection reads. Anything missing, `null` or of
/// the wrong shape is empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Article {
    #[serde(deserialize_with = "string_list")]
    pub tags: Vec<String>,
    #[serde(deserialize_with = "text_or_none")]
    pub excerpt: Option<String>,
    #[serde(deserialize_with = "text_or_none")]
    pub content: Option<String>,
    /// Either a plain name or an object carrying `name`.
    #[serde(deserialize_with = "competition_name")]
    pub competition: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRef {
    pub name: String,
    pub slug: String,
}

impl EntityRef {
    pub fn new(name: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            slug: slug.into(),
        }
    }
}

/// Known entities to match against. Lists that are not available stay empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct EntityReferences<'a> {
    pub teams: &'a [EntityRef],
    pub players: &'a [EntityRef],
    pub managers: &'a [EntityRef],
    /// Players the server already found in the article body.
    pub entity_players: &'a [EntityRef],
    /// Managers the server already found in the article body.
    pub entity_managers: &'a [EntityRef],
}

/// Owned form of [`EntityReferences`] for loading from JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReferenceData {
    #[serde(deserialize_with = "ref_list")]
    pub teams: Vec<EntityRef>,
    #[serde(deserialize_with = "ref_list")]
    pub players: Vec<EntityRef>,
    #[serde(deserialize_with = "ref_list")]
    pub managers: Vec<EntityRef>,
    #[serde(deserialize_with = "ref_list")]
    pub entity_players: Vec<EntityRef>,
    #[serde(deserialize_with = "ref_list")]
    pub entity_managers: Vec<EntityRef>,
}

impl ReferenceData {
    pub fn as_refs(&self) -> EntityReferences<'_> {
        EntityReferences {
            teams: &self.teams,
            players: &self.players,
            managers: &self.managers,
            entity_players: &self.entity_players,
            entity_managers: &self.entity_managers,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntitySource {
    Tag,
    Mention,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoredEntity {
    pub name: String,
    pub slug: String,
    pub score: i32,
    pub source: EntitySource,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySets {
    pub competitions: Vec<ScoredEntity>,
    pub teams: Vec<ScoredEntity>,
    pub players: Vec<ScoredEntity>,
    pub managers: Vec<ScoredEntity>,
}

impl EntitySets {
    pub fn is_empty(&self) -> bool {
        self.competitions.is_empty()
            && self.teams.is_empty()
            && self.players.is_empty()
            && self.managers.is_empty()
    }

    /// Competitions that count as active filters. Fallback entries only feed pills.
    pub fn active_competitions(&self) -> impl Iterator<Item = &ScoredEntity> {
        self.competitions
            .iter()
            .filter(|c| c.source != EntitySource::Fallback)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PillKind {
    Competition,
    Team,
    Player,
    Manager,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pill {
    pub kind: PillKind,
    pub entity: ScoredEntity,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopPills {
    pub competition: Option<ScoredEntity>,
    pub teams: Vec<ScoredEntity>,
    pub extra: Option<Pill>,
}

impl TopPills {
    pub fn len(&self) -> usize {
        usize::from(self.competition.is_some())
            + self.teams.len()
            + usize::from(self.extra.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Header order: competition, teams, then the extra pill.
    pub fn iter(&self) -> impl Iterator<Item = Pill> + '_ {
        let comp = self.competition.iter().map(|e| Pill {
            kind: PillKind::Competition,
            entity: e.clone(),
        });
        let teams = self.teams.iter().map(|e| Pill {
            kind: PillKind::Team,
            entity: e.clone(),
        });
        comp.chain(teams).chain(self.extra.iter().cloned())
    }
}

/// Accumulates one category. First detection of a slug wins.
#[derive(Default)]
struct CategoryBuilder {
    seen: HashSet<String>,
    items: Vec<ScoredEntity>,
}

impl CategoryBuilder {
    fn add(&mut self, name: &str, slug: &str, score: i32, source: EntitySource) -> bool {
        if slug.is_empty() || !self.seen.insert(slug.to_string()) {
            return false;
        }
        self.items.push(ScoredEntity {
            name: name.to_string(),
            slug: slug.to_string(),
            score,
            source,
        });
        true
    }

    fn finish(mut self) -> Vec<ScoredEntity> {
        self.items.sort_by(rank_order);
        self.items
    }
}

fn rank_order(a: &ScoredEntity, b: &ScoredEntity) -> Ordering {
    b.score
        .cmp(&a.score)
        .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        .then_with(|| a.name.cmp(&b.name))
}

fn tag_score(index: usize) -> i32 {
    TAG_BASE_SCORE - i32::try_from(index).unwrap_or(i32::MAX - TAG_BASE_SCORE)
}

struct NormalizedRef<'a> {
    entity: &'a EntityRef,
    name: String,
    slug: String,
}

fn normalize_refs(list: &[EntityRef]) -> Vec<NormalizedRef<'_>> {
    list.iter()
        .map(|entity| NormalizedRef {
            entity,
            name: normalize_label(&entity.name),
            slug: normalize_label(&entity.slug),
        })
        .collect()
}

/// Tags are walked in order so an earlier tag claims the higher score.
fn add_tag_matches(builder: &mut CategoryBuilder, tags: &[String], refs: &[EntityRef]) -> usize {
    let refs = normalize_refs(refs);
    let mut added = 0;
    for (idx, tag) in tags.iter().enumerate() {
        if tag.is_empty() {
            continue;
        }
        for r in refs.iter().filter(|r| *tag == r.name || *tag == r.slug) {
            if builder.add(&r.entity.name, &r.entity.slug, tag_score(idx), EntitySource::Tag) {
                added += 1;
            }
        }
    }
    added
}

fn add_mentions(builder: &mut CategoryBuilder, mentions: &[EntityRef]) -> usize {
    mentions
        .iter()
        .filter(|m| builder.add(&m.name, &m.slug, MENTION_SCORE, EntitySource::Mention))
        .count()
}

fn score_competitions(article: &Article, tags: &[String]) -> Vec<ScoredEntity> {
    let mut builder = CategoryBuilder::default();

    // Tags naming a competition outright are settled here and skip the patterns.
    let mut claimed = vec![false; tags.len()];
    for comp in COMPETITIONS {
        let key = normalize_label(comp.name);
        for (idx, tag) in tags.iter().enumerate() {
            if *tag == key {
                claimed[idx] = true;
                builder.add(comp.name, comp.slug, tag_score(idx), EntitySource::Tag);
            }
        }
    }
    let exact = builder.items.len();

    for (idx, tag) in article.tags.iter().enumerate() {
        if claimed[idx] {
            continue;
        }
        if let Some(comp) = match_competition_pattern(tag) {
            builder.add(comp.name, comp.slug, tag_score(idx), EntitySource::Tag);
        }
    }
    trace!(exact, pattern = builder.items.len() - exact, "competition tag passes");

    if let Some(raw) = article.competition.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        let (name, slug) = match resolve_competition(raw) {
            Some(comp) => (comp.name.to_string(), comp.slug.to_string()),
            None => (raw.to_string(), slugify(raw)),
        };
        let mentioned = [article.excerpt.as_deref(), article.content.as_deref()]
            .into_iter()
            .flatten()
            .any(|text| contains_label(text, &name) || contains_label(text, raw));
        let (score, source) = if mentioned {
            (MENTION_SCORE, EntitySource::Mention)
        } else {
            (FALLBACK_SCORE, EntitySource::Fallback)
        };
        builder.add(&name, &slug, score, source);
    }

    builder.finish()
}

fn score_people(tags: &[String], mentions: &[EntityRef], refs: &[EntityRef]) -> Vec<ScoredEntity> {
    let mut builder = CategoryBuilder::default();
    let mentioned = add_mentions(&mut builder, mentions);
    let tagged = add_tag_matches(&mut builder, tags, refs);
    trace!(mentioned, tagged, "people passes");
    builder.finish()
}

/// Rank the competitions, teams, players and managers an article talks about.
pub fn score_entities(article: &Article, refs: &EntityReferences<'_>) -> EntitySets {
    let tags: Vec<String> = article.tags.iter().map(|t| normalize_label(t)).collect();

    let competitions = score_competitions(article, &tags);

    let mut teams = CategoryBuilder::default();
    add_tag_matches(&mut teams, &tags, refs.teams);
    let teams = teams.finish();

    let players = score_people(&tags, refs.entity_players, refs.players);
    let managers = score_people(&tags, refs.entity_managers, refs.managers);

    debug!(
        competitions = competitions.len(),
        teams = teams.len(),
        players = players.len(),
        managers = managers.len(),
        "article entities scored"
    );

    EntitySets {
        competitions,
        teams,
        players,
        managers,
    }
}

/// Score a batch of articles against shared reference data.
pub fn score_articles(articles: &[Article], refs: &EntityReferences<'_>) -> Vec<EntitySets> {
    with_scoring_pool(|| {
        articles
            .par_iter()
            .map(|article| score_entities(article, refs))
            .collect()
    })
}

/// Pick the header pills: best real competition, two teams, and at most one
/// person when they were tagged or mentioned.
pub fn select_top_pills(sets: &EntitySets) -> TopPills {
    let competition = sets
        .competitions
        .iter()
        .find(|c| c.source != EntitySource::Fallback)
        .cloned();
    let teams = sets.teams.iter().take(TOP_TEAM_PILLS).cloned().collect();

    let player = sets.players.first().map(|e| (PillKind::Player, e));
    let manager = sets.managers.first().map(|e| (PillKind::Manager, e));
    let person = match (player, manager) {
        (Some(p), Some(m)) => Some(if m.1.score > p.1.score { m } else { p }),
        (p, m) => p.or(m),
    };
    let extra = person
        .filter(|(_, e)| e.score >= MENTION_SCORE)
        .map(|(kind, e)| Pill {
            kind,
            entity: e.clone(),
        });

    TopPills {
        competition,
        teams,
        extra,
    }
}

/// Only syntactically invalid JSON fails. A root that is not an object reads
/// as an empty article.
pub fn parse_article_json(raw: &str) -> Result<Article> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(Article::default());
    }
    let root: Value = serde_json::from_str(trimmed).context("invalid article json")?;
    if !root.is_object() {
        return Ok(Article::default());
    }
    serde_json::from_value(root).context("invalid article json")
}

/// Same contract as [`parse_article_json`]. List entries without a string
/// `name` and `slug` are skipped.
pub fn parse_entity_refs_json(raw: &str) -> Result<ReferenceData> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(ReferenceData::default());
    }
    let root: Value = serde_json::from_str(trimmed).context("invalid entity refs json")?;
    if !root.is_object() {
        return Ok(ReferenceData::default());
    }
    serde_json::from_value(root).context("invalid entity refs json")
}

fn string_list<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let Value::Array(items) = value else {
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .filter_map(|item| match item {
            Value::String(s) => Some(s),
            _ => None,
        })
        .collect())
}

fn text_or_none<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(Some(s)),
        _ => Ok(None),
    }
}

fn ref_list<'de, D>(deserializer: D) -> std::result::Result<Vec<EntityRef>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let Value::Array(items) = value else {
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect())
}

fn competition_name<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let name = match value {
        Value::String(s) => Some(s),
        Value::Object(map) => map.get("name").and_then(Value::as_str).map(str::to_string),
        _ => None,
    };
    Ok(name)
}
