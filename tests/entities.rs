use std::fs;
use std::path::PathBuf;

use pitchside::entities::{
    Article, EntityRef, EntityReferences, EntitySets, EntitySource, PillKind, ScoredEntity,
    parse_article_json, parse_entity_refs_json, score_articles, score_entities, select_top_pills,
};

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

fn article(tags: &[&str]) -> Article {
    Article {
        tags: tags.iter().map(|t| t.to_string()).collect(),
        ..Article::default()
    }
}

fn scored(name: &str, score: i32, source: EntitySource) -> ScoredEntity {
    ScoredEntity {
        name: name.to_string(),
        slug: name.to_lowercase().replace(' ', "-"),
        score,
        source,
    }
}

fn slugs(list: &[ScoredEntity]) -> Vec<&str> {
    list.iter().map(|e| e.slug.as_str()).collect()
}

#[test]
fn derby_fixture_ranks_every_category() {
    let article =
        parse_article_json(&read_fixture("article_derby.json")).expect("article should parse");
    let refs =
        parse_entity_refs_json(&read_fixture("refs_spfl.json")).expect("refs should parse");
    let sets = score_entities(&article, &refs.as_refs());

    assert_eq!(sets.competitions.len(), 1);
    let comp = &sets.competitions[0];
    assert_eq!(comp.slug, "scottish-premiership");
    assert_eq!(comp.score, 98);
    assert_eq!(comp.source, EntitySource::Tag);

    assert_eq!(slugs(&sets.teams), vec!["celtic", "rangers"]);
    assert_eq!(sets.teams[0].score, 100);
    assert_eq!(sets.teams[1].score, 99);

    assert_eq!(slugs(&sets.players), vec!["kyogo-furuhashi"]);
    assert_eq!(sets.players[0].source, EntitySource::Mention);
    assert_eq!(sets.players[0].score, 60);

    assert_eq!(slugs(&sets.managers), vec!["brendan-rodgers"]);
    assert_eq!(sets.managers[0].score, 97);

    let pills = select_top_pills(&sets);
    assert_eq!(pills.len(), 4);
    let extra = pills.extra.as_ref().expect("manager pill");
    assert_eq!(extra.kind, PillKind::Manager);
    let kinds: Vec<PillKind> = pills.iter().map(|p| p.kind).collect();
    assert_eq!(
        kinds,
        vec![PillKind::Competition, PillKind::Team, PillKind::Team, PillKind::Manager]
    );
}

#[test]
fn exact_competition_tag_is_tag_sourced() {
    let sets = score_entities(
        &article(&["Transfer news", "  champions LEAGUE! "]),
        &EntityReferences::default(),
    );
    assert_eq!(slugs(&sets.competitions), vec!["champions-league"]);
    assert_eq!(sets.competitions[0].score, 99);
    assert_eq!(sets.competitions[0].source, EntitySource::Tag);
}

#[test]
fn exact_and_pattern_hits_collapse_to_one_entry() {
    let sets = score_entities(
        &article(&["SPFL Premiership", "Scottish Premiership", "Premiership"]),
        &EntityReferences::default(),
    );
    assert_eq!(slugs(&sets.competitions), vec!["scottish-premiership"]);
    // The exact pass claims it first, from the second tag.
    assert_eq!(sets.competitions[0].score, 99);
}

#[test]
fn pattern_only_tag_scores_by_position() {
    let sets = score_entities(
        &article(&["Transfer news", "Sky Bet Championship"]),
        &EntityReferences::default(),
    );
    assert_eq!(slugs(&sets.competitions), vec!["efl-championship"]);
    assert_eq!(sets.competitions[0].score, 99);
    assert_eq!(sets.competitions[0].source, EntitySource::Tag);
}

#[test]
fn named_league_tags_give_one_competition() {
    for (tag, slug) in [
        ("NIFL Premiership", "nifl-premiership"),
        ("Club Friendly", "club-friendly"),
        ("Scottish League Cup", "scottish-league-cup"),
        ("Women's Champions League", "womens-champions-league"),
        ("European Championship", "european-championship"),
    ] {
        let sets = score_entities(&article(&[tag]), &EntityReferences::default());
        assert_eq!(slugs(&sets.competitions), vec![slug], "tag {tag}");
        assert_eq!(sets.competitions[0].score, 100);
    }

    let sets = score_entities(
        &article(&["Irish Premiership", "Premiership"]),
        &EntityReferences::default(),
    );
    assert_eq!(slugs(&sets.competitions), vec!["nifl-premiership", "scottish-premiership"]);
    assert_eq!(sets.competitions[1].score, 99);
}

#[test]
fn competition_field_becomes_mention_or_fallback() {
    let mut a = article(&[]);
    a.competition = Some("Europa League".to_string());
    a.content = Some("Rangers head into the Europa League play-off in form.".to_string());
    let sets = score_entities(&a, &EntityReferences::default());
    assert_eq!(sets.competitions[0].source, EntitySource::Mention);
    assert_eq!(sets.competitions[0].score, 60);
    assert_eq!(sets.active_competitions().count(), 1);

    a.content = None;
    a.excerpt = Some("A quiet night in Glasgow.".to_string());
    let sets = score_entities(&a, &EntityReferences::default());
    assert_eq!(sets.competitions[0].source, EntitySource::Fallback);
    assert_eq!(sets.competitions[0].score, 10);
    assert_eq!(sets.active_competitions().count(), 0);
    assert!(select_top_pills(&sets).competition.is_none());
}

#[test]
fn unknown_competition_field_is_slugged() {
    let mut a = article(&[]);
    a.competition = Some("Highland Cup".to_string());
    let sets = score_entities(&a, &EntityReferences::default());
    assert_eq!(slugs(&sets.competitions), vec!["highland-cup"]);
    assert_eq!(sets.competitions[0].name, "Highland Cup");
}

#[test]
fn teams_match_on_name_or_slug() {
    let teams = vec![
        EntityRef::new("Heart of Midlothian", "hearts"),
        EntityRef::new("St Mirren", "st-mirren"),
        EntityRef::new("Hibernian", "hibernian"),
    ];
    let refs = EntityReferences {
        teams: &teams,
        ..EntityReferences::default()
    };
    let sets = score_entities(&article(&["Hearts", "St. Mirren", "Hibs"]), &refs);
    assert_eq!(slugs(&sets.teams), vec!["hearts", "st-mirren"]);
    assert_eq!(sets.teams[0].score, 100);
    assert_eq!(sets.teams[1].score, 99);
}

#[test]
fn mention_beats_later_tag_for_the_same_player() {
    let players = vec![EntityRef::new("Lawrence Shankland", "lawrence-shankland")];
    let refs = EntityReferences {
        players: &players,
        entity_players: &players,
        ..EntityReferences::default()
    };
    let sets = score_entities(&article(&["Lawrence Shankland"]), &refs);
    assert_eq!(sets.players.len(), 1);
    assert_eq!(sets.players[0].source, EntitySource::Mention);
    assert_eq!(sets.players[0].score, 60);
}

#[test]
fn ties_break_on_name() {
    let managers = vec![
        EntityRef::new("steven Naismith", "steven-naismith"),
        EntityRef::new("Derek McInnes", "derek-mcinnes"),
        EntityRef::new("Barry Robson", "barry-robson"),
    ];
    let refs = EntityReferences {
        entity_managers: &managers,
        ..EntityReferences::default()
    };
    let sets = score_entities(&Article::default(), &refs);
    let names: Vec<&str> = sets.managers.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["Barry Robson", "Derek McInnes", "steven Naismith"]);
}

#[test]
fn empty_article_and_references_give_nothing() {
    let sets = score_entities(&Article::default(), &EntityReferences::default());
    assert!(sets.is_empty());
    let pills = select_top_pills(&sets);
    assert!(pills.is_empty());
    assert_eq!(pills.iter().count(), 0);
}

#[test]
fn pills_cap_teams_and_skip_weak_people() {
    let sets = EntitySets {
        competitions: vec![
            scored("Scottish Cup", 10, EntitySource::Fallback),
            scored("League Cup", 10, EntitySource::Fallback),
        ],
        teams: vec![
            scored("Celtic", 100, EntitySource::Tag),
            scored("Rangers", 99, EntitySource::Tag),
            scored("Aberdeen", 98, EntitySource::Tag),
        ],
        players: vec![scored("Someone", 10, EntitySource::Fallback)],
        managers: vec![scored("Someone Else", 59, EntitySource::Tag)],
    };
    let pills = select_top_pills(&sets);
    assert!(pills.competition.is_none());
    assert_eq!(slugs(&pills.teams), vec!["celtic", "rangers"]);
    assert!(pills.extra.is_none());
    assert_eq!(pills.len(), 2);
}

#[test]
fn pill_prefers_player_on_equal_scores() {
    let sets = EntitySets {
        players: vec![scored("Kyogo Furuhashi", 60, EntitySource::Mention)],
        managers: vec![scored("Brendan Rodgers", 60, EntitySource::Mention)],
        ..EntitySets::default()
    };
    let extra = select_top_pills(&sets).extra.expect("extra pill");
    assert_eq!(extra.kind, PillKind::Player);
    assert!(select_top_pills(&sets).len() <= 4);
}

#[test]
fn batch_scoring_matches_single_calls() {
    let teams = vec![EntityRef::new("Celtic", "celtic"), EntityRef::new("Rangers", "rangers")];
    let refs = EntityReferences {
        teams: &teams,
        ..EntityReferences::default()
    };
    let articles = vec![article(&["Celtic"]), article(&["Rangers", "Celtic"]), Article::default()];
    let batch = score_articles(&articles, &refs);
    assert_eq!(batch.len(), 3);
    for (a, sets) in articles.iter().zip(&batch) {
        assert_eq!(*sets, score_entities(a, &refs));
    }
}

#[test]
fn missing_article_fields_default() {
    let a = parse_article_json("{\"tags\": [\"Celtic\"]}").expect("partial article should parse");
    assert_eq!(a.tags, vec!["Celtic"]);
    assert!(a.excerpt.is_none());
    assert_eq!(parse_article_json("null").expect("null should parse"), Article::default());
    assert!(parse_entity_refs_json("null").expect("null should parse").teams.is_empty());
}

#[test]
fn null_and_misshapen_fields_default() {
    let a = parse_article_json(r#"{"tags": null, "excerpt": "x", "content": null}"#)
        .expect("null tags should parse");
    assert!(a.tags.is_empty());
    assert_eq!(a.excerpt.as_deref(), Some("x"));
    assert!(a.content.is_none());

    let a = parse_article_json(r#"{"competition": null}"#).expect("null competition should parse");
    assert!(a.competition.is_none());
    let a = parse_article_json(r#"{"competition": {"id": 7, "name": "Scottish Cup"}}"#)
        .expect("competition object should parse");
    assert_eq!(a.competition.as_deref(), Some("Scottish Cup"));

    let a = parse_article_json(r#"{"tags": "Celtic", "excerpt": 4}"#)
        .expect("wrong shapes should parse");
    assert_eq!(a, Article::default());
    let a = parse_article_json(r#"{"tags": ["Celtic", 3, null]}"#).expect("mixed tags");
    assert_eq!(a.tags, vec!["Celtic"]);
    assert_eq!(parse_article_json("[1, 2]").expect("array root"), Article::default());

    let refs = parse_entity_refs_json(
        r#"{"teams": [], "players": null, "entityManagers": "none",
            "managers": [{"name": "Derek McInnes", "slug": "derek-mcinnes"}, {"name": 1}]}"#,
    )
    .expect("null lists should parse");
    assert!(refs.players.is_empty());
    assert!(refs.entity_managers.is_empty());
    assert_eq!(refs.managers, vec![EntityRef::new("Derek McInnes", "derek-mcinnes")]);

    assert!(parse_article_json("{\"tags\": [").is_err());
    assert!(parse_entity_refs_json("{teams}").is_err());
}
