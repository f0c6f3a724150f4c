use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use pitchside::config;
use pitchside::entities::{
    ScoredEntity, parse_article_json, parse_entity_refs_json, score_entities, select_top_pills,
};

fn main() -> Result<()> {
    config::init_tool_env();
    let article_path = config::path_arg("--article")
        .context("usage: entity_report --article <a.json> [--refs <r.json>]")?;
    let article = parse_article_json(&read(&article_path)?)?;
    let refs = match config::path_arg("--refs") {
        Some(path) => parse_entity_refs_json(&read(&path)?)?,
        None => Default::default(),
    };

    let sets = score_entities(&article, &refs.as_refs());
    print_section("Competitions", &sets.competitions);
    print_section("Teams", &sets.teams);
    print_section("Players", &sets.players);
    print_section("Managers", &sets.managers);

    let pills = select_top_pills(&sets);
    println!("Pills ({}):", pills.len());
    for pill in pills.iter() {
        println!("  {:?}: {} ({})", pill.kind, pill.entity.name, pill.entity.score);
    }

    if std::env::args().any(|a| a == "--json") {
        let json = serde_json::to_string_pretty(&sets).context("serialize entity sets")?;
        println!("{json}");
    }
    Ok(())
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("read {}", path.display()))
}

fn print_section(title: &str, list: &[ScoredEntity]) {
    println!("{title}:");
    if list.is_empty() {
        println!("  -");
    }
    for e in list {
        println!("  {:>4} {:<9} {} [{}]", e.score, format!("{:?}", e.source), e.name, e.slug);
    }
}
