use std::fs;

use anyhow::{Context, Result};
use tracing::info;

use pitchside::config;
use pitchside::match_record::parse_matches_json;
use pitchside::matchweek::build_rounds;

fn main() -> Result<()> {
    config::init_tool_env();
    let path =
        config::path_arg("--file").context("usage: matchweek_dump --file <fixtures.json>")?;
    let raw = fs::read_to_string(&path)
        .with_context(|| format!("read fixtures from {}", path.display()))?;
    let matches = parse_matches_json(&raw)?;
    info!(count = matches.len(), "fixtures loaded");

    let model = build_rounds(&matches);
    if model.is_empty() {
        println!("No rounds found in {} records.", matches.len());
        return Ok(());
    }

    let limit = config::round_dump_limit();
    let default_key = model.default_round_key();
    for (key, label) in model.labels() {
        let marker = if default_key.as_deref() == Some(key.as_str()) {
            " (default)"
        } else {
            ""
        };
        let list = model.matches_for(&key);
        let relevant = model.relevant_matches(&key).len();
        println!("{key} {label}{marker}: {} matches, {relevant} relevant", list.len());
        for m in list.iter().take(limit) {
            let home = m.home_team().unwrap_or_else(|| "?".to_string());
            let away = m.away_team().unwrap_or_else(|| "?".to_string());
            let status = m.status().unwrap_or_default();
            println!("  {:<18} {home} vs {away} [{status}]", m.kickoff_key());
        }
        if list.len() > limit {
            println!("  ... {} more", list.len() - limit);
        }
    }

    Ok(())
}
