use std::collections::HashMap;

use serde_json::Value;

use crate::models::{
    Leaders, PlayerRecord, Report, ReportSchema, ShotEvent, ShotSummary, TeamFramePoint,
    TeamSummaryRecord, VideoMeta,
};
use crate::normalize::Row;

pub fn detect_schema(raw: &Value) -> ReportSchema {
    match raw.get("game_report") {
        Some(Value::Object(_)) => ReportSchema::Legacy,
        _ => ReportSchema::Flat,
    }
}

/// Build the canonical report from a parsed document of either layout.
pub fn normalize_report(raw: Value) -> Report {
    let schema = detect_schema(&raw);
    let nested = raw.get("game_report");

    let meta = object_section(&raw, "meta")
        .map(VideoMeta::from_row)
        .unwrap_or_default()
        .or(nested
            .and_then(|g| object_section(g, "video"))
            .map(VideoMeta::from_row)
            .unwrap_or_default());

    let players = rows_section(&raw, "player_report")
        .map(|rows| rows.into_iter().map(PlayerRecord::from_row).collect::<Vec<_>>());

    let teams = rows_section(&raw, "team_summary")
        .or_else(|| nested.and_then(|g| rows_section(g, "teams")))
        .map(|rows| {
            let mut teams: Vec<_> = rows.into_iter().map(TeamSummaryRecord::from_row).collect();
            fill_team_distance(&mut teams, players.as_deref().unwrap_or_default());
            teams
        });

    let frame_series = rows_section(&raw, "team_frame_series")
        .or_else(|| nested.and_then(|g| rows_section(g, "team_frame_series")))
        .map(|rows| rows.into_iter().map(TeamFramePoint::from_row).collect());

    let events = rows_section(&raw, "event_log")
        .map(|rows| rows.into_iter().map(ShotEvent::from_row).collect());

    let shot_summary = nested
        .and_then(|g| object_section(g, "shots"))
        .or_else(|| object_section(&raw, "shots"))
        .map(ShotSummary::from_row);

    let leaders = nested
        .and_then(|g| object_section(g, "leaders"))
        .or_else(|| object_section(&raw, "leaders"))
        .map(leaders_from_row);

    Report {
        schema,
        meta,
        teams,
        players,
        frame_series,
        events,
        shot_summary,
        leaders,
        raw,
    }
}

fn leaders_from_row(row: Row) -> Leaders {
    let board = |key: &str| -> Vec<PlayerRecord> {
        rows_of(row.get(key), key)
            .unwrap_or_default()
            .into_iter()
            .map(PlayerRecord::from_row)
            .collect()
    };
    Leaders {
        top_movers: board("top_movers"),
        top_shooters: board("top_shooters_by_FGM"),
    }
}

/// Teams without a distance total get the sum over their players.
fn fill_team_distance(teams: &mut [TeamSummaryRecord], players: &[PlayerRecord]) {
    let mut by_team: HashMap<i64, f64> = HashMap::new();
    for player in players {
        if let (Some(team_id), Some(dist)) = (player.team_id, player.total_dist) {
            *by_team.entry(team_id).or_default() += dist;
        }
    }

    for team in teams.iter_mut().filter(|t| t.total_dist.is_none()) {
        team.total_dist = team.team_id.and_then(|id| by_team.get(&id).copied());
    }
}

fn object_section(parent: &Value, key: &str) -> Option<Row> {
    match parent.get(key)? {
        Value::Object(map) => Some(map.clone()),
        Value::Null => None,
        other => {
            tracing::warn!("section `{}` is {} rather than an object, ignoring it", key, kind(other));
            None
        }
    }
}

fn rows_section(parent: &Value, key: &str) -> Option<Vec<Row>> {
    rows_of(parent.get(key), key)
}

/// Array of objects; non-object entries are dropped.
fn rows_of(value: Option<&Value>, key: &str) -> Option<Vec<Row>> {
    match value? {
        Value::Array(items) => {
            let rows: Vec<Row> = items
                .iter()
                .filter_map(|item| item.as_object().cloned())
                .collect();
            if rows.len() != items.len() {
                tracing::warn!(
                    "section `{}` has {} non-object rows, skipping them",
                    key,
                    items.len() - rows.len()
                );
            }
            Some(rows)
        }
        Value::Null => None,
        other => {
            tracing::warn!("section `{}` is {} rather than an array, ignoring it", key, kind(other));
            None
        }
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
