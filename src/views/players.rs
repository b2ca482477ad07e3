use std::cmp::Ordering;

use serde::Serialize;

use crate::models::{PlayerRecord, Report};
use crate::normalize::{format_percent, round_to};
use crate::views::events::{EventRow, effective_fps};

pub const ALL_TEAMS: &str = "all";

/// Selection label shown for a player.
///
/// Named players: `[Red] #7 Kim (tid=3)`; otherwise `[Red] tid=3`.
/// Missing parts render as `-`.
pub fn player_label(player: &PlayerRecord) -> String {
    let team = player.team_name.as_deref().unwrap_or("-");
    let tid = player
        .track_id
        .map(|t| t.to_string())
        .unwrap_or_else(|| "-".to_string());

    match player.player_name.as_deref() {
        Some(name) if !name.is_empty() => {
            let jersey = player.jersey.as_deref().unwrap_or("-");
            format!("[{team}] #{jersey} {name} (tid={tid})")
        }
        _ => format!("[{team}] tid={tid}"),
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerOption {
    pub label: String,
    pub track_id: Option<i64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayersView {
    pub team_filter: String,
    pub team_names: Vec<String>,
    /// Selection options in report order.
    pub options: Vec<PlayerOption>,
    /// Full table ordered by team id, jersey, track id.
    pub table: Vec<PlayerRecord>,
    pub placeholder: Option<String>,
}

pub fn build(report: &Report, team_filter: Option<&str>) -> PlayersView {
    let filter = team_filter.unwrap_or(ALL_TEAMS);
    let selected: Vec<&PlayerRecord> = report
        .players()
        .iter()
        .filter(|p| filter == ALL_TEAMS || p.team_name.as_deref() == Some(filter))
        .collect();

    let mut team_names: Vec<String> = report
        .players()
        .iter()
        .filter_map(|p| p.team_name.clone())
        .collect();
    team_names.sort();
    team_names.dedup();

    let options = selected
        .iter()
        .map(|p| PlayerOption { label: player_label(p), track_id: p.track_id })
        .collect();

    let mut table: Vec<PlayerRecord> = selected.into_iter().cloned().collect();
    table.sort_by(table_order);

    PlayersView {
        team_filter: filter.to_string(),
        team_names,
        options,
        placeholder: table.is_empty().then(|| "No players to show.".to_string()),
        table,
    }
}

fn table_order(a: &PlayerRecord, b: &PlayerRecord) -> Ordering {
    none_last(a.team_id, b.team_id)
        .then_with(|| jersey_order(a.jersey.as_deref(), b.jersey.as_deref()))
        .then_with(|| none_last(a.track_id, b.track_id))
}

fn none_last<T: Ord>(a: Option<T>, b: Option<T>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

// Numeric jerseys compare as numbers and come before free-form ones.
fn jersey_order(a: Option<&str>, b: Option<&str>) -> Ordering {
    let numeric = |j: Option<&str>| j.and_then(|s| s.trim().parse::<i64>().ok());
    match (numeric(a), numeric(b)) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => none_last(a, b),
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerCards {
    pub min_visible: f64,
    pub field_goals: String,
    pub fg_pct: String,
    pub dist_px: i64,
    pub max_speed: f64,
}

impl PlayerCards {
    fn new(player: &PlayerRecord) -> Self {
        PlayerCards {
            min_visible: round_to(player.min_visible.unwrap_or(0.0), 2),
            field_goals: format!("{}-{}", player.fgm.unwrap_or(0), player.fga.unwrap_or(0)),
            fg_pct: format_percent(player.fg_pct),
            dist_px: player.total_dist.unwrap_or(0.0).trunc() as i64,
            max_speed: round_to(player.max_speed.unwrap_or(0.0), 1),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerDetail {
    pub label: String,
    pub player: PlayerRecord,
    pub cards: PlayerCards,
    /// False when the report has no event log at all.
    pub events_available: bool,
    pub shots: Vec<EventRow>,
}

/// First player in report order whose label matches.
pub fn select_by_label(report: &Report, label: &str) -> Option<PlayerDetail> {
    report
        .players()
        .iter()
        .find(|p| player_label(p) == label)
        .map(|p| detail(report, p))
}

/// First player in report order with this track id.
pub fn select_by_track_id(report: &Report, track_id: i64) -> Option<PlayerDetail> {
    report
        .players()
        .iter()
        .find(|p| p.track_id == Some(track_id))
        .map(|p| detail(report, p))
}

fn detail(report: &Report, player: &PlayerRecord) -> PlayerDetail {
    let fps = effective_fps(report);
    let shots = match (report.events.as_deref(), player.track_id) {
        (Some(events), Some(tid)) => events
            .iter()
            .filter(|e| e.shooter_track_id == Some(tid))
            .map(|e| EventRow::new(e, fps))
            .collect(),
        _ => Vec::new(),
    };

    PlayerDetail {
        label: player_label(player),
        player: player.clone(),
        cards: PlayerCards::new(player),
        events_available: report.events.is_some(),
        shots,
    }
}
