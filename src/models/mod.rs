use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::normalize::{
    Row, take_bool, take_int, take_label, take_number, take_text,
};

/// Which of the two report layouts a document uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportSchema {
    /// Everything nested under `game_report`.
    Legacy,
    /// Top-level `meta`, `team_summary` and `team_frame_series`.
    Flat,
}

/// Video metadata, `meta` or legacy `game_report.video`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VideoMeta {
    pub n_frames: Option<i64>,
    pub duration_s: Option<f64>,
    pub fps: Option<f64>,
    pub source_video: Option<String>,
    pub note: Option<String>,
}

impl VideoMeta {
    pub fn from_row(mut row: Row) -> Self {
        VideoMeta {
            n_frames: take_int(&mut row, &["n_frames", "total_frames_logged"]),
            duration_s: take_number(&mut row, &["duration_s"]),
            fps: take_number(&mut row, &["fps"]),
            source_video: take_label(&mut row, &["source_video"]),
            note: take_label(&mut row, &["note"]),
        }
    }

    /// Fill fields missing here from `other`.
    pub fn or(self, other: VideoMeta) -> Self {
        VideoMeta {
            n_frames: self.n_frames.or(other.n_frames),
            duration_s: self.duration_s.or(other.duration_s),
            fps: self.fps.or(other.fps),
            source_video: self.source_video.or(other.source_video),
            note: self.note.or(other.note),
        }
    }
}

/// One tracked player
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PlayerRecord {
    pub track_id: Option<i64>,
    pub jersey: Option<String>,
    pub player_name: Option<String>,
    pub team_id: Option<i64>,
    pub team_name: Option<String>,
    pub total_dist: Option<f64>,
    pub avg_speed: Option<f64>,
    pub max_speed: Option<f64>,
    pub stop_go_transitions: Option<i64>,
    pub sprint_count: Option<i64>,
    pub turn_frames: Option<i64>,
    pub activity_score: Option<f64>,
    pub min_visible: Option<f64>,
    pub visible_frames: Option<i64>,
    #[serde(rename = "FGA")]
    pub fga: Option<i64>,
    #[serde(rename = "FGM")]
    pub fgm: Option<i64>,
    #[serde(rename = "FG_pct")]
    pub fg_pct: Option<f64>,
    /// Columns the pipeline emitted that have no canonical field.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PlayerRecord {
    pub fn from_row(mut row: Row) -> Self {
        PlayerRecord {
            track_id: take_int(&mut row, &["track_id"]),
            jersey: take_label(&mut row, &["jersey"]),
            player_name: take_text(&mut row, &["player_name"]),
            team_id: take_int(&mut row, &["team_id"]),
            team_name: take_label(&mut row, &["team_name"]),
            total_dist: take_number(&mut row, &["total_dist", "dist_px"]),
            avg_speed: take_number(&mut row, &["avg_speed", "avg_speed_px_s"]),
            max_speed: take_number(&mut row, &["max_speed", "max_speed_px_s"]),
            stop_go_transitions: take_int(&mut row, &["stop_go_transitions"]),
            sprint_count: take_int(&mut row, &["sprint_count"]),
            turn_frames: take_int(&mut row, &["turn_frames"]),
            activity_score: take_number(&mut row, &["activity_score"]),
            min_visible: take_number(&mut row, &["min_visible", "MIN_visible"]),
            visible_frames: take_int(&mut row, &["visible_frames"]),
            fga: take_int(&mut row, &["FGA"]),
            fgm: take_int(&mut row, &["FGM"]),
            fg_pct: take_number(&mut row, &["FG_pct"]),
            extra: row,
        }
    }
}

/// Aggregated shooting and spacing stats for one team
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TeamSummaryRecord {
    pub team_id: Option<i64>,
    pub team_name: Option<String>,
    pub total_dist: Option<f64>,
    #[serde(rename = "team_FGA")]
    pub team_fga: Option<i64>,
    #[serde(rename = "team_FGM")]
    pub team_fgm: Option<i64>,
    #[serde(rename = "team_FG_pct")]
    pub team_fg_pct: Option<f64>,
    pub avg_spacing: Option<f64>,
    pub avg_spread: Option<f64>,
    pub var_spread: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TeamSummaryRecord {
    pub fn from_row(mut row: Row) -> Self {
        TeamSummaryRecord {
            team_id: take_int(&mut row, &["team_id"]),
            team_name: take_label(&mut row, &["team_name"]),
            total_dist: take_number(&mut row, &["total_dist", "team_total_dist", "dist_px"]),
            team_fga: take_int(&mut row, &["team_FGA", "FGA"]),
            team_fgm: take_int(&mut row, &["team_FGM", "FGM"]),
            team_fg_pct: take_number(&mut row, &["team_FG_pct", "FG_pct"]),
            avg_spacing: take_number(&mut row, &["avg_spacing"]),
            avg_spread: take_number(&mut row, &["avg_spread"]),
            var_spread: take_number(&mut row, &["var_spread"]),
            extra: row,
        }
    }
}

/// One (team, frame) sample of team shape metrics
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TeamFramePoint {
    pub team_id: Option<i64>,
    pub team_name: Option<String>,
    pub frame_idx: Option<i64>,
    pub time_s: Option<f64>,
    pub centroid_x: Option<f64>,
    pub centroid_y: Option<f64>,
    pub spacing_nn_mean: Option<f64>,
    pub spread_pair_mean: Option<f64>,
    pub spread_pair_var: Option<f64>,
    pub n_players_visible: Option<f64>,
}

impl TeamFramePoint {
    pub fn from_row(mut row: Row) -> Self {
        TeamFramePoint {
            team_id: take_int(&mut row, &["team_id"]),
            team_name: take_label(&mut row, &["team_name"]),
            frame_idx: take_int(&mut row, &["frame_idx"]),
            time_s: take_number(&mut row, &["time_s"]),
            centroid_x: take_number(&mut row, &["centroid_x"]),
            centroid_y: take_number(&mut row, &["centroid_y"]),
            spacing_nn_mean: take_number(&mut row, &["spacing_nn_mean"]),
            spread_pair_mean: take_number(&mut row, &["spread_pair_mean"]),
            spread_pair_var: take_number(&mut row, &["spread_pair_var"]),
            n_players_visible: take_number(&mut row, &["n_players_visible"]),
        }
    }

    /// Name used to group and filter points: team name, else team id.
    pub fn team_key(&self) -> String {
        match (&self.team_name, self.team_id) {
            (Some(name), _) => name.clone(),
            (None, Some(id)) => id.to_string(),
            (None, None) => "-".to_string(),
        }
    }
}

/// One detected shot attempt
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ShotEvent {
    pub shooter_track_id: Option<i64>,
    pub start_frame: Option<i64>,
    pub end_frame: Option<i64>,
    pub made: Option<bool>,
    /// Times already present in the log; derived times take precedence.
    #[serde(skip)]
    pub start_s: Option<f64>,
    #[serde(skip)]
    pub end_s: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ShotEvent {
    pub fn from_row(mut row: Row) -> Self {
        ShotEvent {
            shooter_track_id: take_int(&mut row, &["shooter_track_id"]),
            start_frame: take_int(&mut row, &["start_frame"]),
            end_frame: take_int(&mut row, &["end_frame"]),
            made: take_bool(&mut row, &["made"]),
            start_s: take_number(&mut row, &["start_s"]),
            end_s: take_number(&mut row, &["end_s"]),
            extra: row,
        }
    }
}

/// Shot totals precomputed by the legacy pipeline (`game_report.shots`)
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ShotSummary {
    pub total_shots: Option<i64>,
    pub made: Option<i64>,
}

impl ShotSummary {
    pub fn from_row(mut row: Row) -> Self {
        ShotSummary {
            total_shots: take_int(&mut row, &["total_shots", "total"]),
            made: take_int(&mut row, &["made", "made_shots", "FGM"]),
        }
    }
}

/// Leaderboards shipped inside legacy reports
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Leaders {
    pub top_movers: Vec<PlayerRecord>,
    #[serde(rename = "top_shooters_by_FGM")]
    pub top_shooters: Vec<PlayerRecord>,
}

/// Canonical, immutable form of a loaded `report.json`.
///
/// Sections are `None` when the document does not carry them at all and
/// `Some(vec![])` when they are present but empty.
#[derive(Debug, Clone)]
pub struct Report {
    pub schema: ReportSchema,
    pub meta: VideoMeta,
    pub teams: Option<Vec<TeamSummaryRecord>>,
    pub players: Option<Vec<PlayerRecord>>,
    pub frame_series: Option<Vec<TeamFramePoint>>,
    pub events: Option<Vec<ShotEvent>>,
    pub shot_summary: Option<ShotSummary>,
    pub leaders: Option<Leaders>,
    /// The document as parsed, NaN tokens already replaced by `null`.
    pub raw: Value,
}

impl Report {
    pub fn players(&self) -> &[PlayerRecord] {
        self.players.as_deref().unwrap_or_default()
    }

    pub fn teams(&self) -> &[TeamSummaryRecord] {
        self.teams.as_deref().unwrap_or_default()
    }

    pub fn frame_series(&self) -> &[TeamFramePoint] {
        self.frame_series.as_deref().unwrap_or_default()
    }

    pub fn events(&self) -> &[ShotEvent] {
        self.events.as_deref().unwrap_or_default()
    }
}
