use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use serde::Deserialize;

use crate::error::ApiError;
use crate::routes::{AppState, ReportQuery};
use crate::views::players::{self, PlayerDetail, PlayersView};

// Query parameters for listing players
#[derive(Deserialize)]
pub struct ListPlayersQuery {
    #[serde(default)]
    path: Option<String>,
    /// Exact team name, or "all"
    #[serde(default)]
    team: Option<String>,
}

// Query parameters for selecting a player by label
#[derive(Deserialize)]
pub struct SelectQuery {
    #[serde(default)]
    path: Option<String>,
    label: String,
}

// GET /api/players?team=Red - Selection options and full player table
pub async fn get_players(
    State(state): State<AppState>,
    Query(params): Query<ListPlayersQuery>,
) -> Result<Json<PlayersView>, ApiError> {
    let report = state.report(params.path.as_deref()).await?;

    Ok(Json(players::build(&report, params.team.as_deref())))
}

// GET /api/players/select?label=[Red] tid=3 - Player detail by selection label
pub async fn select_player(
    State(state): State<AppState>,
    Query(params): Query<SelectQuery>,
) -> Result<Json<PlayerDetail>, ApiError> {
    let report = state.report(params.path.as_deref()).await?;

    let detail = players::select_by_label(&report, &params.label)
        .ok_or_else(|| ApiError::PlayerNotFound(format!("label {:?}", params.label)))?;

    Ok(Json(detail))
}

// GET /api/players/:track_id - Player detail by track id
pub async fn get_player_by_track_id(
    State(state): State<AppState>,
    Path(track_id): Path<i64>,
    Query(params): Query<ReportQuery>,
) -> Result<Json<PlayerDetail>, ApiError> {
    let report = state.report(params.path.as_deref()).await?;

    let detail = players::select_by_track_id(&report, track_id)
        .ok_or_else(|| ApiError::PlayerNotFound(format!("track id {}", track_id)))?;

    Ok(Json(detail))
}
