use axum::{
    extract::{Query, State},
    response::Json,
};

use crate::error::ApiError;
use crate::routes::{AppState, ReportQuery};
use crate::views::summary::{self, SummaryView};

// GET /api/summary - Video meta, shot totals and leaderboards
pub async fn get_summary(
    State(state): State<AppState>,
    Query(params): Query<ReportQuery>,
) -> Result<Json<SummaryView>, ApiError> {
    let report = state.report(params.path.as_deref()).await?;

    Ok(Json(summary::build(&report)))
}
