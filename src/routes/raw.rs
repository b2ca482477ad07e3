use axum::{
    extract::{Query, State},
    response::Json,
};
use serde_json::Value;

use crate::error::ApiError;
use crate::routes::{AppState, ReportQuery};

// GET /api/raw - The report document as loaded
pub async fn get_raw(
    State(state): State<AppState>,
    Query(params): Query<ReportQuery>,
) -> Result<Json<Value>, ApiError> {
    let report = state.report(params.path.as_deref()).await?;

    Ok(Json(report.raw.clone()))
}
