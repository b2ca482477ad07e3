use axum::{
    extract::{Query, State},
    response::Json,
};
use serde::Deserialize;

use crate::error::ApiError;
use crate::routes::AppState;
use crate::views::series::{self, SeriesMetric, SeriesView};

// Query parameters for the team time series chart
#[derive(Deserialize)]
pub struct SeriesQuery {
    #[serde(default)]
    path: Option<String>,
    /// Comma separated team names; every team when omitted
    #[serde(default)]
    teams: Option<String>,
    #[serde(default)]
    metric: SeriesMetric,
    /// Row cap before downsampling (default: 5000, clamped to 500..=20000)
    #[serde(default)]
    max_rows: Option<usize>,
}

fn split_teams(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

// GET /api/series?teams=Red,Blue&metric=centroid_x&max_rows=2000 - Per-team metric over time
pub async fn get_series(
    State(state): State<AppState>,
    Query(params): Query<SeriesQuery>,
) -> Result<Json<SeriesView>, ApiError> {
    let report = state.report(params.path.as_deref()).await?;

    let teams = params.teams.as_deref().map(split_teams);

    Ok(Json(series::build(
        &report,
        teams.as_deref(),
        params.metric,
        params.max_rows,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::routes::test_support::{app_with_report, get_json};

    const REPORT: &str = r#"{
        "team_frame_series": [
            {"team_name": "Red", "frame_idx": 0, "centroid_x": 100.0},
            {"team_name": "Red", "frame_idx": 1, "centroid_x": 110.0},
            {"team_name": "Blue", "frame_idx": 0, "centroid_x": 300.0}
        ]
    }"#;

    #[test]
    fn team_list_parsing() {
        assert_eq!(split_teams(" Red, Blue ,,"), vec!["Red", "Blue"]);
        assert!(split_teams("").is_empty());
    }

    #[tokio::test]
    async fn filters_teams_and_picks_metric() {
        let (app, _tmp) = app_with_report(REPORT);
        let (status, body) = get_json(app, "/api/series?teams=Red&metric=centroid_x").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["axis"], json!("frame_idx"));
        assert_eq!(body["series"].as_array().map(Vec::len), Some(1));
        assert_eq!(
            body["series"][0]["points"],
            json!([{"x": 0.0, "y": 100.0}, {"x": 1.0, "y": 110.0}])
        );
    }

    #[tokio::test]
    async fn row_cap_is_clamped() {
        let (app, _tmp) = app_with_report(REPORT);
        let (_, body) = get_json(app, "/api/series?max_rows=1&metric=centroid_x").await;
        assert_eq!(body["maxRows"], json!(500));
        assert_eq!(body["rowCount"], json!(3));
        assert_eq!(body["series"].as_array().map(Vec::len), Some(2));
    }
}
