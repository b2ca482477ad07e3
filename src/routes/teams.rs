use axum::{
    extract::{Query, State},
    response::Json,
};
use serde::Deserialize;

use crate::error::ApiError;
use crate::routes::AppState;
use crate::views::teams::{self, TeamSortKey, TeamsView};

// Query parameters for the team table
#[derive(Deserialize)]
pub struct TeamsQuery {
    #[serde(default)]
    path: Option<String>,
    #[serde(default)]
    sort: TeamSortKey,
    #[serde(default)]
    ascending: bool,
}

// GET /api/teams?sort=team_FG_pct&ascending=true - Sorted team summary
pub async fn get_teams(
    State(state): State<AppState>,
    Query(params): Query<TeamsQuery>,
) -> Result<Json<TeamsView>, ApiError> {
    let report = state.report(params.path.as_deref()).await?;

    Ok(Json(teams::build(&report, params.sort, params.ascending)))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::routes::test_support::{app_with_report, get_json};

    const REPORT: &str = r#"{
        "team_summary": [
            {"team_id": 0, "team_name": "Red", "total_dist": 10.0, "team_FG_pct": 0.6},
            {"team_id": 1, "team_name": "Blue", "total_dist": 20.0, "team_FG_pct": 0.2}
        ]
    }"#;

    #[tokio::test]
    async fn default_sort_is_distance_descending() {
        let (app, _tmp) = app_with_report(REPORT);
        let (status, body) = get_json(app, "/api/teams").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["sort"], json!("total_dist"));
        assert_eq!(body["teams"][0]["team_name"], json!("Blue"));
        assert_eq!(body["teams"][0]["fgPctLabel"], json!("20.0%"));
    }

    #[tokio::test]
    async fn sort_by_fg_pct_ascending() {
        let (app, _tmp) = app_with_report(REPORT);
        let (_, body) = get_json(app, "/api/teams?sort=team_FG_pct&ascending=true").await;
        assert_eq!(body["teams"][0]["team_name"], json!("Blue"));
        assert_eq!(body["teams"][1]["team_name"], json!("Red"));
    }

    #[tokio::test]
    async fn unknown_sort_key_is_rejected() {
        let (app, _tmp) = app_with_report(REPORT);
        let (status, _) = get_json(app, "/api/teams?sort=height").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
