use axum::{
    extract::{Query, State},
    response::Json,
};

use crate::error::ApiError;
use crate::routes::{AppState, ReportQuery};
use crate::views::events::{self, EventsView};

// GET /api/events - Shot event log with times in seconds
pub async fn get_events(
    State(state): State<AppState>,
    Query(params): Query<ReportQuery>,
) -> Result<Json<EventsView>, ApiError> {
    let report = state.report(params.path.as_deref()).await?;

    Ok(Json(events::build(&report)))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::routes::test_support::{app_with_report, get_json};

    #[tokio::test]
    async fn missing_and_empty_logs_render_identically() {
        let (missing, _a) = app_with_report(r#"{"meta": {"fps": 30}}"#);
        let (empty, _b) = app_with_report(r#"{"meta": {"fps": 30}, "event_log": []}"#);

        let (status, missing) = get_json(missing, "/api/events").await;
        assert_eq!(status, StatusCode::OK);
        let (_, empty) = get_json(empty, "/api/events").await;
        assert_eq!(missing, empty);
        assert!(missing["placeholder"].is_string());
        assert_eq!(missing["events"], json!([]));
    }

    #[tokio::test]
    async fn events_carry_seconds() {
        let (app, _tmp) = app_with_report(
            r#"{"event_log": [{"shooter_track_id": 2, "start_frame": 15, "end_frame": 45, "made": true}]}"#,
        );
        let (_, body) = get_json(app, "/api/events").await;
        assert_eq!(body["fps"], json!(30.0));
        assert_eq!(body["events"][0]["start_s"], json!(0.5));
        assert_eq!(body["events"][0]["end_s"], json!(1.5));
        assert_eq!(body["events"][0]["shooter_track_id"], json!(2));
        assert_eq!(body["totals"], json!({"total": 1, "made": 1, "miss": 0}));
    }
}
