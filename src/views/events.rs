use serde::Serialize;

use crate::models::{Report, ShotEvent};

pub const DEFAULT_FPS: f64 = 30.0;

pub const NO_EVENTS_MESSAGE: &str = "No shot events were detected in this video.";

/// Shot event with its frame range converted to seconds. Times already in
/// the log are kept for events without frames.
#[derive(Debug, Clone, Serialize)]
pub struct EventRow {
    #[serde(flatten)]
    pub event: ShotEvent,
    pub start_s: Option<f64>,
    pub end_s: Option<f64>,
}

impl EventRow {
    pub fn new(event: &ShotEvent, fps: f64) -> Self {
        EventRow {
            start_s: event.start_frame.map(|f| f as f64 / fps).or(event.start_s),
            end_s: event.end_frame.map(|f| f as f64 / fps).or(event.end_s),
            event: event.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ShotTotals {
    pub total: i64,
    pub made: i64,
    pub miss: i64,
}

impl ShotTotals {
    pub fn from_events(events: &[ShotEvent]) -> Self {
        let total = events.len() as i64;
        let made = events.iter().filter(|e| e.made == Some(true)).count() as i64;
        ShotTotals { total, made, miss: total - made }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventsView {
    pub fps: f64,
    pub totals: ShotTotals,
    pub events: Vec<EventRow>,
    pub placeholder: Option<String>,
}

/// Frame rate used for frame -> seconds conversion.
pub fn effective_fps(report: &Report) -> f64 {
    report
        .meta
        .fps
        .filter(|fps| *fps > 0.0)
        .unwrap_or(DEFAULT_FPS)
}

pub fn build(report: &Report) -> EventsView {
    let fps = effective_fps(report);
    let events = report.events();

    EventsView {
        fps,
        totals: ShotTotals::from_events(events),
        events: events.iter().map(|e| EventRow::new(e, fps)).collect(),
        placeholder: events.is_empty().then(|| NO_EVENTS_MESSAGE.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::tests_support::report_from;
    use serde_json::json;

    #[test]
    fn derives_seconds_from_meta_fps() {
        let report = report_from(json!({
            "meta": {"fps": 25.0},
            "event_log": [
                {"shooter_track_id": 3, "start_frame": 50, "end_frame": 75, "made": true},
                {"shooter_track_id": 4, "start_frame": 100, "made": false}
            ]
        }));
        let view = build(&report);
        assert_eq!(view.fps, 25.0);
        assert_eq!(view.events[0].start_s, Some(2.0));
        assert_eq!(view.events[0].end_s, Some(3.0));
        assert_eq!(view.events[1].end_s, None);
        assert_eq!(view.totals, ShotTotals { total: 2, made: 1, miss: 1 });
        assert!(view.placeholder.is_none());
    }

    #[test]
    fn defaults_to_thirty_fps() {
        let report = report_from(json!({
            "meta": {"fps": 0},
            "event_log": [{"start_frame": 60, "end_frame": 90}]
        }));
        let view = build(&report);
        assert_eq!(view.fps, DEFAULT_FPS);
        assert_eq!(view.events[0].start_s, Some(2.0));
        assert_eq!(view.events[0].end_s, Some(3.0));
    }

    #[test]
    fn logged_seconds_survive_serialization() {
        let report = report_from(json!({
            "meta": {"fps": 10.0},
            "event_log": [
                {"shooter_track_id": 1, "start_s": 4.2, "end_s": 5.0, "made": true},
                {"shooter_track_id": 2, "start_frame": 20, "start_s": 9.9}
            ]
        }));
        let out = serde_json::to_string(&build(&report)).unwrap();
        assert_eq!(out.matches("\"start_s\"").count(), 2);
        assert_eq!(out.matches("\"end_s\"").count(), 2);

        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed["events"][0]["start_s"], json!(4.2));
        assert_eq!(parsed["events"][0]["end_s"], json!(5.0));
        assert_eq!(parsed["events"][1]["start_s"], json!(2.0));
        assert_eq!(parsed["events"][1]["end_s"], serde_json::Value::Null);
    }

    #[test]
    fn missing_and_empty_logs_look_the_same() {
        let missing = build(&report_from(json!({})));
        let empty = build(&report_from(json!({"event_log": []})));
        assert_eq!(
            serde_json::to_value(&missing).unwrap(),
            serde_json::to_value(&empty).unwrap()
        );
        assert_eq!(missing.placeholder.as_deref(), Some(NO_EVENTS_MESSAGE));
    }

    #[test]
    fn unknown_made_counts_as_miss() {
        let report = report_from(json!({"event_log": [{"made": null}, {"made": "yes"}]}));
        assert_eq!(build(&report).totals, ShotTotals { total: 2, made: 1, miss: 1 });
    }
}
