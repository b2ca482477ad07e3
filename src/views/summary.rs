use serde::Serialize;

use crate::models::{PlayerRecord, Report, ReportSchema};
use crate::normalize::round_to;
use crate::views::events::ShotTotals;

pub const LEADERBOARD_SIZE: usize = 5;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoSummary {
    pub frames: i64,
    pub duration_s: f64,
    pub fps: Option<f64>,
    pub source_video: Option<String>,
    pub note: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderBoards {
    pub top_movers: Vec<PlayerRecord>,
    #[serde(rename = "topShootersByFGM")]
    pub top_shooters: Vec<PlayerRecord>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionCounts {
    pub players: usize,
    pub teams: usize,
    pub frame_points: usize,
    pub events: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryView {
    pub schema: ReportSchema,
    pub video: VideoSummary,
    pub shots: ShotTotals,
    pub leaders: LeaderBoards,
    pub sections: SectionCounts,
}

pub fn build(report: &Report) -> SummaryView {
    SummaryView {
        schema: report.schema,
        video: video_summary(report),
        shots: shot_totals(report),
        leaders: leader_boards(report),
        sections: SectionCounts {
            players: report.players().len(),
            teams: report.teams().len(),
            frame_points: report.frame_series().len(),
            events: report.events().len(),
        },
    }
}

fn video_summary(report: &Report) -> VideoSummary {
    let meta = &report.meta;
    let frames = meta.n_frames.unwrap_or(0);
    let duration = meta.duration_s.or_else(|| {
        let fps = meta.fps.filter(|fps| *fps > 0.0)?;
        Some(meta.n_frames? as f64 / fps)
    });

    VideoSummary {
        frames,
        duration_s: round_to(duration.unwrap_or(0.0), 1),
        fps: meta.fps,
        source_video: meta.source_video.clone(),
        note: meta.note.clone(),
    }
}

/// Precomputed legacy totals win when they carry a total; otherwise count
/// the event log.
fn shot_totals(report: &Report) -> ShotTotals {
    let from_events = ShotTotals::from_events(report.events());
    match report.shot_summary.as_ref().and_then(|s| Some((s.total_shots?, s.made))) {
        Some((total, made)) => {
            let total = total.max(0);
            let made = made.unwrap_or(from_events.made).clamp(0, total);
            ShotTotals { total, made, miss: total - made }
        }
        None => from_events,
    }
}

fn leader_boards(report: &Report) -> LeaderBoards {
    if let Some(leaders) = &report.leaders {
        return LeaderBoards {
            top_movers: leaders.top_movers.clone(),
            top_shooters: leaders.top_shooters.clone(),
        };
    }

    LeaderBoards {
        top_movers: top_by(report.players(), |p| p.total_dist),
        top_shooters: top_by(report.players(), |p| p.fgm.map(|n| n as f64)),
    }
}

/// Highest values first; players without the value are left out.
fn top_by(players: &[PlayerRecord], key: impl Fn(&PlayerRecord) -> Option<f64>) -> Vec<PlayerRecord> {
    let mut ranked: Vec<(f64, &PlayerRecord)> = players
        .iter()
        .filter_map(|p| Some((key(p)?, p)))
        .collect();
    ranked.sort_by(|a, b| b.0.total_cmp(&a.0));
    ranked
        .into_iter()
        .take(LEADERBOARD_SIZE)
        .map(|(_, p)| p.clone())
        .collect()
}
