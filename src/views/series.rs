use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::{Report, TeamFramePoint};

pub const DEFAULT_MAX_ROWS: usize = 5000;
pub const MIN_MAX_ROWS: usize = 500;
pub const MAX_MAX_ROWS: usize = 20_000;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesMetric {
    CentroidX,
    CentroidY,
    #[default]
    SpacingNnMean,
    SpreadPairMean,
    SpreadPairVar,
    NPlayersVisible,
}

impl SeriesMetric {
    fn value(self, point: &TeamFramePoint) -> Option<f64> {
        match self {
            SeriesMetric::CentroidX => point.centroid_x,
            SeriesMetric::CentroidY => point.centroid_y,
            SeriesMetric::SpacingNnMean => point.spacing_nn_mean,
            SeriesMetric::SpreadPairMean => point.spread_pair_mean,
            SeriesMetric::SpreadPairVar => point.spread_pair_var,
            SeriesMetric::NPlayersVisible => point.n_players_visible,
        }
    }
}

/// What the x axis of the chart measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesAxis {
    TimeS,
    FrameIdx,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamSeries {
    pub team_name: String,
    pub points: Vec<SeriesPoint>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesView {
    pub metric: SeriesMetric,
    pub axis: SeriesAxis,
    pub available_teams: Vec<String>,
    pub max_rows: usize,
    pub total_rows: usize,
    pub stride: usize,
    pub row_count: usize,
    pub series: Vec<TeamSeries>,
    pub placeholder: Option<String>,
}

pub fn clamp_max_rows(max_rows: Option<usize>) -> usize {
    max_rows
        .unwrap_or(DEFAULT_MAX_ROWS)
        .clamp(MIN_MAX_ROWS, MAX_MAX_ROWS)
}

/// Keep every `k`-th row, `k = max(1, len / max_rows)`. Returns the kept
/// rows and the stride used.
pub fn downsample<T>(rows: Vec<T>, max_rows: usize) -> (Vec<T>, usize) {
    if rows.len() <= max_rows || max_rows == 0 {
        return (rows, 1);
    }
    let stride = (rows.len() / max_rows).max(1);
    (rows.into_iter().step_by(stride).collect(), stride)
}

/// `teams == None` selects every team.
pub fn build(
    report: &Report,
    teams: Option<&[String]>,
    metric: SeriesMetric,
    max_rows: Option<usize>,
) -> SeriesView {
    let max_rows = clamp_max_rows(max_rows);

    let mut available_teams: Vec<String> = report.frame_series().iter().map(|p| p.team_key()).collect();
    available_teams.sort();
    available_teams.dedup();

    let mut rows: Vec<&TeamFramePoint> = report
        .frame_series()
        .iter()
        .filter(|p| teams.is_none_or(|wanted| wanted.contains(&p.team_key())))
        .collect();
    rows.sort_by(|a, b| {
        a.team_key()
            .cmp(&b.team_key())
            .then_with(|| frame_order(a, b))
    });

    let total_rows = rows.len();
    let (rows, stride) = downsample(rows, max_rows);
    if stride > 1 {
        tracing::debug!(
            "downsampled team series from {} to {} rows (stride {})",
            total_rows,
            rows.len(),
            stride
        );
    }

    let axis = if !rows.is_empty() && rows.iter().all(|p| p.time_s.is_some()) {
        SeriesAxis::TimeS
    } else {
        SeriesAxis::FrameIdx
    };

    let mut grouped: BTreeMap<String, Vec<(f64, f64)>> = BTreeMap::new();
    for point in &rows {
        let x = match axis {
            SeriesAxis::TimeS => point.time_s,
            SeriesAxis::FrameIdx => point.frame_idx.map(|f| f as f64),
        };
        if let (Some(x), Some(y)) = (x, metric.value(point)) {
            grouped.entry(point.team_key()).or_default().push((x, y));
        }
    }

    let series: Vec<TeamSeries> = grouped
        .into_iter()
        .map(|(team_name, samples)| TeamSeries { team_name, points: mean_by_index(samples) })
        .collect();

    SeriesView {
        metric,
        axis,
        available_teams,
        max_rows,
        total_rows,
        stride,
        row_count: rows.len(),
        placeholder: series.is_empty().then(|| "No team time series to show.".to_string()),
        series,
    }
}

fn frame_order(a: &TeamFramePoint, b: &TeamFramePoint) -> Ordering {
    match (a.frame_idx, b.frame_idx) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => match (a.time_s, b.time_s) {
            (Some(x), Some(y)) => x.total_cmp(&y),
            _ => Ordering::Equal,
        },
    }
}

/// Sort by index and average samples sharing one.
fn mean_by_index(mut samples: Vec<(f64, f64)>) -> Vec<SeriesPoint> {
    samples.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut points: Vec<SeriesPoint> = Vec::new();
    let mut count = 0usize;
    for (x, y) in samples {
        match points.last_mut() {
            Some(last) if last.x == x => {
                count += 1;
                last.y += (y - last.y) / count as f64;
            }
            _ => {
                points.push(SeriesPoint { x, y });
                count = 1;
            }
        }
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::tests_support::report_from;
    use serde_json::{Value, json};

    fn frames(team: &str, n: usize) -> Vec<Value> {
        (0..n)
            .map(|i| json!({"team_name": team, "frame_idx": i, "spacing_nn_mean": i as f64}))
            .collect()
    }

    #[test]
    fn downsample_keeps_every_kth_row() {
        let rows: Vec<usize> = (0..12_000).collect();
        let (kept, stride) = downsample(rows, 5000);
        assert_eq!(stride, 2);
        assert_eq!(kept.len(), 6000);
        assert!(kept.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(kept[1], 2);
    }

    #[test]
    fn downsample_leaves_small_series_alone() {
        let (kept, stride) = downsample(vec![1, 2, 3], 5000);
        assert_eq!(kept, vec![1, 2, 3]);
        assert_eq!(stride, 1);
    }

    #[test]
    fn downsample_row_count_is_ceiling() {
        let (kept, stride) = downsample((0..11_001).collect::<Vec<_>>(), 5000);
        assert_eq!(stride, 2);
        assert_eq!(kept.len(), 5501);
    }

    #[test]
    fn max_rows_is_clamped() {
        assert_eq!(clamp_max_rows(None), DEFAULT_MAX_ROWS);
        assert_eq!(clamp_max_rows(Some(10)), MIN_MAX_ROWS);
        assert_eq!(clamp_max_rows(Some(1_000_000)), MAX_MAX_ROWS);
        assert_eq!(clamp_max_rows(Some(800)), 800);
    }

    #[test]
    fn large_series_is_downsampled_in_team_then_frame_order() {
        let mut rows = frames("Red", 6000);
        rows.extend(frames("Blue", 6000));
        let report = report_from(json!({"team_frame_series": rows}));

        let view = build(&report, None, SeriesMetric::SpacingNnMean, Some(5000));
        assert_eq!(view.total_rows, 12_000);
        assert_eq!(view.stride, 2);
        assert_eq!(view.row_count, 6000);
        assert_eq!(view.axis, SeriesAxis::FrameIdx);
        assert_eq!(view.series.len(), 2);
        assert_eq!(view.series[0].team_name, "Blue");
        assert_eq!(view.series[0].points.len(), 3000);
        assert_eq!(view.series[0].points[1], SeriesPoint { x: 2.0, y: 2.0 });
    }

    #[test]
    fn team_filter_and_time_axis() {
        let report = report_from(json!({"team_frame_series": [
            {"team_name": "Red", "frame_idx": 0, "time_s": 0.0, "centroid_x": 1.0},
            {"team_name": "Red", "frame_idx": 15, "time_s": 0.5, "centroid_x": 3.0},
            {"team_name": "Blue", "frame_idx": 0, "time_s": 0.0, "centroid_x": 9.0}
        ]}));
        let wanted = vec!["Red".to_string()];
        let view = build(&report, Some(wanted.as_slice()), SeriesMetric::CentroidX, None);
        assert_eq!(view.axis, SeriesAxis::TimeS);
        assert_eq!(view.series.len(), 1);
        assert_eq!(
            view.series[0].points,
            vec![SeriesPoint { x: 0.0, y: 1.0 }, SeriesPoint { x: 0.5, y: 3.0 }]
        );
        assert_eq!(view.available_teams, vec!["Blue", "Red"]);
    }

    #[test]
    fn duplicate_indices_are_averaged_and_gaps_skipped() {
        let report = report_from(json!({"team_frame_series": [
            {"team_name": "Red", "frame_idx": 4, "spread_pair_var": 2.0},
            {"team_name": "Red", "frame_idx": 4, "spread_pair_var": 4.0},
            {"team_name": "Red", "frame_idx": 4, "spread_pair_var": 9.0},
            {"team_name": "Red", "frame_idx": 5, "spread_pair_var": null},
            {"team_name": "Red", "frame_idx": 6, "spread_pair_var": 1.0}
        ]}));
        let view = build(&report, None, SeriesMetric::SpreadPairVar, None);
        assert_eq!(
            view.series[0].points,
            vec![SeriesPoint { x: 4.0, y: 5.0 }, SeriesPoint { x: 6.0, y: 1.0 }]
        );
    }

    #[test]
    fn empty_selection_shows_placeholder() {
        let report = report_from(json!({"team_frame_series": frames("Red", 3)}));
        let view = build(&report, Some(&[][..]), SeriesMetric::default(), None);
        assert!(view.series.is_empty());
        assert!(view.placeholder.is_some());
        assert_eq!(view.available_teams, vec!["Red"]);

        let missing = build(&report_from(json!({})), None, SeriesMetric::default(), None);
        assert!(missing.placeholder.is_some());
        assert_eq!(missing.total_rows, 0);
    }

    #[test]
    fn metric_parses_from_column_name() {
        let m: SeriesMetric = serde_json::from_value(json!("n_players_visible")).unwrap();
        assert_eq!(m, SeriesMetric::NPlayersVisible);
    }
}
