use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::models::{Report, TeamSummaryRecord};
use crate::normalize::format_percent;

/// Numeric team columns the table can be sorted by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TeamSortKey {
    #[default]
    #[serde(rename = "total_dist")]
    TotalDist,
    #[serde(rename = "team_FGA")]
    TeamFga,
    #[serde(rename = "team_FGM")]
    TeamFgm,
    #[serde(rename = "team_FG_pct")]
    TeamFgPct,
    #[serde(rename = "avg_spacing")]
    AvgSpacing,
    #[serde(rename = "avg_spread")]
    AvgSpread,
    #[serde(rename = "var_spread")]
    VarSpread,
}

impl TeamSortKey {
    pub const ALL: [TeamSortKey; 7] = [
        TeamSortKey::TotalDist,
        TeamSortKey::TeamFga,
        TeamSortKey::TeamFgm,
        TeamSortKey::TeamFgPct,
        TeamSortKey::AvgSpacing,
        TeamSortKey::AvgSpread,
        TeamSortKey::VarSpread,
    ];

    fn value(self, team: &TeamSummaryRecord) -> Option<f64> {
        match self {
            TeamSortKey::TotalDist => team.total_dist,
            TeamSortKey::TeamFga => team.team_fga.map(|n| n as f64),
            TeamSortKey::TeamFgm => team.team_fgm.map(|n| n as f64),
            TeamSortKey::TeamFgPct => team.team_fg_pct,
            TeamSortKey::AvgSpacing => team.avg_spacing,
            TeamSortKey::AvgSpread => team.avg_spread,
            TeamSortKey::VarSpread => team.var_spread,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamRow {
    #[serde(flatten)]
    pub team: TeamSummaryRecord,
    pub fg_pct_label: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamsView {
    pub sort: TeamSortKey,
    pub ascending: bool,
    pub sort_options: [TeamSortKey; 7],
    pub teams: Vec<TeamRow>,
    pub placeholder: Option<String>,
}

pub fn build(report: &Report, sort: TeamSortKey, ascending: bool) -> TeamsView {
    let mut teams: Vec<&TeamSummaryRecord> = report.teams().iter().collect();
    teams.sort_by(|a, b| compare(sort.value(a), sort.value(b), ascending));

    let rows: Vec<TeamRow> = teams
        .into_iter()
        .map(|team| TeamRow {
            fg_pct_label: format_percent(team.team_fg_pct),
            team: team.clone(),
        })
        .collect();

    TeamsView {
        sort,
        ascending,
        sort_options: TeamSortKey::ALL,
        placeholder: rows.is_empty().then(|| "No team summary in this report.".to_string()),
        teams: rows,
    }
}

// Missing values sort last in either direction.
fn compare(a: Option<f64>, b: Option<f64>, ascending: bool) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) if ascending => x.total_cmp(&y),
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::tests_support::report_from;
    use serde_json::json;

    fn report() -> Report {
        report_from(json!({
            "team_summary": [
                {"team_id": 0, "team_name": "Red", "total_dist": 500.0, "team_FG_pct": 0.5, "avg_spacing": 90.0},
                {"team_id": 1, "team_name": "Blue", "total_dist": 900.0, "team_FG_pct": 0.25},
                {"team_id": 2, "team_name": "Gray", "avg_spacing": 70.0}
            ]
        }))
    }

    fn names(view: &TeamsView) -> Vec<&str> {
        view.teams
            .iter()
            .map(|t| t.team.team_name.as_deref().unwrap_or("-"))
            .collect()
    }

    #[test]
    fn default_sort_is_distance_descending() {
        let view = build(&report(), TeamSortKey::default(), false);
        assert_eq!(names(&view), vec!["Blue", "Red", "Gray"]);
    }

    #[test]
    fn ascending_keeps_missing_last() {
        let view = build(&report(), TeamSortKey::TotalDist, true);
        assert_eq!(names(&view), vec!["Red", "Blue", "Gray"]);

        let view = build(&report(), TeamSortKey::AvgSpacing, true);
        assert_eq!(names(&view), vec!["Gray", "Red", "Blue"]);
    }

    #[test]
    fn rows_carry_formatted_fg_pct() {
        let view = build(&report(), TeamSortKey::TotalDist, false);
        let labels: Vec<_> = view.teams.iter().map(|t| t.fg_pct_label.as_str()).collect();
        assert_eq!(labels, vec!["25.0%", "50.0%", "-"]);
    }

    #[test]
    fn sort_key_parses_from_column_names() {
        let key: TeamSortKey = serde_json::from_value(json!("team_FG_pct")).unwrap();
        assert_eq!(key, TeamSortKey::TeamFgPct);
        assert!(serde_json::from_value::<TeamSortKey>(json!("bogus")).is_err());
    }

    #[test]
    fn missing_section_gives_placeholder() {
        let view = build(&report_from(json!({})), TeamSortKey::default(), false);
        assert!(view.teams.is_empty());
        assert!(view.placeholder.is_some());
    }
}
