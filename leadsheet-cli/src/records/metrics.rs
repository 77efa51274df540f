//! Performance and follower time series

use serde::Serialize;
use uuid::Uuid;

use super::RecordBuilder;
use super::parse::{parse_count, percent_change, rate};
use crate::ingest::{RawGrid, cell_at};
use crate::services::inference::{ColumnRoleMap, Role, RoleProfile};

/// Number of most recent rows kept by default
pub const DEFAULT_WINDOW: usize = 7;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceMetric {
    pub id: Uuid,
    pub date: String,
    pub reach: u64,
    pub engagement: u64,
    /// engagement / reach * 100, 0 when reach is 0
    pub engagement_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FollowerMetric {
    pub id: Uuid,
    pub date: String,
    pub followers: u64,
    /// Change against the previous row of the window, 0 for the first row
    pub gained: i64,
}

/// Latest row compared to the one before it
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MetricsSummary {
    pub reach_change: f64,
    pub engagement_change: f64,
    pub followers_change: f64,
    pub latest_engagement_rate: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MetricsReport {
    pub performance: Vec<PerformanceMetric>,
    pub followers: Vec<FollowerMetric>,
    pub summary: MetricsSummary,
}

impl MetricsReport {
    pub fn is_empty(&self) -> bool {
        self.performance.is_empty()
    }
}

/// Builds a trailing window of metric rows
#[derive(Debug, Clone)]
pub struct MetricsBuilder {
    profile: RoleProfile,
    window: usize,
}

impl MetricsBuilder {
    pub fn new(profile: RoleProfile, window: usize) -> Self {
        Self { profile, window }
    }

    pub fn window(&self) -> usize {
        self.window
    }
}

impl Default for MetricsBuilder {
    fn default() -> Self {
        Self::new(RoleProfile::metrics(), DEFAULT_WINDOW)
    }
}

/// Raw counts of one row before derived fields are computed
struct RowCounts<'a> {
    date: &'a str,
    reach: u64,
    engagement: u64,
    followers: u64,
}

impl RecordBuilder for MetricsBuilder {
    type Output = MetricsReport;

    fn profile(&self) -> &RoleProfile {
        &self.profile
    }

    fn build(&self, grid: &RawGrid, roles: &ColumnRoleMap) -> MetricsReport {
        let data = grid.data_rows();
        let start = data.len().saturating_sub(self.window);

        let date_column = roles.get(Role::Date);
        let reach_column = roles.get(Role::Reach);
        let engagement_column = roles.get(Role::Engagement);
        let followers_column = roles.get(Role::Followers);

        let rows: Vec<RowCounts> = data[start..]
            .iter()
            .map(|row| RowCounts {
                date: cell_at(row, date_column),
                reach: parse_count(cell_at(row, reach_column)),
                engagement: parse_count(cell_at(row, engagement_column)),
                followers: parse_count(cell_at(row, followers_column)),
            })
            .collect();

        let performance: Vec<PerformanceMetric> = rows
            .iter()
            .map(|row| PerformanceMetric {
                id: Uuid::new_v4(),
                date: row.date.to_string(),
                reach: row.reach,
                engagement: row.engagement,
                engagement_rate: rate(row.engagement as f64, row.reach as f64),
            })
            .collect();

        let followers: Vec<FollowerMetric> = rows
            .iter()
            .enumerate()
            .map(|(index, row)| {
                let previous = index
                    .checked_sub(1)
                    .and_then(|prev| rows.get(prev))
                    .map(|prev| prev.followers)
                    .unwrap_or(row.followers);
                FollowerMetric {
                    id: Uuid::new_v4(),
                    date: row.date.to_string(),
                    followers: row.followers,
                    gained: signed(row.followers).saturating_sub(signed(previous)),
                }
            })
            .collect();

        let summary = summarize(&rows);

        log::info!(
            "Built {} metric rows (window {} of {} data rows)",
            performance.len(),
            self.window,
            data.len()
        );

        MetricsReport {
            performance,
            followers,
            summary,
        }
    }
}

/// Counts past `i64::MAX` are clamped rather than wrapped
fn signed(count: u64) -> i64 {
    i64::try_from(count).unwrap_or(i64::MAX)
}

/// Compare the latest row with the previous one, baseline 0 when there is none
fn summarize(rows: &[RowCounts]) -> MetricsSummary {
    let Some(latest) = rows.last() else {
        return MetricsSummary::default();
    };
    let previous = rows.len().checked_sub(2).and_then(|index| rows.get(index));
    let baseline = |field: fn(&RowCounts) -> u64| previous.map(field).unwrap_or(0) as f64;

    MetricsSummary {
        reach_change: percent_change(baseline(|row| row.reach), latest.reach as f64),
        engagement_change: percent_change(baseline(|row| row.engagement), latest.engagement as f64),
        followers_change: percent_change(baseline(|row| row.followers), latest.followers as f64),
        latest_engagement_rate: rate(latest.engagement as f64, latest.reach as f64),
    }
}
