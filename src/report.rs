use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::monthly::{ActivityCounts, ActivityTable, MonthRange, MonthlyActivity};

#[derive(Debug, Serialize)]
pub struct ActivityReport {
    pub source: String,
    pub generated_at: DateTime<Utc>,
    pub start_month: String,
    pub end_month: String,
    pub pulls_loaded: usize,
    pub pulls_analyzed: usize,
    pub core_contributors: usize,
    pub summary: ActivitySummary,
    pub merged: ActivityTable,
    pub rejected: ActivityTable,
}

#[derive(Debug, Serialize)]
pub struct ActivitySummary {
    pub merged: ActivityCounts,
    pub rejected: ActivityCounts,
    pub core_merge_rate: f64,
    pub community_merge_rate: f64,
}

fn merge_rate(merged: usize, rejected: usize) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let rate = (merged as f64 / (merged + rejected).max(1) as f64) * 100.0;
    rate
}

impl ActivitySummary {
    pub fn from_activity(activity: &MonthlyActivity) -> Self {
        let merged = activity.merged.totals();
        let rejected = activity.rejected.totals();

        Self {
            merged,
            rejected,
            core_merge_rate: merge_rate(merged.core, rejected.core),
            community_merge_rate: merge_rate(merged.community, rejected.community),
        }
    }
}

pub struct ReportInputs<'a> {
    pub source: &'a str,
    pub generated_at: DateTime<Utc>,
    pub range: MonthRange,
    pub pulls_loaded: usize,
    pub pulls_analyzed: usize,
    pub core_contributors: usize,
}

impl ActivityReport {
    pub fn new(inputs: &ReportInputs<'_>, activity: MonthlyActivity) -> Self {
        Self {
            source: inputs.source.to_string(),
            generated_at: inputs.generated_at,
            start_month: inputs.range.start.to_string(),
            end_month: inputs.range.end.to_string(),
            pulls_loaded: inputs.pulls_loaded,
            pulls_analyzed: inputs.pulls_analyzed,
            core_contributors: inputs.core_contributors,
            summary: ActivitySummary::from_activity(&activity),
            merged: activity.merged,
            rejected: activity.rejected,
        }
    }
}

/// Plain-text rendering, one line per month.
impl fmt::Display for ActivityReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Pull request activity for {} ({} to {})",
            self.source, self.start_month, self.end_month
        )?;
        writeln!(
            f,
            "{} pull requests loaded, {} analyzed",
            self.pulls_loaded, self.pulls_analyzed
        )?;
        writeln!(f)?;
        writeln!(
            f,
            "{:<10}  {:>11}  {:>16}  {:>13}  {:>18}",
            "month", "core merged", "community merged", "core rejected", "community rejected"
        )?;

        let empty = ActivityCounts::default();
        for (date, merged) in self.merged.iter() {
            let rejected = self.rejected.get(date).unwrap_or(&empty);
            writeln!(
                f,
                "{:<10}  {:>11}  {:>16}  {:>13}  {:>18}",
                date.format("%Y-%m-%d").to_string(),
                merged.core,
                merged.community,
                rejected.core,
                rejected.community
            )?;
        }

        writeln!(f)?;
        writeln!(
            f,
            "{:<10}  {:>11}  {:>16}  {:>13}  {:>18}",
            "total",
            self.summary.merged.core,
            self.summary.merged.community,
            self.summary.rejected.core,
            self.summary.rejected.community
        )?;
        write!(
            f,
            "merge rate: core {:.1}%, community {:.1}%",
            self.summary.core_merge_rate, self.summary.community_merge_rate
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contributors::CoreContributors;
    use crate::monthly::{monthly_data, YearMonth};
    use crate::pulls::NormalizedRow;
    use chrono::TimeZone;

    fn row(user: &str, day: u32, merged: bool) -> NormalizedRow {
        NormalizedRow {
            number: u64::from(day),
            user: user.to_string(),
            milestone: None,
            opened: None,
            merged,
            closed: Utc.with_ymd_and_hms(2021, 3, day, 10, 0, 0).unwrap(),
        }
    }

    fn sample_report() -> ActivityReport {
        let rows = vec![
            row("minrk", 2, true),
            row("minrk", 3, false),
            row("alice", 4, true),
            row("bob", 5, true),
            row("carol", 6, false),
        ];
        let range = MonthRange::new(
            YearMonth::new(2021, 3).unwrap(),
            YearMonth::new(2021, 4).unwrap(),
        );
        let activity = monthly_data(&rows, &CoreContributors::historical(), range);
        let inputs = ReportInputs {
            source: "pulls.json",
            generated_at: Utc.with_ymd_and_hms(2021, 5, 1, 0, 0, 0).unwrap(),
            range,
            pulls_loaded: 6,
            pulls_analyzed: rows.len(),
            core_contributors: 7,
        };

        ActivityReport::new(&inputs, activity)
    }

    #[test]
    fn test_merge_rate_handles_no_pulls() {
        assert!((merge_rate(0, 0) - 0.0).abs() < f64::EPSILON);
        assert!((merge_rate(3, 1) - 75.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_report_summary_totals() {
        let report = sample_report();

        assert_eq!(report.start_month, "2021-03");
        assert_eq!(report.end_month, "2021-04");
        assert_eq!(
            report.summary.merged,
            ActivityCounts {
                core: 1,
                community: 2
            }
        );
        assert_eq!(
            report.summary.rejected,
            ActivityCounts {
                core: 1,
                community: 1
            }
        );
        assert!((report.summary.core_merge_rate - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_report_json_shape() {
        let value = serde_json::to_value(sample_report()).unwrap();

        assert_eq!(value["merged"]["2021-03-01"]["community"], 2);
        assert_eq!(value["rejected"]["2021-04-01"]["core"], 0);
        assert_eq!(value["pulls_loaded"], 6);
        assert_eq!(value["summary"]["rejected"]["community"], 1);
    }

    #[test]
    fn test_display_lists_every_month() {
        let text = sample_report().to_string();

        assert!(text.contains("2021-03 to 2021-04"));
        assert!(text.lines().any(|l| l.starts_with("2021-03-01")));
        assert!(text.lines().any(|l| l.starts_with("2021-04-01")));
        assert!(text.contains("merge rate: core 50.0%, community 66.7%"));
    }
}
