use chrono::{DateTime, Datelike, Months, NaiveDate, NaiveTime, Utc};
use indexmap::IndexMap;
use serde::Serialize;

use crate::contributors::CoreContributors;
use crate::error::{PrStatsError, Result};
use crate::pulls::NormalizedRow;

/// A calendar month whose start and exclusive end are both representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    first: NaiveDate,
    next_first: NaiveDate,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(PrStatsError::InvalidMonth(month));
        }

        NaiveDate::from_ymd_opt(year, month, 1)
            .and_then(Self::from_first_day)
            .ok_or(PrStatsError::InvalidYear(year))
    }

    fn from_first_day(first: NaiveDate) -> Option<Self> {
        let next_first = first.checked_add_months(Months::new(1))?;
        Some(Self { first, next_first })
    }

    pub fn year(self) -> i32 {
        self.first.year()
    }

    pub fn month(self) -> u32 {
        self.first.month()
    }

    /// The following month, if chrono can still represent its end.
    pub fn succ(self) -> Option<Self> {
        Self::from_first_day(self.next_first)
    }

    pub fn first_day(self) -> NaiveDate {
        self.first
    }

    pub fn start(self) -> DateTime<Utc> {
        self.first.and_time(NaiveTime::MIN).and_utc()
    }

    /// Start of the following month, i.e. the exclusive end of this one.
    pub fn end(self) -> DateTime<Utc> {
        self.next_first.and_time(NaiveTime::MIN).and_utc()
    }

    /// Whether `ts` lies strictly between the start of this month and the start of the next.
    pub fn contains(self, ts: DateTime<Utc>) -> bool {
        ts > self.start() && ts < self.end()
    }
}

impl std::fmt::Display for YearMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

/// An inclusive range of calendar months.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthRange {
    pub start: YearMonth,
    pub end: YearMonth,
}

impl MonthRange {
    pub fn new(start: YearMonth, end: YearMonth) -> Self {
        Self { start, end }
    }

    /// Builds a range, filling in a missing end year or month from `today`.
    pub fn resolve(
        today: NaiveDate,
        year_start: i32,
        month_start: u32,
        year_end: Option<i32>,
        month_end: Option<u32>,
    ) -> Result<Self> {
        let start = YearMonth::new(year_start, month_start)?;
        let end = YearMonth::new(
            year_end.unwrap_or_else(|| today.year()),
            month_end.unwrap_or_else(|| today.month()),
        )?;
        Ok(Self { start, end })
    }

    /// Same as [`MonthRange::resolve`] with today's date taken from the system clock.
    pub fn resolve_now(
        year_start: i32,
        month_start: u32,
        year_end: Option<i32>,
        month_end: Option<u32>,
    ) -> Result<Self> {
        Self::resolve(
            Utc::now().date_naive(),
            year_start,
            month_start,
            year_end,
            month_end,
        )
    }

    /// Every month in the range, in order. Empty when `end` precedes `start`.
    pub fn months(self) -> impl Iterator<Item = YearMonth> {
        let end = self.end;
        std::iter::successors(Some(self.start), |m| m.succ())
            .take_while(move |m| *m <= end)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ActivityCounts {
    pub core: usize,
    pub community: usize,
}

impl ActivityCounts {
    pub fn total(self) -> usize {
        self.core + self.community
    }
}

impl std::ops::Add for ActivityCounts {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            core: self.core + rhs.core,
            community: self.community + rhs.community,
        }
    }
}

/// Counts per month, keyed by the first day of the month.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ActivityTable(IndexMap<NaiveDate, ActivityCounts>);

impl ActivityTable {
    pub fn get(&self, date: &NaiveDate) -> Option<&ActivityCounts> {
        self.0.get(date)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NaiveDate, &ActivityCounts)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn totals(&self) -> ActivityCounts {
        self.0
            .values()
            .fold(ActivityCounts::default(), |acc, c| acc + *c)
    }
}

impl FromIterator<(NaiveDate, ActivityCounts)> for ActivityTable {
    fn from_iter<I: IntoIterator<Item = (NaiveDate, ActivityCounts)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthlyBucket {
    pub date: NaiveDate,
    pub core_merged: usize,
    pub community_merged: usize,
    pub core_rejected: usize,
    pub community_rejected: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MonthlyActivity {
    pub merged: ActivityTable,
    pub rejected: ActivityTable,
}

fn bucket_for(rows: &[NormalizedRow], core: &CoreContributors, month: YearMonth) -> MonthlyBucket {
    let (merged, rejected): (Vec<&NormalizedRow>, Vec<&NormalizedRow>) = rows
        .iter()
        .filter(|r| month.contains(r.closed))
        .partition(|r| r.merged);

    let (core_merged, community_merged) = core.core_non_core(merged);
    let (core_rejected, community_rejected) = core.core_non_core(rejected);

    MonthlyBucket {
        date: month.first_day(),
        core_merged,
        community_merged,
        core_rejected,
        community_rejected,
    }
}

/// One bucket per month of `range`, including months without activity.
pub fn monthly_buckets(
    rows: &[NormalizedRow],
    core: &CoreContributors,
    range: MonthRange,
) -> Vec<MonthlyBucket> {
    range
        .months()
        .map(|month| bucket_for(rows, core, month))
        .collect()
}

/// Monthly merged and rejected counts split by core and community authors.
pub fn monthly_data(
    rows: &[NormalizedRow],
    core: &CoreContributors,
    range: MonthRange,
) -> MonthlyActivity {
    let buckets = monthly_buckets(rows, core, range);

    let merged = buckets
        .iter()
        .map(|b| {
            (
                b.date,
                ActivityCounts {
                    core: b.core_merged,
                    community: b.community_merged,
                },
            )
        })
        .collect();

    let rejected = buckets
        .iter()
        .map(|b| {
            (
                b.date,
                ActivityCounts {
                    core: b.core_rejected,
                    community: b.community_rejected,
                },
            )
        })
        .collect();

    MonthlyActivity { merged, rejected }
}
