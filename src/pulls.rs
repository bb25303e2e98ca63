use std::io::Read;

use chrono::{DateTime, NaiveDateTime, Utc};
use log::debug;
use serde::Deserialize;

use crate::error::{PrStatsError, Result};

/// Timestamp format used by the GitHub REST API.
pub const GITHUB_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PullRequestUser {
    #[serde(default)]
    pub login: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PullRequestMilestone {
    #[serde(default)]
    pub title: Option<String>,
}

/// A closed pull request as returned by the repository API.
///
/// Only the fields the pipeline reads are kept, everything else in the
/// payload is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PullRequestRecord {
    pub number: u64,
    #[serde(default)]
    pub user: Option<PullRequestUser>,
    #[serde(default)]
    pub milestone: Option<PullRequestMilestone>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub merged_at: Option<String>,
    #[serde(default)]
    pub closed_at: Option<String>,
}

impl PullRequestRecord {
    /// Author login, absent for deleted accounts and empty `{}` user objects.
    pub fn login(&self) -> Option<&str> {
        self.user.as_ref().and_then(|u| u.login.as_deref())
    }

    /// Records without an author or still open are not part of the analysis.
    pub fn is_valid(&self) -> bool {
        self.login().is_some() && self.closed_at.as_deref().is_some_and(|s| !s.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedRow {
    pub number: u64,
    pub user: String,
    pub milestone: Option<String>,
    pub opened: Option<DateTime<Utc>>,
    pub merged: bool,
    pub closed: DateTime<Utc>,
}

/// Parses a GitHub timestamp. Empty or absent values yield `Ok(None)`.
pub fn parse_github_timestamp(
    value: Option<&str>,
) -> std::result::Result<Option<DateTime<Utc>>, chrono::ParseError> {
    match value {
        Some(s) if !s.is_empty() => {
            let naive = NaiveDateTime::parse_from_str(s, GITHUB_TIMESTAMP_FORMAT)?;
            Ok(Some(naive.and_utc()))
        }
        _ => Ok(None),
    }
}

fn parse_field(
    number: u64,
    field: &'static str,
    value: Option<&str>,
) -> Result<Option<DateTime<Utc>>> {
    parse_github_timestamp(value).map_err(|source| PrStatsError::TimestampParse {
        number,
        field,
        value: value.unwrap_or_default().to_string(),
        source,
    })
}

fn normalize_record(record: &PullRequestRecord) -> Result<Option<NormalizedRow>> {
    let Some(login) = record.login() else {
        return Ok(None);
    };

    let opened = parse_field(record.number, "created_at", record.created_at.as_deref())?;
    let Some(closed) = parse_field(record.number, "closed_at", record.closed_at.as_deref())?
    else {
        return Ok(None);
    };

    Ok(Some(NormalizedRow {
        number: record.number,
        user: login.to_string(),
        milestone: record.milestone.as_ref().and_then(|m| m.title.clone()),
        opened,
        merged: record.merged_at.is_some(),
        closed,
    }))
}

/// Converts raw records into normalized rows, dropping incomplete ones.
///
/// The first malformed timestamp aborts the whole conversion.
pub fn normalize_pulls(records: &[PullRequestRecord]) -> Result<Vec<NormalizedRow>> {
    let rows: Vec<NormalizedRow> = records
        .iter()
        .filter(|r| r.is_valid())
        .map(normalize_record)
        .filter_map(Result::transpose)
        .collect::<Result<_>>()?;

    debug!(
        "Normalized {} of {} pull requests ({} dropped)",
        rows.len(),
        records.len(),
        records.len() - rows.len()
    );

    Ok(rows)
}

/// Reads a JSON array of pull request records.
pub fn load_pulls<R: Read>(reader: R) -> Result<Vec<PullRequestRecord>> {
    let records = serde_json::from_reader(reader)?;
    Ok(records)
}
