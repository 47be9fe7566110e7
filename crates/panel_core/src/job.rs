use std::fmt;

use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use serde::{Deserialize, Deserializer, Serialize};

/// Milliseconds since the Unix epoch. Every time-dependent computation takes one of these.
pub type EpochMillis = i64;

/// Opaque server-assigned job identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct JobId(String);

impl JobId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for JobId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl<'de> Deserialize<'de> for JobId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Number(i64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(text) => JobId(text),
            RawId::Number(number) => JobId(number.to_string()),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum JobStatus {
    Running,
    Done,
    Failed,
    Cancelled,
    /// Any status string this client does not know; rendered verbatim.
    Other(String),
}

impl JobStatus {
    pub fn as_str(&self) -> &str {
        match self {
            JobStatus::Running => "running",
            JobStatus::Done => "done",
            JobStatus::Failed => "failed",
            JobStatus::Cancelled => "cancelled",
            JobStatus::Other(raw) => raw,
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self, JobStatus::Running)
    }

    pub fn is_terminal(&self) -> bool {
        !self.is_running()
    }
}

impl Default for JobStatus {
    fn default() -> Self {
        JobStatus::Other(String::new())
    }
}

impl From<String> for JobStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "running" => JobStatus::Running,
            "done" => JobStatus::Done,
            "failed" => JobStatus::Failed,
            "cancelled" => JobStatus::Cancelled,
            _ => JobStatus::Other(raw),
        }
    }
}

impl From<JobStatus> for String {
    fn from(status: JobStatus) -> Self {
        status.as_str().to_owned()
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read-only client copy of a server-owned job record.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Job {
    pub id: JobId,
    pub query: String,
    pub limit: i64,
    pub out_dir: String,
    pub status: JobStatus,
    pub started_at: Option<String>,
    pub finished_at: Option<String>,
    pub count: Option<u64>,
    pub error: Option<String>,
}

impl Job {
    pub fn started_at_millis(&self) -> Option<EpochMillis> {
        self.started_at.as_deref().and_then(parse_timestamp)
    }

    /// Whole seconds between `started_at` and `now`; 0 when unset or in the future.
    pub fn elapsed_secs(&self, now: EpochMillis) -> u64 {
        match self.started_at_millis() {
            Some(started) => elapsed_secs_since(started, now),
            None => 0,
        }
    }

    /// The error text, only for failed/cancelled jobs and only when non-empty.
    pub fn reported_error(&self) -> Option<&str> {
        match self.status {
            JobStatus::Failed | JobStatus::Cancelled => {
                self.error.as_deref().filter(|text| !text.is_empty())
            }
            _ => None,
        }
    }
}

pub fn elapsed_secs_since(start: EpochMillis, now: EpochMillis) -> u64 {
    u64::try_from((now - start).max(0) / 1000).unwrap_or(0)
}

/// Parses an RFC 3339 timestamp, or a naive ISO-8601 one interpreted as local time.
pub fn parse_timestamp(raw: &str) -> Option<EpochMillis> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.timestamp_millis());
    }
    let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").ok()?;
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|local| local.timestamp_millis())
}

/// One page of the job history as returned by the list endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobPage {
    pub jobs: Vec<Job>,
    pub total: u64,
    pub page: u32,
}

impl Default for JobPage {
    fn default() -> Self {
        Self {
            jobs: Vec::new(),
            total: 0,
            page: 1,
        }
    }
}

impl JobPage {
    pub fn has_running(&self) -> bool {
        self.jobs.iter().any(|job| job.status.is_running())
    }

    pub fn total_pages(&self, per_page: u32) -> u32 {
        total_pages(self.total, per_page)
    }
}

/// `max(1, ceil(total / per_page))`.
pub fn total_pages(total: u64, per_page: u32) -> u32 {
    let per_page = u64::from(per_page.max(1));
    let pages = total.div_ceil(per_page).max(1);
    u32::try_from(pages).unwrap_or(u32::MAX)
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageList {
    pub files: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchRequest {
    pub query: String,
    pub limit: u32,
    pub out_dir: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchResponse {
    pub job_id: JobId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_status_is_kept_verbatim() {
        let job: Job = serde_json::from_str(r#"{"id":"a1","status":"queued"}"#).unwrap();
        assert_eq!(job.status, JobStatus::Other("queued".to_string()));
        assert_eq!(job.status.as_str(), "queued");
        assert!(job.status.is_terminal());
    }

    #[test]
    fn numeric_ids_are_stringified() {
        let job: Job = serde_json::from_str(r#"{"id":42,"status":"done","count":3}"#).unwrap();
        assert_eq!(job.id.as_str(), "42");
        assert_eq!(job.count, Some(3));
    }

    #[test]
    fn elapsed_uses_floor_and_clamps() {
        let job = Job {
            started_at: Some("2024-05-01T10:00:00Z".to_string()),
            ..Job::default()
        };
        let start = job.started_at_millis().unwrap();
        assert_eq!(job.elapsed_secs(start), 0);
        assert_eq!(job.elapsed_secs(start + 2_999), 2);
        assert_eq!(job.elapsed_secs(start - 5_000), 0);
        assert_eq!(Job::default().elapsed_secs(start), 0);
    }

    #[test]
    fn naive_timestamps_are_accepted() {
        assert!(parse_timestamp("2024-05-01T10:00:00.123456").is_some());
        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn total_pages_has_a_floor_of_one() {
        assert_eq!(total_pages(0, 10), 1);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(25, 10), 3);
    }

    #[test]
    fn reported_error_requires_failure_status() {
        let mut job = Job {
            status: JobStatus::Done,
            error: Some("boom".to_string()),
            ..Job::default()
        };
        assert_eq!(job.reported_error(), None);
        job.status = JobStatus::Cancelled;
        assert_eq!(job.reported_error(), Some("boom"));
        job.error = Some(String::new());
        assert_eq!(job.reported_error(), None);
    }
}
