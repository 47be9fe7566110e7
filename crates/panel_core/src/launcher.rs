use crate::job::{elapsed_secs_since, Job, JobId, JobStatus, LaunchRequest};
use crate::labels::Labels;
use crate::render::{escape_html, render_inline_error};
use crate::settings::PanelSettings;
use crate::timer::Ticker;
use crate::EpochMillis;

pub const FAILURE_SUMMARY_CHARS: usize = 200;

/// Polls one freshly launched job, independently of the list ticker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobPoller {
    pub job_id: JobId,
    pub launched_at: EpochMillis,
    pub timer: Ticker,
}

impl JobPoller {
    pub fn start(job_id: JobId, now: EpochMillis, period_ms: i64) -> Self {
        let mut timer = Ticker::new(period_ms);
        timer.start(now);
        Self {
            job_id,
            launched_at: now,
            timer,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LauncherState {
    pub button_enabled: bool,
    /// Markup of the inline result line, hidden while `None`.
    pub result: Option<String>,
    pub poller: Option<JobPoller>,
}

impl Default for LauncherState {
    fn default() -> Self {
        Self {
            button_enabled: true,
            result: None,
            poller: None,
        }
    }
}

/// Builds a launch request from raw form input.
///
/// Only the query is required; a missing or non-positive limit and a blank output
/// folder fall back to the configured defaults. The server remains the authority.
pub fn parse_launch_form(
    query: &str,
    limit: &str,
    out_dir: &str,
    settings: &PanelSettings,
) -> Option<LaunchRequest> {
    let query = query.trim();
    if query.is_empty() {
        return None;
    }
    let limit = limit
        .trim()
        .parse::<u32>()
        .ok()
        .filter(|limit| *limit > 0)
        .unwrap_or(settings.default_limit);
    let out_dir = match out_dir.trim() {
        "" => settings.default_out_dir.clone(),
        dir => dir.to_string(),
    };
    Some(LaunchRequest {
        query: query.to_string(),
        limit,
        out_dir,
    })
}

pub fn render_progress(labels: &Labels, job_id: &JobId, launched_at: EpochMillis, now: EpochMillis) -> String {
    labels.run_progress(
        &escape_html(job_id.as_str()),
        elapsed_secs_since(launched_at, now),
    )
}

/// Final line once the polled job left `running`.
pub fn render_terminal_summary(labels: &Labels, job: &Job) -> String {
    match job.status {
        JobStatus::Done => labels.run_done(&escape_html(&job.out_dir), job.count.unwrap_or(0)),
        JobStatus::Cancelled => labels.run_cancelled.to_string(),
        _ => {
            let error: String = job
                .error
                .as_deref()
                .unwrap_or_default()
                .chars()
                .take(FAILURE_SUMMARY_CHARS)
                .collect();
            escape_html(&labels.run_failed(&error))
        }
    }
}

pub fn render_launch_error(message: &str) -> String {
    render_inline_error(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    fn settings() -> PanelSettings {
        PanelSettings::new(Url::parse("http://panel.test/").unwrap())
    }

    #[test]
    fn blank_query_is_rejected() {
        assert_eq!(parse_launch_form("   ", "5", "out", &settings()), None);
    }

    #[test]
    fn defaults_fill_unparsable_limit_and_blank_dir() {
        let request = parse_launch_form(" cats ", "many", "  ", &settings()).unwrap();
        assert_eq!(request.query, "cats");
        assert_eq!(request.limit, 20);
        assert_eq!(request.out_dir, "data/naver_collected");

        let request = parse_launch_form("cats", "0", "x", &settings()).unwrap();
        assert_eq!(request.limit, 20);
        let request = parse_launch_form("cats", " 7 ", "x", &settings()).unwrap();
        assert_eq!(request.limit, 7);
    }

    #[test]
    fn failure_summary_is_capped() {
        let job = Job {
            status: JobStatus::Failed,
            error: Some("e".repeat(500)),
            ..Job::default()
        };
        let summary = render_terminal_summary(settings().labels(), &job);
        assert_eq!(summary, format!("Failed: {}", "e".repeat(200)));
    }
}
