use std::collections::BTreeSet;

use panel_core::render::{render_job_row, render_pagination, RenderContext};
use panel_core::{parse_timestamp, Controls, Job, JobId, JobStatus, PanelSettings};
use pretty_assertions::assert_eq;
use url::Url;

const STARTED: &str = "2024-05-01T10:00:00Z";

fn settings() -> PanelSettings {
    PanelSettings::new(Url::parse("http://panel.test/").unwrap())
}

fn job(id: &str, status: JobStatus) -> Job {
    Job {
        id: JobId::new(id),
        query: "cats".to_string(),
        limit: 20,
        out_dir: "data/cats".to_string(),
        status,
        started_at: Some(STARTED.to_string()),
        ..Job::default()
    }
}

fn render_at(job: &Job, now: i64) -> String {
    let settings = settings();
    let controls = Controls::default();
    let expanded = BTreeSet::new();
    let ctx = RenderContext {
        now,
        settings: &settings,
        controls: &controls,
        expanded: &expanded,
    };
    render_job_row(job, &ctx)
}

fn t0() -> i64 {
    parse_timestamp(STARTED).unwrap()
}

#[test]
fn terminal_badges_show_the_raw_status_without_cancel() {
    for (status, text, class) in [
        (JobStatus::Done, "done", "done"),
        (JobStatus::Failed, "failed", "failed"),
        (JobStatus::Other("queued".to_string()), "queued", "failed"),
        (JobStatus::Cancelled, "cancelled", "cancelled"),
    ] {
        let html = render_at(&job("1", status), t0() + 60_000);
        assert!(
            html.contains(&format!("<span class=\"status {class}\">{text}</span>")),
            "{html}"
        );
        assert!(!html.contains("btn-cancel"));
        assert!(html.contains("/static/log.html?job_id=1"));
    }
}

#[test]
fn running_badge_counts_whole_seconds() {
    let running = job("1", JobStatus::Running);
    for k in [0_i64, 1, 7, 61] {
        let html = render_at(&running, t0() + k * 1000);
        assert!(html.contains(&format!("collecting ({k} sec)")), "{html}");
    }
    let html = render_at(&running, t0() + 1_999);
    assert!(html.contains("collecting (1 sec)"));
}

#[test]
fn running_row_has_cancel_and_no_log_link() {
    let html = render_at(&job("9", JobStatus::Running), t0());
    assert!(html.contains("<button type=\"button\" class=\"btn-cancel\" data-job-id=\"9\">Cancel</button>"));
    assert!(!html.contains("log.html"));
    assert!(html.contains("btn-delete"));
}

#[test]
fn unset_start_renders_zero_seconds() {
    let mut running = job("1", JobStatus::Running);
    running.started_at = None;
    assert!(render_at(&running, 123_456_789).contains("collecting (0 sec)"));
}

#[test]
fn view_images_requires_a_positive_count() {
    let mut done = job("3", JobStatus::Done);
    done.count = Some(0);
    let html = render_at(&done, t0());
    assert!(html.contains("<span class=\"count\">0 images</span>"));
    assert!(!html.contains("View images"));

    done.count = Some(12);
    let html = render_at(&done, t0());
    assert!(html.contains(
        "<button type=\"button\" class=\"btn-sm\" data-job-id=\"3\">View images</button>"
    ));
}

#[test]
fn long_error_is_summarized_and_kept_whole() {
    let full = format!("{}\nTraceback line", "x".repeat(150));
    let mut failed = job("4", JobStatus::Failed);
    failed.error = Some(full.clone());

    let html = render_at(&failed, t0());
    let summary = format!("<div class=\"error-summary\">{}…</div>", "x".repeat(120));
    assert!(html.contains(&summary), "{html}");
    assert!(html.contains(&format!("<div class=\"error-full\">{full}</div>")));
    assert!(html.contains("class=\"btn-copy\" data-job-id=\"4\">Copy</button>"));
    assert!(html.contains("class=\"btn-error-toggle\" data-job-id=\"4\">Error details</button>"));
}

#[test]
fn error_block_needs_failure_status_and_text() {
    let mut done = job("5", JobStatus::Done);
    done.error = Some("ignored".to_string());
    assert!(!render_at(&done, t0()).contains("error-wrap"));

    let cancelled = job("6", JobStatus::Cancelled);
    assert!(!render_at(&cancelled, t0()).contains("error-wrap"));
}

#[test]
fn user_text_is_escaped() {
    let mut hostile = job("7", JobStatus::Failed);
    hostile.query = "<script>alert(1)</script>".to_string();
    hostile.out_dir = "a&b".to_string();
    hostile.error = Some("<b>bad</b>".to_string());

    let html = render_at(&hostile, t0());
    assert!(!html.contains("<script>"));
    assert!(!html.contains("<b>bad"));
    assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
    assert!(html.contains("a&amp;b"));
}

#[test]
fn last_page_of_three_has_only_previous() {
    let labels = settings().labels();
    let html = render_pagination(3, 25, 10, labels);
    assert_eq!(
        html,
        "<div class=\"pagination\"><button type=\"button\" class=\"btn-page\" data-page=\"2\">Previous</button> <span class=\"page-info\">3 / 3 (total 25)</span></div>"
    );
}

#[test]
fn single_page_has_no_pagination() {
    assert_eq!(render_pagination(1, 10, 10, settings().labels()), "");
}
