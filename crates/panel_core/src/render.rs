//! Markup for the list region, the image modal and the run result line.
//!
//! Everything here is a pure function of its inputs. Server-supplied strings are
//! passed through [`escape_html`] before they are embedded.

use std::collections::BTreeSet;
use std::fmt::Write as _;

use crate::controls::{ControlRole, Controls, Feedback};
use crate::job::{Job, JobId, JobPage, JobStatus};
use crate::labels::Labels;
use crate::settings::{image_url, log_url, PanelSettings};
use crate::EpochMillis;

pub const ERROR_SUMMARY_CHARS: usize = 120;

/// Inputs the row renderer needs besides the job itself.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub now: EpochMillis,
    pub settings: &'a PanelSettings,
    pub controls: &'a Controls,
    pub expanded: &'a BTreeSet<JobId>,
}

impl RenderContext<'_> {
    fn labels(&self) -> &'static Labels {
        self.settings.labels()
    }
}

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

/// First line of `error`, trimmed and capped at [`ERROR_SUMMARY_CHARS`].
///
/// The ellipsis is appended whenever the whole error is longer than the cap,
/// even if its first line alone fits.
pub fn error_summary(error: &str) -> String {
    let first_line = error.split('\n').next().unwrap_or_default().trim();
    let mut summary: String = first_line.chars().take(ERROR_SUMMARY_CHARS).collect();
    if error.chars().count() > ERROR_SUMMARY_CHARS {
        summary.push('…');
    }
    summary
}

pub fn status_class(status: &JobStatus) -> &'static str {
    match status {
        JobStatus::Running => "running",
        JobStatus::Done => "done",
        JobStatus::Cancelled => "cancelled",
        JobStatus::Failed | JobStatus::Other(_) => "failed",
    }
}

pub fn status_text(job: &Job, now: EpochMillis, labels: &Labels) -> String {
    match &job.status {
        JobStatus::Running => labels.collecting(job.elapsed_secs(now)),
        JobStatus::Cancelled => labels.cancelled.to_string(),
        other => other.as_str().to_string(),
    }
}

fn disabled_attr(disabled: bool) -> &'static str {
    if disabled {
        " disabled"
    } else {
        ""
    }
}

/// One `<tr>` for `job`.
pub fn render_job_row(job: &Job, ctx: &RenderContext<'_>) -> String {
    let labels = ctx.labels();
    let id = escape_html(job.id.as_str());
    let mut status = format!(
        "<span class=\"status {}\">{}</span>",
        status_class(&job.status),
        escape_html(&status_text(job, ctx.now, labels))
    );

    if job.status.is_running() {
        let control = ctx.controls.get(ControlRole::Cancel, &job.id);
        let label = match control.and_then(|state| state.feedback) {
            Some(Feedback::Cancelling) => labels.cancelling,
            _ => labels.cancel,
        };
        let _ = write!(
            status,
            " <button type=\"button\" class=\"btn-cancel\" data-job-id=\"{id}\"{}>{label}</button>",
            disabled_attr(control.is_some_and(|state| state.disabled)),
        );
    }

    let mut detail = String::from("<div class=\"cell-actions\">");
    if let (JobStatus::Done, Some(count)) = (&job.status, job.count) {
        let _ = write!(
            detail,
            "<div class=\"cell-meta\"><span class=\"path\">{}</span> · <span class=\"count\">{}</span></div>",
            escape_html(&job.out_dir),
            labels.image_count(count),
        );
        if count > 0 {
            let _ = write!(
                detail,
                "<button type=\"button\" class=\"btn-sm\" data-job-id=\"{id}\">{}</button>",
                labels.view_images
            );
        }
    }
    if !job.status.is_running() {
        let _ = write!(
            detail,
            "<a href=\"{}\" class=\"btn-sm\" target=\"_blank\">{}</a>",
            escape_html(log_url(&ctx.settings.base_url, job.id.as_str()).as_str()),
            labels.log
        );
    }
    let delete_disabled = ctx
        .controls
        .get(ControlRole::Delete, &job.id)
        .is_some_and(|state| state.disabled);
    let _ = write!(
        detail,
        "<button type=\"button\" class=\"btn-delete btn-sm\" data-job-id=\"{id}\" title=\"{}\"{}>{}</button>",
        labels.delete_hint,
        disabled_attr(delete_disabled),
        labels.delete
    );
    if let Some(error) = job.reported_error() {
        detail.push_str(&render_error_block(job, error, ctx));
    }
    detail.push_str("</div>");

    format!(
        "<tr><td>{id}</td><td class=\"query-cell\">{}</td><td>{}</td><td class=\"path-cell\">{}</td><td class=\"status-cell\">{status}{detail}</td></tr>",
        escape_html(&job.query),
        job.limit,
        escape_html(&job.out_dir),
    )
}

fn render_error_block(job: &Job, error: &str, ctx: &RenderContext<'_>) -> String {
    let labels = ctx.labels();
    let id = escape_html(job.id.as_str());
    let expanded = ctx.expanded.contains(&job.id);
    let (copy_label, copy_class) = match ctx
        .controls
        .get(ControlRole::Copy, &job.id)
        .and_then(|state| state.feedback)
    {
        Some(Feedback::Copied) => (labels.copied, "btn-copy copied"),
        Some(Feedback::CopyFailed) => (labels.copy_failed, "btn-copy"),
        _ => (labels.copy, "btn-copy"),
    };
    let toggle_label = if expanded {
        labels.error_hide
    } else {
        labels.error_details
    };

    format!(
        "<div class=\"error-wrap{}\"><button type=\"button\" class=\"{copy_class}\" data-job-id=\"{id}\">{copy_label}</button><div class=\"error-summary\">{}</div><button type=\"button\" class=\"btn-error-toggle\" data-job-id=\"{id}\">{toggle_label}</button><div class=\"error-full\">{}</div></div>",
        if expanded { " expanded" } else { "" },
        escape_html(&error_summary(error)),
        escape_html(error),
    )
}

/// Table with one row per job followed by the pagination bar.
pub fn render_job_table(page: &JobPage, ctx: &RenderContext<'_>) -> String {
    let labels = ctx.labels();
    let mut out = format!(
        "<table><thead><tr><th>{}</th><th>{}</th><th>{}</th><th>{}</th><th>{}</th></tr></thead><tbody>",
        labels.column_id,
        labels.column_query,
        labels.column_limit,
        labels.column_out_dir,
        labels.column_status
    );
    for job in &page.jobs {
        out.push_str(&render_job_row(job, ctx));
    }
    out.push_str("</tbody></table>");
    out.push_str(&render_pagination(
        page.page,
        page.total,
        ctx.settings.per_page,
        labels,
    ));
    out
}

/// Empty when everything fits on one page.
pub fn render_pagination(page: u32, total: u64, per_page: u32, labels: &Labels) -> String {
    let pages = crate::job::total_pages(total, per_page);
    if pages <= 1 {
        return String::new();
    }
    let mut parts = Vec::with_capacity(3);
    if page > 1 {
        parts.push(format!(
            "<button type=\"button\" class=\"btn-page\" data-page=\"{}\">{}</button>",
            page - 1,
            labels.previous
        ));
    }
    parts.push(format!(
        "<span class=\"page-info\">{}</span>",
        labels.page_info(page, pages, total)
    ));
    if page < pages {
        parts.push(format!(
            "<button type=\"button\" class=\"btn-page\" data-page=\"{}\">{}</button>",
            page + 1,
            labels.next
        ));
    }
    format!("<div class=\"pagination\">{}</div>", parts.join(" "))
}

pub fn render_empty_history(labels: &Labels) -> String {
    format!("<p class=\"empty\">{}</p>", labels.empty_history)
}

pub fn render_list_error(labels: &Labels, message: &str) -> String {
    format!(
        "<p class=\"empty\">{}</p>",
        escape_html(&labels.history_load_failed(message))
    )
}

pub fn render_loading(labels: &Labels) -> String {
    labels.loading.to_string()
}

pub fn render_image_grid(settings: &PanelSettings, job_id: &JobId, files: &[String]) -> String {
    if files.is_empty() {
        return format!("<p class=\"empty\">{}</p>", settings.labels().no_images);
    }
    files
        .iter()
        .map(|file| {
            format!(
                "<img src=\"{}\" alt=\"\" loading=\"lazy\">",
                escape_html(image_url(&settings.base_url, job_id.as_str(), file).as_str())
            )
        })
        .collect()
}

pub fn render_modal_error(labels: &Labels, message: &str) -> String {
    format!(
        "<p class=\"error\">{}</p>",
        escape_html(&labels.images_load_failed(message))
    )
}

pub fn render_inline_error(message: &str) -> String {
    format!("<span class=\"error\">{}</span>", escape_html(message))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_covers_markup_characters() {
        assert_eq!(
            escape_html("<script>a & \"b\"</script>"),
            "&lt;script&gt;a &amp; &quot;b&quot;&lt;/script&gt;"
        );
    }

    #[test]
    fn summary_takes_the_trimmed_first_line() {
        assert_eq!(error_summary("  boom  \ntrace line"), "boom");
    }

    #[test]
    fn summary_counts_characters_not_bytes() {
        let error = "가".repeat(130);
        let summary = error_summary(&error);
        assert_eq!(summary.chars().count(), ERROR_SUMMARY_CHARS + 1);
        assert!(summary.ends_with('…'));
    }

    #[test]
    fn short_first_line_of_a_long_error_still_gets_an_ellipsis() {
        let error = format!("short\n{}", "x".repeat(200));
        assert_eq!(error_summary(&error), "short…");
    }

    #[test]
    fn unknown_statuses_share_the_failed_class() {
        assert_eq!(status_class(&JobStatus::Other("queued".into())), "failed");
        assert_eq!(status_class(&JobStatus::Cancelled), "cancelled");
    }
}
