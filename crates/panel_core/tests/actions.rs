use std::sync::Once;

use panel_core::{
    classify, update, Action, AppState, DetailPurpose, Effect, ElementInfo, Job, JobId, JobPage,
    JobStatus, Msg, PanelSettings, RequestFailure,
};
use url::Url;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(panel_logging::initialize_for_tests);
}

fn id(raw: &str) -> JobId {
    JobId::new(raw)
}

fn failed_job(raw: &str) -> Job {
    Job {
        id: id(raw),
        query: "dogs".to_string(),
        limit: 5,
        out_dir: "out".to_string(),
        status: JobStatus::Failed,
        error: Some("network down\nstack".to_string()),
        ..Job::default()
    }
}

/// State showing one page with the given jobs.
fn showing(jobs: Vec<Job>) -> AppState {
    let state = AppState::new(PanelSettings::new(Url::parse("http://panel.test/").unwrap()));
    let total = jobs.len() as u64;
    let (state, _) = update(
        state,
        Msg::PageLoaded {
            retried: false,
            result: Ok(JobPage {
                jobs,
                total,
                page: 1,
            }),
        },
        0,
    );
    state
}

fn click(state: AppState, element: ElementInfo, now: i64) -> (AppState, Vec<Effect>) {
    let action = classify(&element).expect("element maps to an action");
    update(state, Msg::Action(action), now)
}

fn refetch() -> Effect {
    Effect::FetchPage {
        page: 1,
        per_page: 10,
        retried: false,
    }
}

#[test]
fn cancel_disables_then_restores_and_resyncs() {
    init_logging();
    let running = Job {
        status: JobStatus::Running,
        ..failed_job("r1")
    };
    let state = showing(vec![running]);
    let (state, effects) = click(state, ElementInfo::with_classes(&["btn-cancel"]).job(&id("r1")), 0);
    assert_eq!(effects, vec![Effect::CancelJob { job_id: id("r1") }]);
    let html = state.view().list_html;
    assert!(html.contains("data-job-id=\"r1\" disabled>Cancelling...</button>"), "{html}");

    let (state, effects) = update(
        state,
        Msg::CancelFinished {
            job_id: id("r1"),
            result: Err("connection reset".to_string()),
        },
        10,
    );
    assert_eq!(
        effects,
        vec![
            refetch(),
            Effect::Alert {
                message: "Cancel failed: connection reset".to_string()
            }
        ]
    );
    assert!(state
        .view()
        .list_html
        .contains("data-job-id=\"r1\">Cancel</button>"));

    // A successful cancel only resynchronizes.
    let (state, _) = click(state, ElementInfo::with_classes(&["btn-cancel"]).job(&id("r1")), 20);
    let (_, effects) = update(
        state,
        Msg::CancelFinished {
            job_id: id("r1"),
            result: Ok(()),
        },
        30,
    );
    assert_eq!(effects, vec![refetch()]);
}

#[test]
fn blank_failure_messages_fall_back_to_unknown_error() {
    init_logging();
    let (_, effects) = update(
        showing(vec![failed_job("d2")]),
        Msg::ClearFinished {
            result: Err("  ".to_string()),
        },
        0,
    );
    assert_eq!(
        effects,
        vec![Effect::Alert {
            message: "Delete failed: unknown error".to_string()
        }]
    );
}

#[test]
fn delete_requires_confirmation() {
    init_logging();
    let state = showing(vec![failed_job("d1")]);
    let delete = ElementInfo::with_classes(&["btn-delete", "btn-sm"]).job(&id("d1"));

    let (state, effects) = click(state, delete.clone(), 0);
    assert!(effects.is_empty());
    assert!(state.view().confirmation.unwrap().contains("not deleted"));

    let (state, effects) = update(state, Msg::ConfirmationAnswered { accepted: false }, 0);
    assert!(effects.is_empty());
    assert!(state.view().confirmation.is_none());

    let (state, _) = click(state, delete, 0);
    let (state, effects) = update(state, Msg::ConfirmationAnswered { accepted: true }, 0);
    assert_eq!(effects, vec![Effect::DeleteJob { job_id: id("d1") }]);
    assert!(state.view().list_html.contains("data-job-id=\"d1\" title=\"Removes the history entry only\" disabled>"));

    let (_state, effects) = update(
        state,
        Msg::DeleteFinished {
            job_id: id("d1"),
            result: Ok(()),
        },
        0,
    );
    assert_eq!(effects, vec![refetch()]);
}

#[test]
fn failed_delete_alerts_and_reenables() {
    init_logging();
    let state = showing(vec![failed_job("d2")]);
    let (state, _) = click(state, ElementInfo::with_classes(&["btn-delete", "btn-sm"]).job(&id("d2")), 0);
    let (state, _) = update(state, Msg::ConfirmationAnswered { accepted: true }, 0);
    let (state, effects) = update(
        state,
        Msg::DeleteFinished {
            job_id: id("d2"),
            result: Err("Job not found".to_string()),
        },
        0,
    );
    assert_eq!(
        effects,
        vec![Effect::Alert {
            message: "Delete failed: Job not found".to_string()
        }]
    );
    assert!(!state.view().list_html.contains(" disabled>"));
}

#[test]
fn copy_feedback_reverts_after_two_seconds() {
    init_logging();
    let state = showing(vec![failed_job("c1")]);
    let (state, effects) = click(state, ElementInfo::with_classes(&["btn-copy"]).job(&id("c1")), 0);
    assert_eq!(
        effects,
        vec![Effect::FetchJob {
            job_id: id("c1"),
            purpose: DetailPurpose::CopyError
        }]
    );

    let (state, effects) = update(
        state,
        Msg::JobLoaded {
            job_id: id("c1"),
            purpose: DetailPurpose::CopyError,
            result: Ok(failed_job("c1")),
        },
        100,
    );
    assert_eq!(
        effects,
        vec![Effect::WriteClipboard {
            job_id: id("c1"),
            text: "network down\nstack".to_string()
        }]
    );

    let (state, _) = update(
        state,
        Msg::ClipboardWritten {
            job_id: id("c1"),
            result: Ok(()),
        },
        200,
    );
    assert!(state.view().list_html.contains("class=\"btn-copy copied\" data-job-id=\"c1\">Copied</button>"));
    assert_eq!(state.next_deadline(), Some(2_200));

    let (state, _) = update(state, Msg::Tick, 2_199);
    assert!(state.view().list_html.contains(">Copied</button>"));
    let (state, _) = update(state, Msg::Tick, 2_200);
    assert!(state.view().list_html.contains("class=\"btn-copy\" data-job-id=\"c1\">Copy</button>"));
}

#[test]
fn clipboard_failure_shows_failed_then_reverts() {
    init_logging();
    let state = showing(vec![failed_job("c2")]);
    let (state, _) = update(
        state,
        Msg::ClipboardWritten {
            job_id: id("c2"),
            result: Err("no clipboard".to_string()),
        },
        0,
    );
    assert!(state.view().list_html.contains("data-job-id=\"c2\">Failed</button>"));
    let (state, _) = update(state, Msg::Tick, 2_000);
    assert!(state.view().list_html.contains("data-job-id=\"c2\">Copy</button>"));

    // A failed detail fetch ends the same way.
    let (state, _) = update(
        state,
        Msg::JobLoaded {
            job_id: id("c2"),
            purpose: DetailPurpose::CopyError,
            result: Err(RequestFailure::new("timeout")),
        },
        3_000,
    );
    assert!(state.view().list_html.contains("data-job-id=\"c2\">Failed</button>"));
}

#[test]
fn toggle_is_local_and_survives_refresh() {
    init_logging();
    let state = showing(vec![failed_job("t1")]);
    let toggle = ElementInfo::with_classes(&["btn-error-toggle"]).job(&id("t1"));
    let (state, effects) = click(state, toggle.clone(), 0);
    assert!(effects.is_empty());
    let html = state.view().list_html;
    assert!(html.contains("<div class=\"error-wrap expanded\">"));
    assert!(html.contains(">Hide</button>"));

    // A ticker refresh re-renders the same job.
    let (state, _) = update(
        state,
        Msg::PageLoaded {
            retried: false,
            result: Ok(JobPage {
                jobs: vec![failed_job("t1")],
                total: 1,
                page: 1,
            }),
        },
        1_000,
    );
    assert!(state.is_error_expanded(&id("t1")));

    let (state, _) = click(state, toggle, 0);
    let html = state.view().list_html;
    assert!(html.contains("<div class=\"error-wrap\">"));
    assert!(html.contains(">Error details</button>"));
}

#[test]
fn view_images_fills_the_modal() {
    init_logging();
    let state = showing(Vec::new());
    let (state, effects) = click(state, ElementInfo::with_classes(&["btn-sm"]).job(&id("v1")), 0);
    assert_eq!(
        effects,
        vec![Effect::FetchJob {
            job_id: id("v1"),
            purpose: DetailPurpose::Modal
        }]
    );
    assert_eq!(state.view().modal.unwrap().body_html, "Loading...");

    let detail = Job {
        id: id("v1"),
        query: "birds".to_string(),
        status: JobStatus::Done,
        count: Some(2),
        ..Job::default()
    };
    let (state, effects) = update(
        state,
        Msg::JobLoaded {
            job_id: id("v1"),
            purpose: DetailPurpose::Modal,
            result: Ok(detail),
        },
        0,
    );
    assert_eq!(effects, vec![Effect::FetchImages { job_id: id("v1") }]);
    assert_eq!(state.view().modal.unwrap().title, "Collected images: birds (2 images)");

    let (state, _) = update(
        state,
        Msg::ImagesLoaded {
            job_id: id("v1"),
            result: Ok(vec!["a 1.jpg".to_string(), "b.png".to_string()]),
        },
        0,
    );
    let body = state.view().modal.unwrap().body_html;
    assert_eq!(
        body,
        "<img src=\"http://panel.test/api/jobs/v1/images/a%201.jpg\" alt=\"\" loading=\"lazy\"><img src=\"http://panel.test/api/jobs/v1/images/b.png\" alt=\"\" loading=\"lazy\">"
    );
}

#[test]
fn modal_errors_stay_inline_and_stale_results_are_ignored() {
    init_logging();
    let state = showing(Vec::new());
    let (state, _) = click(state, ElementInfo::with_classes(&["btn-sm"]).job(&id("v2")), 0);
    let (state, _) = update(
        state,
        Msg::ImagesLoaded {
            job_id: id("v2"),
            result: Ok(Vec::new()),
        },
        0,
    );
    assert_eq!(
        state.view().modal.unwrap().body_html,
        "<p class=\"empty\">No images</p>"
    );

    let (state, _) = update(
        state,
        Msg::ImagesLoaded {
            job_id: id("v2"),
            result: Err("Job or folder not found".to_string()),
        },
        0,
    );
    assert_eq!(
        state.view().modal.unwrap().body_html,
        "<p class=\"error\">Failed to load: Job or folder not found</p>"
    );

    let (state, _) = click(state, ElementInfo::with_id("modalClose"), 0);
    assert!(state.view().modal.is_none());
    let (state, effects) = update(
        state,
        Msg::ImagesLoaded {
            job_id: id("v2"),
            result: Ok(vec!["late.jpg".to_string()]),
        },
        0,
    );
    assert!(effects.is_empty());
    assert!(state.view().modal.is_none());
}

#[test]
fn clear_history_confirms_then_resyncs_or_alerts() {
    init_logging();
    let state = showing(vec![failed_job("h1")]);
    let (state, _) = update(state, Msg::Action(Action::ClearHistory), 0);
    assert!(state.view().confirmation.is_some());
    let (state, effects) = update(state, Msg::ConfirmationAnswered { accepted: true }, 0);
    assert_eq!(effects, vec![Effect::ClearHistory]);

    let (state, effects) = update(state, Msg::ClearFinished { result: Ok(()) }, 0);
    assert_eq!(effects, vec![refetch()]);
    let (_state, effects) = update(
        state,
        Msg::ClearFinished {
            result: Err("disk full".to_string()),
        },
        0,
    );
    assert!(matches!(&effects[..], [Effect::Alert { message }] if message.contains("disk full")));
}
