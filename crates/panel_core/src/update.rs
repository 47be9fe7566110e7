use crate::controls::{ControlRole, Feedback};
use crate::launcher::{
    parse_launch_form, render_launch_error, render_progress, render_terminal_summary, JobPoller,
};
use crate::render::{escape_html, render_image_grid, render_loading, render_modal_error};
use crate::state::{ListRegion, ModalState, PendingConfirmation};
use crate::{
    Action, AppState, DetailPurpose, Effect, EpochMillis, Job, JobId, JobPage, Labels, Msg,
    RequestFailure,
};

/// Pure update function: applies a message to state at `now` and returns any effects.
pub fn update(mut state: AppState, msg: Msg, now: EpochMillis) -> (AppState, Vec<Effect>) {
    state.now = now;
    let effects = match msg {
        Msg::Refresh { page } => refresh(&mut state, page),
        Msg::PageLoaded { retried, result } => page_loaded(&mut state, retried, result),
        Msg::Tick => tick(&mut state),
        Msg::Action(action) => dispatch(&mut state, action),
        Msg::ConfirmationAnswered { accepted } => confirmation_answered(&mut state, accepted),
        Msg::CancelFinished { job_id, result } => {
            // The list is resynchronized whatever the outcome.
            state.controls.restore(ControlRole::Cancel, &job_id);
            state.mark_dirty();
            let mut effects = refresh(&mut state, None);
            if let Err(message) = result {
                let labels = state.settings.labels();
                effects.push(Effect::Alert {
                    message: labels.cancel_failed(failure_text(labels, &message)),
                });
            }
            effects
        }
        Msg::DeleteFinished { job_id, result } => {
            state.controls.restore(ControlRole::Delete, &job_id);
            state.mark_dirty();
            match result {
                Ok(()) => refresh(&mut state, None),
                Err(message) => {
                    let labels = state.settings.labels();
                    vec![Effect::Alert {
                        message: labels.delete_failed(failure_text(labels, &message)),
                    }]
                }
            }
        }
        Msg::ClearFinished { result } => match result {
            Ok(()) => refresh(&mut state, None),
            Err(message) => {
                let labels = state.settings.labels();
                vec![Effect::Alert {
                    message: labels.delete_failed(failure_text(labels, &message)),
                }]
            }
        },
        Msg::JobLoaded {
            job_id,
            purpose,
            result,
        } => job_loaded(&mut state, job_id, purpose, result),
        Msg::ImagesLoaded { job_id, result } => {
            images_loaded(&mut state, &job_id, result);
            Vec::new()
        }
        Msg::ClipboardWritten { job_id, result } => {
            let feedback = match result {
                Ok(()) => Feedback::Copied,
                Err(_) => Feedback::CopyFailed,
            };
            flash_copy(&mut state, &job_id, feedback);
            Vec::new()
        }
        Msg::LaunchSubmitted {
            query,
            limit,
            out_dir,
        } => launch_submitted(&mut state, &query, &limit, &out_dir),
        Msg::LaunchFinished { result } => launch_finished(&mut state, result),
    };

    (state, effects)
}

fn failure_text<'a>(labels: &'a Labels, message: &'a str) -> &'a str {
    if message.trim().is_empty() {
        labels.unknown_error
    } else {
        message
    }
}

fn refresh(state: &mut AppState, page: Option<u32>) -> Vec<Effect> {
    if let Some(page) = page {
        state.view.current_page = page.max(1);
    }
    vec![Effect::FetchPage {
        page: state.view.current_page,
        per_page: state.settings.per_page,
        retried: false,
    }]
}

fn page_loaded(state: &mut AppState, retried: bool, result: Result<JobPage, String>) -> Vec<Effect> {
    let page = match result {
        Ok(page) => page,
        Err(message) => {
            state.view.list = ListRegion::Error(message);
            state.view.ticker.stop();
            state.mark_dirty();
            return Vec::new();
        }
    };

    // Deletions can leave the current page past the end; fall back to page 1 once.
    if page.total > 0 && page.jobs.is_empty() && page.page > 1 && !retried {
        state.view.current_page = 1;
        return vec![Effect::FetchPage {
            page: 1,
            per_page: state.settings.per_page,
            retried: true,
        }];
    }

    state.mark_dirty();
    if page.total == 0 {
        state.view.list = ListRegion::Empty;
        state.view.ticker.stop();
        state.expanded.clear();
        return Vec::new();
    }

    if page.has_running() {
        state.view.ticker.start(state.now);
    } else {
        state.view.ticker.stop();
    }
    state
        .expanded
        .retain(|job_id| page.jobs.iter().any(|job| &job.id == job_id));
    state.view.list = ListRegion::Table(page);
    Vec::new()
}

fn tick(state: &mut AppState) -> Vec<Effect> {
    let now = state.now;
    let mut effects = Vec::new();
    if state.view.ticker.fire(now) {
        effects.extend(refresh(state, None));
    }
    if let Some(poller) = state.launcher.poller.as_mut() {
        if poller.timer.fire(now) {
            effects.push(Effect::FetchJob {
                job_id: poller.job_id.clone(),
                purpose: DetailPurpose::Poll,
            });
        }
    }
    if state.controls.expire(now) {
        state.mark_dirty();
    }
    effects
}

fn dispatch(state: &mut AppState, action: Action) -> Vec<Effect> {
    match action {
        Action::Cancel(job_id) => {
            state
                .controls
                .begin(ControlRole::Cancel, &job_id, Some(Feedback::Cancelling));
            state.mark_dirty();
            vec![Effect::CancelJob { job_id }]
        }
        Action::Delete(job_id) => {
            state.confirmation = Some(PendingConfirmation::Delete(job_id));
            state.mark_dirty();
            Vec::new()
        }
        Action::ClearHistory => {
            state.confirmation = Some(PendingConfirmation::ClearHistory);
            state.mark_dirty();
            Vec::new()
        }
        Action::ViewImages(job_id) => {
            let labels = state.settings.labels();
            state.modal = Some(ModalState {
                job_id: job_id.clone(),
                title: labels.images_title.to_string(),
                body: render_loading(labels),
            });
            state.mark_dirty();
            vec![Effect::FetchJob {
                job_id,
                purpose: DetailPurpose::Modal,
            }]
        }
        Action::CloseModal => {
            if state.modal.take().is_some() {
                state.mark_dirty();
            }
            Vec::new()
        }
        Action::CopyError(job_id) => vec![Effect::FetchJob {
            job_id,
            purpose: DetailPurpose::CopyError,
        }],
        Action::ToggleError(job_id) => {
            if !state.expanded.remove(&job_id) {
                state.expanded.insert(job_id);
            }
            state.mark_dirty();
            Vec::new()
        }
        Action::Paginate(page) => refresh(state, Some(page)),
    }
}

fn confirmation_answered(state: &mut AppState, accepted: bool) -> Vec<Effect> {
    let Some(pending) = state.confirmation.take() else {
        return Vec::new();
    };
    state.mark_dirty();
    if !accepted {
        return Vec::new();
    }
    match pending {
        PendingConfirmation::Delete(job_id) => {
            state.controls.begin(ControlRole::Delete, &job_id, None);
            vec![Effect::DeleteJob { job_id }]
        }
        PendingConfirmation::ClearHistory => vec![Effect::ClearHistory],
    }
}

fn job_loaded(
    state: &mut AppState,
    job_id: JobId,
    purpose: DetailPurpose,
    result: Result<Job, RequestFailure>,
) -> Vec<Effect> {
    match purpose {
        DetailPurpose::Modal => {
            let labels = state.settings.labels();
            let Some(modal) = state.modal.as_mut().filter(|modal| modal.job_id == job_id) else {
                return Vec::new();
            };
            let effects = match result {
                Ok(job) => {
                    modal.title = labels.modal_title(&job.query, job.count.unwrap_or(0));
                    vec![Effect::FetchImages { job_id }]
                }
                Err(failure) => {
                    modal.body = render_modal_error(labels, &failure.message);
                    Vec::new()
                }
            };
            state.mark_dirty();
            effects
        }
        DetailPurpose::CopyError => match result {
            Ok(job) => vec![Effect::WriteClipboard {
                job_id,
                text: job.error.unwrap_or_default(),
            }],
            Err(_) => {
                flash_copy(state, &job_id, Feedback::CopyFailed);
                Vec::new()
            }
        },
        DetailPurpose::Poll => poll_result(state, job_id, result),
    }
}

fn images_loaded(state: &mut AppState, job_id: &JobId, result: Result<Vec<String>, String>) {
    let Some(modal) = state.modal.as_mut().filter(|modal| &modal.job_id == job_id) else {
        return;
    };
    modal.body = match result {
        Ok(files) => render_image_grid(&state.settings, job_id, &files),
        Err(message) => render_modal_error(state.settings.labels(), &message),
    };
    state.mark_dirty();
}

fn flash_copy(state: &mut AppState, job_id: &JobId, feedback: Feedback) {
    let revert_at = state.now + state.settings.feedback_ms;
    state
        .controls
        .flash(ControlRole::Copy, job_id, feedback, revert_at);
    state.mark_dirty();
}

fn launch_submitted(state: &mut AppState, query: &str, limit: &str, out_dir: &str) -> Vec<Effect> {
    if !state.launcher.button_enabled {
        return Vec::new();
    }
    let labels = state.settings.labels();
    state.mark_dirty();
    let Some(request) = parse_launch_form(query, limit, out_dir, &state.settings) else {
        state.launcher.result = Some(render_launch_error(labels.query_required));
        return Vec::new();
    };
    state.launcher.button_enabled = false;
    state.launcher.result = Some(labels.starting.to_string());
    vec![Effect::Launch { request }]
}

fn launch_finished(state: &mut AppState, result: Result<JobId, String>) -> Vec<Effect> {
    let labels = state.settings.labels();
    state.mark_dirty();
    match result {
        Ok(job_id) => {
            state.launcher.result = Some(labels.run_started(&escape_html(job_id.as_str())));
            state.launcher.poller = Some(JobPoller::start(
                job_id,
                state.now,
                state.settings.poll_period_ms,
            ));
            refresh(state, None)
        }
        Err(message) => {
            state.launcher.result = Some(render_launch_error(&message));
            state.launcher.button_enabled = true;
            Vec::new()
        }
    }
}

fn poll_result(
    state: &mut AppState,
    job_id: JobId,
    result: Result<Job, RequestFailure>,
) -> Vec<Effect> {
    let Some(launched_at) = state
        .launcher
        .poller
        .as_ref()
        .filter(|poller| poller.job_id == job_id)
        .map(|poller| poller.launched_at)
    else {
        return Vec::new();
    };
    let labels = state.settings.labels();
    let job = match result {
        Ok(job) => job,
        // The job was removed while running; polling can never succeed again.
        Err(failure) if failure.is_not_found() => {
            state.launcher.poller = None;
            state.launcher.button_enabled = true;
            state.launcher.result = Some(render_launch_error(
                &labels.run_failed(failure_text(labels, &failure.message)),
            ));
            state.mark_dirty();
            return refresh(state, None);
        }
        // Other failures leave the poller running; the next period retries.
        Err(_) => return Vec::new(),
    };

    state.mark_dirty();
    if job.status.is_running() {
        state.launcher.result = Some(render_progress(
            labels,
            &job_id,
            launched_at,
            state.now,
        ));
        return Vec::new();
    }

    state.launcher.poller = None;
    state.launcher.button_enabled = true;
    state.launcher.result = Some(render_terminal_summary(labels, &job));
    refresh(state, None)
}
