use std::collections::BTreeSet;

use crate::controls::Controls;
use crate::launcher::LauncherState;
use crate::render::{
    render_empty_history, render_job_table, render_list_error, render_loading, RenderContext,
};
use crate::settings::PanelSettings;
use crate::timer::Ticker;
use crate::view_model::{ModalView, PanelViewModel};
use crate::{EpochMillis, JobId, JobPage};

/// What the list region currently shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListRegion {
    Loading,
    Empty,
    /// The last page the server returned; re-rendered whole on every view.
    Table(JobPage),
    Error(String),
}

/// The list synchronizer's state: which page is shown and the shared ticker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub current_page: u32,
    pub ticker: Ticker,
    pub list: ListRegion,
}

impl ViewState {
    pub fn new(ticker_period_ms: i64) -> Self {
        Self {
            current_page: 1,
            ticker: Ticker::new(ticker_period_ms),
            list: ListRegion::Loading,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalState {
    pub job_id: JobId,
    pub title: String,
    pub body: String,
}

/// A destructive action waiting for the user's yes/no.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingConfirmation {
    Delete(JobId),
    ClearHistory,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    pub(crate) settings: PanelSettings,
    pub(crate) view: ViewState,
    pub(crate) controls: Controls,
    pub(crate) expanded: BTreeSet<JobId>,
    pub(crate) modal: Option<ModalState>,
    pub(crate) launcher: LauncherState,
    pub(crate) confirmation: Option<PendingConfirmation>,
    pub(crate) now: EpochMillis,
    dirty: bool,
}

impl AppState {
    pub fn new(settings: PanelSettings) -> Self {
        let view = ViewState::new(settings.ticker_period_ms);
        Self {
            settings,
            view,
            controls: Controls::default(),
            expanded: BTreeSet::new(),
            modal: None,
            launcher: LauncherState::default(),
            confirmation: None,
            now: 0,
            dirty: true,
        }
    }

    pub fn settings(&self) -> &PanelSettings {
        &self.settings
    }

    pub fn view_state(&self) -> &ViewState {
        &self.view
    }

    pub fn launcher(&self) -> &LauncherState {
        &self.launcher
    }

    pub fn confirmation(&self) -> Option<&PendingConfirmation> {
        self.confirmation.as_ref()
    }

    pub fn is_error_expanded(&self, job_id: &JobId) -> bool {
        self.expanded.contains(job_id)
    }

    /// Earliest instant at which a timer wants a [`crate::Msg::Tick`].
    pub fn next_deadline(&self) -> Option<EpochMillis> {
        [
            self.view.ticker.next_due(),
            self.launcher
                .poller
                .as_ref()
                .and_then(|poller| poller.timer.next_due()),
            self.controls.next_deadline(),
        ]
        .into_iter()
        .flatten()
        .min()
    }

    /// Builds the full view model. Every region is rendered from scratch.
    pub fn view(&self) -> PanelViewModel {
        let labels = self.settings.labels();
        let ctx = RenderContext {
            now: self.now,
            settings: &self.settings,
            controls: &self.controls,
            expanded: &self.expanded,
        };
        let list_html = match &self.view.list {
            ListRegion::Loading => render_loading(labels),
            ListRegion::Empty => render_empty_history(labels),
            ListRegion::Table(page) => render_job_table(page, &ctx),
            ListRegion::Error(message) => render_list_error(labels, message),
        };
        let confirmation = self.confirmation.as_ref().map(|pending| match pending {
            PendingConfirmation::Delete(_) => labels.confirm_delete.to_string(),
            PendingConfirmation::ClearHistory => labels.confirm_clear.to_string(),
        });

        PanelViewModel {
            list_html,
            current_page: self.view.current_page,
            ticker_active: self.view.ticker.is_active(),
            run_button_enabled: self.launcher.button_enabled,
            run_result_html: self.launcher.result.clone(),
            modal: self.modal.as_ref().map(|modal| ModalView {
                title: modal.title.clone(),
                body_html: modal.body.clone(),
            }),
            confirmation,
        }
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Returns whether a render is pending and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}
