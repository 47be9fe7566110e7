//! Panel core: pure job-list state machine, renderer and view-model helpers.
mod action;
mod controls;
mod effect;
mod job;
mod labels;
mod launcher;
mod msg;
pub mod render;
mod settings;
mod state;
mod timer;
mod update;
mod view_model;

pub use action::{classify, Action, ElementInfo, CLEAR_HISTORY_ID, MODAL_CLOSE_ID};
pub use controls::{ControlRole, ControlState, Controls, Feedback};
pub use effect::{DetailPurpose, Effect};
pub use job::{
    elapsed_secs_since, parse_timestamp, total_pages, EpochMillis, ImageList, Job, JobId, JobPage,
    JobStatus, LaunchRequest, LaunchResponse,
};
pub use labels::{Labels, Locale};
pub use launcher::{parse_launch_form, JobPoller, LauncherState};
pub use msg::{Msg, RequestFailure};
pub use settings::{
    endpoint, image_url, log_url, PanelSettings, DEFAULT_FEEDBACK_MS, DEFAULT_LIMIT,
    DEFAULT_OUT_DIR, DEFAULT_PER_PAGE, DEFAULT_POLL_PERIOD_MS, DEFAULT_TICKER_PERIOD_MS,
};
pub use state::{AppState, ListRegion, ModalState, PendingConfirmation, ViewState};
pub use timer::Ticker;
pub use update::update;
pub use view_model::{ModalView, PanelViewModel};
