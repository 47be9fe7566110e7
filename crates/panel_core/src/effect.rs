use crate::{JobId, LaunchRequest};

/// Side effects requested by [`crate::update`]; executed by the runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    FetchPage {
        page: u32,
        per_page: u32,
        /// Set on the single fallback fetch of page 1.
        retried: bool,
    },
    FetchJob { job_id: JobId, purpose: DetailPurpose },
    FetchImages { job_id: JobId },
    CancelJob { job_id: JobId },
    DeleteJob { job_id: JobId },
    ClearHistory,
    Launch { request: LaunchRequest },
    WriteClipboard { job_id: JobId, text: String },
    /// Blocking notice for the user.
    Alert { message: String },
}

/// Why a single job was fetched; routes the response back to its consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailPurpose {
    Modal,
    CopyError,
    Poll,
}
