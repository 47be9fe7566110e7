use std::fmt;

use crate::{Action, DetailPurpose, Job, JobId, JobPage};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Resynchronize the list; `None` keeps the current page.
    Refresh { page: Option<u32> },
    /// The list endpoint answered.
    PageLoaded {
        retried: bool,
        result: Result<JobPage, String>,
    },
    /// The clock advanced; due timers fire.
    Tick,
    /// User interacted with a classified control.
    Action(Action),
    /// User answered the pending confirmation prompt.
    ConfirmationAnswered { accepted: bool },
    CancelFinished {
        job_id: JobId,
        result: Result<(), String>,
    },
    DeleteFinished {
        job_id: JobId,
        result: Result<(), String>,
    },
    ClearFinished { result: Result<(), String> },
    JobLoaded {
        job_id: JobId,
        purpose: DetailPurpose,
        result: Result<Job, RequestFailure>,
    },
    ImagesLoaded {
        job_id: JobId,
        result: Result<Vec<String>, String>,
    },
    ClipboardWritten {
        job_id: JobId,
        result: Result<(), String>,
    },
    /// Launch form submitted with raw field values.
    LaunchSubmitted {
        query: String,
        limit: String,
        out_dir: String,
    },
    LaunchFinished { result: Result<JobId, String> },
}

/// A failed job request, keeping the HTTP status when the server answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestFailure {
    pub status: Option<u16>,
    pub message: String,
}

impl RequestFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: None,
            message: message.into(),
        }
    }

    pub fn with_status(status: u16, message: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            message: message.into(),
        }
    }

    /// The job no longer exists on the server.
    pub fn is_not_found(&self) -> bool {
        self.status == Some(404)
    }
}

impl fmt::Display for RequestFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}
