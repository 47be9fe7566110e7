//! Panel engine: job API client, clock and the effect-executing runtime loop.
mod api;
mod clock;
mod error;
mod runtime;

pub use api::{decode_body, ApiSettings, HttpJobApi, JobApi};
pub use clock::Clock;
pub use error::{ApiError, ClipboardError};
pub use runtime::{Host, PanelHandle, PanelRuntime};
