use std::future::Future;
use std::sync::Arc;

use panel_core::{
    classify, update, AppState, Effect, ElementInfo, Msg, PanelSettings, PanelViewModel,
    RequestFailure,
};
use panel_logging::{panel_debug, panel_info, panel_warn};
use tokio::sync::mpsc;
use tokio::time::Instant;

use crate::{ClipboardError, Clock, JobApi};

/// The display side of the panel: shows view models and performs user-facing effects.
pub trait Host: Send {
    /// Replaces every region with the content of `view`.
    fn render(&mut self, view: &PanelViewModel);
    /// Blocking notice.
    fn alert(&mut self, message: &str);
    fn write_clipboard(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// Sends user input into a running [`PanelRuntime`].
#[derive(Debug, Clone)]
pub struct PanelHandle {
    tx: mpsc::UnboundedSender<Msg>,
}

impl PanelHandle {
    /// Returns `false` once the runtime has stopped.
    pub fn send(&self, msg: Msg) -> bool {
        self.tx.send(msg).is_ok()
    }

    /// Routes an interaction through [`classify`]. Unrecognized elements are ignored.
    pub fn click(&self, element: &ElementInfo) -> bool {
        match classify(element) {
            Some(action) => self.send(Msg::Action(action)),
            None => {
                panel_debug!("Ignoring interaction with {:?}", element);
                true
            }
        }
    }

    pub fn refresh(&self) -> bool {
        self.send(Msg::Refresh { page: None })
    }

    pub fn answer(&self, accepted: bool) -> bool {
        self.send(Msg::ConfirmationAnswered { accepted })
    }

    pub fn launch(&self, query: &str, limit: &str, out_dir: &str) -> bool {
        self.send(Msg::LaunchSubmitted {
            query: query.to_string(),
            limit: limit.to_string(),
            out_dir: out_dir.to_string(),
        })
    }
}

/// Single event loop applying messages to the panel state one at a time.
///
/// Network effects run as spawned tasks and report back through a channel, so
/// several requests may be in flight at once. Whichever resolves last overwrites
/// the display; the next tick corrects any staleness.
pub struct PanelRuntime<H: Host> {
    state: AppState,
    runner: EffectRunner<H>,
    input_rx: mpsc::UnboundedReceiver<Msg>,
    result_rx: mpsc::UnboundedReceiver<Msg>,
}

impl<H: Host> PanelRuntime<H> {
    pub fn new(settings: PanelSettings, api: Arc<dyn JobApi>, host: H) -> (Self, PanelHandle) {
        let (input_tx, input_rx) = mpsc::unbounded_channel();
        let (result_tx, result_rx) = mpsc::unbounded_channel();
        let runtime = Self {
            state: AppState::new(settings),
            runner: EffectRunner {
                api,
                host,
                clock: Clock::system(),
                result_tx,
            },
            input_rx,
            result_rx,
        };
        (runtime, PanelHandle { tx: input_tx })
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.runner.clock = clock;
        self
    }

    /// Runs until every [`PanelHandle`] is dropped, then returns the host.
    pub async fn run(self) -> H {
        let PanelRuntime {
            mut state,
            mut runner,
            mut input_rx,
            mut result_rx,
        } = self;

        panel_info!("Panel runtime started");
        state = runner.apply(state, Msg::Refresh { page: None });
        loop {
            let wake = state
                .next_deadline()
                .map(|deadline| runner.clock.instant_at(deadline));
            let msg = tokio::select! {
                input = input_rx.recv() => match input {
                    Some(msg) => msg,
                    None => break,
                },
                Some(result) = result_rx.recv() => result,
                () = sleep_until(wake) => Msg::Tick,
            };
            state = runner.apply(state, msg);
        }
        panel_info!("Panel runtime stopped");
        runner.host
    }
}

async fn sleep_until(wake: Option<Instant>) {
    match wake {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

struct EffectRunner<H: Host> {
    api: Arc<dyn JobApi>,
    host: H,
    clock: Clock,
    result_tx: mpsc::UnboundedSender<Msg>,
}

impl<H: Host> EffectRunner<H> {
    fn apply(&mut self, state: AppState, msg: Msg) -> AppState {
        let ticker_was_active = state.view_state().ticker.is_active();
        let (mut state, effects) = update(state, msg, self.clock.now_millis());

        match (ticker_was_active, state.view_state().ticker.is_active()) {
            (false, true) => panel_debug!("Ticker started"),
            (true, false) => panel_debug!("Ticker stopped"),
            _ => {}
        }

        for effect in effects {
            self.execute(effect);
        }

        if state.consume_dirty() {
            self.host.render(&state.view());
        }
        state
    }

    fn execute(&mut self, effect: Effect) {
        panel_debug!("Effect {:?}", effect);
        match effect {
            Effect::FetchPage {
                page,
                per_page,
                retried,
            } => self.spawn(move |api| async move {
                Msg::PageLoaded {
                    retried,
                    result: api
                        .list_jobs(page, per_page)
                        .await
                        .map_err(|err| err.to_string()),
                }
            }),
            Effect::FetchJob { job_id, purpose } => self.spawn(move |api| async move {
                let result = api.get_job(&job_id).await.map_err(RequestFailure::from);
                Msg::JobLoaded {
                    job_id,
                    purpose,
                    result,
                }
            }),
            Effect::FetchImages { job_id } => self.spawn(move |api| async move {
                let result = api
                    .list_images(&job_id)
                    .await
                    .map(|list| list.files)
                    .map_err(|err| err.to_string());
                Msg::ImagesLoaded { job_id, result }
            }),
            Effect::CancelJob { job_id } => self.spawn(move |api| async move {
                let result = api.cancel(&job_id).await.map_err(|err| {
                    panel_warn!("Cancel of job {} failed: {}", job_id, err);
                    err.to_string()
                });
                Msg::CancelFinished { job_id, result }
            }),
            Effect::DeleteJob { job_id } => self.spawn(move |api| async move {
                let result = api.delete(&job_id).await.map_err(|err| err.to_string());
                Msg::DeleteFinished { job_id, result }
            }),
            Effect::ClearHistory => self.spawn(move |api| async move {
                Msg::ClearFinished {
                    result: api.clear().await.map_err(|err| err.to_string()),
                }
            }),
            Effect::Launch { request } => self.spawn(move |api| async move {
                let result = api
                    .launch(&request)
                    .await
                    .map(|response| {
                        panel_info!("Launched job {} for '{}'", response.job_id, request.query);
                        response.job_id
                    })
                    .map_err(|err| err.to_string());
                Msg::LaunchFinished { result }
            }),
            Effect::WriteClipboard { job_id, text } => {
                let result = self.host.write_clipboard(&text).map_err(|err| {
                    panel_warn!("Copying error of job {} failed: {}", job_id, err);
                    err.to_string()
                });
                let _ = self.result_tx.send(Msg::ClipboardWritten { job_id, result });
            }
            Effect::Alert { message } => self.host.alert(&message),
        }
    }

    fn spawn<F, Fut>(&self, task: F)
    where
        F: FnOnce(Arc<dyn JobApi>) -> Fut,
        Fut: Future<Output = Msg> + Send + 'static,
    {
        let result_tx = self.result_tx.clone();
        let fut = task(self.api.clone());
        tokio::spawn(async move {
            let _ = result_tx.send(fut.await);
        });
    }
}
