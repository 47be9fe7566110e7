use std::io::{self, BufRead, IsTerminal};
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;

use anyhow::Context;
use clap::Parser;
use panel_core::Locale;
use panel_engine::{HttpJobApi, PanelHandle, PanelRuntime};
use panel_logging::{panel_info, panel_warn};

use super::commands::{parse_command, Command, HELP};
use super::config::{PanelConfig, DEFAULT_CONFIG_PATH};
use super::logging::{self, LogDestination};
use super::snapshot::SnapshotWriter;
use super::terminal::TerminalHost;

/// Terminal front end for the image collection job panel.
#[derive(Debug, Parser)]
#[command(name = "panel", version, about)]
struct Args {
    /// RON configuration file; defaults apply when it does not exist.
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
    /// Root URL of the job API.
    #[arg(long, env = "PANEL_BASE_URL")]
    base_url: Option<String>,
    /// Where the rendered HTML page is written after every change.
    #[arg(long, env = "PANEL_SNAPSHOT")]
    snapshot: Option<PathBuf>,
    #[arg(long)]
    locale: Option<Locale>,
    #[arg(long, value_enum)]
    log: Option<LogDestination>,
}

impl Args {
    fn apply(self, mut config: PanelConfig) -> PanelConfig {
        if let Some(base_url) = self.base_url {
            config.base_url = base_url;
        }
        if let Some(snapshot) = self.snapshot {
            config.snapshot_path = snapshot;
        }
        if let Some(locale) = self.locale {
            config.locale = locale;
        }
        if let Some(log) = self.log {
            config.log_destination = log;
        }
        config
    }
}

pub fn run_app() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = PanelConfig::load(&args.config)?;
    let config = args.apply(config);

    logging::initialize(config.log_destination, config.log_level()?);

    let settings = config.panel_settings()?;
    let api = HttpJobApi::new(config.api_settings()?).context("failed to build HTTP client")?;
    panel_info!("Panel connecting to {}", settings.base_url);

    let stdout = io::stdout();
    let clipboard_enabled = stdout.is_terminal();
    let host = TerminalHost::new(
        stdout,
        SnapshotWriter::new(config.snapshot_path.clone()),
        settings.labels(),
        clipboard_enabled,
    );

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start tokio runtime")?;

    runtime.block_on(async move {
        let (panel, handle) = PanelRuntime::new(settings, Arc::new(api), host);
        eprintln!("{HELP}");
        eprintln!("snapshot: {}", config.snapshot_path.display());
        spawn_input_reader(handle);
        panel.run().await;
    });
    Ok(())
}

/// Reads commands from stdin on a plain thread. Dropping the handle at EOF or
/// `quit` stops the panel runtime.
fn spawn_input_reader(handle: PanelHandle) {
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(err) => {
                    panel_warn!("Failed to read stdin: {}", err);
                    break;
                }
            };
            let delivered = match parse_command(&line) {
                Ok(None) => true,
                Ok(Some(Command::Quit)) => break,
                Ok(Some(Command::Help)) => {
                    eprintln!("{HELP}");
                    true
                }
                Ok(Some(Command::Refresh)) => handle.refresh(),
                Ok(Some(Command::Click(element))) => handle.click(&element),
                Ok(Some(Command::Launch {
                    query,
                    limit,
                    out_dir,
                })) => handle.launch(&query, &limit, &out_dir),
                Ok(Some(Command::Answer(accepted))) => handle.answer(accepted),
                Err(err) => {
                    eprintln!("{err}; {HELP}");
                    true
                }
            };
            if !delivered {
                break;
            }
        }
    });
}
