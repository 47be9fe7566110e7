mod app;
mod commands;
mod config;
mod logging;
mod snapshot;
mod terminal;

pub use app::run_app;
