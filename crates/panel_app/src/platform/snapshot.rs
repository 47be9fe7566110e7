use std::fmt::Write as _;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use panel_core::render::escape_html;
use panel_core::{Labels, PanelViewModel, CLEAR_HISTORY_ID, MODAL_CLOSE_ID};
use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot directory {0:?} is not usable: {1}")]
    Directory(PathBuf, io::Error),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Replaces the snapshot file in one step: write a sibling temp file, then rename.
#[derive(Debug, Clone)]
pub struct SnapshotWriter {
    path: PathBuf,
}

impl SnapshotWriter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn write(&self, content: &str) -> Result<(), SnapshotError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir).map_err(|err| SnapshotError::Directory(dir.clone(), err))?;

        let mut tmp = NamedTempFile::new_in(&dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.flush()?;
        tmp.persist(&self.path).map_err(|err| SnapshotError::Io(err.error))?;
        Ok(())
    }
}

/// The whole panel as a standalone HTML document.
pub fn render_page(view: &PanelViewModel, labels: &Labels) -> String {
    let mut page = String::new();
    let _ = write!(
        page,
        "<!DOCTYPE html>\n<html lang=\"{}\">\n<head><meta charset=\"utf-8\"><title>{title}</title></head>\n<body>\n<h1>{title}</h1>\n",
        labels.locale,
        title = labels.panel_title,
    );

    let run_disabled = if view.run_button_enabled { "" } else { " disabled" };
    let _ = write!(
        page,
        "<section class=\"run\"><button type=\"button\" id=\"btnRun\"{run_disabled}>{}</button><div id=\"runResult\">{}</div></section>\n",
        labels.run,
        view.run_result_html.as_deref().unwrap_or(""),
    );

    let _ = write!(
        page,
        "<section class=\"history\"><button type=\"button\" id=\"{CLEAR_HISTORY_ID}\">{}</button><div id=\"jobList\">{}</div></section>\n",
        labels.clear_history, view.list_html,
    );

    if let Some(modal) = &view.modal {
        let _ = write!(
            page,
            "<div id=\"imageModal\" class=\"modal open\"><div class=\"modal-content\"><div class=\"modal-header\"><h3 id=\"modalTitle\">{}</h3><button type=\"button\" id=\"{MODAL_CLOSE_ID}\">&times;</button></div><div id=\"modalGrid\">{}</div></div></div>\n",
            escape_html(&modal.title),
            modal.body_html,
        );
    }

    if let Some(prompt) = &view.confirmation {
        let _ = write!(
            page,
            "<div class=\"confirm\" role=\"alertdialog\">{}</div>\n",
            escape_html(prompt)
        );
    }

    page.push_str("</body>\n</html>\n");
    page
}
