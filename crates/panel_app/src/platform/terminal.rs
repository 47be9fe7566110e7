use std::io::{self, Write};

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use panel_core::{Labels, PanelViewModel};
use panel_engine::{ClipboardError, Host};
use panel_logging::{panel_debug, panel_error};

use super::snapshot::{render_page, SnapshotWriter};

/// Host for a terminal session: the HTML page goes to a snapshot file, a short
/// status line and clipboard escapes go to `out`, alerts go to stderr.
pub struct TerminalHost<W: Write + Send> {
    out: W,
    snapshot: SnapshotWriter,
    labels: &'static Labels,
    clipboard_enabled: bool,
    last_status: String,
}

impl<W: Write + Send> TerminalHost<W> {
    pub fn new(
        out: W,
        snapshot: SnapshotWriter,
        labels: &'static Labels,
        clipboard_enabled: bool,
    ) -> Self {
        Self {
            out,
            snapshot,
            labels,
            clipboard_enabled,
            last_status: String::new(),
        }
    }

    #[cfg(test)]
    fn into_output(self) -> W {
        self.out
    }
}

impl<W: Write + Send> Host for TerminalHost<W> {
    fn render(&mut self, view: &PanelViewModel) {
        if let Err(err) = self.snapshot.write(&render_page(view, self.labels)) {
            panel_error!("Failed to write snapshot {:?}: {}", self.snapshot.path(), err);
        }

        let status = status_line(view);
        if status != self.last_status {
            let _ = writeln!(self.out, "{status}");
            let _ = self.out.flush();
            self.last_status = status;
        }
    }

    fn alert(&mut self, message: &str) {
        eprintln!("! {message}");
    }

    fn write_clipboard(&mut self, text: &str) -> Result<(), ClipboardError> {
        if !self.clipboard_enabled {
            return Err(ClipboardError::Unavailable(
                "output is not a terminal".to_string(),
            ));
        }
        write!(self.out, "\x1b]52;c;{}\x07", STANDARD.encode(text))
            .and_then(|()| self.out.flush())
            .map_err(|err: io::Error| ClipboardError::Write(err.to_string()))?;
        panel_debug!("Copied {} bytes through OSC 52", text.len());
        Ok(())
    }
}

/// One plain-text line describing what changed on screen.
fn status_line(view: &PanelViewModel) -> String {
    let mut parts = vec![format!("page {}", view.current_page)];
    if view.ticker_active {
        parts.push("live".to_string());
    }
    if let Some(result) = &view.run_result_html {
        parts.push(format!("run: {}", strip_tags(result)));
    }
    if let Some(modal) = &view.modal {
        parts.push(format!("modal: {}", modal.title));
    }
    if let Some(prompt) = &view.confirmation {
        parts.push(format!("confirm (y/n): {prompt}"));
    }
    parts.join(" | ")
}

fn strip_tags(html: &str) -> String {
    let mut text = String::with_capacity(html.len());
    let mut in_tag = false;
    for ch in html.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            c if !in_tag => text.push(c),
            _ => {}
        }
    }
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&amp;", "&")
}
