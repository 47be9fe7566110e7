//! Terminal command language. Job commands become the same element descriptions
//! a click in the browser panel would produce.

use panel_core::{ElementInfo, JobId, CLEAR_HISTORY_ID, MODAL_CLOSE_ID};
use thiserror::Error;

pub const HELP: &str = "commands: refresh | page N | cancel ID | delete ID | images ID | copy ID | toggle ID | close | clear | run QUERY [LIMIT] [OUT_DIR] | y | n | quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Refresh,
    Click(ElementInfo),
    Launch {
        query: String,
        limit: String,
        out_dir: String,
    },
    Answer(bool),
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unknown command '{0}'")]
    Unknown(String),
    #[error("'{0}' needs a job id")]
    MissingJobId(&'static str),
    #[error("'page' needs a page number")]
    MissingPage,
    #[error("'run' needs a query")]
    MissingQuery,
    #[error("unterminated quote")]
    UnterminatedQuote,
}

/// Parses one input line. Blank lines yield `Ok(None)`.
pub fn parse_command(line: &str) -> Result<Option<Command>, CommandError> {
    let words = split_words(line)?;
    let Some((head, args)) = words.split_first() else {
        return Ok(None);
    };

    let command = match head.to_ascii_lowercase().as_str() {
        "refresh" | "r" => Command::Refresh,
        "page" | "p" => {
            let page = args.first().ok_or(CommandError::MissingPage)?;
            Command::Click(ElementInfo::with_classes(&["btn-page"]).data("page", page.as_str()))
        }
        "cancel" => job_click("cancel", &["btn-cancel"], args)?,
        "delete" | "rm" => job_click("delete", &["btn-delete", "btn-sm"], args)?,
        "images" | "view" => job_click("images", &["btn-sm"], args)?,
        "copy" => job_click("copy", &["btn-copy"], args)?,
        "toggle" => job_click("toggle", &["btn-error-toggle"], args)?,
        "close" => Command::Click(ElementInfo::with_id(MODAL_CLOSE_ID)),
        "clear" => Command::Click(ElementInfo::with_id(CLEAR_HISTORY_ID)),
        "run" => {
            let query = args.first().ok_or(CommandError::MissingQuery)?;
            Command::Launch {
                query: query.clone(),
                limit: args.get(1).cloned().unwrap_or_default(),
                out_dir: args.get(2).cloned().unwrap_or_default(),
            }
        }
        "y" | "yes" => Command::Answer(true),
        "n" | "no" => Command::Answer(false),
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(Some(command))
}

fn job_click(
    name: &'static str,
    classes: &[&str],
    args: &[String],
) -> Result<Command, CommandError> {
    let id = args.first().ok_or(CommandError::MissingJobId(name))?;
    Ok(Command::Click(
        ElementInfo::with_classes(classes).job(&JobId::new(id.as_str())),
    ))
}

/// Whitespace-separated words; double quotes group words containing spaces.
fn split_words(line: &str) -> Result<Vec<String>, CommandError> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quoted = false;

    for ch in line.chars() {
        match ch {
            '"' => {
                quoted = !quoted;
                in_word = true;
            }
            c if c.is_whitespace() && !quoted => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            c => {
                current.push(c);
                in_word = true;
            }
        }
    }
    if quoted {
        return Err(CommandError::UnterminatedQuote);
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}
