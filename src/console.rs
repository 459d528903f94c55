use session_processors::{AuthState, FormatId, WorkflowSession, WorkflowState};
use std::fmt::Write;

pub(crate) const HELP: &str = "\
Commands:
  login <code>     verify an access code and remember it
  logout           forget the access code
  fetch <url>      fetch media info (a bare URL works too)
  format <id>      choose one of the offered formats
  download         download the chosen format
  status           show the current session
  help             show this message
  quit             exit";

#[derive(Debug, PartialEq)]
pub(crate) enum Command {
    Login(String),
    Logout,
    Fetch(String),
    Format(FormatId),
    Download,
    Status,
    Help,
    Quit,
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub(crate) enum CommandError {
    #[error("Unknown command: {0}. Type `help` for the list of commands.")]
    Unknown(String),
    #[error("Usage: {0}")]
    MissingArgument(&'static str),
}

fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

/// Parses one input line. Blank lines yield `None`.
pub(crate) fn parse_command(line: &str) -> Result<Option<Command>, CommandError> {
    let line = line.trim();

    if line.is_empty() {
        return Ok(None);
    }

    let (name, argument) = match line.split_once(char::is_whitespace) {
        Some((name, argument)) => (name, argument.trim()),
        None => (line, ""),
    };

    let required = |usage: &'static str| {
        if argument.is_empty() {
            Err(CommandError::MissingArgument(usage))
        } else {
            Ok(argument.to_string())
        }
    };

    let command = match name.to_lowercase().as_str() {
        "login" => Command::Login(required("login <code>")?),
        "logout" => Command::Logout,
        "fetch" => Command::Fetch(required("fetch <url>")?),
        "format" => Command::Format(required("format <id>")?.into()),
        "download" => Command::Download,
        "status" => Command::Status,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        _ if is_url(line) => Command::Fetch(line.to_string()),
        _ => return Err(CommandError::Unknown(name.to_string())),
    };

    Ok(Some(command))
}

pub(crate) fn render_auth(state: AuthState) -> &'static str {
    match state {
        AuthState::Unauthenticated => "Not signed in. Use `login <code>` to continue.",
        AuthState::Verifying => "Verifying access code...",
        AuthState::Authenticated => "Signed in.",
    }
}

fn format_duration(seconds: f64) -> String {
    let total = seconds.round() as u64;
    let (hours, minutes, seconds) = (total / 3600, total % 3600 / 60, total % 60);

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{}:{:02}", minutes, seconds)
    }
}

pub(crate) fn render_session(session: &WorkflowSession) -> String {
    let mut out = String::new();

    match session.state() {
        WorkflowState::Idle => {
            out.push_str("Nothing in progress. Paste a URL to start.");
            return out;
        }
        WorkflowState::FetchingMetadata => {
            let _ = write!(
                out,
                "Fetching info for {}...",
                session.source_url().unwrap_or_default()
            );
            return out;
        }
        WorkflowState::Failed(reason) => {
            let _ = write!(out, "Error: {}", reason);
            return out;
        }
        WorkflowState::MetadataReady
        | WorkflowState::Downloading
        | WorkflowState::DownloadSucceeded => {}
    }

    if let Some(metadata) = session.metadata() {
        let _ = writeln!(out, "{}", metadata.title);

        if let Some(duration) = metadata.duration_seconds {
            let _ = writeln!(out, "Duration: {}", format_duration(duration));
        }
        if let Some(extractor) = &metadata.extractor {
            let _ = writeln!(out, "Source: {}", extractor);
        }

        let _ = writeln!(out, "Formats:");
        for format in &metadata.formats {
            let marker = if &format.format_id == session.selected_format() {
                '*'
            } else {
                ' '
            };
            let kind = if format.is_audio() { "audio" } else { "video" };
            let _ = writeln!(
                out,
                " {} {:<12} {} [{}, {}]",
                marker,
                format.format_id.as_str(),
                format.display_label,
                kind,
                format.container_ext
            );
        }
    }

    match session.state() {
        WorkflowState::Downloading => {
            let _ = write!(out, "Downloading {}...", session.selected_format());
        }
        WorkflowState::DownloadSucceeded => {
            if let Some(artifact) = session.last_artifact() {
                let _ = write!(
                    out,
                    "Downloaded! {} ({}, {} bytes) saved to {}",
                    artifact.filename,
                    artifact.mime_type,
                    artifact.size,
                    artifact.location.display()
                );
            }
        }
        _ => {
            let _ = write!(out, "Use `format <id>` to choose, then `download`.");
        }
    }

    out
}
