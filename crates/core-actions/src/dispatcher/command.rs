//! Command execution (`:w`, `:q`, `:e <file>`, `:set`, ...).
//!
//! Document I/O goes through the host's `DocumentProvider`; every failure is
//! reported as an error status and leaves the buffer untouched.

use super::command_parser::{CommandParser, ParsedCommand, SetOption};
use super::{DispatchResult, Services, StatusKind};
use core_state::{Document, DocumentError, EditorState};
use core_text::motion;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

const NOT_SAVED: &str = "No write since last change (add ! to override)";

/// Run the text typed at the `:` prompt (without the leading colon).
pub(crate) fn execute(raw: &str, state: &mut EditorState, services: &mut Services<'_>) -> DispatchResult {
    let parsed = CommandParser::parse(&format!(":{raw}"));
    tracing::debug!(target: "actions.dispatch", command = ?parsed, "command");
    match parsed {
        ParsedCommand::Write(None) => write(state, services),
        ParsedCommand::Write(Some(path)) => write_to(&path, state, services),
        ParsedCommand::Quit { force } => {
            if state.document.is_dirty() && !force {
                DispatchResult::warning(NOT_SAVED)
            } else {
                DispatchResult::quit()
            }
        }
        ParsedCommand::WriteQuit => quit_after(write(state, services)),
        ParsedCommand::Exit => {
            if state.document.is_dirty() {
                quit_after(write(state, services))
            } else {
                DispatchResult::quit()
            }
        }
        ParsedCommand::GotoLine(n) => goto_line(n, state),
        ParsedCommand::NoHighlight => {
            state.document.search.clear();
            DispatchResult::dirty()
        }
        ParsedCommand::Set(option) => set(option, state),
        ParsedCommand::Edit { path, force } => {
            if state.document.is_dirty() && !force {
                DispatchResult::warning(NOT_SAVED)
            } else {
                open_document(path, state, services)
            }
        }
        ParsedCommand::Unknown(body) if body.is_empty() => DispatchResult::clean(),
        ParsedCommand::Unknown(body) => {
            DispatchResult::error(format!("Not an editor command: {body}"))
        }
    }
}

fn quit_after(written: DispatchResult) -> DispatchResult {
    match &written.status {
        Some(status) if status.kind != StatusKind::Info => written,
        _ => written.merge(DispatchResult::quit()),
    }
}

fn display(path: &Path) -> String {
    path.display().to_string()
}

fn write(state: &mut EditorState, services: &mut Services<'_>) -> DispatchResult {
    match state.document.save(services.documents) {
        Ok(report) => {
            let name = state.document.path().map(display).unwrap_or_default();
            DispatchResult::info(format!(
                "\"{name}\" {}L, {}B written",
                report.lines, report.bytes
            ))
        }
        Err(err) => {
            tracing::error!(target: "io", %err, "write_failed");
            DispatchResult::error(err.to_string())
        }
    }
}

/// `:w <path>` names an unnamed document; a named one is copied to `path`
/// and keeps its own name and modified flag.
fn write_to(path: &Path, state: &mut EditorState, services: &mut Services<'_>) -> DispatchResult {
    if state.document.path().is_none() {
        state.document.set_path(path.to_path_buf());
        return write(state, services);
    }
    let mut content = state.document.buffer.text();
    content.push('\n');
    match services.documents.save(path, &content) {
        Ok(report) => DispatchResult::info(format!(
            "\"{}\" {}L, {}B written",
            display(path),
            report.lines,
            report.bytes
        )),
        Err(err) => {
            tracing::error!(target: "io", %err, "write_failed");
            DispatchResult::error(err.to_string())
        }
    }
}

fn goto_line(n: usize, state: &mut EditorState) -> DispatchResult {
    let doc = &mut state.document;
    let last = doc.buffer.line_count() - 1;
    doc.cursor.row = n.saturating_sub(1).min(last);
    doc.cursor.col = 0;
    motion::first_non_blank(&doc.buffer, &mut doc.cursor);
    motion::clamp(&doc.buffer, &mut doc.cursor, false);
    DispatchResult::dirty()
}

fn set(option: SetOption, state: &mut EditorState) -> DispatchResult {
    let settings = &mut state.settings;
    match option {
        SetOption::IgnoreCase | SetOption::NoIgnoreCase => {
            settings.case_sensitive = option == SetOption::NoIgnoreCase;
            let doc = &mut state.document;
            doc.search
                .set_case_sensitive(settings.case_sensitive, &doc.buffer);
        }
        SetOption::Number => settings.line_numbers = true,
        SetOption::NoNumber => settings.line_numbers = false,
        SetOption::Wrap => settings.wrap = true,
        SetOption::NoWrap => settings.wrap = false,
    }
    tracing::debug!(target: "actions.dispatch", ?option, "setting_changed");
    DispatchResult::dirty()
}

/// Load `path` through the document provider and swap it in. A path that does
/// not exist yet opens an empty document bound to it.
pub(crate) fn open_document(
    path: PathBuf,
    state: &mut EditorState,
    services: &mut Services<'_>,
) -> DispatchResult {
    let name = display(&path);
    let (document, status) = match services.documents.load(&path) {
        Ok(loaded) => {
            let lines = loaded.content.lines().count();
            let suffix = if loaded.writable { "" } else { " [readonly]" };
            let doc = Document::from_loaded(path, loaded);
            (doc, format!("\"{name}\"{suffix} {lines}L"))
        }
        Err(DocumentError::Load { source, .. }) if source.kind() == ErrorKind::NotFound => {
            let mut doc = Document::default();
            doc.set_path(path);
            (doc, format!("\"{name}\" [New]"))
        }
        Err(err) => {
            tracing::error!(target: "io", %err, "open_failed");
            return DispatchResult::error(err.to_string());
        }
    };
    state.replace_document(document);
    tracing::info!(target: "io", lines = state.document.buffer.line_count(), "document_opened");
    DispatchResult::info(status)
}
