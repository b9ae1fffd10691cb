//! Structured command line parsing.
//!
//! Converts the raw command text (beginning with ':') into a `ParsedCommand`.
//! Parsing is pure; unknown input becomes `ParsedCommand::Unknown`, which the
//! executor turns into an error status message.

use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetOption {
    IgnoreCase,
    NoIgnoreCase,
    Number,
    NoNumber,
    Wrap,
    NoWrap,
}

impl SetOption {
    fn parse(name: &str) -> Option<Self> {
        Some(match name {
            "ic" | "ignorecase" => SetOption::IgnoreCase,
            "noic" | "noignorecase" => SetOption::NoIgnoreCase,
            "nu" | "number" => SetOption::Number,
            "nonu" | "nonumber" => SetOption::NoNumber,
            "wrap" => SetOption::Wrap,
            "nowrap" => SetOption::NoWrap,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedCommand {
    /// `:w [path]`
    Write(Option<PathBuf>),
    /// `:q` / `:q!`
    Quit { force: bool },
    WriteQuit,
    /// `:x`: write only when modified, then quit.
    Exit,
    /// `:<n>`, 1-based.
    GotoLine(usize),
    NoHighlight,
    Set(SetOption),
    /// `:e <path>` / `:e! <path>`
    Edit { path: PathBuf, force: bool },
    Unknown(String),
}

pub struct CommandParser;

impl CommandParser {
    pub fn parse(raw: &str) -> ParsedCommand {
        let s = raw.trim();
        let Some(body) = s.strip_prefix(':') else {
            return ParsedCommand::Unknown(s.to_string());
        };
        let body = body.trim();
        if body.is_empty() {
            return ParsedCommand::Unknown(String::new());
        }
        if body.chars().all(|c| c.is_ascii_digit()) {
            return match body.parse::<usize>() {
                Ok(n) => ParsedCommand::GotoLine(n),
                Err(_) => ParsedCommand::Unknown(body.to_string()),
            };
        }
        let (name, arg) = match body.find(char::is_whitespace) {
            Some(i) => (&body[..i], body[i..].trim()),
            None => (body, ""),
        };
        match (name, arg) {
            ("q" | "quit", "") => ParsedCommand::Quit { force: false },
            ("q!" | "quit!", "") => ParsedCommand::Quit { force: true },
            ("w" | "write", "") => ParsedCommand::Write(None),
            ("w" | "write", path) => ParsedCommand::Write(Some(PathBuf::from(path))),
            ("wq", "") => ParsedCommand::WriteQuit,
            ("x" | "exit", "") => ParsedCommand::Exit,
            ("noh" | "nohlsearch", "") => ParsedCommand::NoHighlight,
            ("e" | "edit", path) if !path.is_empty() => ParsedCommand::Edit {
                path: PathBuf::from(path),
                force: false,
            },
            ("e!" | "edit!", path) if !path.is_empty() => ParsedCommand::Edit {
                path: PathBuf::from(path),
                force: true,
            },
            ("set" | "se", option) => match SetOption::parse(option) {
                Some(option) => ParsedCommand::Set(option),
                None => ParsedCommand::Unknown(body.to_string()),
            },
            _ => ParsedCommand::Unknown(body.to_string()),
        }
    }
}
