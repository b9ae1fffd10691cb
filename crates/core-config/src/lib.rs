//! Configuration loading and parsing.
//!
//! Parses `jotter.toml` (or an override path provided by the binary):
//!
//! ```toml
//! [editor]
//! line_numbers = true
//! wrap = true
//! tab_width = 4
//! history_limit = 200
//! highlight_delay_ms = 150
//!
//! [search]
//! case_sensitive = false
//! ```
//!
//! Every field is optional. Unknown fields are ignored so older binaries keep
//! reading newer files. A missing file yields defaults silently; a malformed
//! one yields defaults with a warning. Out-of-range values are clamped when
//! the effective values are computed, and the raw parsed values are kept.

use anyhow::Result;
use serde::Deserialize;
use std::{fs, path::PathBuf};
use tracing::{info, warn};

pub const CONFIG_FILE_NAME: &str = "jotter.toml";
const TAB_WIDTH_MIN: u8 = 1;
const TAB_WIDTH_MAX: u8 = 16;

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct EditorConfig {
    #[serde(default = "EditorConfig::default_true")]
    pub line_numbers: bool,
    #[serde(default = "EditorConfig::default_true")]
    pub wrap: bool,
    #[serde(default = "EditorConfig::default_tab_width")]
    pub tab_width: u8,
    #[serde(default = "EditorConfig::default_history_limit")]
    pub history_limit: usize,
    #[serde(default = "EditorConfig::default_highlight_delay_ms")]
    pub highlight_delay_ms: u64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            line_numbers: true,
            wrap: true,
            tab_width: Self::default_tab_width(),
            history_limit: Self::default_history_limit(),
            highlight_delay_ms: Self::default_highlight_delay_ms(),
        }
    }
}

impl EditorConfig {
    const fn default_true() -> bool {
        true
    }
    const fn default_tab_width() -> u8 {
        4
    }
    const fn default_history_limit() -> usize {
        200
    }
    const fn default_highlight_delay_ms() -> u64 {
        150
    }
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    #[serde(default)]
    pub case_sensitive: bool,
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    #[serde(default)]
    pub editor: EditorConfig,
    #[serde(default)]
    pub search: SearchConfig,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub raw: Option<String>, // original file string (optional)
    pub file: ConfigFile,    // parsed (or default) data
    pub path: Option<PathBuf>,
}

/// Best-effort config path following platform conventions (XDG / AppData Roaming).
pub fn discover() -> PathBuf {
    // Working directory first so a notes folder can carry its own settings.
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("jotter").join(CONFIG_FILE_NAME);
    }
    PathBuf::from(CONFIG_FILE_NAME)
}

pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    let Ok(content) = fs::read_to_string(&path) else {
        return Ok(Config::default());
    };
    match toml::from_str::<ConfigFile>(&content) {
        Ok(file) => {
            info!(target: "config", path = %path.display(), "config_loaded");
            Ok(Config {
                raw: Some(content),
                file,
                path: Some(path),
            })
        }
        Err(e) => {
            warn!(target: "config", path = %path.display(), error = %e, "config_parse_failed_using_defaults");
            Ok(Config::default())
        }
    }
}

impl Config {
    pub fn line_numbers(&self) -> bool {
        self.file.editor.line_numbers
    }

    pub fn wrap(&self) -> bool {
        self.file.editor.wrap
    }

    /// Spaces inserted for a tab, clamped to `1..=16`.
    pub fn tab_width(&self) -> usize {
        let raw = self.file.editor.tab_width;
        let clamped = raw.clamp(TAB_WIDTH_MIN, TAB_WIDTH_MAX);
        if clamped != raw {
            info!(target: "config", raw, clamped, "tab_width_clamped");
        }
        usize::from(clamped)
    }

    /// Undo entries kept per document; never below 1.
    pub fn history_limit(&self) -> usize {
        let raw = self.file.editor.history_limit;
        if raw == 0 {
            info!(target: "config", raw, clamped = 1, "history_limit_clamped");
        }
        raw.max(1)
    }

    pub fn highlight_delay_ms(&self) -> u64 {
        self.file.editor.highlight_delay_ms
    }

    pub fn search_case_sensitive(&self) -> bool {
        self.file.search.case_sensitive
    }
}
