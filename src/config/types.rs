use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Session settings, read from `config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerminalConfig {
    /// Where command history is loaded from and saved to.
    pub history_file: Option<PathBuf>,
    /// Prompt shown by `read_line`.
    pub prompt: String,
    /// Ask the terminal to mark pasted text (default: true).
    pub bracketed_paste: bool,
    /// Entries kept in memory; the saved file is capped to this too (default: 100).
    pub history_capacity: usize,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            history_file: None,
            prompt: default_prompt(),
            bracketed_paste: true,
            history_capacity: default_history_capacity(),
        }
    }
}

fn default_prompt() -> String {
    "> ".to_string()
}

fn default_history_capacity() -> usize {
    100
}
