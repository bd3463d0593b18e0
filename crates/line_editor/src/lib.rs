//! Line editing for raw-mode terminals.
//!
//! The [`Editor`] reads key events, keeps the prompt and input line on screen,
//! holds a bounded in-memory history and recognises bracketed paste blocks.
//! Consumers talk to it through the [`LineEditor`] trait so that tests (and
//! other editors) can stand in for it.

mod editor;
mod error;
mod history;
mod screen;
mod source;

use std::io::{self, Write};

pub use crossterm::event::{KeyCode, KeyModifiers};
pub use editor::Editor;
pub use error::EditorError;
pub use history::History;
pub use screen::EditorWriter;
pub use source::{EventSource, LineEvents, ScriptedEvents, TerminalEvents};

/// Completion hook, consulted for every key the editor does not handle itself.
///
/// `pos` is a byte offset into `line`. Returning `Some((line, pos))` replaces
/// the input line and moves the cursor; `None` lets the key through.
pub trait AutoComplete: Send {
    fn complete(&mut self, line: &str, pos: usize, key: KeyCode) -> Option<(String, usize)>;
}

/// The capability a terminal session needs from a line editor.
pub trait LineEditor: Send {
    /// Block until a full line is entered.
    fn read_line(&mut self) -> Result<String, EditorError>;

    fn set_prompt(&mut self, prompt: &str);

    /// Append an entry verbatim (no filtering), oldest first.
    fn add_to_history(&mut self, entry: &str);

    /// Current history, oldest first.
    fn history(&self) -> Vec<String>;

    fn set_bracketed_paste_mode(&mut self, enabled: bool) -> io::Result<()>;

    fn set_auto_complete(&mut self, completer: Option<Box<dyn AutoComplete>>);

    /// A writer for output that should appear above the prompt.
    fn writer(&self) -> Box<dyn Write + Send>;
}
