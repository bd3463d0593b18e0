//! Interactive terminal sessions for command-line tools.
//!
//! A [`Session`] puts the terminal into raw mode, hands line editing to a
//! [`LineEditor`], persists command history to a flat file, and makes sure
//! everything printed meanwhile gets the `\r` a raw terminal needs before
//! each `\n`. Closing (or dropping) the session puts the terminal back.
//!
//! ```no_run
//! use std::io::Write;
//!
//! let mut session = rawline::Session::open()?;
//! session.set_prompt("> ");
//! session.set_history_file("/tmp/.rawline_history");
//! let line = session.read_line()?;
//! writeln!(session.out(), "got {line}")?;
//! session.close()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod cr_writer;
pub mod error;
pub mod history;
pub mod logging;
pub mod output;
pub mod session;
pub mod term_mode;
pub mod trampoline;

mod guard;

pub use config::{ConfigError, TerminalConfig};
pub use cr_writer::CrWriter;
pub use error::SessionError;
pub use line_editor::{
    AutoComplete, Editor, EditorError, EventSource, KeyCode, LineEditor, LineEvents,
    ScriptedEvents,
};
pub use output::SessionOut;
pub use session::{Session, SessionHandle};
pub use trampoline::{AutoCompleteCallback, AutoCompleteTrampoline};
