use std::io;
use std::os::unix::io::RawFd;
use std::path::{Path, PathBuf};

use line_editor::{Editor, EditorError, KeyCode, LineEditor};
use tracing::{debug, error, info, warn};
use tracing_subscriber::util::TryInitError;

use crate::config::TerminalConfig;
use crate::error::SessionError;
use crate::guard::SavedMode;
use crate::history;
use crate::logging;
use crate::output::SessionOut;
use crate::term_mode;
use crate::trampoline::AutoCompleteTrampoline;

/// The parts of a session a completion callback may use.
#[derive(Clone)]
pub struct SessionHandle {
    fd: RawFd,
    interactive: bool,
    out: SessionOut,
}

impl SessionHandle {
    pub fn fd(&self) -> RawFd {
        self.fd
    }

    pub fn is_terminal(&self) -> bool {
        self.interactive
    }

    pub fn out(&self) -> SessionOut {
        self.out.clone()
    }
}

/// An interactive terminal session.
///
/// Opening one on a terminal switches it to raw mode; [`close`](Self::close)
/// (or dropping the session) switches it back and saves history. On anything
/// that is not a terminal the mode is left alone and output is not translated.
pub struct Session<E: LineEditor = Editor> {
    handle: SessionHandle,
    saved: SavedMode,
    editor: E,
    history_file: Option<PathBuf>,
    bracketed_paste: bool,
    /// Raw mode was entered and `close` has not run yet.
    active: bool,
    watching_signals: bool,
}

impl Session<Editor> {
    /// Open a session on stdin, drawing on stderr.
    pub fn open() -> Result<Self, SessionError> {
        Self::open_with(libc::STDIN_FILENO, Editor::stderr())
    }

    /// Like [`open`](Self::open), then apply `config`.
    pub fn open_with_config(config: &TerminalConfig) -> Result<Self, SessionError> {
        let editor = Editor::stderr().with_history_capacity(config.history_capacity);
        let mut session = Self::open_with(libc::STDIN_FILENO, editor)?;
        session.set_prompt(&config.prompt);
        if !config.bracketed_paste {
            session.set_bracketed_paste(false);
        }
        if let Some(path) = &config.history_file {
            session.set_history_file(path);
        }
        Ok(session)
    }
}

impl<E: LineEditor> Session<E> {
    /// Open a session on `fd`, editing lines with `editor`.
    pub fn open_with(fd: RawFd, editor: E) -> Result<Self, SessionError> {
        let interactive = term_mode::is_terminal(fd);
        let sink = editor.writer();
        if !interactive {
            debug!(fd, "not a terminal, leaving mode untouched");
            return Ok(Self {
                handle: SessionHandle {
                    fd,
                    interactive,
                    out: SessionOut::plain(sink),
                },
                saved: SavedMode::new(fd, None),
                editor,
                history_file: None,
                bracketed_paste: false,
                active: false,
                watching_signals: false,
            });
        }

        let original =
            term_mode::make_raw(fd).map_err(|source| SessionError::TerminalMode { fd, source })?;
        let mut session = Self {
            handle: SessionHandle {
                fd,
                interactive,
                out: SessionOut::raw(sink),
            },
            saved: SavedMode::new(fd, Some(original)),
            editor,
            history_file: None,
            bracketed_paste: false,
            active: true,
            watching_signals: false,
        };
        session.set_bracketed_paste(true);
        Ok(session)
    }

    /// Whether the session's input is a terminal. Fixed at open.
    pub fn is_terminal(&self) -> bool {
        self.handle.interactive
    }

    /// Whether the terminal is currently held in raw mode.
    pub fn is_raw(&self) -> bool {
        self.saved.is_held()
    }

    pub fn fd(&self) -> RawFd {
        self.handle.fd
    }

    pub fn handle(&self) -> SessionHandle {
        self.handle.clone()
    }

    /// Output that stays readable whatever mode the terminal is in.
    pub fn out(&self) -> SessionOut {
        self.handle.out()
    }

    /// Writer for a log subscriber; see [`logger_setup`](Self::logger_setup).
    pub fn log_writer(&self) -> SessionOut {
        self.handle.out()
    }

    /// Route `tracing` output through the session so log lines keep the
    /// prompt intact. Colors are on only for a terminal.
    pub fn logger_setup(&self) -> Result<(), TryInitError> {
        logging::init_tracing(self.log_writer(), self.is_terminal())
    }

    /// Load history from `path` into the editor and save it back there on
    /// close. Never fails: an unusable file means empty history.
    pub fn set_history_file(&mut self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        let entries = history::load(path);
        for entry in &entries {
            self.editor.add_to_history(entry);
        }
        info!("Loaded {} history entries from {}", entries.len(), path.display());
        self.history_file = (!path.as_os_str().is_empty()).then(|| path.to_path_buf());
    }

    pub fn history_file(&self) -> Option<&Path> {
        self.history_file.as_deref()
    }

    pub fn set_prompt(&mut self, prompt: &str) {
        self.editor.set_prompt(prompt);
    }

    /// Turn bracketed paste on or off. Only meaningful on a raw terminal.
    pub fn set_bracketed_paste(&mut self, enabled: bool) {
        if !self.active || self.bracketed_paste == enabled {
            return;
        }
        match self.editor.set_bracketed_paste_mode(enabled) {
            Ok(()) => self.bracketed_paste = enabled,
            Err(err) => warn!("Could not switch bracketed paste mode: {}", err),
        }
    }

    /// Block until the user enters a line.
    ///
    /// A line completed inside a bracketed paste is a normal result here.
    pub fn read_line(&mut self) -> Result<String, EditorError> {
        match self.editor.read_line() {
            Err(EditorError::PasteIndicator(line)) => Ok(line),
            other => other,
        }
    }

    pub fn set_auto_complete_callback<F>(&mut self, callback: F)
    where
        F: FnMut(&SessionHandle, &str, usize, KeyCode) -> Option<(String, usize)> + Send + 'static,
    {
        let trampoline = AutoCompleteTrampoline::new(self.handle(), Box::new(callback));
        self.editor.set_auto_complete(Some(Box::new(trampoline)));
    }

    /// Restore the terminal mode if the process panics.
    pub fn restore_on_panic(&self) {
        if self.active {
            self.saved.install_panic_hook();
        }
    }

    /// Restore the terminal mode on SIGTERM, SIGHUP or SIGQUIT before the
    /// signal takes its default action. The signals keep their default
    /// action after close.
    pub fn restore_on_signals(&mut self) -> io::Result<()> {
        if self.active && !self.watching_signals {
            self.saved.spawn_signal_watcher()?;
            self.watching_signals = true;
        }
        Ok(())
    }

    pub fn editor(&self) -> &E {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut E {
        &mut self.editor
    }

    /// Leave raw mode and save history. Runs once; later calls return `Ok`.
    ///
    /// Only the restore error is returned. History problems are logged.
    pub fn close(&mut self) -> Result<(), SessionError> {
        if !self.active {
            return Ok(());
        }
        self.active = false;

        if self.bracketed_paste {
            if let Err(err) = self.editor.set_bracketed_paste_mode(false) {
                warn!("Could not disable bracketed paste: {}", err);
            }
            self.bracketed_paste = false;
        }

        // `None`: a panic hook or signal watcher got there first.
        let restored = self.saved.restore().unwrap_or(Ok(()));
        self.handle.out.make_plain();

        if let Some(path) = &self.history_file {
            let entries = self.editor.history();
            info!("Saving history ({} commands) to {}", entries.len(), path.display());
            history::save(path, &entries);
        }

        restored.map_err(|source| SessionError::Restore {
            fd: self.handle.fd,
            source,
        })
    }
}

impl<E: LineEditor> Drop for Session<E> {
    fn drop(&mut self) {
        if let Err(err) = self.close() {
            error!("{}", err);
        }
    }
}
