use std::io::{self, Write};
use std::sync::Arc;

use crossterm::event::{
    DisableBracketedPaste, EnableBracketedPaste, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers,
};
use crossterm::execute;

use crate::error::EditorError;
use crate::history::History;
use crate::screen::{EditorWriter, Screen, SharedScreen};
use crate::source::{EventSource, TerminalEvents};
use crate::{AutoComplete, LineEditor};

/// What a key press means to the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Submit,
    Interrupt,
    EofOrDelete,
    Home,
    End,
    Left,
    Right,
    Backspace,
    Delete,
    KillToStart,
    KillToEnd,
    DeleteWord,
    ClearScreen,
    HistoryOlder,
    HistoryNewer,
    /// Left to the completer, then inserted if printable.
    Other,
}

fn action_for(key: &KeyEvent) -> Action {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match (key.code, ctrl) {
        (KeyCode::Enter, _) | (KeyCode::Char('j' | 'm'), true) => Action::Submit,
        (KeyCode::Char('c'), true) => Action::Interrupt,
        (KeyCode::Char('d'), true) => Action::EofOrDelete,
        (KeyCode::Home, _) | (KeyCode::Char('a'), true) => Action::Home,
        (KeyCode::End, _) | (KeyCode::Char('e'), true) => Action::End,
        (KeyCode::Left, _) | (KeyCode::Char('b'), true) => Action::Left,
        (KeyCode::Right, _) | (KeyCode::Char('f'), true) => Action::Right,
        (KeyCode::Backspace, _) | (KeyCode::Char('h'), true) => Action::Backspace,
        (KeyCode::Delete, _) => Action::Delete,
        (KeyCode::Char('u'), true) => Action::KillToStart,
        (KeyCode::Char('k'), true) => Action::KillToEnd,
        (KeyCode::Char('w'), true) => Action::DeleteWord,
        (KeyCode::Char('l'), true) => Action::ClearScreen,
        (KeyCode::Up, _) | (KeyCode::Char('p'), true) => Action::HistoryOlder,
        (KeyCode::Down, _) | (KeyCode::Char('n'), true) => Action::HistoryNewer,
        _ => Action::Other,
    }
}

/// Default [`LineEditor`]: emacs-style keys over an [`EventSource`].
pub struct Editor<S = TerminalEvents> {
    source: S,
    screen: SharedScreen,
    history: History,
    completer: Option<Box<dyn AutoComplete>>,
    bracketed_paste: bool,
    /// Pasted text left over after the newline that completed a line.
    pending_paste: Option<String>,
}

impl Editor<TerminalEvents> {
    /// Read from stdin, draw on stderr.
    pub fn stderr() -> Self {
        Self::new(TerminalEvents::stdin(), Box::new(io::stderr()))
    }
}

impl<S: EventSource> Editor<S> {
    pub fn new(source: S, sink: Box<dyn Write + Send>) -> Self {
        Self {
            source,
            screen: Screen::shared(sink),
            history: History::default(),
            completer: None,
            bracketed_paste: false,
            pending_paste: None,
        }
    }

    pub fn with_history_capacity(mut self, capacity: usize) -> Self {
        let mut history = History::with_capacity(capacity);
        for entry in self.history.entries() {
            history.push(&entry);
        }
        self.history = history;
        self
    }

    pub fn bracketed_paste(&self) -> bool {
        self.bracketed_paste
    }

    fn next_event(&mut self) -> Result<Event, EditorError> {
        match self.source.next_event() {
            Ok(event) => Ok(event),
            Err(err) if err.kind() == io::ErrorKind::UnexpectedEof => {
                self.abandon()?;
                Err(EditorError::Eof)
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Handle one key. `Some` means the line is complete.
    fn handle_key(&mut self, key: KeyEvent) -> Result<Option<String>, EditorError> {
        let action = action_for(&key);
        match action {
            Action::Submit => return self.submit().map(Some),
            Action::Interrupt => {
                self.abandon()?;
                return Err(EditorError::Interrupted);
            }
            Action::EofOrDelete if self.line_is_empty() => {
                self.abandon()?;
                return Err(EditorError::Eof);
            }
            Action::HistoryOlder => {
                let current = self.screen.lock().text();
                if let Some(entry) = self.history.older(&current) {
                    self.replace_line(&entry)?;
                }
            }
            Action::HistoryNewer => {
                if let Some(entry) = self.history.newer() {
                    self.replace_line(&entry)?;
                }
            }
            Action::Other => self.complete_or_insert(key)?,
            edit => {
                let mut screen = self.screen.lock();
                match edit {
                    Action::EofOrDelete | Action::Delete => screen.delete(),
                    Action::Home => screen.home(),
                    Action::End => screen.end(),
                    Action::Left => screen.left(),
                    Action::Right => screen.right(),
                    Action::Backspace => screen.backspace(),
                    Action::KillToStart => screen.kill_to_start(),
                    Action::KillToEnd => screen.kill_to_end(),
                    Action::DeleteWord => screen.delete_word(),
                    Action::ClearScreen => {
                        screen.clear_all()?;
                        return Ok(None);
                    }
                    _ => {}
                }
                screen.refresh()?;
            }
        }
        Ok(None)
    }

    fn complete_or_insert(&mut self, key: KeyEvent) -> io::Result<()> {
        if let Some(completer) = self.completer.as_mut() {
            // The completer may print through a writer, which takes the
            // screen lock; don't hold it across the call.
            let (line, pos) = {
                let screen = self.screen.lock();
                (screen.text(), screen.byte_pos())
            };
            if let Some((new_line, new_pos)) = completer.complete(&line, pos, key.code) {
                let mut screen = self.screen.lock();
                screen.set_line_at(&new_line, new_pos);
                return screen.refresh();
            }
        }
        match key.code {
            KeyCode::Char(c)
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                let mut screen = self.screen.lock();
                screen.insert(c);
                screen.refresh()
            }
            _ => Ok(()),
        }
    }

    /// Insert pasted text literally. A newline in it completes the line;
    /// whatever follows is kept for the next `read_line`.
    fn insert_paste(&mut self, text: &str) -> Result<Option<String>, EditorError> {
        let Some(idx) = text.find(['\r', '\n']) else {
            let mut screen = self.screen.lock();
            text.chars().for_each(|c| screen.insert(c));
            screen.refresh()?;
            return Ok(None);
        };
        let skip = if text[idx..].starts_with("\r\n") { 2 } else { 1 };
        let rest = &text[idx + skip..];
        if !rest.is_empty() {
            self.pending_paste = Some(rest.to_string());
        }
        {
            let mut screen = self.screen.lock();
            text[..idx].chars().for_each(|c| screen.insert(c));
        }
        self.submit().map(Some)
    }

    fn line_is_empty(&self) -> bool {
        self.screen.lock().line.is_empty()
    }

    fn replace_line(&mut self, text: &str) -> io::Result<()> {
        let mut screen = self.screen.lock();
        screen.set_line(text);
        screen.refresh()
    }

    fn submit(&mut self) -> Result<String, EditorError> {
        let line = self.screen.lock().finish()?;
        self.history.record(&line);
        Ok(line)
    }

    /// Drop the current input and move to a fresh row.
    fn abandon(&mut self) -> io::Result<()> {
        self.screen.lock().finish().map(|_| ())
    }
}

impl<S: EventSource> LineEditor for Editor<S> {
    fn read_line(&mut self) -> Result<String, EditorError> {
        self.screen.lock().begin()?;
        let screen = Arc::clone(&self.screen);
        let _idle = scopeguard::guard((), move |_| screen.lock().active = false);
        self.history.reset_cursor();

        if let Some(text) = self.pending_paste.take() {
            if let Some(line) = self.insert_paste(&text)? {
                return Err(EditorError::PasteIndicator(line));
            }
        }

        loop {
            match self.next_event()? {
                Event::Key(key) if key.kind != KeyEventKind::Release => {
                    if let Some(line) = self.handle_key(key)? {
                        return Ok(line);
                    }
                }
                Event::Paste(text) => {
                    if let Some(line) = self.insert_paste(&text)? {
                        return Err(EditorError::PasteIndicator(line));
                    }
                }
                Event::Resize(..) => self.screen.lock().refresh()?,
                _ => {}
            }
        }
    }

    fn set_prompt(&mut self, prompt: &str) {
        self.screen.lock().prompt = prompt.to_string();
    }

    fn add_to_history(&mut self, entry: &str) {
        self.history.push(entry);
    }

    fn history(&self) -> Vec<String> {
        self.history.entries()
    }

    fn set_bracketed_paste_mode(&mut self, enabled: bool) -> io::Result<()> {
        let mut sequence = Vec::new();
        if enabled {
            execute!(sequence, EnableBracketedPaste)?;
        } else {
            execute!(sequence, DisableBracketedPaste)?;
        }
        self.screen.lock().write_raw(&sequence)?;
        self.bracketed_paste = enabled;
        Ok(())
    }

    fn set_auto_complete(&mut self, completer: Option<Box<dyn AutoComplete>>) {
        self.completer = completer;
    }

    fn writer(&self) -> Box<dyn Write + Send> {
        Box::new(EditorWriter::new(Arc::clone(&self.screen)))
    }
}
