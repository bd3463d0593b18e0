//! Mock line editor that replays scripted `read_line` results.

#![allow(dead_code)]

use parking_lot::Mutex;
use std::collections::VecDeque;
use std::io::{self, Write};
use std::sync::Arc;

use rawline::{AutoComplete, EditorError, KeyCode, LineEditor};

use super::Capture;

/// Everything the mock saw, shared so it survives the session.
#[derive(Default)]
pub struct Recorded {
    pub prompt: String,
    /// Bracketed paste switches, in order.
    pub paste_modes: Vec<bool>,
}

pub struct MockEditor {
    results: VecDeque<Result<String, EditorError>>,
    history: Vec<String>,
    completer: Option<Box<dyn AutoComplete>>,
    output: Capture,
    pub recorded: Arc<Mutex<Recorded>>,
}

impl MockEditor {
    pub fn new(output: Capture) -> Self {
        Self {
            results: VecDeque::new(),
            history: Vec::new(),
            completer: None,
            output,
            recorded: Arc::new(Mutex::new(Recorded::default())),
        }
    }

    pub fn line(mut self, line: &str) -> Self {
        self.results.push_back(Ok(line.to_string()));
        self
    }

    pub fn error(mut self, err: EditorError) -> Self {
        self.results.push_back(Err(err));
        self
    }

    /// Press a key as the real editor would, through the installed completer.
    pub fn press(&mut self, line: &str, pos: usize, key: KeyCode) -> Option<(String, usize)> {
        self.completer.as_mut()?.complete(line, pos, key)
    }
}

impl LineEditor for MockEditor {
    fn read_line(&mut self) -> Result<String, EditorError> {
        let result = self.results.pop_front().unwrap_or(Err(EditorError::Eof));
        match &result {
            Ok(line) | Err(EditorError::PasteIndicator(line)) => self.history.push(line.clone()),
            Err(_) => {}
        }
        result
    }

    fn set_prompt(&mut self, prompt: &str) {
        self.recorded.lock().prompt = prompt.to_string();
    }

    fn add_to_history(&mut self, entry: &str) {
        self.history.push(entry.to_string());
    }

    fn history(&self) -> Vec<String> {
        self.history.clone()
    }

    fn set_bracketed_paste_mode(&mut self, enabled: bool) -> io::Result<()> {
        self.recorded.lock().paste_modes.push(enabled);
        Ok(())
    }

    fn set_auto_complete(&mut self, completer: Option<Box<dyn AutoComplete>>) {
        self.completer = completer;
    }

    fn writer(&self) -> Box<dyn Write + Send> {
        Box::new(self.output.clone())
    }
}
