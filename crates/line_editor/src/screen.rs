use std::io::{self, Write};
use std::sync::Arc;

use crossterm::cursor::{MoveTo, MoveToColumn};
use crossterm::style::Print;
use crossterm::terminal::{Clear, ClearType};
use crossterm::queue;
use parking_lot::Mutex;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Prompt, input line and cursor as currently drawn, plus the sink they are
/// drawn to. Shared between the editor and its writers.
pub(crate) struct Screen {
    sink: Box<dyn Write + Send>,
    pub(crate) prompt: String,
    pub(crate) line: Vec<char>,
    /// Cursor position, in chars.
    pub(crate) pos: usize,
    /// A `read_line` is in progress and the prompt is on screen.
    pub(crate) active: bool,
}

pub(crate) type SharedScreen = Arc<Mutex<Screen>>;

impl Screen {
    pub(crate) fn shared(sink: Box<dyn Write + Send>) -> SharedScreen {
        Arc::new(Mutex::new(Self {
            sink,
            prompt: String::new(),
            line: Vec::new(),
            pos: 0,
            active: false,
        }))
    }

    pub(crate) fn begin(&mut self) -> io::Result<()> {
        self.line.clear();
        self.pos = 0;
        self.active = true;
        self.refresh()
    }

    /// End the current line and hand back its text.
    pub(crate) fn finish(&mut self) -> io::Result<String> {
        let text = self.line.drain(..).collect();
        self.pos = 0;
        self.active = false;
        self.sink.write_all(b"\r\n")?;
        self.sink.flush()?;
        Ok(text)
    }

    /// Redraw the prompt line and place the cursor.
    pub(crate) fn refresh(&mut self) -> io::Result<()> {
        let column = self.cursor_column();
        let text = self.text();
        let Self { sink, prompt, .. } = self;
        queue!(
            sink,
            Print("\r"),
            Print(prompt.as_str()),
            Print(text),
            Clear(ClearType::UntilNewLine),
            MoveToColumn(column)
        )?;
        sink.flush()
    }

    pub(crate) fn clear_all(&mut self) -> io::Result<()> {
        queue!(self.sink, Clear(ClearType::All), MoveTo(0, 0))?;
        self.refresh()
    }

    pub(crate) fn text(&self) -> String {
        self.line.iter().collect()
    }

    /// Cursor position as a byte offset into `text()`.
    pub(crate) fn byte_pos(&self) -> usize {
        self.line[..self.pos].iter().map(|c| c.len_utf8()).sum()
    }

    pub(crate) fn set_line(&mut self, text: &str) {
        self.line = text.chars().collect();
        self.pos = self.line.len();
    }

    /// Replace the line, with the cursor given as a byte offset.
    pub(crate) fn set_line_at(&mut self, text: &str, byte_pos: usize) {
        let byte_pos = byte_pos.min(text.len());
        let head = text.get(..byte_pos).unwrap_or(text);
        self.line = text.chars().collect();
        self.pos = head.chars().count();
    }

    pub(crate) fn insert(&mut self, c: char) {
        self.line.insert(self.pos, c);
        self.pos += 1;
    }

    pub(crate) fn backspace(&mut self) {
        if self.pos > 0 {
            self.pos -= 1;
            self.line.remove(self.pos);
        }
    }

    pub(crate) fn delete(&mut self) {
        if self.pos < self.line.len() {
            self.line.remove(self.pos);
        }
    }

    pub(crate) fn left(&mut self) {
        self.pos = self.pos.saturating_sub(1);
    }

    pub(crate) fn right(&mut self) {
        self.pos = (self.pos + 1).min(self.line.len());
    }

    pub(crate) fn home(&mut self) {
        self.pos = 0;
    }

    pub(crate) fn end(&mut self) {
        self.pos = self.line.len();
    }

    pub(crate) fn kill_to_start(&mut self) {
        self.line.drain(..self.pos);
        self.pos = 0;
    }

    pub(crate) fn kill_to_end(&mut self) {
        self.line.truncate(self.pos);
    }

    /// Delete the word before the cursor, and the blanks after it.
    pub(crate) fn delete_word(&mut self) {
        let mut start = self.pos;
        while start > 0 && self.line[start - 1] == ' ' {
            start -= 1;
        }
        while start > 0 && self.line[start - 1] != ' ' {
            start -= 1;
        }
        self.line.drain(start..self.pos);
        self.pos = start;
    }

    pub(crate) fn write_raw(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.sink.write_all(bytes)?;
        self.sink.flush()
    }

    /// Print `buf` without disturbing the input line: while reading, the
    /// prompt is cleared, `buf` written, and the prompt drawn again.
    fn write_above(&mut self, buf: &[u8]) -> io::Result<()> {
        if !self.active {
            return self.sink.write_all(buf);
        }
        queue!(self.sink, Print("\r"), Clear(ClearType::CurrentLine))?;
        self.sink.write_all(buf)?;
        self.refresh()
    }

    fn cursor_column(&self) -> u16 {
        let input: usize = self.line[..self.pos]
            .iter()
            .map(|c| c.width().unwrap_or(0))
            .sum();
        (self.prompt.width() + input).min(u16::MAX as usize) as u16
    }
}

/// Output handle for text that should appear above the prompt.
#[derive(Clone)]
pub struct EditorWriter {
    screen: SharedScreen,
}

impl EditorWriter {
    pub(crate) fn new(screen: SharedScreen) -> Self {
        Self { screen }
    }
}

impl Write for EditorWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.screen.lock().write_above(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.screen.lock().sink.flush()
    }
}
