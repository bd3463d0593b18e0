use std::collections::VecDeque;
use std::io::{self, BufRead, BufReader, IsTerminal, Stdin};

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};

/// Where the editor gets its input events from.
pub trait EventSource: Send {
    /// Block until the next event. `UnexpectedEof` means the input is gone.
    fn next_event(&mut self) -> io::Result<Event>;
}

fn plain_key(code: KeyCode) -> Event {
    Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
}

/// Events from stdin.
///
/// crossterm only reads a terminal (falling back to `/dev/tty`), so a piped
/// or redirected stdin is read line by line instead.
pub enum TerminalEvents {
    Tty,
    Stream(LineEvents<BufReader<Stdin>>),
}

impl TerminalEvents {
    pub fn stdin() -> Self {
        let stdin = io::stdin();
        if stdin.is_terminal() {
            Self::Tty
        } else {
            Self::Stream(LineEvents::new(BufReader::new(stdin)))
        }
    }
}

impl EventSource for TerminalEvents {
    fn next_event(&mut self) -> io::Result<Event> {
        match self {
            Self::Tty => crossterm::event::read(),
            Self::Stream(lines) => lines.next_event(),
        }
    }
}

/// Key events from a byte stream that is not a terminal.
///
/// Each line becomes one key press per character followed by Enter, with the
/// `\n` (or `\r\n`) dropped. A last line without a terminator is still
/// entered. Bytes that are not UTF-8 arrive as U+FFFD.
pub struct LineEvents<R> {
    reader: R,
    pending: VecDeque<Event>,
}

impl<R: BufRead> LineEvents<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            pending: VecDeque::new(),
        }
    }
}

impl<R: BufRead + Send> EventSource for LineEvents<R> {
    fn next_event(&mut self) -> io::Result<Event> {
        loop {
            if let Some(event) = self.pending.pop_front() {
                return Ok(event);
            }
            let mut raw = Vec::new();
            if self.reader.read_until(b'\n', &mut raw)? == 0 {
                return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "input closed"));
            }
            let line = raw.strip_suffix(b"\n").unwrap_or(&raw[..]);
            let line = line.strip_suffix(b"\r").unwrap_or(line);
            self.pending.extend(
                String::from_utf8_lossy(line)
                    .chars()
                    .map(|c| plain_key(KeyCode::Char(c))),
            );
            self.pending.push_back(plain_key(KeyCode::Enter));
        }
    }
}

/// A fixed queue of events, for driving an editor without a terminal.
#[derive(Debug, Default, Clone)]
pub struct ScriptedEvents {
    events: VecDeque<Event>,
}

impl ScriptedEvents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: Event) -> &mut Self {
        self.events.push_back(event);
        self
    }

    /// Queue one key press per character of `text`.
    pub fn typed(&mut self, text: &str) -> &mut Self {
        for c in text.chars() {
            self.key(KeyCode::Char(c));
        }
        self
    }

    pub fn key(&mut self, code: KeyCode) -> &mut Self {
        self.push(plain_key(code))
    }

    pub fn ctrl(&mut self, c: char) -> &mut Self {
        self.push(Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)))
    }

    pub fn paste(&mut self, text: &str) -> &mut Self {
        self.push(Event::Paste(text.to_string()))
    }

    pub fn take(&mut self) -> Self {
        std::mem::take(self)
    }
}

impl EventSource for ScriptedEvents {
    fn next_event(&mut self) -> io::Result<Event> {
        self.events
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "script exhausted"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn drain<S: EventSource>(source: &mut S) -> (Vec<Event>, io::ErrorKind) {
        let mut events = Vec::new();
        loop {
            match source.next_event() {
                Ok(event) => events.push(event),
                Err(err) => return (events, err.kind()),
            }
        }
    }

    #[test]
    fn lines_become_keys_then_enter() {
        let mut source = LineEvents::new(Cursor::new(b"ab\r\n\nc".to_vec()));
        let (events, end) = drain(&mut source);

        assert_eq!(
            events,
            vec![
                plain_key(KeyCode::Char('a')),
                plain_key(KeyCode::Char('b')),
                plain_key(KeyCode::Enter),
                plain_key(KeyCode::Enter),
                plain_key(KeyCode::Char('c')),
                plain_key(KeyCode::Enter),
            ]
        );
        assert_eq!(end, io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        let mut source = LineEvents::new(Cursor::new(b"\xffx\n".to_vec()));
        let (events, _) = drain(&mut source);
        assert_eq!(events[0], plain_key(KeyCode::Char('\u{fffd}')));
        assert_eq!(events[1], plain_key(KeyCode::Char('x')));
    }

    #[test]
    fn empty_stream_is_eof() {
        let mut source = LineEvents::new(Cursor::new(Vec::new()));
        let (events, end) = drain(&mut source);
        assert!(events.is_empty());
        assert_eq!(end, io::ErrorKind::UnexpectedEof);
    }
}
