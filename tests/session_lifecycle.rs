mod common;

use std::fs;
use std::io::{BufReader, Write};
use std::panic;
use std::os::unix::io::AsRawFd;

use common::{is_raw, open_pty, pipe_with, Capture, MockEditor};
use rawline::term_mode;
use rawline::{Editor, EditorError, KeyCode, LineEditor, LineEvents, ScriptedEvents, Session};
use tempfile::TempDir;

#[test]
fn non_terminal_session_leaves_mode_and_output_alone() {
    let file = tempfile::tempfile().unwrap();
    let capture = Capture::default();
    let mut session = Session::open_with(file.as_raw_fd(), MockEditor::new(capture.clone())).unwrap();

    assert!(!session.is_terminal());
    assert!(!session.is_terminal());
    assert!(!session.is_raw());
    assert!(!session.out().is_raw());

    session.out().write_all(b"a\nb\n").unwrap();
    assert_eq!(capture.contents(), b"a\nb\n");
    assert!(session.editor().recorded.lock().paste_modes.is_empty());

    assert!(session.close().is_ok());
}

#[test]
fn open_enters_raw_mode_and_close_restores_it() {
    let pty = open_pty();
    assert!(!is_raw(pty.slave_fd()));

    let capture = Capture::default();
    let mut session = Session::open_with(pty.slave_fd(), MockEditor::new(capture.clone())).unwrap();
    assert!(session.is_terminal());
    assert!(session.is_raw());
    assert!(is_raw(pty.slave_fd()));

    session.close().unwrap();
    assert!(!session.is_raw());
    assert!(!is_raw(pty.slave_fd()));
    assert!(session.is_terminal());
}

#[test]
fn output_gets_carriage_returns_only_while_raw() {
    let pty = open_pty();
    let capture = Capture::default();
    let mut session = Session::open_with(pty.slave_fd(), MockEditor::new(capture.clone())).unwrap();
    let mut out = session.out();

    let n = out.write(b"a\nb\n").unwrap();
    assert_eq!(n, 4);
    assert_eq!(capture.contents(), b"a\r\nb\r\n");

    session.close().unwrap();
    capture.clear();
    out.write_all(b"c\n").unwrap();
    assert_eq!(capture.contents(), b"c\n");
}

#[test]
fn second_close_does_not_restore_again() {
    let pty = open_pty();
    let mut session =
        Session::open_with(pty.slave_fd(), MockEditor::new(Capture::default())).unwrap();

    session.close().unwrap();
    assert!(!is_raw(pty.slave_fd()));

    // Someone else puts the terminal back into raw mode; a second close
    // must leave it that way.
    let cooked = term_mode::make_raw(pty.slave_fd()).unwrap();
    assert!(session.close().is_ok());
    assert!(is_raw(pty.slave_fd()));
    cooked.apply(pty.slave_fd()).unwrap();
}

#[test]
fn drop_restores_mode() {
    let pty = open_pty();
    {
        let _session =
            Session::open_with(pty.slave_fd(), MockEditor::new(Capture::default())).unwrap();
        assert!(is_raw(pty.slave_fd()));
    }
    assert!(!is_raw(pty.slave_fd()));
}

#[test]
fn bracketed_paste_is_on_while_open() {
    let pty = open_pty();
    let editor = MockEditor::new(Capture::default());
    let recorded = editor.recorded.clone();
    let mut session = Session::open_with(pty.slave_fd(), editor).unwrap();
    assert_eq!(recorded.lock().paste_modes, vec![true]);

    session.close().unwrap();
    session.close().unwrap();
    assert_eq!(recorded.lock().paste_modes, vec![true, false]);
}

#[test]
fn bracketed_paste_can_be_turned_off() {
    let pty = open_pty();
    let editor = MockEditor::new(Capture::default());
    let recorded = editor.recorded.clone();
    let mut session = Session::open_with(pty.slave_fd(), editor).unwrap();

    session.set_bracketed_paste(false);
    session.set_bracketed_paste(false);
    drop(session);
    assert_eq!(recorded.lock().paste_modes, vec![true, false]);
}

#[test]
fn history_is_loaded_and_saved_on_close() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("history");
    fs::write(&path, "ls\ncd /tmp\n").unwrap();

    let pty = open_pty();
    let editor = MockEditor::new(Capture::default()).line("pwd");
    let mut session = Session::open_with(pty.slave_fd(), editor).unwrap();

    session.set_history_file(&path);
    assert_eq!(session.history_file(), Some(path.as_path()));
    assert_eq!(session.editor().history(), vec!["ls", "cd /tmp"]);

    assert_eq!(session.read_line().unwrap(), "pwd");
    session.close().unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "ls\ncd /tmp\npwd\n");
}

#[test]
fn missing_history_file_is_created() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("new_history");

    let pty = open_pty();
    let mut session =
        Session::open_with(pty.slave_fd(), MockEditor::new(Capture::default())).unwrap();
    session.set_history_file(&path);

    assert!(path.exists());
    assert!(session.editor().history().is_empty());
}

#[test]
fn broken_history_file_does_not_stop_the_session() {
    let dir = TempDir::new().unwrap();

    let pty = open_pty();
    let editor = MockEditor::new(Capture::default()).line("still works");
    let mut session = Session::open_with(pty.slave_fd(), editor).unwrap();

    // A directory can be neither read as history nor written to.
    session.set_history_file(dir.path());
    assert!(session.editor().history().is_empty());
    assert_eq!(session.read_line().unwrap(), "still works");
    assert!(session.close().is_ok());
}

#[test]
fn empty_history_path_is_ignored() {
    let pty = open_pty();
    let mut session =
        Session::open_with(pty.slave_fd(), MockEditor::new(Capture::default())).unwrap();

    session.set_history_file("");
    assert!(session.history_file().is_none());
    assert!(session.close().is_ok());
}

#[test]
fn history_is_not_saved_without_raw_mode() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("history");
    let file = tempfile::tempfile().unwrap();

    let editor = MockEditor::new(Capture::default()).line("echo");
    let mut session = Session::open_with(file.as_raw_fd(), editor).unwrap();
    session.set_history_file(&path);
    session.read_line().unwrap();
    session.close().unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "");
}

#[test]
fn paste_indicator_is_not_an_error() {
    let file = tempfile::tempfile().unwrap();
    let editor = MockEditor::new(Capture::default())
        .error(EditorError::PasteIndicator("pasted text".to_string()))
        .error(EditorError::Interrupted)
        .error(EditorError::Io(std::io::Error::other("boom")));
    let mut session = Session::open_with(file.as_raw_fd(), editor).unwrap();

    assert_eq!(session.read_line().unwrap(), "pasted text");
    assert!(matches!(session.read_line(), Err(EditorError::Interrupted)));
    assert!(matches!(session.read_line(), Err(EditorError::Io(_))));
    assert!(matches!(session.read_line(), Err(EditorError::Eof)));
}

#[test]
fn completion_callback_sees_the_session() {
    let pty = open_pty();
    let capture = Capture::default();
    let mut session = Session::open_with(pty.slave_fd(), MockEditor::new(capture.clone())).unwrap();
    let fd = session.fd();

    session.set_auto_complete_callback(move |session, line, pos, key| {
        assert_eq!(session.fd(), fd);
        assert!(session.is_terminal());
        if key != KeyCode::Tab {
            return None;
        }
        writeln!(session.out(), "candidates: {}", line).ok()?;
        Some((format!("{}ory", line), pos + 3))
    });

    let editor = session.editor_mut();
    assert_eq!(editor.press("hist", 4, KeyCode::Char('x')), None);
    assert_eq!(
        editor.press("hist", 4, KeyCode::Tab),
        Some(("history".to_string(), 7))
    );
    assert_eq!(capture.contents(), b"candidates: hist\r\n");
}

#[test]
fn restore_on_signals_twice_is_harmless() {
    let pty = open_pty();
    let mut session =
        Session::open_with(pty.slave_fd(), MockEditor::new(Capture::default())).unwrap();
    session.restore_on_signals().unwrap();
    session.restore_on_signals().unwrap();
    session.close().unwrap();
    assert!(!is_raw(pty.slave_fd()));
}

#[test]
fn panic_restores_mode_and_close_still_saves_history() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("history");
    fs::write(&path, "ls\n").unwrap();

    let pty = open_pty();
    let mut session =
        Session::open_with(pty.slave_fd(), MockEditor::new(Capture::default())).unwrap();
    session.set_history_file(&path);
    session.restore_on_panic();
    assert!(is_raw(pty.slave_fd()));

    let result = panic::catch_unwind(|| panic!("boom"));
    assert!(result.is_err());
    assert!(!is_raw(pty.slave_fd()));
    assert!(!session.is_raw());

    assert!(session.close().is_ok());
    assert!(!is_raw(pty.slave_fd()));
    assert_eq!(fs::read_to_string(&path).unwrap(), "ls\n");
}

#[test]
fn piped_input_is_read_line_by_line() {
    let input = pipe_with(b"echo hello\nexit\n");
    let fd = input.as_raw_fd();
    let screen = Capture::default();
    let editor = Editor::new(LineEvents::new(BufReader::new(input)), Box::new(screen.clone()));
    let mut session = Session::open_with(fd, editor).unwrap();

    assert!(!session.is_terminal());
    assert_eq!(session.read_line().unwrap(), "echo hello");
    assert_eq!(session.read_line().unwrap(), "exit");
    assert!(matches!(session.read_line(), Err(EditorError::Eof)));

    session.out().write_all(b"hello\n").unwrap();
    assert!(screen.text().ends_with("hello\n"));
    assert!(!screen.text().contains("\x1b[?2004h"));
}

#[test]
fn real_editor_end_to_end() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("history");
    fs::write(&path, "ls\n").unwrap();

    let mut script = ScriptedEvents::new();
    script
        .typed("pwd")
        .key(KeyCode::Enter)
        .paste("echo pasted\n")
        .key(KeyCode::Up)
        .key(KeyCode::Up)
        .key(KeyCode::Up)
        .key(KeyCode::Enter);
    let screen = Capture::default();
    let editor = Editor::new(script.take(), Box::new(screen.clone()));

    let pty = open_pty();
    let mut session = Session::open_with(pty.slave_fd(), editor).unwrap();
    session.set_prompt("$ ");
    session.set_history_file(&path);

    assert_eq!(session.read_line().unwrap(), "pwd");
    assert_eq!(session.read_line().unwrap(), "echo pasted");
    assert_eq!(session.read_line().unwrap(), "ls");
    assert!(matches!(session.read_line(), Err(EditorError::Eof)));
    assert!(screen.text().contains("$ pwd"));
    assert!(screen.text().contains("\x1b[?2004h"));

    session.close().unwrap();
    assert!(screen.text().ends_with("\x1b[?2004l"));
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "ls\npwd\necho pasted\nls\n"
    );
}
