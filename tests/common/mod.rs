//! Shared test utilities: pseudo-terminals and a scripted line editor.

#![allow(dead_code, unused_imports)]

pub mod mock_editor;

use parking_lot::Mutex;
use std::fs::File;
use std::io::{self, Write};
use std::os::unix::io::{AsRawFd, FromRawFd, OwnedFd, RawFd};
use std::sync::Arc;

use rawline::term_mode::TermMode;

pub use mock_editor::MockEditor;

/// Both ends of a pseudo-terminal. The slave behaves like a real tty, so
/// sessions can change its mode without touching the test runner's terminal.
pub struct Pty {
    pub master: OwnedFd,
    pub slave: OwnedFd,
}

impl Pty {
    pub fn slave_fd(&self) -> RawFd {
        self.slave.as_raw_fd()
    }
}

pub fn open_pty() -> Pty {
    let mut master = -1;
    let mut slave = -1;
    let rc = unsafe {
        libc::openpty(
            &mut master,
            &mut slave,
            std::ptr::null_mut(),
            std::ptr::null_mut(),
            std::ptr::null_mut(),
        )
    };
    assert_eq!(rc, 0, "openpty failed: {}", io::Error::last_os_error());
    unsafe {
        Pty {
            master: OwnedFd::from_raw_fd(master),
            slave: OwnedFd::from_raw_fd(slave),
        }
    }
}

/// Read end of a pipe that yields `input` and then end of file.
pub fn pipe_with(input: &[u8]) -> File {
    let mut fds = [-1; 2];
    let rc = unsafe { libc::pipe(fds.as_mut_ptr()) };
    assert_eq!(rc, 0, "pipe failed: {}", io::Error::last_os_error());
    let (reader, mut writer) = unsafe { (File::from_raw_fd(fds[0]), File::from_raw_fd(fds[1])) };
    writer.write_all(input).expect("write to pipe");
    reader
}

/// Let a child process started with `Command` keep `fd` open.
pub fn inherit_fd(fd: RawFd) {
    let rc = unsafe { libc::fcntl(fd, libc::F_SETFD, 0) };
    assert_eq!(rc, 0, "fcntl failed: {}", io::Error::last_os_error());
}

pub fn is_raw(fd: RawFd) -> bool {
    TermMode::capture(fd).expect("tcgetattr").is_raw()
}

/// Cloneable in-memory sink.
#[derive(Clone, Default)]
pub struct Capture(Arc<Mutex<Vec<u8>>>);

impl Capture {
    pub fn contents(&self) -> Vec<u8> {
        self.0.lock().clone()
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.contents()).into_owned()
    }

    pub fn clear(&self) {
        self.0.lock().clear();
    }
}

impl Write for Capture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
