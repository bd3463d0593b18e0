//! Terminal mode snapshot and raw-mode transition over termios.

use std::io;
use std::mem::MaybeUninit;
use std::os::unix::io::RawFd;

/// Saved terminal attributes for one file descriptor.
#[derive(Clone, Copy)]
pub struct TermMode {
    attrs: libc::termios,
}

impl TermMode {
    /// Read the current attributes of `fd`.
    pub fn capture(fd: RawFd) -> io::Result<Self> {
        let mut attrs = MaybeUninit::<libc::termios>::uninit();
        if unsafe { libc::tcgetattr(fd, attrs.as_mut_ptr()) } != 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(Self {
            attrs: unsafe { attrs.assume_init() },
        })
    }

    /// Apply these attributes to `fd`.
    pub fn apply(&self, fd: RawFd) -> io::Result<()> {
        if unsafe { libc::tcsetattr(fd, libc::TCSANOW, &self.attrs) } != 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }

    /// Raw variant: no echo, no line buffering, no signal keys, no output
    /// post-processing (so `\n` is no longer turned into `\r\n`).
    fn raw(&self) -> Self {
        let mut attrs = self.attrs;
        unsafe { libc::cfmakeraw(&mut attrs) };
        attrs.c_cc[libc::VMIN] = 1;
        attrs.c_cc[libc::VTIME] = 0;
        Self { attrs }
    }

    pub fn is_raw(&self) -> bool {
        self.attrs.c_lflag & (libc::ICANON | libc::ECHO) == 0
    }
}

pub fn is_terminal(fd: RawFd) -> bool {
    unsafe { libc::isatty(fd) == 1 }
}

/// Switch `fd` to raw mode, returning the mode it was in before.
pub fn make_raw(fd: RawFd) -> io::Result<TermMode> {
    let original = TermMode::capture(fd)?;
    original.raw().apply(fd)?;
    Ok(original)
}
