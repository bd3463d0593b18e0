use std::io;
use std::os::unix::io::RawFd;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to put terminal (fd {fd}) into raw mode: {source}")]
    TerminalMode {
        fd: RawFd,
        #[source]
        source: io::Error,
    },

    #[error("failed to restore terminal mode (fd {fd}): {source}")]
    Restore {
        fd: RawFd,
        #[source]
        source: io::Error,
    },
}
