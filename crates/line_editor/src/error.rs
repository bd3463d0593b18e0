use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EditorError {
    /// The line was completed by a newline inside a bracketed paste.
    /// Carries the text collected so far.
    #[error("line completed inside a bracketed paste")]
    PasteIndicator(String),

    /// Ctrl-C.
    #[error("interrupted")]
    Interrupted,

    /// Ctrl-D on an empty line, or the input source closed.
    #[error("end of input")]
    Eof,

    #[error(transparent)]
    Io(#[from] io::Error),
}
