use std::io::{self, Write};
use std::mem;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing_subscriber::fmt::MakeWriter;

use crate::cr_writer::CrWriter;

type Sink = Box<dyn Write + Send>;

enum Output {
    /// Terminal is raw: every `\n` needs a `\r`.
    Raw(CrWriter<Sink>),
    Plain(Sink),
}

/// The session's output sink.
///
/// Clones share the same sink, so a handle given to a logger or a completion
/// callback follows the session: CR-translating while raw mode is on, plain
/// passthrough once the session is closed.
#[derive(Clone)]
pub struct SessionOut {
    inner: Arc<Mutex<Output>>,
}

impl SessionOut {
    pub(crate) fn raw(sink: Sink) -> Self {
        Self::from_output(Output::Raw(CrWriter::new(sink)))
    }

    pub(crate) fn plain(sink: Sink) -> Self {
        Self::from_output(Output::Plain(sink))
    }

    fn from_output(output: Output) -> Self {
        Self {
            inner: Arc::new(Mutex::new(output)),
        }
    }

    /// Whether output is currently CR-translated.
    pub fn is_raw(&self) -> bool {
        matches!(*self.inner.lock(), Output::Raw(_))
    }

    /// Release the translation buffer, if any.
    pub fn reset(&self) {
        if let Output::Raw(writer) = &mut *self.inner.lock() {
            writer.reset();
        }
    }

    /// Drop CR translation and write straight to the underlying sink.
    pub(crate) fn make_plain(&self) {
        let mut output = self.inner.lock();
        let current = mem::replace(&mut *output, Output::Plain(Box::new(io::sink())));
        *output = match current {
            Output::Raw(writer) => Output::Plain(writer.into_inner()),
            plain => plain,
        };
    }
}

impl Write for SessionOut {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match &mut *self.inner.lock() {
            Output::Raw(writer) => writer.write(buf),
            Output::Plain(sink) => sink.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match &mut *self.inner.lock() {
            Output::Raw(writer) => writer.flush(),
            Output::Plain(sink) => sink.flush(),
        }
    }
}

impl<'a> MakeWriter<'a> for SessionOut {
    type Writer = SessionOut;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
