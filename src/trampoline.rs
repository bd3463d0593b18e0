use line_editor::{AutoComplete, KeyCode};

use crate::session::SessionHandle;

/// Completion callback that also gets the session, e.g. to print suggestions
/// through [`SessionHandle::out`]. `pos` is a byte offset into `line`.
pub type AutoCompleteCallback =
    Box<dyn FnMut(&SessionHandle, &str, usize, KeyCode) -> Option<(String, usize)> + Send>;

/// Adapts an [`AutoCompleteCallback`] to the editor's narrower
/// [`AutoComplete`] hook by supplying the owning session on every call.
pub struct AutoCompleteTrampoline {
    session: SessionHandle,
    callback: AutoCompleteCallback,
}

impl AutoCompleteTrampoline {
    pub fn new(session: SessionHandle, callback: AutoCompleteCallback) -> Self {
        Self { session, callback }
    }
}

impl AutoComplete for AutoCompleteTrampoline {
    fn complete(&mut self, line: &str, pos: usize, key: KeyCode) -> Option<(String, usize)> {
        (self.callback)(&self.session, line, pos, key)
    }
}
