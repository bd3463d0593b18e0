//! Shared slot for the saved terminal mode.
//!
//! The session, the panic hook and the signal watcher all hold the same slot.
//! Whoever restores first takes the snapshot out of it, so the terminal mode
//! is restored exactly once.

use std::io;
use std::os::unix::io::RawFd;
use std::sync::Arc;
use std::thread;

use parking_lot::Mutex;
use signal_hook::consts::{SIGHUP, SIGQUIT, SIGTERM};
use signal_hook::iterator::Signals;

use crate::term_mode::TermMode;

#[derive(Clone)]
pub(crate) struct SavedMode {
    fd: RawFd,
    slot: Arc<Mutex<Option<TermMode>>>,
}

impl SavedMode {
    pub(crate) fn new(fd: RawFd, mode: Option<TermMode>) -> Self {
        Self {
            fd,
            slot: Arc::new(Mutex::new(mode)),
        }
    }

    /// The terminal is still in the mode this session put it in.
    pub(crate) fn is_held(&self) -> bool {
        self.slot.lock().is_some()
    }

    /// Put the saved mode back. `None` if someone already did.
    pub(crate) fn restore(&self) -> Option<io::Result<()>> {
        let mode = self.slot.lock().take()?;
        Some(mode.apply(self.fd))
    }

    /// Best effort, for contexts that must not block (panic hook, signal).
    fn restore_now(&self) {
        if let Some(mut slot) = self.slot.try_lock() {
            if let Some(mode) = slot.take() {
                let _ = mode.apply(self.fd);
            }
        }
    }

    pub(crate) fn install_panic_hook(&self) {
        let saved = self.clone();
        let default_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            saved.restore_now();
            default_hook(info);
        }));
    }

    /// Restore on SIGTERM, SIGHUP or SIGQUIT, then let the signal's default
    /// action run.
    ///
    /// The watcher stays for the life of the process. Once the slot is empty
    /// it only re-delivers the default action; stopping it would leave the
    /// signals registered and ignored.
    pub(crate) fn spawn_signal_watcher(&self) -> io::Result<()> {
        let mut signals = Signals::new([SIGTERM, SIGHUP, SIGQUIT])?;
        let saved = self.clone();
        thread::Builder::new()
            .name("rawline-signals".to_string())
            .spawn(move || {
                for signal in signals.forever() {
                    saved.restore_now();
                    let _ = signal_hook::low_level::emulate_default_handler(signal);
                }
            })?;
        Ok(())
    }
}
