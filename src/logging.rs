use tracing_subscriber::util::TryInitError;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::output::SessionOut;

/// Install a global subscriber that writes through `out`.
///
/// Filtering follows `RUST_LOG`, defaulting to `info`.
pub fn init_tracing(out: SessionOut, ansi: bool) -> Result<(), TryInitError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let layer = fmt::layer()
        .with_writer(out)
        .with_ansi(ansi)
        .with_target(false)
        .with_level(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init()
}
