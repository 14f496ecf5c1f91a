//! The fixed wait used when the catalog has not caught up yet.

use std::time::Duration;

/// How long to wait when a freshly added key is not yet reported installed.
pub const INSTALL_CONFIRMATION_WAIT: Duration = Duration::from_secs(1);

/// Blocks the calling thread for a duration.
pub trait Pause {
    /// Block for `duration`.
    fn pause(&self, duration: Duration);
}

/// [`Pause`] backed by [`std::thread::sleep`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleep;

impl Pause for ThreadSleep {
    fn pause(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}
