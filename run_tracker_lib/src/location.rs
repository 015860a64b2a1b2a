use std::time::Duration;

use crate::{config::PositionOptions, error::LocationError, session::SessionToken};

/// Which one-shot request a position result answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocateKind {
    /// Explicit "locate me" from the user. Failures are reported.
    Manual,
    /// Silent attempt made while idle. Failures are swallowed.
    Initial,
}

/// The platform's location capability.
///
/// Implementations deliver results back to the tracker asynchronously: watch samples and
/// failures through `RunTracker::on_sample`/`on_watch_error` tagged with the token given to
/// `watch_position`, one-shot results through `RunTracker::on_located`.
pub trait LocationProvider {
    type WatchHandle;

    fn is_available(&self) -> bool;

    fn watch_position(
        &mut self,
        token: SessionToken,
        options: &PositionOptions,
    ) -> Result<Self::WatchHandle, LocationError>;

    /// After this returns no further callback for the handle may be delivered.
    fn clear_watch(&mut self, handle: Self::WatchHandle);

    fn get_current_position(&mut self, kind: LocateKind, options: &PositionOptions) -> Result<(), LocationError>;
}

/// Periodic callback source driving `RunTracker::on_tick`.
pub trait Ticker {
    fn start(&mut self, token: SessionToken, period: Duration);

    /// Must be idempotent; called on every exit path.
    fn stop(&mut self);
}
