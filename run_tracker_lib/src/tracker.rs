use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::{
    config::TrackerConfig,
    error::LocationError,
    geo::DistanceAccumulator,
    location::{LocateKind, LocationProvider, Ticker},
    sample::Sample,
    session::{transition, SessionEvent, SessionStatus, SessionToken},
    stats::RunStats,
};

/// Owns the state of the run being tracked and the subscriptions feeding it.
///
/// All platform callbacks come back through the `on_*` methods. Session-scoped callbacks
/// carry the token they were registered with and are dropped unless it is the current one
/// and the session is still tracking.
pub struct RunTracker<L: LocationProvider, T: Ticker> {
    config: TrackerConfig,
    location: L,
    ticker: T,

    status: SessionStatus,
    token: SessionToken,
    watch: Option<L::WatchHandle>,
    session_start: Option<DateTime<Utc>>,

    current_position: Option<Sample>,
    route: Vec<Sample>,
    stats: RunStats,
    accumulator: DistanceAccumulator,
    error_message: Option<&'static str>,
}

/// What the map and stats overlay render.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackerView<'a> {
    pub current_position: Option<&'a Sample>,
    pub route: &'a [Sample],
    pub status: SessionStatus,
    pub stats: RunStats,
    pub error_message: Option<&'static str>,
}

impl<L: LocationProvider, T: Ticker> RunTracker<L, T> {
    pub fn new(config: TrackerConfig, location: L, ticker: T) -> Self {
        let accumulator = DistanceAccumulator::new(config.jitter_threshold_m);

        Self {
            config,
            location,
            ticker,
            status: SessionStatus::Idle,
            token: SessionToken::default(),
            watch: None,
            session_start: None,
            current_position: None,
            route: Vec::new(),
            stats: RunStats::default(),
            accumulator,
            error_message: None,
        }
    }

    /// Begins a new session at `now`, discarding the previous route and stats.
    pub fn start(&mut self, now: DateTime<Utc>) -> Result<SessionToken, LocationError> {
        let Some(next) = transition(self.status, SessionEvent::Start) else {
            warn!("Start ignored while {:?}", self.status);
            return Ok(self.token);
        };

        if !self.location.is_available() {
            warn!("Cannot start, no location capability");
            self.error_message = Some(LocationError::Unsupported.tracking_message());
            return Err(LocationError::Unsupported);
        }

        self.token = self.token.next();
        self.status = next;
        self.error_message = None;
        self.route.clear();
        self.stats = RunStats::default();
        self.accumulator.reset();
        self.session_start = Some(now);

        self.ticker.start(self.token, self.config.tick_period);

        match self.location.watch_position(self.token, &self.config.watch_options) {
            Ok(handle) => self.watch = Some(handle),
            Err(error) => {
                self.fail(error);
                return Err(error);
            }
        }

        info!("Started session {}", self.token);
        Ok(self.token)
    }

    pub fn stop(&mut self) {
        self.release();
        self.apply(SessionEvent::Stop);
        info!("Stopped session {}, status {:?}", self.token, self.status);
    }

    /// Called when the owner goes away. Also runs on drop.
    pub fn teardown(&mut self) {
        self.release();
        self.apply(SessionEvent::Teardown);
    }

    pub fn on_sample(&mut self, token: SessionToken, sample: Sample) -> bool {
        if !self.is_current(token) {
            warn!("Dropping sample from stale session {} (current {})", token, self.token);
            return false;
        }

        if !sample.is_finite() {
            warn!("Dropping non-finite sample ({}, {})", sample.latitude, sample.longitude);
            return false;
        }

        self.current_position = Some(sample);
        self.route.push(sample);

        let step = self.accumulator.on_sample(&sample);
        if let Some(speed) = step.speed {
            self.stats.distance_m += step.distance_delta;
            self.stats.current_speed_mps = speed;
        }

        true
    }

    pub fn on_watch_error(&mut self, token: SessionToken, error: LocationError) -> bool {
        if !self.is_current(token) {
            warn!("Dropping {:?} from stale session {}", error, token);
            return false;
        }

        self.fail(error);
        true
    }

    pub fn on_tick(&mut self, token: SessionToken, now: DateTime<Utc>) -> bool {
        if !self.is_current(token) {
            return false;
        }

        let Some(session_start) = self.session_start else {
            return false;
        };

        // Derived from the start time so late or skipped ticks do not accumulate drift
        let elapsed_ms = now.signed_duration_since(session_start).num_milliseconds().max(0);
        self.stats.elapsed_s = elapsed_ms as u64 / 1000;
        true
    }

    /// One-shot position request on user demand. Independent of the session.
    pub fn locate_me(&mut self) -> Result<(), LocationError> {
        if !self.location.is_available() {
            self.error_message = Some(LocationError::Unsupported.locate_message());
            return Err(LocationError::Unsupported);
        }

        self.error_message = None;
        let options = self.config.locate_options;
        let result = self.location.get_current_position(LocateKind::Manual, &options);
        if let Err(error) = result {
            self.on_located(LocateKind::Manual, Err(error));
        }
        result
    }

    /// Silent best-effort fix while idle so the map has somewhere to start.
    pub fn request_initial_position(&mut self) -> bool {
        if self.status != SessionStatus::Idle || !self.location.is_available() {
            return false;
        }

        let options = self.config.initial_options;
        match self.location.get_current_position(LocateKind::Initial, &options) {
            Ok(()) => true,
            Err(error) => {
                debug!("Initial position request failed: {:?}", error);
                false
            }
        }
    }

    pub fn on_located(&mut self, kind: LocateKind, result: Result<Sample, LocationError>) {
        match (kind, result) {
            (_, Ok(sample)) => self.current_position = Some(sample),
            (LocateKind::Manual, Err(error)) => {
                warn!("Locate failed: {:?}", error);
                self.error_message = Some(error.locate_message());
            }
            (LocateKind::Initial, Err(error)) => debug!("Initial locate failed: {:?}", error),
        }
    }

    pub fn view(&self) -> TrackerView<'_> {
        TrackerView {
            current_position: self.current_position.as_ref(),
            route: &self.route,
            status: self.status,
            stats: self.stats,
            error_message: self.error_message,
        }
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn token(&self) -> SessionToken {
        self.token
    }

    pub fn stats(&self) -> RunStats {
        self.stats
    }

    pub fn route(&self) -> &[Sample] {
        &self.route
    }

    pub fn current_position(&self) -> Option<&Sample> {
        self.current_position.as_ref()
    }

    pub fn error_message(&self) -> Option<&'static str> {
        self.error_message
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub fn location(&self) -> &L {
        &self.location
    }

    pub fn ticker(&self) -> &T {
        &self.ticker
    }

    fn is_current(&self, token: SessionToken) -> bool {
        token == self.token && self.status == SessionStatus::Tracking
    }

    fn fail(&mut self, error: LocationError) {
        warn!("Session {} interrupted: {:?}", self.token, error);
        self.error_message = Some(error.tracking_message());
        self.release();
        self.apply(SessionEvent::IngestFailure);
    }

    fn release(&mut self) {
        if let Some(handle) = self.watch.take() {
            self.location.clear_watch(handle);
        }
        self.ticker.stop();
    }

    fn apply(&mut self, event: SessionEvent) {
        match transition(self.status, event) {
            Some(next) => self.status = next,
            None => warn!("{:?} ignored while {:?}", event, self.status),
        }
    }
}

impl<L: LocationProvider, T: Ticker> Drop for RunTracker<L, T> {
    fn drop(&mut self) {
        self.release();
    }
}
