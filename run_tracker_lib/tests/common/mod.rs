#![allow(dead_code)]

use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use run_tracker_lib::{
    geo::EARTH_RADIUS_M, LocateKind, LocationError, LocationProvider, PositionOptions, RunTracker, Sample,
    SessionToken, Ticker, TrackerConfig,
};

#[derive(Debug, Default)]
pub struct FakeLocation {
    pub unavailable: bool,
    pub refuse_watch: Option<LocationError>,
    pub refuse_locate: Option<LocationError>,
    next_handle: u32,
    pub active_watches: Vec<(u32, SessionToken)>,
    pub watch_options: Vec<PositionOptions>,
    pub requests: Vec<(LocateKind, PositionOptions)>,
}

impl FakeLocation {
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Default::default()
        }
    }

    pub fn refusing_watch(error: LocationError) -> Self {
        Self {
            refuse_watch: Some(error),
            ..Default::default()
        }
    }

    pub fn refusing_locate(error: LocationError) -> Self {
        Self {
            refuse_locate: Some(error),
            ..Default::default()
        }
    }
}

impl LocationProvider for FakeLocation {
    type WatchHandle = u32;

    fn is_available(&self) -> bool {
        !self.unavailable
    }

    fn watch_position(&mut self, token: SessionToken, options: &PositionOptions) -> Result<u32, LocationError> {
        if let Some(error) = self.refuse_watch {
            return Err(error);
        }
        self.next_handle += 1;
        self.active_watches.push((self.next_handle, token));
        self.watch_options.push(*options);
        Ok(self.next_handle)
    }

    fn clear_watch(&mut self, handle: u32) {
        self.active_watches.retain(|(h, _)| *h != handle);
    }

    fn get_current_position(&mut self, kind: LocateKind, options: &PositionOptions) -> Result<(), LocationError> {
        if let Some(error) = self.refuse_locate {
            return Err(error);
        }
        self.requests.push((kind, *options));
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct FakeTicker {
    pub running: Option<(SessionToken, Duration)>,
    pub stop_calls: usize,
}

impl Ticker for FakeTicker {
    fn start(&mut self, token: SessionToken, period: Duration) {
        self.running = Some((token, period));
    }

    fn stop(&mut self) {
        self.running = None;
        self.stop_calls += 1;
    }
}

pub type TestTracker = RunTracker<FakeLocation, FakeTicker>;

pub fn tracker() -> TestTracker {
    RunTracker::new(TrackerConfig::default(), FakeLocation::default(), FakeTicker::default())
}

pub fn epoch() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp_millis(1_700_000_000_000).unwrap()
}

pub fn after_ms(ms: i64) -> DateTime<Utc> {
    epoch() + TimeDelta::milliseconds(ms)
}

/// Sample `meters` north of the origin on the equator.
pub fn north(meters: f64) -> Sample {
    Sample::new((meters / EARTH_RADIUS_M).to_degrees(), 0., epoch())
}
