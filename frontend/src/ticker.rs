use std::time::Duration;

use gloo_timers::callback::Interval;
use run_tracker_lib::{SessionToken, Ticker};
use yew::Callback;

pub struct IntervalTicker {
    on_tick: Callback<SessionToken>,
    interval: Option<Interval>,
}

impl IntervalTicker {
    pub fn new(on_tick: Callback<SessionToken>) -> Self {
        Self {
            on_tick,
            interval: None,
        }
    }
}

impl Ticker for IntervalTicker {
    fn start(&mut self, token: SessionToken, period: Duration) {
        let on_tick = self.on_tick.clone();
        let interval = Interval::new(period.as_millis() as u32, move || on_tick.emit(token));

        // Replacing drops (and clears) any interval left over
        self.interval = Some(interval);
    }

    fn stop(&mut self) {
        // Dropping clears the browser interval
        self.interval = None;
    }
}
