use std::{cell::RefCell, mem, rc::Rc};

use chrono::{DateTime, Utc};
use run_tracker_lib::{LocateKind, LocationError, LocationProvider, PositionOptions, Sample, SessionToken};
use wasm_bindgen::{closure::Closure, JsCast};
use web_sys::{Geolocation, GeolocationPosition, GeolocationPositionError};
use yew::Callback;

pub type LocateResult = (LocateKind, Result<Sample, LocationError>);

/// `navigator.geolocation` as a location capability. Results are emitted on the given callbacks.
pub struct BrowserLocation {
    geolocation: Option<Geolocation>,
    on_sample: Callback<(SessionToken, Sample)>,
    on_watch_error: Callback<(SessionToken, LocationError)>,
    on_located: Callback<LocateResult>,
    watches: Rc<RefCell<WatchKeeper<WatchHandle>>>,
}

/// Keeps the closures of cleared watches alive.
///
/// The browser may still run a callback it queued before `clearWatch`, so retired handles are
/// only released once the current watch delivers a position.
#[derive(Debug)]
pub struct WatchKeeper<H> {
    current: Option<SessionToken>,
    retired: Vec<H>,
}

impl<H> Default for WatchKeeper<H> {
    fn default() -> Self {
        Self {
            current: None,
            retired: Vec::new(),
        }
    }
}

impl<H> WatchKeeper<H> {
    pub fn activate(&mut self, token: SessionToken) {
        self.current = Some(token);
    }

    pub fn retire(&mut self, handle: H) {
        self.current = None;
        self.retired.push(handle);
    }

    /// Returns the handles that are safe to drop now. Deliveries from retired watches release nothing.
    #[must_use]
    pub fn on_delivery(&mut self, token: SessionToken) -> Vec<H> {
        if self.current == Some(token) {
            mem::take(&mut self.retired)
        } else {
            Vec::new()
        }
    }

    pub fn retired(&self) -> usize {
        self.retired.len()
    }
}

pub struct WatchHandle {
    id: i32,
    _on_position: Closure<dyn FnMut(GeolocationPosition)>,
    _on_error: Closure<dyn FnMut(GeolocationPositionError)>,
}

impl BrowserLocation {
    pub fn new(
        on_sample: Callback<(SessionToken, Sample)>,
        on_watch_error: Callback<(SessionToken, LocationError)>,
        on_located: Callback<LocateResult>,
    ) -> Self {
        let geolocation = web_sys::window()
            .and_then(|window| window.navigator().geolocation().ok())
            .filter(|geolocation| !geolocation.is_undefined() && !geolocation.is_null());

        Self {
            geolocation,
            on_sample,
            on_watch_error,
            on_located,
            watches: Rc::default(),
        }
    }
}

impl LocationProvider for BrowserLocation {
    type WatchHandle = WatchHandle;

    fn is_available(&self) -> bool {
        self.geolocation.is_some()
    }

    fn watch_position(&mut self, token: SessionToken, options: &PositionOptions) -> Result<WatchHandle, LocationError> {
        let geolocation = self.geolocation.as_ref().ok_or(LocationError::Unsupported)?;

        let on_sample = self.on_sample.clone();
        let watches = Rc::clone(&self.watches);
        let on_position = Closure::<dyn FnMut(GeolocationPosition)>::new(move |position: GeolocationPosition| {
            // Dropped outside the borrow, emitting may re-enter `clear_watch`
            let released = watches.borrow_mut().on_delivery(token);
            drop(released);
            on_sample.emit((token, to_sample(&position)));
        });

        let on_watch_error = self.on_watch_error.clone();
        let on_error = Closure::<dyn FnMut(GeolocationPositionError)>::new(move |error: GeolocationPositionError| {
            on_watch_error.emit((token, LocationError::from_code(error.code())));
        });

        let id = geolocation
            .watch_position_with_error_callback_and_options(
                on_position.as_ref().unchecked_ref(),
                Some(on_error.as_ref().unchecked_ref()),
                &to_web_options(options),
            );

        self.watches.borrow_mut().activate(token);
        Ok(WatchHandle {
            id,
            _on_position: on_position,
            _on_error: on_error,
        })
    }

    fn clear_watch(&mut self, handle: WatchHandle) {
        if let Some(geolocation) = &self.geolocation {
            geolocation.clear_watch(handle.id);
        }
        self.watches.borrow_mut().retire(handle);
    }

    fn get_current_position(&mut self, kind: LocateKind, options: &PositionOptions) -> Result<(), LocationError> {
        let geolocation = self.geolocation.as_ref().ok_or(LocationError::Unsupported)?;

        let on_located = self.on_located.clone();
        let on_success = Closure::once_into_js(move |position: GeolocationPosition| {
            on_located.emit((kind, Ok(to_sample(&position))));
        });

        let on_located = self.on_located.clone();
        let on_failure = Closure::once_into_js(move |error: GeolocationPositionError| {
            on_located.emit((kind, Err(LocationError::from_code(error.code()))));
        });

        geolocation.get_current_position_with_error_callback_and_options(
            on_success.unchecked_ref(),
            Some(on_failure.unchecked_ref()),
            &to_web_options(options),
        );
        Ok(())
    }
}

fn to_sample(position: &GeolocationPosition) -> Sample {
    let coords = position.coords();
    let timestamp = DateTime::from_timestamp_millis(position.timestamp() as i64).unwrap_or_else(Utc::now);

    Sample::new(coords.latitude(), coords.longitude(), timestamp).with_speed(coords.speed())
}

fn to_web_options(options: &PositionOptions) -> web_sys::PositionOptions {
    let web_options = web_sys::PositionOptions::new();
    web_options.set_enable_high_accuracy(options.high_accuracy);
    web_options.set_timeout(options.timeout.as_millis() as u32);
    if let Some(maximum_age) = options.maximum_age {
        web_options.set_maximum_age(maximum_age.as_millis() as u32);
    }
    web_options
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retired_watches_survive_until_current_delivers() {
        let mut keeper = WatchKeeper::default();
        let first = SessionToken::default().next();
        let second = first.next();
        let third = second.next();

        // Fast stop, start, stop, start
        keeper.activate(first);
        keeper.retire(1);
        keeper.activate(second);
        keeper.retire(2);
        keeper.activate(third);
        assert_eq!(keeper.retired(), 2);

        // Late callbacks of older watches keep everything alive
        assert!(keeper.on_delivery(first).is_empty());
        assert!(keeper.on_delivery(second).is_empty());
        assert_eq!(keeper.retired(), 2);

        assert_eq!(keeper.on_delivery(third), vec![1, 2]);
        assert_eq!(keeper.retired(), 0);
    }

    #[test]
    fn nothing_is_released_while_no_watch_is_active() {
        let mut keeper = WatchKeeper::default();
        let token = SessionToken::default().next();
        keeper.activate(token);
        keeper.retire(7);

        assert!(keeper.on_delivery(token).is_empty());
        assert_eq!(keeper.retired(), 1);
    }
}
