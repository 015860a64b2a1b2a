mod common;

use std::{
    io,
    sync::{Arc, Mutex},
};

use common::*;
use run_tracker_lib::LocationError;
use tracing::Level;

#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl io::Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Captured {
    fn text(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

fn capture(run: impl FnOnce()) -> String {
    let captured = Captured::default();
    let writer = captured.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_ansi(false)
        .without_time()
        .with_writer(move || writer.clone())
        .finish();

    tracing::subscriber::with_default(subscriber, run);
    captured.text()
}

#[test]
fn session_lifecycle_is_logged() {
    let logs = capture(|| {
        let mut tracker = tracker();
        let token = tracker.start(epoch()).unwrap();
        tracker.on_sample(token, north(0.));
        tracker.stop();
        tracker.on_sample(token, north(5.));
    });

    assert!(logs.contains("INFO"), "{logs}");
    assert!(logs.contains("Started session #1"), "{logs}");
    assert!(logs.contains("Stopped session #1, status Idle"), "{logs}");
    assert!(logs.contains("Dropping sample from stale session #1"), "{logs}");
}

#[test]
fn ingest_failure_is_logged_as_warning() {
    let logs = capture(|| {
        let mut tracker = tracker();
        let token = tracker.start(epoch()).unwrap();
        tracker.on_watch_error(token, LocationError::PermissionDenied);
    });

    assert!(logs.contains("WARN"), "{logs}");
    assert!(logs.contains("Session #1 interrupted: PermissionDenied"), "{logs}");
}
