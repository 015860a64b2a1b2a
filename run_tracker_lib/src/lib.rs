pub mod config;
pub mod error;
pub mod geo;
pub mod location;
pub mod sample;
pub mod session;
pub mod stats;
pub mod tracker;

pub use config::{PositionOptions, TrackerConfig};
pub use error::{ConfigError, LocationError};
pub use location::{LocateKind, LocationProvider, Ticker};
pub use sample::Sample;
pub use session::{SessionStatus, SessionToken};
pub use stats::RunStats;
pub use tracker::{RunTracker, TrackerView};
