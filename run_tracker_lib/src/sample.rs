use chrono::{DateTime, Utc};
use geo_types::Point;
use serde::{Deserialize, Serialize};

/// One position reading as delivered by the location capability.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub latitude: f64,
    pub longitude: f64,
    pub timestamp: DateTime<Utc>,
    /// Ground speed in m/s, if the platform reports one.
    pub speed: Option<f64>,
}

impl Sample {
    pub fn new(latitude: f64, longitude: f64, timestamp: DateTime<Utc>) -> Self {
        Self {
            latitude,
            longitude,
            timestamp,
            speed: None,
        }
    }

    pub fn with_speed(mut self, speed: Option<f64>) -> Self {
        self.speed = speed;
        self
    }

    /// False when the platform handed over a NaN or infinite coordinate.
    pub fn is_finite(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }

    pub fn point(&self) -> Point {
        Point::new(self.longitude, self.latitude)
    }
}

impl From<(Point, DateTime<Utc>)> for Sample {
    fn from((point, timestamp): (Point, DateTime<Utc>)) -> Self {
        Sample::new(point.y(), point.x(), timestamp)
    }
}
