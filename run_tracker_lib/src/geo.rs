use tracing::debug;

use crate::sample::Sample;

pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Great-circle distance in meters between two (latitude, longitude) pairs given in degrees.
pub fn haversine_distance(p1: (f64, f64), p2: (f64, f64)) -> f64 {
    let d_lat = (p2.0 - p1.0).to_radians();
    let d_lon = (p2.1 - p1.1).to_radians();
    let lat1 = p1.0.to_radians();
    let lat2 = p2.0.to_radians();

    let a = f64::sin(d_lat / 2.).powi(2)
        + f64::cos(lat1) * f64::cos(lat2) * f64::sin(d_lon / 2.).powi(2);
    // Rounding can push `a` a hair above 1 for antipodal points
    let c = 2. * f64::asin(f64::sqrt(a.clamp(0., 1.)));

    EARTH_RADIUS_M * c
}

pub fn sample_distance(a: &Sample, b: &Sample) -> f64 {
    haversine_distance((a.latitude, a.longitude), (b.latitude, b.longitude))
}

/// Outcome of feeding one sample to the accumulator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step {
    /// Distance added to the running total. Zero for the first sample and for filtered movement.
    pub distance_delta: f64,
    /// Reported speed of an accepted sample (0 when the platform gave none).
    /// `None` when the sample did not advance the reference point.
    pub speed: Option<f64>,
}

impl Step {
    const NONE: Step = Step {
        distance_delta: 0.,
        speed: None,
    };

    pub fn accepted(&self) -> bool {
        self.speed.is_some()
    }
}

/// Computes the contribution of `next` given the current reference point `prev`.
///
/// Movements at or below `threshold_m` are treated as GPS jitter and contribute nothing.
pub fn step(prev: Option<&Sample>, next: &Sample, threshold_m: f64) -> Step {
    let Some(prev) = prev else {
        return Step::NONE;
    };

    let distance = sample_distance(prev, next);
    if !distance.is_finite() || distance <= threshold_m {
        return Step::NONE;
    }

    Step {
        distance_delta: distance,
        speed: Some(next.speed.unwrap_or(0.)),
    }
}

/// Running, jitter-filtered distance for one session.
///
/// A filtered sample does not replace the reference point, so slow drift is measured
/// from the last accepted position and eventually crosses the threshold.
#[derive(Debug, Clone)]
pub struct DistanceAccumulator {
    threshold_m: f64,
    reference: Option<Sample>,
    total_m: f64,
}

impl DistanceAccumulator {
    pub fn new(threshold_m: f64) -> Self {
        Self {
            threshold_m,
            reference: None,
            total_m: 0.,
        }
    }

    pub fn on_sample(&mut self, next: &Sample) -> Step {
        if !next.is_finite() {
            debug!("Ignoring non-finite sample ({}, {})", next.latitude, next.longitude);
            return Step::NONE;
        }

        if self.reference.is_none() {
            self.reference = Some(*next);
            return Step::NONE;
        }

        let step = step(self.reference.as_ref(), next, self.threshold_m);
        if step.accepted() {
            self.total_m += step.distance_delta;
            self.reference = Some(*next);
            debug!("Accepted {:.2} m, total {:.2} m", step.distance_delta, self.total_m);
        } else {
            debug!("Filtered sample at ({}, {})", next.latitude, next.longitude);
        }

        step
    }

    pub fn reset(&mut self) {
        self.reference = None;
        self.total_m = 0.;
    }

    pub fn total_m(&self) -> f64 {
        self.total_m
    }

    pub fn reference(&self) -> Option<&Sample> {
        self.reference.as_ref()
    }
}
