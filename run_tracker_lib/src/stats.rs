use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RunStats {
    pub distance_m: f64,
    pub elapsed_s: u64,
    pub current_speed_mps: f64,
}

pub fn format_distance(meters: f64) -> String {
    if meters < 1000. {
        format!("{:.0} m", meters)
    } else {
        format!("{:.2} km", meters / 1000.)
    }
}

pub fn format_duration(seconds: u64) -> String {
    let hrs = seconds / 3600;
    let mins = (seconds % 3600) / 60;
    let secs = seconds % 60;

    if hrs > 0 {
        format!("{}:{:02}:{:02}", hrs, mins, secs)
    } else {
        format!("{:02}:{:02}", mins, secs)
    }
}

/// Speed in m/s as a running pace, minutes per kilometer.
pub fn format_pace(speed_mps: f64) -> String {
    if speed_mps <= 0. {
        return "--:--".into();
    }

    let secs_per_km = (1000. / speed_mps).round() as u64;
    format!("{}:{:02} /km", secs_per_km / 60, secs_per_km % 60)
}

#[test]
fn formats_distance() {
    assert_eq!(format_distance(0.), "0 m");
    assert_eq!(format_distance(999.4), "999 m");
    assert_eq!(format_distance(1000.), "1.00 km");
    assert_eq!(format_distance(12_346.), "12.35 km");
}

#[test]
fn formats_duration() {
    assert_eq!(format_duration(0), "00:00");
    assert_eq!(format_duration(65), "01:05");
    assert_eq!(format_duration(3599), "59:59");
    assert_eq!(format_duration(3600), "1:00:00");
    assert_eq!(format_duration(7384), "2:03:04");
}

#[test]
fn formats_pace() {
    assert_eq!(format_pace(0.), "--:--");
    assert_eq!(format_pace(1000. / 300.), "5:00 /km");
}
