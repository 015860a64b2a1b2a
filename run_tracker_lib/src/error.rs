use thiserror::Error;

/// Why the location capability could not deliver a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LocationError {
    #[error("permission to read the location was denied")]
    PermissionDenied,
    #[error("position unavailable")]
    PositionUnavailable,
    #[error("location request timed out")]
    Timeout,
    #[error("location capability unsupported")]
    Unsupported,
    #[error("unknown location error")]
    Unknown,
}

impl LocationError {
    pub const PERMISSION_DENIED: u16 = 1;
    pub const POSITION_UNAVAILABLE: u16 = 2;
    pub const TIMEOUT: u16 = 3;

    /// Maps a platform error code onto the taxonomy.
    pub fn from_code(code: u16) -> Self {
        match code {
            Self::PERMISSION_DENIED => Self::PermissionDenied,
            Self::POSITION_UNAVAILABLE => Self::PositionUnavailable,
            Self::TIMEOUT => Self::Timeout,
            _ => Self::Unknown,
        }
    }

    /// Message shown when a running session is interrupted.
    pub fn tracking_message(&self) -> &'static str {
        match self {
            Self::PermissionDenied => "Location permission denied.",
            Self::PositionUnavailable => "Location unavailable.",
            Self::Timeout => "Location request timed out.",
            Self::Unsupported => UNSUPPORTED_MESSAGE,
            Self::Unknown => "Tracking interrupted.",
        }
    }

    /// Message shown when a one-shot "locate me" request fails.
    pub fn locate_message(&self) -> &'static str {
        match self {
            Self::PermissionDenied => "Location permission denied. Please enable it in settings.",
            Self::PositionUnavailable => "Location information is unavailable.",
            Self::Timeout => "Location request timed out.",
            Self::Unsupported => UNSUPPORTED_MESSAGE,
            Self::Unknown => "Unable to retrieve location.",
        }
    }
}

const UNSUPPORTED_MESSAGE: &str = "Geolocation is not supported by your browser.";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("line {line}: expected `key = value`")]
    MalformedLine { line: usize },
    #[error("line {line}: invalid value {value:?} for `{key}`")]
    InvalidValue {
        line: usize,
        key: String,
        value: String,
    },
    #[error("`{0}` is out of range")]
    OutOfRange(&'static str),
}
