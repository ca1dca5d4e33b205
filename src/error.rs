use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error, PartialEq)]
pub enum Error {
    /// The flat disk cannot reach a dome this small.
    #[error("invalid celestial sphere radius {radius} m: must be in meters and at least {minimum} m")]
    SphereTooSmall { radius: f64, minimum: f64 },

    #[error("conflicting sign: negative leading field {value} combined with {indicator}")]
    ConflictingSign { value: f64, indicator: String },

    #[error("invalid sexagesimal value ({first}, {minutes}, {seconds}): {reason}")]
    InvalidSexagesimal {
        first: f64,
        minutes: f64,
        seconds: f64,
        reason: &'static str,
    },

    #[error("unknown hemisphere '{0}', expected one of N, S, E, W")]
    UnknownHemisphere(String),

    #[error("catalog line {line}: {message}")]
    Catalog { line: usize, message: String },

    #[error("no valid {kind} given")]
    NoSelection { kind: &'static str },

    #[error("timestamp {0} is out of range")]
    InvalidTimestamp(i64),

    #[error("i/o error: {0}")]
    Io(String),
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}
