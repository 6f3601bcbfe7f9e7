use thiserror::Error;

/// Every way a check run can fail. All of them are fatal and end up as a
/// `CRITICAL - <message>` line with exit code 2.
#[derive(Error, Debug)]
pub enum CheckError {
    #[error("invalid station id: {0}")]
    InvalidStation(String),

    #[error("could not fetch station {station}: {reason}")]
    FetchFailure { station: u32, reason: String },

    #[error("{0} not found on station page")]
    MissingField(Field),

    #[error("malformed price in line {line_no}: {line}")]
    MalformedPrice { line_no: usize, line: String },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Usage(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    StationName,
    Street,
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Field::StationName => write!(f, "station name"),
            Field::Street => write!(f, "station street"),
        }
    }
}

pub type Result<T> = std::result::Result<T, CheckError>;
