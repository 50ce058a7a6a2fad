use core::fmt;

/// Failure reported by a Profile or Leaderboard store implementation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoreError {
    Unavailable(String),
    Backend(String),
    Corrupt { field: &'static str, detail: String },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable(detail) => write!(f, "store unavailable: {detail}"),
            Self::Backend(detail) => write!(f, "store backend error: {detail}"),
            Self::Corrupt { field, detail } => {
                write!(f, "corrupt stored value for {field}: {detail}")
            }
        }
    }
}

impl std::error::Error for StoreError {}

/// Raw input that could not be mapped to a direction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InputError {
    UnknownKey(String),
    SwipeTooShort { distance: i32, min: i32 },
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownKey(key) => write!(f, "unmapped key: {key}"),
            Self::SwipeTooShort { distance, min } => {
                write!(f, "swipe too short: {distance} (need at least {min})")
            }
        }
    }
}

impl std::error::Error for InputError {}
