use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    InsufficientData { need: usize, have: usize },
    MalformedRecord { need: usize, have: usize },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InsufficientData { need, have } => {
                write!(f, "insufficient data: need {} bytes, have {}", need, have)
            }
            Error::MalformedRecord { need, have } => {
                write!(f, "malformed record: need {} bytes, have {}", need, have)
            }
        }
    }
}

impl std::error::Error for Error {}
