use std::fmt::{self, Display};

/// The kind of error that occurred.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The request never got a response, e.g. the connection failed.
    Transport,
    /// The service answered with a non-success status code.
    Status(u16),
    /// The service answered, but the body could not be understood.
    InvalidResponse,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Transport => write!(f, "Transport error"),
            ErrorKind::Status(code) => write!(f, "Status {code}"),
            ErrorKind::InvalidResponse => write!(f, "Invalid response"),
        }
    }
}
