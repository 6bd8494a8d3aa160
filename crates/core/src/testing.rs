use std::error::Error;
use std::fmt::{self, Display, Formatter};

use chrono::{DateTime, TimeZone, Utc};
use genbridge_service::{ErrorKind, ServiceError};

use crate::service_client::Failure;

#[derive(Debug)]
struct Unreachable;

impl Display for Unreachable {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "connection refused")
    }
}

impl Error for Unreachable {}

impl ServiceError for Unreachable {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Transport
    }
}

pub fn failure() -> Failure {
    Box::new(Unreachable)
}

pub fn at(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
}
