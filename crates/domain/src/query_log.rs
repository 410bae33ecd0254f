use crate::wire::{RecordType, ResponseCode};
use std::fmt;
use std::net::IpAddr;

/// How a query was answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryStatus {
    Forwarded,
    Cached,
    Blocked,
}

impl QueryStatus {
    /// Cached wins over blocked, blocked over forwarded.
    pub fn from_flags(blocked: bool, cached: bool) -> Self {
        if cached {
            QueryStatus::Cached
        } else if blocked {
            QueryStatus::Blocked
        } else {
            QueryStatus::Forwarded
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            QueryStatus::Forwarded => "FORWARDED",
            QueryStatus::Cached => "CACHED",
            QueryStatus::Blocked => "BLOCKED",
        }
    }
}

impl fmt::Display for QueryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct QueryLog {
    /// Unix seconds.
    pub timestamp: i64,
    pub client_ip: IpAddr,
    pub record_type: RecordType,
    pub domain: String,
    pub response_code: ResponseCode,
    pub duration_secs: f32,
    pub status: QueryStatus,
}
