use std::fmt;
use std::sync::Arc;

use super::HttpError;

/// Callback invoked once per HTTP attempt.
///
/// Credentials are never passed to the hook; the request body is not included.
pub type ExchangeHook = Arc<dyn Fn(&Exchange<'_>) + Send + Sync>;

/// Gateway operation that produced an [`Exchange`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Send,
    SendBatch,
    SendOtp,
    Query,
}

impl Operation {
    /// Endpoint path relative to the base URL.
    pub fn path(self) -> &'static str {
        match self {
            Self::Send => "broadcast",
            Self::SendBatch => "broadcast-2d",
            Self::SendOtp => "broadcast-otp",
            Self::Query => "query",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Metadata about one HTTP attempt.
#[derive(Debug, Clone, Copy)]
pub struct Exchange<'a> {
    pub operation: Operation,
    pub url: &'a str,
    /// 1-based attempt number.
    pub attempt: u32,
    pub status: ExchangeStatus<'a>,
}

#[derive(Debug, Clone, Copy)]
pub enum ExchangeStatus<'a> {
    /// The server answered (any HTTP status).
    Response { status: u16, body: &'a str },
    /// No response was received.
    Failed { error: &'a HttpError },
}
