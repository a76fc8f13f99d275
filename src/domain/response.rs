use serde_json::Value;

use crate::domain::value::StatusCode;

/// Why a request ended the way it did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// The gateway accepted the request.
    Accepted,
    /// The gateway answered but refused the request (vendor business failure).
    ///
    /// `status_code` is set when the reply carried a numeric status that fits in an `i64`.
    Rejected { status_code: Option<StatusCode> },
    /// HTTP 401 from the gateway.
    Unauthorized,
    /// The reply body was not JSON, or carried neither a status code nor an error flag.
    InvalidResponse,
    /// Every attempt failed with a transient fault.
    Unreachable { attempts: u32 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct GatewayResult {
    pub success: bool,
    pub message: String,
    pub data: Option<Value>,
    pub outcome: Outcome,
}

impl GatewayResult {
    pub const UNAUTHORIZED: &'static str = "unauthorized: check credentials";
    pub const INVALID_RESPONSE: &'static str = "invalid API response";

    pub(crate) fn accepted(message: impl Into<String>, data: Value) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
            outcome: Outcome::Accepted,
        }
    }

    pub(crate) fn rejected(
        message: impl Into<String>,
        status_code: Option<StatusCode>,
        data: Value,
    ) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: Some(data),
            outcome: Outcome::Rejected { status_code },
        }
    }

    pub(crate) fn unauthorized() -> Self {
        Self {
            success: false,
            message: Self::UNAUTHORIZED.to_owned(),
            data: None,
            outcome: Outcome::Unauthorized,
        }
    }

    pub(crate) fn invalid_response(message: impl Into<String>, data: Option<Value>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data,
            outcome: Outcome::InvalidResponse,
        }
    }

    pub(crate) fn unreachable(attempts: u32, last_failure: impl Into<String>) -> Self {
        Self {
            success: false,
            message: last_failure.into(),
            data: None,
            outcome: Outcome::Unreachable { attempts },
        }
    }

    /// Status code of a numeric-convention reply, if any.
    pub fn status_code(&self) -> Option<StatusCode> {
        match self.outcome {
            Outcome::Rejected { status_code } => status_code,
            Outcome::Accepted => self
                .data
                .as_ref()
                .and_then(|data| data.get("status").or_else(|| data.get("Status")))
                .and_then(Value::as_i64)
                .map(StatusCode::new),
            _ => None,
        }
    }

    /// Remaining message credits reported by an account query (`MessagesLeft`).
    ///
    /// Accepts both JSON numbers and numeric strings.
    pub fn messages_left(&self) -> Option<u64> {
        match self.data.as_ref()?.get("MessagesLeft")? {
            Value::Number(number) => number.as_u64(),
            Value::String(text) => text.trim().parse().ok(),
            _ => None,
        }
    }
}
