use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Empty {
        field: &'static str,
    },
    InvalidPhoneNumber {
        input: String,
    },
    InvalidEmail {
        input: String,
    },
    MessageTooLong {
        max: usize,
        actual: usize,
    },
    InvalidBatchEntry {
        index: usize,
        reason: Box<ValidationError>,
    },
    ReservedQueryParam {
        key: String,
    },
    IncompleteAccount {
        missing: &'static str,
    },
    TooSmall {
        field: &'static str,
        min: u64,
        actual: u64,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{field} must not be empty"),
            Self::InvalidPhoneNumber { input } => write!(f, "invalid phone number: {input}"),
            Self::InvalidEmail { input } => write!(f, "invalid email address: {input}"),
            Self::MessageTooLong { max, actual } => {
                write!(f, "message too long: {actual} characters (max {max})")
            }
            Self::InvalidBatchEntry { index, reason } => {
                write!(f, "invalid batch entry #{index}: {reason}")
            }
            Self::ReservedQueryParam { key } => {
                write!(f, "query parameter {key} is reserved")
            }
            Self::IncompleteAccount { missing } => {
                write!(f, "account credentials are incomplete: {missing} is missing")
            }
            Self::TooSmall { field, min, actual } => {
                write!(f, "{field} must be at least {min} (got {actual})")
            }
        }
    }
}

impl std::error::Error for ValidationError {}

#[cfg(test)]
mod tests {
    use super::ValidationError;

    #[test]
    fn display_messages_are_human_readable() {
        let err = ValidationError::Empty { field: "Message" };
        assert_eq!(err.to_string(), "Message must not be empty");

        let err = ValidationError::InvalidPhoneNumber {
            input: "bad".to_owned(),
        };
        assert_eq!(err.to_string(), "invalid phone number: bad");

        let err = ValidationError::MessageTooLong {
            max: 160,
            actual: 161,
        };
        assert_eq!(
            err.to_string(),
            "message too long: 161 characters (max 160)"
        );

        let err = ValidationError::InvalidBatchEntry {
            index: 2,
            reason: Box::new(ValidationError::InvalidPhoneNumber {
                input: "123".to_owned(),
            }),
        };
        assert_eq!(
            err.to_string(),
            "invalid batch entry #2: invalid phone number: 123"
        );

        let err = ValidationError::TooSmall {
            field: "retry_attempts",
            min: 1,
            actual: 0,
        };
        assert_eq!(err.to_string(), "retry_attempts must be at least 1 (got 0)");
    }
}
