//! Domain layer: strong types with validation and invariants (no I/O).

mod request;
mod response;
mod validation;
mod value;

pub use request::{BatchEntry, Query, SendBatch, SendMessage, SendOtp};
pub use response::{GatewayResult, Outcome};
pub use validation::ValidationError;
pub use value::{
    ApiCode, Email, KnownStatusCode, MessageText, Password, PhoneNumber, QueryAction,
    RawPhoneNumber, SenderId, StatusCode,
};
