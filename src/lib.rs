//! Typed Rust client for the iTexMo SMS gateway HTTP API.
//!
//! The crate is split into a domain layer of validated types, a transport layer that knows the
//! gateway's JSON shapes, and a client layer that orchestrates requests, retries, and logging.
//! Every call resolves to a [`GatewayResult`]; gateway rejections are results, not errors.
//!
//! ```rust,no_run
//! use itexmo::{Auth, ItexmoClient, MessageText, RawPhoneNumber, SendMessage};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), itexmo::ItexmoError> {
//!     let client = ItexmoClient::new(Auth::api_code("...")?);
//!     let phone = RawPhoneNumber::new("09171234567")?;
//!     let msg = MessageText::new("hello")?;
//!     let result = client.send(SendMessage::one(phone, msg)).await?;
//!     println!("{}: {}", result.success, result.message);
//!     Ok(())
//! }
//! ```
#![forbid(unsafe_code)]

pub mod client;
pub mod config;
pub mod domain;
mod transport;

pub use client::{
    Auth, BoxFuture, Exchange, ExchangeHook, ExchangeStatus, HttpError, HttpResponse,
    HttpTransport, ItexmoClient, ItexmoClientBuilder, ItexmoError, Operation, RetryPolicy,
};
pub use config::Settings;
pub use domain::{
    ApiCode, BatchEntry, Email, GatewayResult, KnownStatusCode, MessageText, Outcome, Password,
    PhoneNumber, Query, QueryAction, RawPhoneNumber, SendBatch, SendMessage, SendOtp, SenderId,
    StatusCode, ValidationError,
};
