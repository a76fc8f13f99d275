//! Transport layer: wire-format details (JSON payloads and reply decoding).

mod broadcast;
mod query;
mod reply;

pub use broadcast::{encode_batch_json, encode_otp_json, encode_send_json};
pub use query::encode_query_json;
pub use reply::normalize_reply;
