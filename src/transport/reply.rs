use serde::Deserialize;
use serde_json::{Number, Value};

use crate::domain::{GatewayResult, KnownStatusCode, StatusCode};

const FLAG_SUCCESS_FALLBACK: &str = "request completed successfully";
const FLAG_ERROR_FALLBACK: &str = "gateway reported an error";

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("invalid API response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid API response")]
    MissingStatus { data: Value },
}

/// The two reply conventions used by iTexMo API versions.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum VendorReply {
    /// Numeric `status` where `0` means success.
    Status(StatusReply),
    /// Boolean `Error` with a free-text `Message`.
    Flag(FlagReply),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StatusReply {
    #[serde(alias = "Status")]
    status: Number,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FlagReply {
    #[serde(rename = "Error")]
    error: bool,
    #[serde(rename = "Message", default)]
    message: Option<Value>,
}

impl FlagReply {
    fn message_text(&self) -> Option<String> {
        match self.message.as_ref()? {
            Value::Null => None,
            Value::String(text) => Some(text.clone()),
            other => Some(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DecodedReply {
    pub reply: VendorReply,
    pub data: Value,
}

pub fn decode_reply_json(json: &str) -> Result<DecodedReply, TransportError> {
    let data: Value = serde_json::from_str(json)?;
    // Structs also deserialize from JSON arrays; only objects are valid replies.
    if !data.is_object() {
        return Err(TransportError::MissingStatus { data });
    }
    match VendorReply::deserialize(&data) {
        Ok(reply) => Ok(DecodedReply { reply, data }),
        Err(_) => Err(TransportError::MissingStatus { data }),
    }
}

/// Map a 2xx response body to a [`GatewayResult`].
pub fn normalize_reply(json: &str) -> GatewayResult {
    match decode_reply_json(json) {
        Ok(DecodedReply { reply, data }) => match reply {
            VendorReply::Status(StatusReply { status }) => match status.as_i64() {
                Some(status) => {
                    let code = StatusCode::new(status);
                    if code.is_success() {
                        GatewayResult::accepted(code.description(), data)
                    } else {
                        GatewayResult::rejected(code.description(), Some(code), data)
                    }
                }
                // Integers past i64::MAX are still codes, just not ones we know.
                None if status.is_u64() => {
                    GatewayResult::rejected(KnownStatusCode::UNRECOGNIZED, None, data)
                }
                None => {
                    GatewayResult::invalid_response(GatewayResult::INVALID_RESPONSE, Some(data))
                }
            },
            VendorReply::Flag(flag) => {
                let message = flag.message_text();
                if flag.error {
                    GatewayResult::rejected(
                        message.unwrap_or_else(|| FLAG_ERROR_FALLBACK.to_owned()),
                        None,
                        data,
                    )
                } else {
                    GatewayResult::accepted(
                        message.unwrap_or_else(|| FLAG_SUCCESS_FALLBACK.to_owned()),
                        data,
                    )
                }
            }
        },
        Err(err @ TransportError::Json(_)) => {
            GatewayResult::invalid_response(err.to_string(), None)
        }
        Err(TransportError::MissingStatus { data }) => {
            GatewayResult::invalid_response(GatewayResult::INVALID_RESPONSE, Some(data))
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::domain::Outcome;

    use super::*;

    #[test]
    fn status_zero_is_success() {
        let result = normalize_reply(r#"{"status": 0}"#);
        assert!(result.success);
        assert_eq!(result.message, "message sent successfully");
        assert_eq!(result.data, Some(json!({"status": 0})));
        assert_eq!(result.outcome, Outcome::Accepted);
    }

    #[test]
    fn status_codes_one_to_nine_are_rejections() {
        for code in 1..=9 {
            let body = json!({ "status": code }).to_string();
            let result = normalize_reply(&body);
            assert!(!result.success, "code {code}");
            assert_eq!(result.message, StatusCode::new(code).description());
            assert_eq!(result.data, Some(json!({ "status": code })));
            assert_eq!(
                result.outcome,
                Outcome::Rejected {
                    status_code: Some(StatusCode::new(code))
                }
            );
        }
    }

    #[test]
    fn unknown_status_code_is_unrecognized() {
        for body in [r#"{"status": 999}"#, r#"{"Status": -4}"#, r#"{"status": 10}"#] {
            let result = normalize_reply(body);
            assert!(!result.success);
            assert_eq!(result.message, "unrecognized status code");
        }
    }

    #[test]
    fn out_of_range_integer_status_is_unrecognized() {
        let result = normalize_reply(r#"{"status": 18446744073709551615}"#);
        assert!(!result.success);
        assert_eq!(result.message, "unrecognized status code");
        assert_eq!(result.outcome, Outcome::Rejected { status_code: None });
        assert!(result.data.is_some());

        let result = normalize_reply(r#"{"status": -9223372036854775808}"#);
        assert_eq!(result.message, "unrecognized status code");
        assert_eq!(result.status_code(), Some(StatusCode::new(i64::MIN)));
    }

    #[test]
    fn fractional_status_is_invalid_response() {
        let result = normalize_reply(r#"{"status": 0.5}"#);
        assert!(!result.success);
        assert_eq!(result.message, "invalid API response");
        assert_eq!(result.outcome, Outcome::InvalidResponse);
        assert_eq!(result.data, Some(json!({"status": 0.5})));
    }

    #[test]
    fn error_flag_false_surfaces_message_verbatim() {
        let body = r#"{"Error": false, "Message": "Sent to 2 recipients.", "TotalSMS": 2, "Failed": 0}"#;
        let result = normalize_reply(body);
        assert!(result.success);
        assert_eq!(result.message, "Sent to 2 recipients.");
        assert_eq!(result.outcome, Outcome::Accepted);
        assert_eq!(result.data.unwrap()["TotalSMS"], json!(2));
    }

    #[test]
    fn error_flag_true_is_rejection_with_vendor_message() {
        let result = normalize_reply(r#"{"Error": true, "Message": "Invalid credentials."}"#);
        assert!(!result.success);
        assert_eq!(result.message, "Invalid credentials.");
        assert_eq!(result.outcome, Outcome::Rejected { status_code: None });
    }

    #[test]
    fn error_flag_without_message_uses_fallbacks() {
        let ok = normalize_reply(r#"{"Error": false, "MessagesLeft": 10}"#);
        assert!(ok.success);
        assert_eq!(ok.message, FLAG_SUCCESS_FALLBACK);
        assert_eq!(ok.messages_left(), Some(10));

        let err = normalize_reply(r#"{"Error": true, "Message": null}"#);
        assert!(!err.success);
        assert_eq!(err.message, FLAG_ERROR_FALLBACK);
    }

    #[test]
    fn status_wins_when_both_conventions_are_present() {
        let result = normalize_reply(r#"{"status": 2, "Error": false, "Message": "ok"}"#);
        assert!(!result.success);
        assert_eq!(result.message, "no balance or insufficient credit");
    }

    #[test]
    fn undecodable_body_is_invalid_response_without_data() {
        let result = normalize_reply("{ not json }");
        assert!(!result.success);
        assert!(result.message.starts_with("invalid API response: "));
        assert_eq!(result.data, None);
        assert_eq!(result.outcome, Outcome::InvalidResponse);
    }

    #[test]
    fn body_without_status_keeps_decoded_data() {
        let result = normalize_reply(r#"{"invalid": "response"}"#);
        assert!(!result.success);
        assert_eq!(result.message, "invalid API response");
        assert_eq!(result.data, Some(json!({"invalid": "response"})));
        assert_eq!(result.outcome, Outcome::InvalidResponse);

        let result = normalize_reply(r#"{"status": "0"}"#);
        assert_eq!(result.outcome, Outcome::InvalidResponse);
    }

    #[test]
    fn decode_reply_distinguishes_conventions() {
        let decoded = decode_reply_json(r#"{"status": 3}"#).unwrap();
        assert!(matches!(decoded.reply, VendorReply::Status(_)));

        let decoded = decode_reply_json(r#"{"Error": true, "Message": "x"}"#).unwrap();
        assert!(matches!(decoded.reply, VendorReply::Flag(_)));

        for body in ["[]", "[0]", "0", "null"] {
            assert!(
                matches!(
                    decode_reply_json(body),
                    Err(TransportError::MissingStatus { .. })
                ),
                "decoded {body}"
            );
        }
    }
}
