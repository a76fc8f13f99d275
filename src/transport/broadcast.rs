use serde_json::{Map, Value};

use crate::domain::{
    BatchEntry, MessageText, RawPhoneNumber, SendBatch, SendMessage, SendOtp, SenderId,
};

pub fn encode_send_json(request: &SendMessage, sender_id: Option<&SenderId>) -> Map<String, Value> {
    let mut body = Map::new();
    push_recipients(&mut body, request.recipients());
    body.insert(
        MessageText::FIELD.to_owned(),
        Value::from(request.msg().as_str()),
    );
    push_sender_id(&mut body, sender_id);
    body
}

pub fn encode_batch_json(request: &SendBatch, sender_id: Option<&SenderId>) -> Map<String, Value> {
    let entries = request
        .entries()
        .iter()
        .map(encode_batch_entry)
        .collect::<Vec<_>>();

    let mut body = Map::new();
    body.insert(SendBatch::FIELD.to_owned(), Value::Array(entries));
    push_sender_id(&mut body, sender_id);
    body
}

pub fn encode_otp_json(request: &SendOtp) -> Map<String, Value> {
    let mut body = Map::new();
    push_recipients(&mut body, std::slice::from_ref(request.recipient()));
    body.insert(
        MessageText::FIELD.to_owned(),
        Value::from(request.msg().as_str()),
    );
    body
}

fn encode_batch_entry(entry: &BatchEntry) -> Value {
    let mut object = Map::new();
    object.insert(
        BatchEntry::RECIPIENT_FIELD.to_owned(),
        Value::from(entry.recipient().raw()),
    );
    object.insert(
        MessageText::FIELD.to_owned(),
        Value::from(entry.msg().as_str()),
    );
    Value::Object(object)
}

fn push_recipients(body: &mut Map<String, Value>, recipients: &[RawPhoneNumber]) {
    let recipients = recipients
        .iter()
        .map(|phone| Value::from(phone.raw()))
        .collect::<Vec<_>>();
    body.insert(RawPhoneNumber::FIELD.to_owned(), Value::Array(recipients));
}

fn push_sender_id(body: &mut Map<String, Value>, sender_id: Option<&SenderId>) {
    if let Some(sender_id) = sender_id {
        body.insert(
            SenderId::FIELD.to_owned(),
            Value::from(sender_id.as_str()),
        );
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn phone(raw: &str) -> RawPhoneNumber {
        RawPhoneNumber::new(raw).unwrap()
    }

    fn text(raw: &str) -> MessageText {
        MessageText::new(raw).unwrap()
    }

    #[test]
    fn encode_send_lists_recipients_and_sender() {
        let request = SendMessage::new(
            vec![phone("09171234567"), phone("+639181234567")],
            text("hello"),
        )
        .unwrap();
        let sender = SenderId::new("ACME").unwrap();

        let body = encode_send_json(&request, Some(&sender));
        assert_eq!(
            Value::Object(body),
            json!({
                "Recipients": ["09171234567", "+639181234567"],
                "Message": "hello",
                "SenderId": "ACME",
            })
        );
    }

    #[test]
    fn encode_send_omits_missing_sender() {
        let request = SendMessage::one(phone("09171234567"), text("hello"));
        let body = encode_send_json(&request, None);
        assert!(!body.contains_key(SenderId::FIELD));
    }

    #[test]
    fn encode_batch_keeps_entry_order() {
        let request = SendBatch::from_pairs([
            ("09181234567", "second"),
            ("09171234567", "first"),
        ])
        .unwrap();

        let body = encode_batch_json(&request, None);
        assert_eq!(
            Value::Object(body),
            json!({
                "Messages": [
                    {"Recipient": "09181234567", "Message": "second"},
                    {"Recipient": "09171234567", "Message": "first"},
                ],
            })
        );
    }

    #[test]
    fn encode_otp_has_single_recipient_and_no_sender() {
        let request = SendOtp::new(phone("09171234567"), text("Your OTP is 123456"));
        let body = encode_otp_json(&request);
        assert_eq!(
            Value::Object(body),
            json!({
                "Recipients": ["09171234567"],
                "Message": "Your OTP is 123456",
            })
        );
    }
}
