use std::collections::BTreeMap;

use serde_json::Value;

use crate::domain::validation::ValidationError;
use crate::domain::value::{
    ApiCode, Email, MessageText, Password, QueryAction, RawPhoneNumber, SenderId,
};

#[derive(Debug, Clone)]
pub struct SendMessage {
    recipients: Vec<RawPhoneNumber>,
    msg: MessageText,
    sender_id: Option<SenderId>,
}

impl SendMessage {
    pub fn new(recipients: Vec<RawPhoneNumber>, msg: MessageText) -> Result<Self, ValidationError> {
        if recipients.is_empty() {
            return Err(ValidationError::Empty {
                field: RawPhoneNumber::FIELD,
            });
        }
        Ok(Self {
            recipients,
            msg,
            sender_id: None,
        })
    }

    pub fn one(recipient: RawPhoneNumber, msg: MessageText) -> Self {
        Self {
            recipients: vec![recipient],
            msg,
            sender_id: None,
        }
    }

    /// Override the configured default sender for this message.
    pub fn with_sender_id(mut self, sender_id: SenderId) -> Self {
        self.sender_id = Some(sender_id);
        self
    }

    pub fn recipients(&self) -> &[RawPhoneNumber] {
        &self.recipients
    }

    pub fn msg(&self) -> &MessageText {
        &self.msg
    }

    pub fn sender_id(&self) -> Option<&SenderId> {
        self.sender_id.as_ref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchEntry {
    recipient: RawPhoneNumber,
    msg: MessageText,
}

impl BatchEntry {
    /// JSON field name of the recipient inside one batch entry.
    pub const RECIPIENT_FIELD: &'static str = "Recipient";

    pub fn new(recipient: RawPhoneNumber, msg: MessageText) -> Self {
        Self { recipient, msg }
    }

    pub fn parse(
        recipient: impl Into<String>,
        msg: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            recipient: RawPhoneNumber::new(recipient)?,
            msg: MessageText::new(msg)?,
        })
    }

    pub fn recipient(&self) -> &RawPhoneNumber {
        &self.recipient
    }

    pub fn msg(&self) -> &MessageText {
        &self.msg
    }
}

#[derive(Debug, Clone)]
pub struct SendBatch {
    entries: Vec<BatchEntry>,
    sender_id: Option<SenderId>,
}

impl SendBatch {
    /// JSON field name of the entry list (`Messages`).
    pub const FIELD: &'static str = "Messages";

    pub fn new(entries: Vec<BatchEntry>) -> Result<Self, ValidationError> {
        if entries.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self {
            entries,
            sender_id: None,
        })
    }

    /// Build a batch from raw `(recipient, message)` pairs.
    ///
    /// The first invalid pair rejects the whole batch and is reported with its position.
    pub fn from_pairs<I, R, M>(pairs: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = (R, M)>,
        R: Into<String>,
        M: Into<String>,
    {
        let entries = pairs
            .into_iter()
            .enumerate()
            .map(|(index, (recipient, msg))| {
                BatchEntry::parse(recipient, msg).map_err(|reason| {
                    ValidationError::InvalidBatchEntry {
                        index,
                        reason: Box::new(reason),
                    }
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(entries)
    }

    pub fn with_sender_id(mut self, sender_id: SenderId) -> Self {
        self.sender_id = Some(sender_id);
        self
    }

    pub fn entries(&self) -> &[BatchEntry] {
        &self.entries
    }

    pub fn sender_id(&self) -> Option<&SenderId> {
        self.sender_id.as_ref()
    }
}

#[derive(Debug, Clone)]
pub struct SendOtp {
    recipient: RawPhoneNumber,
    msg: MessageText,
}

impl SendOtp {
    pub fn new(recipient: RawPhoneNumber, msg: MessageText) -> Self {
        Self { recipient, msg }
    }

    pub fn recipient(&self) -> &RawPhoneNumber {
        &self.recipient
    }

    pub fn msg(&self) -> &MessageText {
        &self.msg
    }
}

#[derive(Debug, Clone)]
pub struct Query {
    action: QueryAction,
    params: BTreeMap<String, Value>,
}

impl Query {
    const RESERVED: [&'static str; 4] = [
        ApiCode::FIELD,
        Email::FIELD,
        Password::FIELD,
        QueryAction::FIELD,
    ];

    pub fn new(action: QueryAction) -> Self {
        Self {
            action,
            params: BTreeMap::new(),
        }
    }

    /// Add an extra top-level parameter.
    ///
    /// Credential and action field names are rejected so they cannot be overridden.
    pub fn with_param(
        mut self,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<Self, ValidationError> {
        let key = key.into();
        let trimmed = key.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: "query parameter" });
        }
        if Self::RESERVED
            .iter()
            .any(|reserved| reserved.eq_ignore_ascii_case(trimmed))
        {
            return Err(ValidationError::ReservedQueryParam {
                key: trimmed.to_owned(),
            });
        }
        self.params.insert(trimmed.to_owned(), value.into());
        Ok(self)
    }

    pub fn action(&self) -> &QueryAction {
        &self.action
    }

    pub fn params(&self) -> &BTreeMap<String, Value> {
        &self.params
    }
}
