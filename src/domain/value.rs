use crate::domain::validation::ValidationError;

use phonenumber::country;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// iTexMo API code (`ApiCode`).
///
/// Invariant: non-empty after trimming.
pub struct ApiCode(String);

impl ApiCode {
    /// JSON field name used by iTexMo (`ApiCode`).
    pub const FIELD: &'static str = "ApiCode";

    /// Create a validated [`ApiCode`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated code.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// iTexMo account email (`Email`).
///
/// Invariant: a single `@` separating a non-empty local part from a dotted domain, and no
/// whitespace. This is a syntax check only; deliverability is not verified.
pub struct Email(String);

impl Email {
    /// JSON field name used by iTexMo (`Email`).
    pub const FIELD: &'static str = "Email";

    /// Create a validated [`Email`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        if !is_email_syntax(trimmed) {
            return Err(ValidationError::InvalidEmail {
                input: trimmed.to_owned(),
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated email.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn is_email_syntax(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain.contains('.') && domain.split('.').all(|label| !label.is_empty())
}

#[derive(Clone, PartialEq, Eq, Hash)]
/// iTexMo account password (`Password`).
///
/// Invariant: must not be empty (whitespace is preserved and allowed).
pub struct Password(String);

impl Password {
    /// JSON field name used by iTexMo (`Password`).
    pub const FIELD: &'static str = "Password";

    /// Create a validated [`Password`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(value))
    }

    /// Borrow the password as provided.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Password(***)")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Sender name (`SenderId`).
///
/// Invariant: non-empty after trimming. The value must be registered with your iTexMo account.
pub struct SenderId(String);

impl SenderId {
    /// JSON field name used by iTexMo (`SenderId`).
    pub const FIELD: &'static str = "SenderId";

    /// Create a validated [`SenderId`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated sender id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// SMS message text (`Message`).
///
/// Invariant: non-empty after trimming. The original value (including whitespace) is preserved.
/// The upper length bound depends on client configuration and is checked by the client.
pub struct MessageText(String);

impl MessageText {
    /// JSON field name used by iTexMo (`Message`).
    pub const FIELD: &'static str = "Message";

    /// Create validated message text.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(value))
    }

    /// Borrow the message text as provided.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Length in characters, as compared against the configured maximum.
    pub fn char_count(&self) -> usize {
        self.0.chars().count()
    }

    /// Fail with [`ValidationError::MessageTooLong`] when longer than `max` characters.
    pub fn ensure_within(&self, max: usize) -> Result<(), ValidationError> {
        let actual = self.char_count();
        if actual > max {
            return Err(ValidationError::MessageTooLong { max, actual });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Recipient phone number as sent to iTexMo.
///
/// Invariant: after trimming, an optional leading `+` followed by 10 to 15 ASCII digits.
/// No other normalization is applied; parse into [`PhoneNumber`] for E.164 normalization.
pub struct RawPhoneNumber(String);

impl RawPhoneNumber {
    /// JSON field name used by iTexMo for recipient lists (`Recipients`).
    pub const FIELD: &'static str = "Recipients";

    /// Minimum number of digits accepted.
    pub const MIN_DIGITS: usize = 10;
    /// Maximum number of digits accepted (E.164 limit).
    pub const MAX_DIGITS: usize = 15;

    /// Create a validated raw phone number.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }

        let digits = trimmed.strip_prefix('+').unwrap_or(trimmed);
        let well_formed = (Self::MIN_DIGITS..=Self::MAX_DIGITS).contains(&digits.len())
            && digits.bytes().all(|b| b.is_ascii_digit());
        if !well_formed {
            return Err(ValidationError::InvalidPhoneNumber {
                input: trimmed.to_owned(),
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Raw (trimmed) value as sent to iTexMo.
    pub fn raw(&self) -> &str {
        &self.0
    }
}

impl TryFrom<PhoneNumber> for RawPhoneNumber {
    type Error = ValidationError;

    /// Convert an already-parsed phone number to its E.164 form.
    fn try_from(value: PhoneNumber) -> Result<Self, Self::Error> {
        Self::new(value.e164)
    }
}

#[derive(Debug, Clone)]
/// Parsed phone number with an E.164 representation.
///
/// Equality, ordering, and hashing are based on the E.164 form.
pub struct PhoneNumber {
    raw: String,
    e164: String,
    parsed: phonenumber::PhoneNumber,
}

impl PhoneNumber {
    /// Region assumed for numbers written in national format (iTexMo serves the Philippines).
    pub const DEFAULT_REGION: country::Id = country::Id::PH;

    /// Parse and normalize a phone number into E.164.
    ///
    /// `default_region` is used when the input does not contain an explicit country prefix.
    pub fn parse(
        default_region: Option<country::Id>,
        input: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let input = input.into();
        let raw = input.trim().to_owned();
        if raw.is_empty() {
            return Err(ValidationError::Empty {
                field: RawPhoneNumber::FIELD,
            });
        }

        let parsed = phonenumber::parse(default_region, &raw)
            .map_err(|_| ValidationError::InvalidPhoneNumber { input: raw.clone() })?;

        let e164 = phonenumber::format(&parsed)
            .mode(phonenumber::Mode::E164)
            .to_string();

        Ok(Self { raw, e164, parsed })
    }

    /// Parse a number, assuming [`PhoneNumber::DEFAULT_REGION`] for national formats.
    pub fn parse_local(input: impl Into<String>) -> Result<Self, ValidationError> {
        Self::parse(Some(Self::DEFAULT_REGION), input)
    }

    /// Raw input after trimming.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Normalized E.164 representation.
    pub fn e164(&self) -> &str {
        &self.e164
    }

    /// The parsed phone number from the `phonenumber` crate.
    pub fn parsed(&self) -> &phonenumber::PhoneNumber {
        &self.parsed
    }
}

impl PartialEq for PhoneNumber {
    fn eq(&self, other: &Self) -> bool {
        self.e164 == other.e164
    }
}

impl Eq for PhoneNumber {}

impl std::hash::Hash for PhoneNumber {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.e164.hash(state);
    }
}

impl std::cmp::PartialOrd for PhoneNumber {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl std::cmp::Ord for PhoneNumber {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.e164.cmp(&other.e164)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Action discriminator for the `query` endpoint (`Action`).
///
/// Invariant: non-empty after trimming.
pub struct QueryAction(String);

impl QueryAction {
    /// JSON field name used by iTexMo (`Action`).
    pub const FIELD: &'static str = "Action";

    /// Action returning API code details, including remaining message credits.
    pub const API_CODE_INFO: &'static str = "ApiCodeInfo";

    /// Create a validated [`QueryAction`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// The balance/account lookup action.
    pub fn api_code_info() -> Self {
        Self(Self::API_CODE_INFO.to_owned())
    }

    /// Borrow the action name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Numeric iTexMo status code.
///
/// This value is preserved as-is even when the code is unknown to this crate.
pub struct StatusCode(i64);

impl StatusCode {
    /// Construct a status code from its integer representation.
    pub fn new(code: i64) -> Self {
        Self(code)
    }

    /// Get the integer code as provided by iTexMo.
    pub fn as_i64(self) -> i64 {
        self.0
    }

    /// Map this code to a known status code variant, if one exists.
    pub fn known(self) -> Option<KnownStatusCode> {
        KnownStatusCode::from_code(self.0)
    }

    /// Returns `true` only for [`KnownStatusCode::Success`].
    pub fn is_success(self) -> bool {
        self.known() == Some(KnownStatusCode::Success)
    }

    /// Returns `true` if this status code represents a credential/authorization problem.
    pub fn is_auth_error(self) -> bool {
        matches!(self.known(), Some(kind) if kind.is_auth_error())
    }

    /// Human-readable description; unknown codes yield `"unrecognized status code"`.
    pub fn description(self) -> &'static str {
        self.known()
            .map_or(KnownStatusCode::UNRECOGNIZED, KnownStatusCode::description)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
/// Known iTexMo status codes.
///
/// Unknown codes are preserved as [`StatusCode`] and return `None` from [`KnownStatusCode::from_code`].
pub enum KnownStatusCode {
    Success,
    InvalidNumber,
    InsufficientCredit,
    InvalidApiCode,
    MessageTooLong,
    BlockedAsSpam,
    InvalidSenderName,
    InvalidNumberFormat,
    Unauthorized,
    ApiDeactivated,
}

impl KnownStatusCode {
    pub(crate) const UNRECOGNIZED: &'static str = "unrecognized status code";

    /// Convert a raw iTexMo integer code into a known variant.
    pub fn from_code(code: i64) -> Option<Self> {
        Some(match code {
            0 => Self::Success,
            1 => Self::InvalidNumber,
            2 => Self::InsufficientCredit,
            3 => Self::InvalidApiCode,
            4 => Self::MessageTooLong,
            5 => Self::BlockedAsSpam,
            6 => Self::InvalidSenderName,
            7 => Self::InvalidNumberFormat,
            8 => Self::Unauthorized,
            9 => Self::ApiDeactivated,
            _ => return None,
        })
    }

    /// Fixed human-readable description of the code.
    pub fn description(self) -> &'static str {
        match self {
            Self::Success => "message sent successfully",
            Self::InvalidNumber => "invalid number",
            Self::InsufficientCredit => "no balance or insufficient credit",
            Self::InvalidApiCode => "invalid API code",
            Self::MessageTooLong => "maximum number of characters exceeded",
            Self::BlockedAsSpam => "message blocked due to spam content",
            Self::InvalidSenderName => "invalid sender name",
            Self::InvalidNumberFormat => "invalid mobile number format",
            Self::Unauthorized => "unauthorized request or API not allowed",
            Self::ApiDeactivated => "API deactivated",
        }
    }

    /// Whether this status indicates invalid credentials or a disallowed API code.
    pub fn is_auth_error(self) -> bool {
        matches!(self, Self::InvalidApiCode | Self::Unauthorized)
    }
}
