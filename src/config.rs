//! Settings loading: `ITEXMO_*` environment variables layered over defaults.

use std::fmt;
use std::time::Duration;

use figment::Figment;
use figment::providers::{Env, Serialized};
use figment::value::{Dict, Value};
use serde::{Deserialize, Serialize};

use crate::client::{
    Auth, DEFAULT_BASE_URL, DEFAULT_MAX_MESSAGE_LENGTH, ItexmoClient, ItexmoClientBuilder,
    ItexmoError, RetryPolicy,
};
use crate::domain::{Email, Password, SenderId, ValidationError};

/// Prefix of the environment variables read by [`Settings::from_env`].
pub const ENV_PREFIX: &str = "ITEXMO_";

/// Keys read verbatim; `Env` would otherwise parse `0042` as the number 42.
const TEXT_KEYS: [&str; 4] = ["api_code", "email", "password", "sender_id"];

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
/// Client settings as plain values.
///
/// Empty `email`, `password`, and `sender_id` values mean "not set". Durations are in
/// milliseconds.
pub struct Settings {
    pub api_code: String,
    pub email: Option<String>,
    pub password: Option<String>,
    pub sender_id: Option<String>,
    pub base_url: String,
    pub max_message_length: usize,
    pub retry_attempts: u32,
    pub retry_delay: u64,
    pub connect_timeout: Option<u64>,
    pub timeout: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_code: String::new(),
            email: None,
            password: None,
            sender_id: None,
            base_url: DEFAULT_BASE_URL.to_owned(),
            max_message_length: DEFAULT_MAX_MESSAGE_LENGTH,
            retry_attempts: RetryPolicy::DEFAULT_ATTEMPTS,
            retry_delay: RetryPolicy::DEFAULT_DELAY.as_millis() as u64,
            connect_timeout: None,
            timeout: None,
        }
    }
}

impl Settings {
    /// Defaults merged with `ITEXMO_*` environment variables.
    ///
    /// Credentials and the sender id are taken as raw text. Merge further providers onto the
    /// returned [`Figment`] to add config files.
    pub fn figment() -> Figment {
        Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(Env::prefixed(ENV_PREFIX).ignore(&TEXT_KEYS))
            .merge(Serialized::defaults(text_env()))
    }

    /// Extract settings from [`Settings::figment`].
    pub fn from_env() -> Result<Self, ItexmoError> {
        Self::from_figment(&Self::figment())
    }

    /// Extract settings from any figment.
    pub fn from_figment(figment: &Figment) -> Result<Self, ItexmoError> {
        figment
            .extract()
            .map_err(|err| ItexmoError::Config(Box::new(err)))
    }

    /// Validate the settings and turn them into a client builder.
    pub fn into_builder(self) -> Result<ItexmoClientBuilder, ItexmoError> {
        let auth = match (non_empty(self.email), non_empty(self.password)) {
            (Some(email), Some(password)) => Auth::account(self.api_code, email, password)?,
            (None, None) => Auth::api_code(self.api_code)?,
            (Some(_), None) => {
                return Err(ValidationError::IncompleteAccount {
                    missing: Password::FIELD,
                }
                .into());
            }
            (None, Some(_)) => {
                return Err(ValidationError::IncompleteAccount {
                    missing: Email::FIELD,
                }
                .into());
            }
        };

        let retry = RetryPolicy::new(
            self.retry_attempts,
            Duration::from_millis(self.retry_delay),
        )?;

        let mut builder = ItexmoClient::builder(auth)
            .base_url(self.base_url)
            .max_message_length(self.max_message_length)
            .retry_policy(retry);
        if let Some(sender_id) = non_empty(self.sender_id) {
            builder = builder.default_sender_id(SenderId::new(sender_id)?);
        }
        if let Some(ms) = self.connect_timeout {
            builder = builder.connect_timeout(Duration::from_millis(ms));
        }
        if let Some(ms) = self.timeout {
            builder = builder.timeout(Duration::from_millis(ms));
        }
        Ok(builder)
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("sender_id", &self.sender_id)
            .field("base_url", &self.base_url)
            .field("max_message_length", &self.max_message_length)
            .field("retry_attempts", &self.retry_attempts)
            .field("retry_delay", &self.retry_delay)
            .field("connect_timeout", &self.connect_timeout)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl ItexmoClient {
    /// Build a client from `ITEXMO_*` environment variables.
    ///
    /// `ITEXMO_API_CODE` is required; see [`Settings`] for the other variables.
    pub fn from_env() -> Result<Self, ItexmoError> {
        Settings::from_env()?.into_builder()?.build()
    }
}

fn text_env() -> Dict {
    Env::prefixed(ENV_PREFIX)
        .only(&TEXT_KEYS)
        .iter()
        .map(|(key, value)| (key.as_str().to_ascii_lowercase(), Value::from(value)))
        .collect()
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|it| !it.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use figment::Jail;

    use super::*;

    #[test]
    fn defaults_apply_when_env_is_empty() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            let settings = Settings::from_env().unwrap();
            assert_eq!(settings, Settings::default());
            assert_eq!(settings.base_url, "https://api.itexmo.com/api/");
            assert_eq!(settings.max_message_length, 160);
            assert_eq!(settings.retry_attempts, 3);
            assert_eq!(settings.retry_delay, 1000);
            Ok(())
        });
    }

    #[test]
    fn env_values_round_trip_into_client() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            jail.set_env("ITEXMO_API_CODE", "TR-ACME-1234");
            jail.set_env("ITEXMO_EMAIL", "ops@example.com");
            jail.set_env("ITEXMO_PASSWORD", "s3cret");
            jail.set_env("ITEXMO_SENDER_ID", "ACME");
            jail.set_env("ITEXMO_BASE_URL", "https://gateway.example.invalid/api");
            jail.set_env("ITEXMO_MAX_MESSAGE_LENGTH", "320");
            jail.set_env("ITEXMO_RETRY_ATTEMPTS", "5");
            jail.set_env("ITEXMO_RETRY_DELAY", "250");
            jail.set_env("ITEXMO_TIMEOUT", "10000");

            let settings = Settings::from_env().unwrap();
            assert_eq!(settings.api_code, "TR-ACME-1234");
            assert_eq!(settings.email.as_deref(), Some("ops@example.com"));
            assert_eq!(settings.timeout, Some(10_000));
            assert_eq!(settings.connect_timeout, None);

            let client = settings.into_builder().unwrap().build().unwrap();
            assert_eq!(client.default_sender_id().map(SenderId::as_str), Some("ACME"));
            assert_eq!(client.max_message_length(), 320);
            assert_eq!(
                client.retry_policy(),
                RetryPolicy::new(5, Duration::from_millis(250)).unwrap()
            );
            Ok(())
        });
    }

    #[test]
    fn numeric_looking_credentials_stay_text() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            jail.set_env("ITEXMO_API_CODE", "00123");
            jail.set_env("ITEXMO_EMAIL", "ops@example.com");
            jail.set_env("ITEXMO_PASSWORD", "0042");
            jail.set_env("ITEXMO_SENDER_ID", "1.50");

            let settings = Settings::from_env().unwrap();
            assert_eq!(settings.api_code, "00123");
            assert_eq!(settings.password.as_deref(), Some("0042"));
            assert_eq!(settings.sender_id.as_deref(), Some("1.50"));

            jail.set_env("ITEXMO_PASSWORD", "true");
            jail.set_env("ITEXMO_API_CODE", "123456");
            let settings = Settings::from_env().unwrap();
            assert_eq!(settings.api_code, "123456");
            assert_eq!(settings.password.as_deref(), Some("true"));

            let client = settings.into_builder().unwrap().build().unwrap();
            assert_eq!(client.default_sender_id().map(SenderId::as_str), Some("1.50"));
            Ok(())
        });
    }

    #[test]
    fn numeric_settings_are_still_parsed() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            jail.set_env("ITEXMO_API_CODE", "00123");
            jail.set_env("ITEXMO_RETRY_ATTEMPTS", "7");
            jail.set_env("ITEXMO_CONNECT_TIMEOUT", "1500");

            let settings = Settings::from_env().unwrap();
            assert_eq!(settings.retry_attempts, 7);
            assert_eq!(settings.connect_timeout, Some(1500));
            Ok(())
        });
    }

    #[test]
    fn empty_optional_values_mean_unset() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            jail.set_env("ITEXMO_API_CODE", "TR-ACME");
            jail.set_env("ITEXMO_EMAIL", "");
            jail.set_env("ITEXMO_PASSWORD", "");
            jail.set_env("ITEXMO_SENDER_ID", "");

            let client = ItexmoClient::from_env().unwrap();
            assert!(client.default_sender_id().is_none());
            Ok(())
        });
    }

    #[test]
    fn missing_api_code_is_a_validation_error() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            let err = ItexmoClient::from_env().unwrap_err();
            assert!(matches!(
                err,
                ItexmoError::Validation(ValidationError::Empty { .. })
            ));
            Ok(())
        });
    }

    #[test]
    fn half_configured_account_is_rejected() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            jail.set_env("ITEXMO_API_CODE", "TR-ACME");
            jail.set_env("ITEXMO_EMAIL", "ops@example.com");

            let err = Settings::from_env().unwrap().into_builder().unwrap_err();
            assert!(matches!(
                err,
                ItexmoError::Validation(ValidationError::IncompleteAccount {
                    missing: "Password"
                })
            ));
            Ok(())
        });
    }

    #[test]
    fn invalid_values_are_reported() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            jail.set_env("ITEXMO_API_CODE", "TR-ACME");
            jail.set_env("ITEXMO_RETRY_ATTEMPTS", "0");
            let err = Settings::from_env().unwrap().into_builder().unwrap_err();
            assert!(matches!(
                err,
                ItexmoError::Validation(ValidationError::TooSmall { .. })
            ));

            jail.set_env("ITEXMO_RETRY_ATTEMPTS", "many");
            let err = Settings::from_env().unwrap_err();
            assert!(matches!(err, ItexmoError::Config(_)));

            jail.set_env("ITEXMO_RETRY_ATTEMPTS", "3");
            jail.set_env("ITEXMO_EMAIL", "not-an-email");
            jail.set_env("ITEXMO_PASSWORD", "pw");
            let err = Settings::from_env().unwrap().into_builder().unwrap_err();
            assert!(matches!(
                err,
                ItexmoError::Validation(ValidationError::InvalidEmail { .. })
            ));
            Ok(())
        });
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let settings = Settings {
            api_code: "TR-ACME".to_owned(),
            password: Some("hunter2".to_owned()),
            ..Settings::default()
        };
        let rendered = format!("{settings:?}");
        assert!(!rendered.contains("hunter2"));
        assert!(!rendered.contains("TR-ACME"));
    }
}
