//! Client layer: orchestrates transport calls, retries, and maps transport ↔ domain.

mod hook;
mod retry;

use std::error::Error as StdError;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use serde_json::{Map, Value};
use tracing::{debug, warn};
use url::Url;

use crate::domain::{
    ApiCode, Email, GatewayResult, Password, Query, QueryAction, SendBatch, SendMessage,
    SendOtp, SenderId, ValidationError,
};

pub use hook::{Exchange, ExchangeHook, ExchangeStatus, Operation};
pub use retry::RetryPolicy;

/// Default iTexMo API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.itexmo.com/api/";
/// Default maximum message length, in characters.
pub const DEFAULT_MAX_MESSAGE_LENGTH: usize = 160;

/// Boxed future returned by [`HttpTransport`].
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

type BoxError = Box<dyn StdError + Send + Sync>;

#[derive(Debug, Clone, PartialEq, Eq)]
/// Raw HTTP response handed back by an [`HttpTransport`].
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// HTTP seam used by [`ItexmoClient`].
///
/// The default implementation is backed by `reqwest`. Supply your own through
/// [`ItexmoClientBuilder::transport`] to route requests elsewhere or to script responses.
pub trait HttpTransport: Send + Sync {
    /// POST `body` as JSON to `url`.
    fn post_json<'a>(
        &'a self,
        url: &'a str,
        body: Value,
    ) -> BoxFuture<'a, Result<HttpResponse, HttpError>>;
}

#[derive(Debug, Clone)]
struct ReqwestTransport {
    client: reqwest::Client,
}

impl HttpTransport for ReqwestTransport {
    fn post_json<'a>(
        &'a self,
        url: &'a str,
        body: Value,
    ) -> BoxFuture<'a, Result<HttpResponse, HttpError>> {
        Box::pin(async move {
            let response = self.client.post(url).json(&body).send().await?;
            let status = response.status().as_u16();
            let body = response.text().await?;
            Ok(HttpResponse { status, body })
        })
    }
}

#[derive(Debug, thiserror::Error)]
/// Failure to obtain an HTTP response.
///
/// Everything except [`HttpError::Build`] is treated as transient and retried.
pub enum HttpError {
    /// The request or connection timed out.
    #[error("request timed out: {0}")]
    Timeout(#[source] BoxError),

    /// DNS, TLS, or TCP connection failure.
    #[error("connection failed: {0}")]
    Connect(#[source] BoxError),

    /// Any other failure while sending or reading the response.
    #[error("request failed: {0}")]
    Request(#[source] BoxError),

    /// The request could not be constructed; retrying cannot help.
    #[error("request could not be built: {0}")]
    Build(#[source] BoxError),
}

impl HttpError {
    /// Whether another attempt may succeed.
    pub fn is_transient(&self) -> bool {
        !matches!(self, Self::Build(_))
    }
}

impl From<reqwest::Error> for HttpError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(Box::new(err))
        } else if err.is_connect() {
            Self::Connect(Box::new(err))
        } else if err.is_builder() {
            Self::Build(Box::new(err))
        } else {
            Self::Request(Box::new(err))
        }
    }
}

#[derive(Debug, Clone)]
/// Authentication credentials for iTexMo API calls.
///
/// Use [`Auth::api_code`] when the API code alone identifies you, or [`Auth::account`] when
/// your account also requires the email/password pair on every request.
pub enum Auth {
    /// Authenticate via `ApiCode` only.
    ApiCode(ApiCode),
    /// Authenticate via `ApiCode` + `Email` + `Password`.
    Account {
        api_code: ApiCode,
        email: Email,
        password: Password,
    },
}

impl Auth {
    /// Create [`Auth::ApiCode`] and validate that the value is non-empty after trimming.
    pub fn api_code(value: impl Into<String>) -> Result<Self, ValidationError> {
        Ok(Self::ApiCode(ApiCode::new(value)?))
    }

    /// Create [`Auth::Account`]; the email must be syntactically valid.
    pub fn account(
        api_code: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Ok(Self::Account {
            api_code: ApiCode::new(api_code)?,
            email: Email::new(email)?,
            password: Password::new(password)?,
        })
    }

    fn push_json_fields(&self, body: &mut Map<String, Value>) {
        match self {
            Self::ApiCode(api_code) => {
                body.insert(ApiCode::FIELD.to_owned(), Value::from(api_code.as_str()));
            }
            Self::Account {
                api_code,
                email,
                password,
            } => {
                body.insert(ApiCode::FIELD.to_owned(), Value::from(api_code.as_str()));
                body.insert(Email::FIELD.to_owned(), Value::from(email.as_str()));
                body.insert(Password::FIELD.to_owned(), Value::from(password.as_str()));
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
/// Errors returned by [`ItexmoClient`].
///
/// Gateway-level failures (rejected messages, HTTP 401, malformed replies, exhausted retries)
/// are not errors: they come back as a [`GatewayResult`] with `success == false`.
pub enum ItexmoError {
    /// The request could not be sent at all (not retried).
    #[error("transport error: {0}")]
    Transport(#[source] HttpError),

    /// The configured base URL is not a valid URL.
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),

    /// Settings could not be loaded or extracted.
    #[error("configuration error: {0}")]
    Config(#[source] Box<figment::Error>),

    /// One of the domain constructors or client limits rejected an invalid value.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}

#[derive(Debug, Clone)]
struct Endpoints {
    send: String,
    batch: String,
    otp: String,
    query: String,
}

impl Endpoints {
    fn under(base: &Url) -> Result<Self, url::ParseError> {
        Ok(Self {
            send: base.join(Operation::Send.path())?.into(),
            batch: base.join(Operation::SendBatch.path())?.into(),
            otp: base.join(Operation::SendOtp.path())?.into(),
            query: base.join(Operation::Query.path())?.into(),
        })
    }

    fn get(&self, operation: Operation) -> &str {
        match operation {
            Operation::Send => &self.send,
            Operation::SendBatch => &self.batch,
            Operation::SendOtp => &self.otp,
            Operation::Query => &self.query,
        }
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        let at = |operation: Operation| format!("{DEFAULT_BASE_URL}{}", operation.path());
        Self {
            send: at(Operation::Send),
            batch: at(Operation::SendBatch),
            otp: at(Operation::SendOtp),
            query: at(Operation::Query),
        }
    }
}

fn parse_base_url(raw: &str) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(raw.trim())?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

#[derive(Clone)]
/// Builder for [`ItexmoClient`].
///
/// Use this when you need to customize the base URL, sender, limits, retries, or timeouts.
pub struct ItexmoClientBuilder {
    auth: Auth,
    base_url: String,
    default_sender_id: Option<SenderId>,
    max_message_length: usize,
    retry: RetryPolicy,
    connect_timeout: Option<Duration>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
    hook: Option<ExchangeHook>,
    transport: Option<Arc<dyn HttpTransport>>,
}

impl ItexmoClientBuilder {
    /// Create a builder with the default base URL, limits, and retry policy.
    pub fn new(auth: Auth) -> Self {
        Self {
            auth,
            base_url: DEFAULT_BASE_URL.to_owned(),
            default_sender_id: None,
            max_message_length: DEFAULT_MAX_MESSAGE_LENGTH,
            retry: RetryPolicy::default(),
            connect_timeout: None,
            timeout: None,
            user_agent: None,
            hook: None,
            transport: None,
        }
    }

    /// Override the API base URL. Endpoint paths are resolved relative to it.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sender used by `send` and `send_batch` when the request carries none.
    pub fn default_sender_id(mut self, sender_id: SenderId) -> Self {
        self.default_sender_id = Some(sender_id);
        self
    }

    /// Maximum message length in characters. Must be at least 1.
    pub fn max_message_length(mut self, max: usize) -> Self {
        self.max_message_length = max;
        self
    }

    /// Retry policy for transient failures. Defaults to [`RetryPolicy::default`].
    pub fn retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Set the TCP/TLS connect timeout of the default transport.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Set a timeout applied to each entire request of the default transport.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Override the HTTP `User-Agent` header of the default transport.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Register a callback invoked after every HTTP attempt.
    pub fn exchange_hook(mut self, hook: impl Fn(&Exchange<'_>) + Send + Sync + 'static) -> Self {
        self.hook = Some(Arc::new(hook));
        self
    }

    /// Replace the `reqwest` transport. Timeouts and user-agent settings are then ignored.
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Build an [`ItexmoClient`].
    pub fn build(self) -> Result<ItexmoClient, ItexmoError> {
        if self.max_message_length == 0 {
            return Err(ValidationError::TooSmall {
                field: "max_message_length",
                min: 1,
                actual: 0,
            }
            .into());
        }

        let endpoints = Endpoints::under(&parse_base_url(&self.base_url)?)?;

        let http = match self.transport {
            Some(transport) => transport,
            None => {
                let mut builder = reqwest::Client::builder();
                if let Some(timeout) = self.connect_timeout {
                    builder = builder.connect_timeout(timeout);
                }
                if let Some(timeout) = self.timeout {
                    builder = builder.timeout(timeout);
                }
                if let Some(user_agent) = self.user_agent {
                    builder = builder.user_agent(user_agent);
                }
                let client = builder
                    .build()
                    .map_err(|err| ItexmoError::Transport(HttpError::Build(Box::new(err))))?;
                Arc::new(ReqwestTransport { client })
            }
        };

        Ok(ItexmoClient {
            auth: self.auth,
            endpoints,
            default_sender_id: self.default_sender_id,
            max_message_length: self.max_message_length,
            retry: self.retry,
            hook: self.hook,
            http,
        })
    }
}

impl fmt::Debug for ItexmoClientBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ItexmoClientBuilder")
            .field("auth", &self.auth)
            .field("base_url", &self.base_url)
            .field("default_sender_id", &self.default_sender_id)
            .field("max_message_length", &self.max_message_length)
            .field("retry", &self.retry)
            .field("connect_timeout", &self.connect_timeout)
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .finish_non_exhaustive()
    }
}

#[derive(Clone)]
/// High-level iTexMo client.
///
/// This type orchestrates request validation, JSON encoding, retries, and reply normalization.
/// By default it posts to endpoints under `https://api.itexmo.com/api/`:
/// - `broadcast` for [`ItexmoClient::send`]
/// - `broadcast-2d` for [`ItexmoClient::send_batch`]
/// - `broadcast-otp` for [`ItexmoClient::send_otp`]
/// - `query` for [`ItexmoClient::query`]
///
/// Every call builds a fresh request; nothing is cached between calls. A retried send whose
/// first response was lost in transit may be delivered twice, since iTexMo offers no
/// idempotency key.
pub struct ItexmoClient {
    auth: Auth,
    endpoints: Endpoints,
    default_sender_id: Option<SenderId>,
    max_message_length: usize,
    retry: RetryPolicy,
    hook: Option<ExchangeHook>,
    http: Arc<dyn HttpTransport>,
}

impl ItexmoClient {
    /// Create a client with the default base URL, limits, and retry policy.
    ///
    /// For more customization, use [`ItexmoClient::builder`].
    pub fn new(auth: Auth) -> Self {
        Self {
            auth,
            endpoints: Endpoints::default(),
            default_sender_id: None,
            max_message_length: DEFAULT_MAX_MESSAGE_LENGTH,
            retry: RetryPolicy::default(),
            hook: None,
            http: Arc::new(ReqwestTransport {
                client: reqwest::Client::new(),
            }),
        }
    }

    /// Start building a client with custom settings.
    pub fn builder(auth: Auth) -> ItexmoClientBuilder {
        ItexmoClientBuilder::new(auth)
    }

    /// Sender applied when a request carries none.
    pub fn default_sender_id(&self) -> Option<&SenderId> {
        self.default_sender_id.as_ref()
    }

    /// Maximum message length in characters.
    pub fn max_message_length(&self) -> usize {
        self.max_message_length
    }

    /// Retry policy applied to every request.
    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    /// Send one message to one or more recipients (`broadcast`).
    ///
    /// The request's sender overrides the configured default sender.
    ///
    /// Errors:
    /// - Returns [`ItexmoError::Validation`] when the message exceeds the configured maximum,
    /// - [`ItexmoError::Transport`] when the request cannot be built.
    pub async fn send(&self, request: SendMessage) -> Result<GatewayResult, ItexmoError> {
        request.msg().ensure_within(self.max_message_length)?;

        let sender_id = request.sender_id().or(self.default_sender_id.as_ref());
        let body = crate::transport::encode_send_json(&request, sender_id);
        self.dispatch(Operation::Send, body).await
    }

    /// Send distinct messages to distinct recipients in one request (`broadcast-2d`).
    ///
    /// Every entry is checked before anything is sent; the first over-length entry rejects
    /// the whole batch.
    pub async fn send_batch(&self, request: SendBatch) -> Result<GatewayResult, ItexmoError> {
        for (index, entry) in request.entries().iter().enumerate() {
            entry
                .msg()
                .ensure_within(self.max_message_length)
                .map_err(|reason| ValidationError::InvalidBatchEntry {
                    index,
                    reason: Box::new(reason),
                })?;
        }

        let sender_id = request.sender_id().or(self.default_sender_id.as_ref());
        let body = crate::transport::encode_batch_json(&request, sender_id);
        self.dispatch(Operation::SendBatch, body).await
    }

    /// Send a one-time password message (`broadcast-otp`).
    ///
    /// The OTP endpoint does not accept a sender, so no sender is ever sent.
    pub async fn send_otp(&self, request: SendOtp) -> Result<GatewayResult, ItexmoError> {
        request.msg().ensure_within(self.max_message_length)?;

        let body = crate::transport::encode_otp_json(&request);
        self.dispatch(Operation::SendOtp, body).await
    }

    /// Run an account query (`query`).
    pub async fn query(&self, request: Query) -> Result<GatewayResult, ItexmoError> {
        let body = crate::transport::encode_query_json(&request);
        self.dispatch(Operation::Query, body).await
    }

    /// Query API code details; see [`GatewayResult::messages_left`] for the remaining credits.
    pub async fn check_balance(&self) -> Result<GatewayResult, ItexmoError> {
        self.query(Query::new(QueryAction::api_code_info())).await
    }

    async fn dispatch(
        &self,
        operation: Operation,
        fields: Map<String, Value>,
    ) -> Result<GatewayResult, ItexmoError> {
        let url = self.endpoints.get(operation);
        let mut body = Map::new();
        self.auth.push_json_fields(&mut body);
        body.extend(fields);
        let body = Value::Object(body);

        let attempts = self.retry.attempts();
        let mut last_failure = String::new();

        for attempt in 1..=attempts {
            debug!(%operation, url, attempt, "sending iTexMo request");

            match self.http.post_json(url, body.clone()).await {
                Ok(response) => {
                    self.notify(Exchange {
                        operation,
                        url,
                        attempt,
                        status: ExchangeStatus::Response {
                            status: response.status,
                            body: &response.body,
                        },
                    });

                    if response.status == 401 {
                        warn!(%operation, "iTexMo rejected credentials (HTTP 401)");
                        return Ok(GatewayResult::unauthorized());
                    }
                    if (200..=299).contains(&response.status) {
                        let result = crate::transport::normalize_reply(&response.body);
                        debug!(
                            %operation,
                            success = result.success,
                            outcome = ?result.outcome,
                            "iTexMo request completed"
                        );
                        return Ok(result);
                    }
                    last_failure = format!("unexpected HTTP status: {}", response.status);
                }
                Err(err) => {
                    self.notify(Exchange {
                        operation,
                        url,
                        attempt,
                        status: ExchangeStatus::Failed { error: &err },
                    });

                    if !err.is_transient() {
                        return Err(ItexmoError::Transport(err));
                    }
                    last_failure = format!("transport error: {err}");
                }
            }

            if attempt < attempts {
                warn!(
                    %operation,
                    attempt,
                    failure = %last_failure,
                    delay_ms = self.retry.delay().as_millis() as u64,
                    "transient iTexMo failure, retrying"
                );
                self.retry.wait().await;
            }
        }

        warn!(%operation, attempts, failure = %last_failure, "iTexMo request failed, giving up");
        Ok(GatewayResult::unreachable(attempts, last_failure))
    }

    fn notify(&self, exchange: Exchange<'_>) {
        if let Some(hook) = self.hook.as_ref() {
            hook(&exchange);
        }
    }
}

impl fmt::Debug for ItexmoClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ItexmoClient")
            .field("auth", &self.auth)
            .field("endpoints", &self.endpoints)
            .field("default_sender_id", &self.default_sender_id)
            .field("max_message_length", &self.max_message_length)
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}
