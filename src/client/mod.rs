//! Client layer: authenticated calls against the gateway and the OneAPI operations built on
//! top of them.

use std::error::Error as StdError;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Deserialize;

use crate::domain::{
    Address, ConfigurationError, HttpResult, MessageId, Password, RequestId, Response, SendSms,
    SubscriptionId, SubscriptionOptions, Username,
};
use crate::transport;

const DEFAULT_BASE_URI: &str = "https://api.smsified.com/v1";
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
const JSON_ACCEPT: &str = "application/json";

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HttpMethod {
    Get,
    Post,
    Delete,
}

impl HttpMethod {
    fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Delete => "DELETE",
        }
    }
}

#[derive(Debug, Clone)]
struct HttpRequest {
    method: HttpMethod,
    url: String,
    headers: Vec<(String, String)>,
    body: Option<String>,
}

#[derive(Debug, Clone)]
struct HttpResponse {
    status: u16,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

trait HttpTransport: Send + Sync {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>>;
}

#[derive(Debug, Clone)]
struct ReqwestTransport {
    client: reqwest::Client,
}

impl HttpTransport for ReqwestTransport {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>> {
        Box::pin(async move {
            let method = match request.method {
                HttpMethod::Get => reqwest::Method::GET,
                HttpMethod::Post => reqwest::Method::POST,
                HttpMethod::Delete => reqwest::Method::DELETE,
            };
            let mut builder = self.client.request(method, request.url.as_str());
            for (name, value) in &request.headers {
                builder = builder.header(name.as_str(), value.as_str());
            }
            if let Some(body) = request.body {
                builder = builder.body(body);
            }

            let response = builder.send().await?;
            let status = response.status().as_u16();
            let headers = response
                .headers()
                .iter()
                .map(|(name, value)| {
                    (
                        name.as_str().to_owned(),
                        String::from_utf8_lossy(value.as_bytes()).into_owned(),
                    )
                })
                .collect();
            let body = response.bytes().await?.to_vec();
            Ok(HttpResponse {
                status,
                headers,
                body,
            })
        })
    }
}

#[derive(Clone, Default, Deserialize)]
/// Client settings as they come from a config file or the environment.
///
/// `username` and `password` are required; they stay optional here so that their absence is
/// reported as [`ConfigurationError::Missing`] naming the field.
pub struct ClientConfig {
    pub username: Option<String>,
    pub password: Option<String>,
    /// Alternative gateway location, defaults to `https://api.smsified.com/v1`.
    pub base_uri: Option<String>,
    /// Sender used when a call does not name one.
    pub sender_address: Option<String>,
    /// Destination used by inbound-subscription calls that do not name one.
    pub destination_address: Option<String>,
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("base_uri", &self.base_uri)
            .field("sender_address", &self.sender_address)
            .field("destination_address", &self.destination_address)
            .finish()
    }
}

#[derive(Debug, Clone)]
/// Basic-auth credentials sent with every call.
pub struct Credentials {
    username: Username,
    password: Password,
}

impl Credentials {
    /// Validate a username/password pair; the username is trimmed, the password is kept as given.
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, ConfigurationError> {
        Ok(Self {
            username: Username::new(username)?,
            password: Password::new(password)?,
        })
    }

    pub fn username(&self) -> &Username {
        &self.username
    }

    /// `Authorization` header value.
    fn authorization(&self) -> String {
        let token = STANDARD.encode(format!(
            "{}:{}",
            self.username.as_str(),
            self.password.as_str()
        ));
        format!("Basic {token}")
    }
}

#[derive(Debug, thiserror::Error)]
/// Errors returned while constructing a [`SmsifiedClient`].
///
/// Calls on a constructed client never fail with this type: HTTP-level outcomes are part of
/// the returned [`Response`].
pub enum SmsifiedError {
    /// Missing or invalid configuration.
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// The underlying HTTP client could not be built (TLS backend, ...).
    #[error("http client error: {0}")]
    HttpClient(#[source] reqwest::Error),
}

#[derive(Debug, Clone, Default)]
/// Builder for [`SmsifiedClient`].
///
/// Use this when you need a timeout, a user-agent, or a non-default gateway location.
pub struct SmsifiedClientBuilder {
    config: ClientConfig,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl SmsifiedClientBuilder {
    /// Start from an empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a deserialized [`ClientConfig`].
    pub fn from_config(config: ClientConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.config.username = Some(username.into());
        self
    }

    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.config.password = Some(password.into());
        self
    }

    /// Override the gateway base URI.
    pub fn base_uri(mut self, base_uri: impl Into<String>) -> Self {
        self.config.base_uri = Some(base_uri.into());
        self
    }

    /// Default sender for send, delivery-status and outbound-subscription calls.
    pub fn sender_address(mut self, address: impl Into<String>) -> Self {
        self.config.sender_address = Some(address.into());
        self
    }

    /// Default destination for inbound-subscription calls.
    pub fn destination_address(mut self, address: impl Into<String>) -> Self {
        self.config.destination_address = Some(address.into());
        self
    }

    /// Set an HTTP client timeout applied to the entire request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Override the HTTP `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Validate the configuration and build a [`SmsifiedClient`].
    ///
    /// Configuration is checked before the HTTP client is created.
    pub fn build(self) -> Result<SmsifiedClient, SmsifiedError> {
        let settings = Settings::from_config(self.config)?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(user_agent) = self.user_agent {
            builder = builder.user_agent(user_agent);
        }
        let client = builder.build().map_err(SmsifiedError::HttpClient)?;

        Ok(SmsifiedClient::with_transport(
            settings,
            Arc::new(ReqwestTransport { client }),
        ))
    }
}

#[derive(Debug, Clone)]
struct Settings {
    credentials: Credentials,
    base_uri: String,
    sender_address: Option<Address>,
    destination_address: Option<Address>,
}

impl Settings {
    fn from_config(config: ClientConfig) -> Result<Self, ConfigurationError> {
        let username = config.username.ok_or(ConfigurationError::Missing {
            field: Username::FIELD,
        })?;
        let password = config.password.ok_or(ConfigurationError::Missing {
            field: Password::FIELD,
        })?;
        let credentials = Credentials::new(username, password)?;

        let base_uri = match config.base_uri {
            Some(base_uri) => parse_base_uri(&base_uri)?,
            None => DEFAULT_BASE_URI.to_owned(),
        };

        Ok(Self {
            credentials,
            base_uri,
            sender_address: optional_address(config.sender_address, "sender_address")?,
            destination_address: optional_address(
                config.destination_address,
                "destination_address",
            )?,
        })
    }
}

fn parse_base_uri(input: &str) -> Result<String, ConfigurationError> {
    let invalid = || ConfigurationError::InvalidBaseUri {
        input: input.to_owned(),
    };
    let parsed = url::Url::parse(input.trim()).map_err(|_| invalid())?;
    if !matches!(parsed.scheme(), "http" | "https")
        || parsed.cannot_be_a_base()
        || parsed.query().is_some()
        || parsed.fragment().is_some()
    {
        return Err(invalid());
    }
    Ok(parsed.as_str().trim_end_matches('/').to_owned())
}

fn optional_address(
    value: Option<String>,
    field: &'static str,
) -> Result<Option<Address>, ConfigurationError> {
    value
        .map(|value| Address::new(value).map_err(|_| ConfigurationError::Empty { field }))
        .transpose()
}

fn resolve_address<'a>(
    explicit: Option<&'a Address>,
    default: Option<&'a Address>,
    field: &'static str,
) -> Result<&'a Address, ConfigurationError> {
    explicit
        .or(default)
        .ok_or(ConfigurationError::Missing { field })
}

#[derive(Clone)]
/// Authenticated SMSified OneAPI client.
///
/// Every call resolves to a [`Response`] envelope exactly once, whatever the HTTP outcome:
/// a 404, a 500, or a refused connection is reported in the envelope rather than as an
/// error. The only errors are [`ConfigurationError`]s raised before any I/O, for example when
/// no sender address is known.
///
/// Cloning is cheap; clones share the HTTP connection pool and may issue calls
/// concurrently. Completion order between concurrent calls is unspecified.
pub struct SmsifiedClient {
    credentials: Credentials,
    authorization: String,
    base_uri: String,
    sender_address: Option<Address>,
    destination_address: Option<Address>,
    http: Arc<dyn HttpTransport>,
}

impl SmsifiedClient {
    /// Create a client from a [`ClientConfig`].
    ///
    /// Fails with [`ConfigurationError::Missing`] when `username` or `password` is absent.
    pub fn new(config: ClientConfig) -> Result<Self, SmsifiedError> {
        SmsifiedClientBuilder::from_config(config).build()
    }

    /// Start building a client with custom settings.
    pub fn builder() -> SmsifiedClientBuilder {
        SmsifiedClientBuilder::new()
    }

    fn with_transport(settings: Settings, http: Arc<dyn HttpTransport>) -> Self {
        Self {
            authorization: settings.credentials.authorization(),
            credentials: settings.credentials,
            base_uri: settings.base_uri,
            sender_address: settings.sender_address,
            destination_address: settings.destination_address,
            http,
        }
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn base_uri(&self) -> &str {
        &self.base_uri
    }

    pub fn sender_address(&self) -> Option<&Address> {
        self.sender_address.as_ref()
    }

    pub fn destination_address(&self) -> Option<&Address> {
        self.destination_address.as_ref()
    }

    /// `GET` a path relative to the base URI. `path` already carries its query string.
    pub async fn get(&self, path: &str, headers: &[(String, String)]) -> Response {
        self.execute(HttpMethod::Get, path, None, headers).await
    }

    /// `POST` an already form-encoded body to a path relative to the base URI.
    pub async fn post(
        &self,
        path: &str,
        body: impl Into<String>,
        headers: &[(String, String)],
    ) -> Response {
        self.execute(HttpMethod::Post, path, Some(body.into()), headers)
            .await
    }

    /// `DELETE` a path relative to the base URI.
    pub async fn delete(&self, path: &str, headers: &[(String, String)]) -> Response {
        self.execute(HttpMethod::Delete, path, None, headers).await
    }

    async fn execute(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<String>,
        headers: &[(String, String)],
    ) -> Response {
        let request = HttpRequest {
            method,
            url: self.url(path),
            headers: self.merge_headers(headers),
            body,
        };
        tracing::debug!(method = method.as_str(), path, "sending gateway request");

        match self.http.execute(request).await {
            Ok(response) => {
                tracing::debug!(
                    method = method.as_str(),
                    path,
                    status = response.status,
                    "gateway responded"
                );
                let data = transport::decode_data(&response.body);
                Response::new(
                    data,
                    HttpResult {
                        status: Some(response.status),
                        headers: response.headers,
                        body: response.body,
                        error: None,
                    },
                )
            }
            Err(err) => {
                tracing::warn!(
                    method = method.as_str(),
                    path,
                    error = %err,
                    "gateway request failed"
                );
                Response::new(
                    None,
                    HttpResult {
                        status: None,
                        headers: Vec::new(),
                        body: Vec::new(),
                        error: Some(err.to_string()),
                    },
                )
            }
        }
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{path}", self.base_uri)
        } else {
            format!("{}/{path}", self.base_uri)
        }
    }

    /// Caller headers first, with the fixed set and `Authorization` replacing any
    /// same-named (case-insensitive) entries.
    fn merge_headers(&self, headers: &[(String, String)]) -> Vec<(String, String)> {
        let fixed = [
            ("Content-Type", FORM_CONTENT_TYPE),
            ("Accept", JSON_ACCEPT),
            ("Authorization", self.authorization.as_str()),
        ];
        let mut merged = headers
            .iter()
            .filter(|(name, _)| {
                !fixed
                    .iter()
                    .any(|(fixed_name, _)| fixed_name.eq_ignore_ascii_case(name))
            })
            .cloned()
            .collect::<Vec<_>>();
        merged.extend(
            fixed
                .iter()
                .map(|(name, value)| ((*name).to_owned(), (*value).to_owned())),
        );
        merged
    }

    /// Send an SMS to one or more addresses.
    ///
    /// Uses the request's sender, falling back to the configured default; fails with
    /// [`ConfigurationError::Missing`] (`sender_address`) when neither is set.
    pub async fn send_sms(&self, request: SendSms) -> Result<Response, ConfigurationError> {
        let sender = resolve_address(
            request.sender_address(),
            self.sender_address.as_ref(),
            "sender_address",
        )?;
        let path = transport::send_sms_path(sender);
        let body = transport::encode_send_sms_form(&request);
        Ok(self.post(&path, body, &[]).await)
    }

    /// Delivery status of an outstanding send request.
    pub async fn delivery_status(
        &self,
        request_id: &RequestId,
        sender_address: Option<&Address>,
    ) -> Result<Response, ConfigurationError> {
        let sender = resolve_address(
            sender_address,
            self.sender_address.as_ref(),
            "sender_address",
        )?;
        let path = transport::delivery_infos_path(sender, request_id);
        Ok(self.get(&path, &[]).await)
    }

    /// Retrieve a single message.
    pub async fn retrieve_sms(&self, message_id: &MessageId) -> Response {
        self.get(&transport::message_path(message_id), &[]).await
    }

    /// Search messages with a raw query string, e.g. `start=2011-02-14&end=2011-02-15`.
    pub async fn search_sms(&self, query: &str) -> Response {
        self.get(&transport::search_messages_path(query), &[]).await
    }

    /// Subscribe to messages received on `destination_address` (or the configured default).
    pub async fn create_inbound_subscription(
        &self,
        destination_address: Option<&Address>,
        options: &SubscriptionOptions,
    ) -> Result<Response, ConfigurationError> {
        let destination = resolve_address(
            destination_address,
            self.destination_address.as_ref(),
            "destination_address",
        )?;
        let body = transport::encode_create_inbound_subscription_form(destination, options);
        Ok(self
            .post(transport::create_inbound_subscription_path(), body, &[])
            .await)
    }

    /// Subscribe to delivery notifications for messages sent from `sender_address`.
    pub async fn create_outbound_subscription(
        &self,
        sender_address: Option<&Address>,
        options: &SubscriptionOptions,
    ) -> Result<Response, ConfigurationError> {
        let sender = resolve_address(
            sender_address,
            self.sender_address.as_ref(),
            "sender_address",
        )?;
        let path = transport::create_outbound_subscription_path(sender);
        let body = transport::encode_subscription_form(options);
        Ok(self.post(&path, body, &[]).await)
    }

    /// List inbound subscriptions for `destination_address`.
    pub async fn inbound_subscriptions(
        &self,
        destination_address: Option<&Address>,
    ) -> Result<Response, ConfigurationError> {
        let destination = resolve_address(
            destination_address,
            self.destination_address.as_ref(),
            "destination_address",
        )?;
        let path = transport::list_inbound_subscriptions_path(destination);
        Ok(self.get(&path, &[]).await)
    }

    /// List outbound subscriptions for `sender_address`.
    pub async fn outbound_subscriptions(
        &self,
        sender_address: Option<&Address>,
    ) -> Result<Response, ConfigurationError> {
        let sender = resolve_address(
            sender_address,
            self.sender_address.as_ref(),
            "sender_address",
        )?;
        let path = transport::list_outbound_subscriptions_path(sender);
        Ok(self.get(&path, &[]).await)
    }

    /// Replace the options of an inbound subscription.
    pub async fn update_inbound_subscription(
        &self,
        subscription_id: &SubscriptionId,
        options: &SubscriptionOptions,
    ) -> Response {
        let path = transport::inbound_subscription_path(subscription_id);
        self.post(&path, transport::encode_subscription_form(options), &[])
            .await
    }

    /// Replace the options of an outbound subscription.
    pub async fn update_outbound_subscription(
        &self,
        subscription_id: &SubscriptionId,
        options: &SubscriptionOptions,
    ) -> Response {
        let path = transport::outbound_subscription_path(subscription_id);
        self.post(&path, transport::encode_subscription_form(options), &[])
            .await
    }

    /// Cancel an inbound subscription.
    pub async fn delete_inbound_subscription(&self, subscription_id: &SubscriptionId) -> Response {
        self.delete(&transport::inbound_subscription_path(subscription_id), &[])
            .await
    }

    /// Cancel an outbound subscription.
    pub async fn delete_outbound_subscription(
        &self,
        subscription_id: &SubscriptionId,
    ) -> Response {
        self.delete(&transport::outbound_subscription_path(subscription_id), &[])
            .await
    }
}
