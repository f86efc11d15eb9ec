//! MongoClient for reaching the Data API over HTTPS.

use crate::connection::Connection;
use crate::db::Database;
use crate::error::{MongoError, Result};
use crate::transport::{HttpTransport, ReqwestTransport};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Environment variable holding the endpoint URL.
pub const ENDPOINT_ENV: &str = "MONGODB_API_ENDPOINT";
/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "MONGODB_API_KEY";
/// Environment variable holding the data source name.
pub const DATA_SOURCE_ENV: &str = "DATA_SOURCE";

/// Required connection identity.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the Data API endpoint.
    pub url: String,
    /// API key sent in the `apiKey` header.
    pub api_key: String,
    /// Name of the cluster the endpoint routes to.
    pub data_source: String,
}

impl ClientConfig {
    /// Create a configuration from its three parts.
    pub fn new(
        url: impl Into<String>,
        api_key: impl Into<String>,
        data_source: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            api_key: api_key.into(),
            data_source: data_source.into(),
        }
    }

    /// Create a new ClientConfig builder.
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Read the configuration from `MONGODB_API_ENDPOINT`, `MONGODB_API_KEY`
    /// and `DATA_SOURCE`.
    pub fn from_env() -> Result<Self> {
        let config = Self::new(
            read_env(ENDPOINT_ENV)?,
            read_env(API_KEY_ENV)?,
            read_env(DATA_SOURCE_ENV)?,
        );
        config.validate()?;
        Ok(config)
    }

    /// Check that every required field is present.
    ///
    /// The API key and data source are sent verbatim, so surrounding
    /// whitespace is rejected rather than stripped.
    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(MongoError::configuration("url is required"));
        }
        check_verbatim("api key", &self.api_key)?;
        check_verbatim("data source", &self.data_source)
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("url", &self.url)
            .field("api_key", &"<redacted>")
            .field("data_source", &self.data_source)
            .finish()
    }
}

fn check_verbatim(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(MongoError::configuration(format!("{field} is required")));
    }
    if value.trim() != value {
        return Err(MongoError::configuration(format!(
            "{field} has leading or trailing whitespace"
        )));
    }
    Ok(())
}

fn read_env(name: &str) -> Result<String> {
    std::env::var(name)
        .map_err(|_| MongoError::configuration(format!("environment variable {name} is not set")))
}

/// Builder for ClientConfig.
#[derive(Debug, Clone, Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Set the endpoint URL.
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.config.url = url.into();
        self
    }

    /// Set the API key.
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.config.api_key = api_key.into();
        self
    }

    /// Set the data source.
    pub fn data_source(mut self, data_source: impl Into<String>) -> Self {
        self.config.data_source = data_source.into();
        self
    }

    /// Build the configuration.
    pub fn build(self) -> ClientConfig {
        self.config
    }
}

/// Extra transport options applied to every request.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Headers merged after the standard ones; a matching name replaces the default.
    pub headers: Vec<(String, String)>,
    /// Timeout handed to the transport for each request.
    pub timeout: Option<Duration>,
}

impl RequestOptions {
    /// Create a new RequestOptions builder.
    pub fn builder() -> RequestOptionsBuilder {
        RequestOptionsBuilder::default()
    }
}

/// Builder for RequestOptions.
#[derive(Debug, Clone, Default)]
pub struct RequestOptionsBuilder {
    options: RequestOptions,
}

impl RequestOptionsBuilder {
    /// Add a header.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.headers.push((name.into(), value.into()));
        self
    }

    /// Set the per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.options.timeout = Some(timeout);
        self
    }

    /// Build the options.
    pub fn build(self) -> RequestOptions {
        self.options
    }
}

/// Normalize a base URL so operation names can be appended directly.
///
/// The result always ends in `/action/`. Applying it twice is a no-op.
pub fn normalize_base_url(url: &str) -> String {
    let mut url = url.trim().to_string();
    if !url.ends_with('/') {
        url.push('/');
    }
    if !url.ends_with("/action/") {
        url.push_str("action/");
    }
    url
}

/// A Data API client.
///
/// The client is a cheap handle around an immutable [`Connection`]. Selecting
/// a database returns a new [`Database`]; the client itself never changes.
///
/// # Example
///
/// ```ignore
/// use mongo_data_api::{ClientConfig, MongoClient};
///
/// #[tokio::main]
/// async fn main() -> mongo_data_api::Result<()> {
///     let client = MongoClient::new(ClientConfig::from_env()?)?;
///     let users = client.database("mydb").collection_with_doc("users");
///
///     let active = users.find(bson::doc! { "active": true }).await?;
///     println!("{} active users", active.len());
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct MongoClient {
    connection: Arc<Connection>,
}

impl MongoClient {
    /// Create a client using the default `reqwest` transport.
    ///
    /// Fails with [`MongoError::Configuration`] if the url, API key or data
    /// source is empty.
    pub fn new(config: ClientConfig) -> Result<Self> {
        Self::with_options(config, RequestOptions::default())
    }

    /// Create a client with extra transport options.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let options = RequestOptions::builder()
    ///     .header("Cache-Control", "no-cache")
    ///     .timeout(Duration::from_secs(10))
    ///     .build();
    /// let client = MongoClient::with_options(config, options)?;
    /// ```
    pub fn with_options(config: ClientConfig, options: RequestOptions) -> Result<Self> {
        let transport = ReqwestTransport::new()?;
        Self::with_transport(config, options, Arc::new(transport))
    }

    /// Create a client with a custom transport (useful for testing).
    pub fn with_transport(
        config: ClientConfig,
        options: RequestOptions,
        transport: Arc<dyn HttpTransport>,
    ) -> Result<Self> {
        let connection = Connection::new(&config, options, transport)?;
        Ok(Self {
            connection: Arc::new(connection),
        })
    }

    /// Get a database handle.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let db = client.database("mydb");
    /// ```
    pub fn database(&self, name: &str) -> Database {
        Database::new(name.to_string(), self.connection.clone())
    }

    /// Get the normalized base URL.
    pub fn base_url(&self) -> &str {
        self.connection.base_url()
    }

    /// Get the data source name.
    pub fn data_source(&self) -> &str {
        self.connection.data_source()
    }

    /// Get the shared connection identity.
    pub fn connection(&self) -> &Arc<Connection> {
        &self.connection
    }
}

/// Alias for MongoClient for compatibility.
pub type Client = MongoClient;
