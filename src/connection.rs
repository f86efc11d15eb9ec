//! Shared connection identity and the request dispatch path.

use crate::client::{normalize_base_url, ClientConfig, RequestOptions};
use crate::error::{MongoError, Result};
use crate::operation::{Namespace, OperationRequest};
use crate::transport::{HttpRequest, HttpTransport};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE};
use serde_json::Value as JsonValue;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Authentication header expected by the endpoint (`apiKey`, matched case-insensitively).
pub const API_KEY_HEADER: &str = "apikey";

/// Immutable identity shared by every handle derived from one client.
pub struct Connection {
    base_url: String,
    data_source: String,
    headers: HeaderMap,
    timeout: Option<Duration>,
    transport: Arc<dyn HttpTransport>,
}

impl Connection {
    /// Validate the configuration and compose the fixed request headers.
    pub(crate) fn new(
        config: &ClientConfig,
        options: RequestOptions,
        transport: Arc<dyn HttpTransport>,
    ) -> Result<Self> {
        config.validate()?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let mut api_key = HeaderValue::from_str(&config.api_key)
            .map_err(|_| MongoError::configuration("api key is not a valid header value"))?;
        api_key.set_sensitive(true);
        headers.insert(HeaderName::from_static(API_KEY_HEADER), api_key);

        for (name, value) in &options.headers {
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| MongoError::configuration(format!("invalid header name: {name}")))?;
            let header_value = HeaderValue::from_str(value).map_err(|_| {
                MongoError::configuration(format!("invalid value for header {name}"))
            })?;
            headers.insert(header_name, header_value);
        }

        Ok(Self {
            base_url: normalize_base_url(&config.url),
            data_source: config.data_source.clone(),
            headers,
            timeout: options.timeout,
            transport,
        })
    }

    /// Normalized base URL, ending in `action/`.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Data source routed by the endpoint.
    pub fn data_source(&self) -> &str {
        &self.data_source
    }

    /// Timeout hint handed to the transport.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Headers attached to every request.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Send one operation and return the normalized response body.
    pub(crate) async fn dispatch(
        &self,
        namespace: &Namespace,
        request: &OperationRequest,
    ) -> Result<JsonValue> {
        namespace.validate()?;

        let operation = request.operation();
        let url = format!("{}{}", self.base_url, operation.name());
        let body = serde_json::to_vec(&request.envelope(&self.data_source, namespace))?;

        debug!(
            operation = operation.name(),
            database = namespace.database(),
            collection = namespace.collection(),
            url = %url,
            "dispatching data api request"
        );

        let response = self
            .transport
            .post(HttpRequest {
                url,
                headers: self.headers.clone(),
                body,
                timeout: self.timeout,
            })
            .await?;

        debug!(
            operation = operation.name(),
            status = response.status,
            bytes = response.body.len(),
            "received data api response"
        );

        if !response.is_success() {
            let body = serde_json::from_slice(&response.body).unwrap_or_else(|_| {
                JsonValue::String(String::from_utf8_lossy(&response.body).into_owned())
            });
            warn!(
                operation = operation.name(),
                status = response.status,
                "data api request rejected"
            );
            return Err(MongoError::remote(response.status, body));
        }

        let parsed: JsonValue = serde_json::from_slice(&response.body)
            .map_err(|e| MongoError::transport(format!("invalid JSON response: {e}")))?;

        Ok(unwrap_documents(parsed))
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("base_url", &self.base_url)
            .field("data_source", &self.data_source)
            .field("api_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

/// Return the value of the `documents` key when the body is an object that
/// has one, whatever that value is; otherwise return the body unchanged.
pub fn unwrap_documents(body: JsonValue) -> JsonValue {
    match body {
        JsonValue::Object(mut map) if map.contains_key("documents") => {
            map.remove("documents").unwrap_or(JsonValue::Null)
        }
        other => other,
    }
}
