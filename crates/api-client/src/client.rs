//! Main API client implementation

use crate::config::ClientConfig;
use crate::endpoints::{IpLookupApi, OverpassApi};
use crate::error::{ApiError, ErrorContext, ApiResult};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE, USER_AGENT};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

/// Request correlation ID header
const X_REQUEST_ID: &str = "X-Request-ID";

/// HTTP client shared by all endpoint interfaces
///
/// This client wraps `reqwest` and adds:
/// - Request correlation IDs for tracing
/// - Uniform status and body handling
/// - Timeout classification
///
/// Cloning is cheap; clones share the connection pool.
#[derive(Clone)]
pub struct DropoffClient {
    inner: Client,
    config: Arc<ClientConfig>,
}

impl DropoffClient {
    /// Create a new client with specific configuration
    pub fn with_config(config: ClientConfig) -> ApiResult<Self> {
        config.validate()?;

        let mut default_headers = HeaderMap::new();
        default_headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let agent = HeaderValue::from_str(&config.user_agent)
            .map_err(|_| ApiError::config(format!("invalid user agent: {}", config.user_agent)))?;
        default_headers.insert(USER_AGENT, agent);

        let inner = Client::builder()
            .timeout(config.timeout)
            .default_headers(default_headers)
            .build()
            .map_err(ApiError::Request)?;

        Ok(Self {
            inner,
            config: Arc::new(config),
        })
    }

    /// Get the current configuration
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    // -------------------------------------------------------------------------
    // Endpoint API accessors
    // -------------------------------------------------------------------------

    /// Access the Overpass geodata endpoint
    #[must_use]
    pub fn overpass(&self) -> OverpassApi {
        OverpassApi::new(self.clone())
    }

    /// Access the IP geolocation endpoint
    #[must_use]
    pub fn ip_lookup(&self) -> IpLookupApi {
        IpLookupApi::new(self.clone())
    }

    // -------------------------------------------------------------------------
    // Low-level HTTP methods
    // -------------------------------------------------------------------------

    /// Perform a GET request to an absolute URL
    #[instrument(skip(self), fields(request_id))]
    pub async fn get_url<T: DeserializeOwned>(&self, url: &str) -> ApiResult<T> {
        let request = self.inner.request(Method::GET, url);
        self.execute(Method::GET, url, request).await
    }

    /// POST a plain-text body to an absolute URL
    #[instrument(skip(self, body), fields(request_id, body_len = body.len()))]
    pub async fn post_text<T: DeserializeOwned>(&self, url: &str, body: String) -> ApiResult<T> {
        let request = self
            .inner
            .request(Method::POST, url)
            .header(CONTENT_TYPE, "text/plain; charset=utf-8")
            .body(body);
        self.execute(Method::POST, url, request).await
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        method: Method,
        url: &str,
        request: RequestBuilder,
    ) -> ApiResult<T> {
        let request_id = Uuid::new_v4().to_string();
        tracing::Span::current().record("request_id", request_id.as_str());

        let start = Instant::now();
        let result = match request.header(X_REQUEST_ID, &request_id).send().await {
            Ok(response) => self.handle_response(response).await,
            Err(e) if e.is_timeout() => Err(ApiError::Timeout(self.config.timeout)),
            Err(e) => Err(ApiError::Request(e)),
        };
        let elapsed = start.elapsed();

        match &result {
            Ok(_) => debug!(
                request_id = %request_id,
                elapsed_ms = elapsed.as_millis(),
                "Request succeeded"
            ),
            Err(e) => {
                let context = ErrorContext {
                    request_id: Some(request_id.clone()),
                    endpoint: url.to_string(),
                    method: method.to_string(),
                };
                warn!(
                    context = %context,
                    elapsed_ms = elapsed.as_millis(),
                    error = %e,
                    "Request failed"
                );
            }
        }

        result
    }

    /// Handle HTTP response and deserialize
    async fn handle_response<T: DeserializeOwned>(&self, response: Response) -> ApiResult<T> {
        let status = response.status();

        if status.is_success() {
            let body = response.text().await?;
            Ok(serde_json::from_str(&body)?)
        } else {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            Err(ApiError::api_response(status.as_u16(), message))
        }
    }
}
