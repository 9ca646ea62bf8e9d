//! HTTP client setup and middleware configuration.
//!
//! Requests are sent through a `reqwest-middleware` client carrying the
//! `reqwest-tracing` middleware, so every request is recorded as a tracing span.
//! No retry middleware is installed: a failed attempt is final.
//!
//! # Examples
//!
//! ```rust
//! use fetchurl::fetch::{create_http_client, HttpClientConfig};
//! use reqwest::header::{HeaderMap, USER_AGENT};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut headers = HeaderMap::new();
//! headers.insert(USER_AGENT, "builder/1.0".parse()?);
//!
//! let config = HttpClientConfig {
//!     headers: Some(headers),
//!     ..HttpClientConfig::default()
//! };
//! let client = create_http_client(config)?;
//! # Ok(())
//! # }
//! ```

use reqwest::{
    header::{HeaderMap, HeaderValue, USER_AGENT},
    Proxy,
};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_tracing::TracingMiddleware;

/// User agent sent when none is configured.
pub const DEFAULT_USER_AGENT: &str = concat!("fetchurl/", env!("CARGO_PKG_VERSION"));

/// Configuration for HTTP client setup.
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Optional explicit proxy.
    pub proxy: Option<Proxy>,
    /// Default headers to include with every request.
    pub headers: Option<HeaderMap>,
    /// Honour the `HTTP_PROXY`/`HTTPS_PROXY`/`NO_PROXY` environment.
    pub system_proxy: bool,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(DEFAULT_USER_AGENT));

        Self {
            proxy: None,
            headers: Some(headers),
            system_proxy: true,
        }
    }
}

/// Creates an HTTP client with tracing middleware.
pub fn create_http_client(config: HttpClientConfig) -> Result<ClientWithMiddleware, reqwest::Error> {
    let mut inner_client_builder = reqwest::Client::builder();

    if !config.system_proxy {
        inner_client_builder = inner_client_builder.no_proxy();
    }

    if let Some(proxy) = config.proxy {
        inner_client_builder = inner_client_builder.proxy(proxy);
    }

    if let Some(headers) = config.headers {
        inner_client_builder = inner_client_builder.default_headers(headers);
    }

    let inner_client = inner_client_builder.build()?;

    let client = ClientBuilder::new(inner_client)
        .with(TracingMiddleware::default())
        .build();

    Ok(client)
}
