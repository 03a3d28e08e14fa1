// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HTTP transport for the Sengled cloud.

use std::time::Duration;

use reqwest::Client;
use reqwest::header::{CONTENT_TYPE, COOKIE, HeaderMap, HeaderValue};
use serde_json::Value;

use crate::error::ProtocolError;

/// Value of the `X-Requested-With` header the vendor app sends.
pub const REQUESTED_WITH: &str = "com.sengled.life2";

/// HTTP client for the Sengled cloud JSON API.
///
/// Every call is a `POST` with a JSON body. Calls made with a session add
/// the `Cookie: JSESSIONID=...` and `sid` headers.
///
/// # Examples
///
/// ```no_run
/// use sengled_lib::protocol::HttpClient;
/// use serde_json::json;
///
/// # async fn example() -> Result<(), sengled_lib::error::ProtocolError> {
/// let client = HttpClient::new()?;
/// let body = client
///     .post(
///         "https://life2.cloud.sengled.com/life2/device/list.json",
///         &json!({}),
///         Some("session-id"),
///     )
///     .await?;
/// println!("{body}");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Default request timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Creates a client with the default timeout.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be created.
    pub fn new() -> Result<Self, ProtocolError> {
        Self::with_timeout(Self::DEFAULT_TIMEOUT)
    }

    /// Creates a client with a custom request timeout.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be created.
    pub fn with_timeout(timeout: Duration) -> Result<Self, ProtocolError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert("X-Requested-With", HeaderValue::from_static(REQUESTED_WITH));

        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(ProtocolError::Http)?;

        Ok(Self { client })
    }

    /// Posts `payload` to `url` and returns the decoded JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::AuthenticationFailed`] on HTTP 401,
    /// [`ProtocolError::ConnectionFailed`] on any other non-success status,
    /// and [`ProtocolError::InvalidBody`] when the body is not JSON.
    pub async fn post(
        &self,
        url: &str,
        payload: &Value,
        session: Option<&str>,
    ) -> Result<Value, ProtocolError> {
        tracing::debug!(url = %url, payload = %payload, "Sending HTTP request");

        let mut request = self.client.post(url).json(payload);
        if let Some(session) = session.filter(|s| !s.is_empty()) {
            request = request
                .header(COOKIE, format!("JSESSIONID={session}"))
                .header("sid", session);
        }

        let response = request.send().await.map_err(ProtocolError::Http)?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            return Err(ProtocolError::AuthenticationFailed);
        }

        if !response.status().is_success() {
            return Err(ProtocolError::ConnectionFailed(format!(
                "HTTP {} - {}",
                response.status().as_u16(),
                response.status().canonical_reason().unwrap_or("Unknown")
            )));
        }

        let body = response.text().await.map_err(ProtocolError::Http)?;

        tracing::debug!(body = %body, "Received HTTP response");

        Ok(serde_json::from_str(&body)?)
    }
}
