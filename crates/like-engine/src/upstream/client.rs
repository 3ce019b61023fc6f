//! HTTP transport emulating the Android game client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{self, HeaderMap, HeaderName, HeaderValue};
use tracing::warn;

use super::{CallOutcome, UpstreamTransport};
use crate::codec::EncryptedPayload;
use crate::credentials::Token;

const CLIENT_USER_AGENT: &str = "Dalvik/2.1.0 (Linux; U; Android 9; ASUS_Z01QD Build/PI)";
const UNITY_VERSION: &str = "2018.4.11f1";
const GA_VERSION: &str = "v1 1";
const RELEASE_VERSION: &str = "OB49";

/// Fixed headers sent with every call, minus the authorization.
fn client_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(header::USER_AGENT, HeaderValue::from_static(CLIENT_USER_AGENT));
    headers.insert(header::CONNECTION, HeaderValue::from_static("Keep-Alive"));
    headers.insert(header::ACCEPT_ENCODING, HeaderValue::from_static("gzip"));
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/x-www-form-urlencoded"),
    );
    headers.insert(header::EXPECT, HeaderValue::from_static("100-continue"));
    headers.insert(
        HeaderName::from_static("x-unity-version"),
        HeaderValue::from_static(UNITY_VERSION),
    );
    headers.insert(HeaderName::from_static("x-ga"), HeaderValue::from_static(GA_VERSION));
    headers.insert(
        HeaderName::from_static("releaseversion"),
        HeaderValue::from_static(RELEASE_VERSION),
    );
    headers
}

/// reqwest-backed [`UpstreamTransport`].
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    client: reqwest::Client,
    headers: HeaderMap,
    timeout: Duration,
}

impl UpstreamClient {
    pub fn new(client: reqwest::Client, timeout: Duration) -> Self {
        Self {
            client,
            headers: client_headers(),
            timeout,
        }
    }
}

#[async_trait]
impl UpstreamTransport for UpstreamClient {
    async fn send(&self, payload: &EncryptedPayload, token: &Token, url: &str) -> CallOutcome {
        let body = match payload.to_body() {
            Ok(body) => body,
            Err(e) => return CallOutcome::Failed(e.to_string()),
        };

        let result = self
            .client
            .post(url)
            .headers(self.headers.clone())
            .bearer_auth(token.as_str())
            .timeout(self.timeout)
            .body(body)
            .send()
            .await;

        let response = match result {
            Ok(response) => response,
            Err(e) => {
                warn!(%url, error = %e, "Upstream request failed");
                return CallOutcome::Failed(e.to_string());
            }
        };

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            warn!(
                %url,
                status = status.as_u16(),
                token = token.redacted(),
                "Upstream request returned non-200 status"
            );
            return CallOutcome::Status(status.as_u16());
        }

        match response.bytes().await {
            Ok(bytes) => CallOutcome::Success(bytes),
            Err(e) => {
                warn!(%url, error = %e, "Failed to read upstream response body");
                CallOutcome::Failed(e.to_string())
            }
        }
    }
}
