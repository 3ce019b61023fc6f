//! Remote token list source.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use super::token::{Token, TokenRecord};
use crate::error::{LikeError, Result};

/// Where the credential pool gets its tokens from.
#[async_trait]
pub trait TokenSource: Send + Sync {
    /// Fetch the complete current token list.
    async fn fetch(&self) -> Result<Vec<Token>>;

    /// Human readable description for logs.
    fn describe(&self) -> String;
}

/// Token list served as a JSON array of `{"token": "..."}` records.
pub struct HttpTokenSource {
    client: reqwest::Client,
    url: String,
    timeout: Duration,
}

impl HttpTokenSource {
    pub fn new(client: reqwest::Client, url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client,
            url: url.into(),
            timeout,
        }
    }
}

#[async_trait]
impl TokenSource for HttpTokenSource {
    async fn fetch(&self) -> Result<Vec<Token>> {
        debug!(url = %self.url, "Fetching tokens");

        let response = self
            .client
            .get(&self.url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| LikeError::TokenSource(format!("request to {} failed: {e}", self.url)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LikeError::TokenSource(format!(
                "{} returned status {}",
                self.url, status
            )));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| LikeError::TokenSource(format!("failed to read body: {e}")))?;
        let records: Vec<TokenRecord> = serde_json::from_slice(&body)
            .map_err(|e| LikeError::TokenSource(format!("malformed token list: {e}")))?;

        Ok(records
            .into_iter()
            .filter_map(TokenRecord::into_token)
            .collect())
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::Router;
    use axum::http::StatusCode;
    use axum::routing::get;
    use tokio::net::TcpListener;

    async fn serve(router: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn fetches_token_records() {
        let base = serve(Router::new().route(
            "/tokens.json",
            get(|| async { r#"[{"token":"tok-a"},{"token":"tok-b"}]"# }),
        ))
        .await;

        let source = HttpTokenSource::new(
            reqwest::Client::new(),
            format!("{base}/tokens.json"),
            Duration::from_secs(5),
        );
        let tokens = source.fetch().await.unwrap();
        assert_eq!(tokens, vec![Token::from("tok-a"), Token::from("tok-b")]);
    }

    #[tokio::test]
    async fn rejects_error_status_and_malformed_body() {
        let base = serve(
            Router::new()
                .route("/missing", get(|| async { StatusCode::NOT_FOUND }))
                .route("/broken", get(|| async { "{not json" })),
        )
        .await;

        let client = reqwest::Client::new();
        let missing =
            HttpTokenSource::new(client.clone(), format!("{base}/missing"), Duration::from_secs(5));
        assert!(matches!(missing.fetch().await, Err(LikeError::TokenSource(_))));

        let broken = HttpTokenSource::new(client, format!("{base}/broken"), Duration::from_secs(5));
        assert!(matches!(broken.fetch().await, Err(LikeError::TokenSource(_))));
    }

    #[tokio::test]
    async fn times_out_on_slow_source() {
        let base = serve(Router::new().route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(2)).await;
                "[]"
            }),
        ))
        .await;

        let source = HttpTokenSource::new(
            reqwest::Client::new(),
            format!("{base}/slow"),
            Duration::from_millis(100),
        );
        assert!(matches!(source.fetch().await, Err(LikeError::TokenSource(_))));
    }
}
