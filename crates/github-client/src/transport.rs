use std::sync::Arc;
use std::time::Instant;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};
use reqwest::{Client, Request, Response};

use crate::credentials::CredentialSource;
use crate::error::GithubError;

/// REST API version pinned on every request.
pub const GITHUB_API_VERSION: &str = "2022-11-28";

const USER_AGENT: &str = concat!("ghas-lab-builder/", env!("CARGO_PKG_VERSION"));

// ─── Transport ────────────────────────────────────────────────────────────

/// Decorates every outbound request with static headers and a credential,
/// and logs the exchange.
///
/// The caller's [`Request`] is never mutated: `execute` works on a clone.
/// Nothing is retried and no timeout is imposed beyond what the underlying
/// client already carries.
pub struct Transport {
    client: Client,
    static_headers: HeaderMap,
    credentials: Arc<dyn CredentialSource>,
}

impl Transport {
    pub fn new(
        client: Client,
        static_headers: HeaderMap,
        credentials: Arc<dyn CredentialSource>,
    ) -> Self {
        Self {
            client,
            static_headers,
            credentials,
        }
    }

    /// Transport with GitHub's `Accept`, API version and user-agent headers.
    pub fn github(client: Client, credentials: Arc<dyn CredentialSource>) -> Self {
        Self::new(client, github_headers(), credentials)
    }

    /// The underlying client, for building requests.
    pub fn client(&self) -> &Client {
        &self.client
    }

    pub async fn execute(&self, request: &Request) -> Result<Response, GithubError> {
        let start = Instant::now();

        let mut req = request.try_clone().ok_or_else(|| {
            GithubError::Request("request body is a stream and cannot be cloned".into())
        })?;

        for (name, value) in &self.static_headers {
            req.headers_mut().insert(name.clone(), value.clone());
        }

        if let Some(auth) = self.credentials.authorization() {
            let mut value = HeaderValue::from_str(&auth).map_err(|_| {
                GithubError::Request("credential contains invalid header characters".into())
            })?;
            value.set_sensitive(true);
            req.headers_mut().insert(AUTHORIZATION, value);
        }

        let method = req.method().clone();
        let url = req.url().to_string();
        tracing::info!(%method, %url, "HTTP request");

        match self.client.execute(req).await {
            Ok(resp) => {
                let took_ms = start.elapsed().as_millis() as u64;
                let rate_limit_remaining = resp
                    .headers()
                    .get("x-ratelimit-remaining")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("");
                tracing::info!(
                    status = resp.status().as_u16(),
                    %method,
                    %url,
                    took_ms,
                    rate_limit_remaining,
                    "HTTP response"
                );
                Ok(resp)
            }
            Err(e) => {
                let took_ms = start.elapsed().as_millis() as u64;
                tracing::error!(%method, %url, error = %e, took_ms, "HTTP error");
                Err(GithubError::Transport(e))
            }
        }
    }
}

impl std::fmt::Debug for Transport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transport")
            .field("static_headers", &self.static_headers.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

/// Static headers GitHub expects on every call.
pub fn github_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        reqwest::header::ACCEPT,
        HeaderValue::from_static("application/vnd.github+json"),
    );
    headers.insert(
        HeaderName::from_static("x-github-api-version"),
        HeaderValue::from_static(GITHUB_API_VERSION),
    );
    headers.insert(
        reqwest::header::USER_AGENT,
        HeaderValue::from_static(USER_AGENT),
    );
    headers
}

// ─── Tests ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::{CredentialRotator, StaticCredential};
    use mockito::Matcher;

    fn get(url: &str) -> Request {
        Client::new().get(url).build().unwrap()
    }

    #[tokio::test]
    async fn injects_static_and_auth_headers() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/orgs/acme")
            .match_header("authorization", "Bearer tok-a")
            .match_header("accept", "application/vnd.github+json")
            .match_header("x-github-api-version", GITHUB_API_VERSION)
            .with_status(200)
            .create_async()
            .await;

        let transport = Transport::github(Client::new(), Arc::new(StaticCredential::new("tok-a")));
        let resp = transport
            .execute(&get(&format!("{}/orgs/acme", server.url())))
            .await
            .unwrap();

        assert_eq!(resp.status().as_u16(), 200);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn empty_credential_sends_no_authorization() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/meta")
            .match_header("authorization", Matcher::Missing)
            .with_status(200)
            .create_async()
            .await;

        let transport = Transport::github(Client::new(), Arc::new(StaticCredential::new("")));
        transport
            .execute(&get(&format!("{}/meta", server.url())))
            .await
            .unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn follows_rotator_cursor() {
        let mut server = mockito::Server::new_async().await;
        let first = server
            .mock("GET", "/meta")
            .match_header("authorization", "Bearer one")
            .with_status(200)
            .expect(1)
            .create_async()
            .await;
        let second = server
            .mock("GET", "/meta")
            .match_header("authorization", "Bearer two")
            .with_status(200)
            .expect(1)
            .create_async()
            .await;

        let rotator = Arc::new(CredentialRotator::new(vec!["one".into(), "two".into()]).unwrap());
        let transport = Transport::github(Client::new(), rotator.clone());
        let req = get(&format!("{}/meta", server.url()));

        transport.execute(&req).await.unwrap();
        rotator.advance().unwrap();
        transport.execute(&req).await.unwrap();

        first.assert_async().await;
        second.assert_async().await;
    }

    #[tokio::test]
    async fn caller_request_is_not_mutated() {
        let mut server = mockito::Server::new_async().await;
        server.mock("GET", "/meta").with_status(200).create_async().await;

        let transport = Transport::github(Client::new(), Arc::new(StaticCredential::new("tok")));
        let req = get(&format!("{}/meta", server.url()));
        transport.execute(&req).await.unwrap();

        assert!(req.headers().get(AUTHORIZATION).is_none());
        assert!(req.headers().get("x-github-api-version").is_none());
    }

    #[tokio::test]
    async fn connection_failure_propagates() {
        let transport = Transport::github(Client::new(), Arc::new(StaticCredential::new("tok")));
        // Port 9 (discard) on loopback is closed in test environments.
        let err = transport
            .execute(&get("http://127.0.0.1:9/unreachable"))
            .await
            .unwrap_err();
        assert!(matches!(err, GithubError::Transport(_)));
    }
}
