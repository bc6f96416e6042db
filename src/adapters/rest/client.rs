//! REST backend for the realtime store
//!
//! Every node is reachable as `{base_url}/{path}.json`:
//!
//! | Operation | Request |
//! |-----------|---------|
//! | get       | `GET`    |
//! | push      | `POST`, response `{"name": "<generated key>"}` |
//! | set       | `PUT`    |
//! | remove    | `DELETE` |
//! | subscribe | `GET` with `Accept: text/event-stream` |
//!
//! When an auth token is configured it is sent as the `auth` query parameter.

use super::events::{EventStreamParser, StreamUpdate};
use crate::adapters::store::subscription::{
    snapshot_channel, ListenerRegistration, SnapshotSender, Subscription,
};
use crate::adapters::store::traits::{RealtimeStore, StoreResult};
use crate::adapters::store::StorePath;
use crate::config::{SecretString, StoreConfig};
use crate::domain::{HospitalError, Result, StoreError};
use async_trait::async_trait;
use futures::StreamExt;
use reqwest::header::ACCEPT;
use reqwest::{Client, ClientBuilder, Response, StatusCode};
use secrecy::ExposeSecret;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tokio::sync::oneshot;
use url::Url;

/// Response body of a `POST`
#[derive(Debug, Deserialize)]
struct PushResponse {
    name: String,
}

/// Error body returned by the store
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Realtime store reached over HTTPS
pub struct RestStore {
    base_url: Url,

    /// Client for one-shot requests, bounded by the request timeout
    client: Client,

    /// Client for event streams; only the connect phase is bounded
    stream_client: Client,

    auth_token: Option<SecretString>,
}

impl RestStore {
    /// Create a new REST store from configuration
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the base URL is invalid or the HTTP
    /// clients cannot be built.
    pub fn new(config: &StoreConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            HospitalError::Configuration(format!(
                "Invalid store.base_url '{}': {e}",
                config.base_url
            ))
        })?;

        if base_url.cannot_be_a_base() {
            return Err(HospitalError::Configuration(format!(
                "store.base_url '{}' cannot be used as a base URL",
                config.base_url
            )));
        }

        let connect_timeout = Duration::from_secs(config.connect_timeout_seconds);

        let mut client_builder = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(connect_timeout);
        let mut stream_builder = ClientBuilder::new().connect_timeout(connect_timeout);

        if !config.tls_verify {
            tracing::warn!("TLS certificate verification disabled for the store connection");
            client_builder = client_builder.danger_accept_invalid_certs(true);
            stream_builder = stream_builder.danger_accept_invalid_certs(true);
        }

        let client = client_builder.build().map_err(|e| {
            HospitalError::Configuration(format!("Failed to build HTTP client: {e}"))
        })?;
        let stream_client = stream_builder.build().map_err(|e| {
            HospitalError::Configuration(format!("Failed to build streaming HTTP client: {e}"))
        })?;

        Ok(Self {
            base_url,
            client,
            stream_client,
            auth_token: config.auth_token.clone(),
        })
    }

    /// Base URL requests are built from
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// URL of the node at `path`
    fn url_for(&self, path: &StorePath) -> StoreResult<Url> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                StoreError::InvalidPath(format!("cannot append '{path}' to {}", self.base_url))
            })?;
            segments.pop_if_empty();
            match path.segments().split_last() {
                Some((last, init)) => {
                    segments.extend(init);
                    segments.push(&format!("{last}.json"));
                }
                None => {
                    segments.push(".json");
                }
            }
        }

        if let Some(token) = &self.auth_token {
            let token: &str = token.expose_secret().as_ref();
            url.query_pairs_mut().append_pair("auth", token);
        }
        Ok(url)
    }

    async fn send_json(
        &self,
        method: reqwest::Method,
        path: &StorePath,
        body: Option<&Value>,
    ) -> StoreResult<Response> {
        let url = self.url_for(path)?;
        tracing::debug!(method = method.as_str(), path = %path, "Sending store request");

        let mut request = self.client.request(method, url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(map_transport_error)?;
        check_status(response).await
    }
}

fn map_transport_error(err: reqwest::Error) -> StoreError {
    if err.is_timeout() {
        StoreError::Timeout(err.to_string())
    } else {
        StoreError::ConnectionFailed(err.to_string())
    }
}

/// Turn a non-success response into the matching `StoreError`
async fn check_status(response: Response) -> StoreResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .map(|b| b.error)
        .unwrap_or(body);

    Err(match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => StoreError::PermissionDenied(message),
        StatusCode::REQUEST_TIMEOUT => StoreError::Timeout(message),
        s if s.is_server_error() => StoreError::ServerError {
            status: s.as_u16(),
            message,
        },
        s => StoreError::ClientError {
            status: s.as_u16(),
            message,
        },
    })
}

#[async_trait]
impl RealtimeStore for RestStore {
    fn backend_name(&self) -> &'static str {
        "rest"
    }

    async fn subscribe(&self, path: &StorePath) -> StoreResult<Subscription> {
        let url = self.url_for(path)?;
        let request = self
            .stream_client
            .get(url)
            .header(ACCEPT, "text/event-stream");

        let (sender, receiver) = snapshot_channel();
        let (cancel_tx, cancel_rx) = oneshot::channel::<()>();

        let listened = path.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = cancel_rx => {
                    tracing::debug!(path = %listened, "Event stream detached");
                }
                outcome = run_event_stream(request, &sender) => {
                    if let Err(err) = outcome {
                        tracing::warn!(path = %listened, error = %err, "Event stream ended with error");
                        let _ = sender.send(Err(err));
                    }
                }
            }
        });

        let registration = ListenerRegistration::new(move || {
            let _ = cancel_tx.send(());
        });

        Ok(Subscription::new(path.clone(), receiver, registration))
    }

    async fn get(&self, path: &StorePath) -> StoreResult<Value> {
        let response = self.send_json(reqwest::Method::GET, path, None).await?;
        response
            .json::<Value>()
            .await
            .map_err(|e| StoreError::InvalidResponse(e.to_string()))
    }

    async fn push(&self, parent: &StorePath, value: Value) -> StoreResult<String> {
        let response = self
            .send_json(reqwest::Method::POST, parent, Some(&value))
            .await?;
        let body: PushResponse = response
            .json()
            .await
            .map_err(|e| StoreError::InvalidResponse(format!("unexpected push response: {e}")))?;
        Ok(body.name)
    }

    async fn set(&self, path: &StorePath, value: Value) -> StoreResult<()> {
        self.send_json(reqwest::Method::PUT, path, Some(&value))
            .await?;
        Ok(())
    }

    async fn remove(&self, path: &StorePath) -> StoreResult<()> {
        self.send_json(reqwest::Method::DELETE, path, None).await?;
        Ok(())
    }
}

/// Read the event stream, mirroring the value at the subscribed path and
/// forwarding a full copy after each change.
///
/// Returns `Ok(())` when the subscriber went away, `Err` when the stream
/// failed or the server ended it.
async fn run_event_stream(
    request: reqwest::RequestBuilder,
    sender: &SnapshotSender,
) -> StoreResult<()> {
    let response = request.send().await.map_err(map_transport_error)?;
    let response = check_status(response).await?;

    let mut body = response.bytes_stream();
    let mut parser = EventStreamParser::new();
    let mut mirror = Value::Null;
    let mut delivered: Option<Value> = None;

    while let Some(chunk) = body.next().await {
        let chunk = chunk.map_err(|e| StoreError::StreamClosed(e.to_string()))?;

        for event in parser.feed(&chunk) {
            let update = StreamUpdate::decode(&event)?;
            if !update.apply(&mut mirror)? {
                continue;
            }

            if delivered.as_ref() == Some(&mirror) {
                continue;
            }
            if sender.send(Ok(mirror.clone())).is_err() {
                return Ok(());
            }
            delivered = Some(mirror.clone());
        }

        if sender.is_closed() {
            return Ok(());
        }
    }

    Err(StoreError::StreamClosed(
        "server closed the event stream".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::secret_string;

    fn config(base_url: &str) -> StoreConfig {
        StoreConfig {
            base_url: base_url.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_url_for_record() {
        let store = RestStore::new(&config("https://example.firebaseio.com")).unwrap();
        let path = StorePath::parse("hospitals/2024/-Nq1").unwrap();
        assert_eq!(
            store.url_for(&path).unwrap().as_str(),
            "https://example.firebaseio.com/hospitals/2024/-Nq1.json"
        );
    }

    #[test]
    fn test_url_for_root_and_base_path() {
        let store = RestStore::new(&config("https://example.com/db/")).unwrap();
        assert_eq!(
            store.url_for(&StorePath::root()).unwrap().as_str(),
            "https://example.com/db/.json"
        );
        assert_eq!(
            store.url_for(&StorePath::hospitals()).unwrap().as_str(),
            "https://example.com/db/hospitals.json"
        );
    }

    #[test]
    fn test_url_encodes_segments_and_token() {
        let mut cfg = config("https://example.com");
        cfg.auth_token = Some(secret_string("t0k&n".to_string()));
        let store = RestStore::new(&cfg).unwrap();

        let path = StorePath::parse("hospitals/서울 1").unwrap();
        let url = store.url_for(&path).unwrap();
        assert_eq!(
            url.as_str(),
            "https://example.com/hospitals/%EC%84%9C%EC%9A%B8%201.json?auth=t0k%26n"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            RestStore::new(&config("not a url")),
            Err(HospitalError::Configuration(_))
        ));
        assert!(RestStore::new(&config("mailto:ops@example.com")).is_err());
    }
}
