//! HTTP transport shared by every bridge operation.

use std::sync::Arc;

use log::{debug, warn};
use reqwest::{Method, StatusCode};
use serde_json::Value;
use tokio::sync::Mutex;

use crate::config::ClientConfig;
use crate::errors::Error;
use crate::history::{MessageHistory, MessageType};

type Result<T> = std::result::Result<T, Error>;

/// A configured HTTP client plus the exchange history it writes to.
///
/// Cloning is cheap and clones share both the connection pool and the
/// history, so concurrent requests to different lights can each hold one.
#[derive(Debug, Clone)]
pub struct Transport {
    http: reqwest::Client,
    history: Arc<Mutex<MessageHistory>>,
}

impl Transport {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Transport {
            http,
            history: Arc::new(Mutex::new(MessageHistory::with_max_entries(
                config.history_size,
            ))),
        })
    }

    pub async fn history(&self) -> MessageHistory {
        self.history.lock().await.clone()
    }

    pub async fn clear_history(&self) {
        self.history.lock().await.clear();
    }

    /// GET a reply body; a non-success status is an error.
    pub async fn get(&self, operation: &str, url: &str) -> Result<String> {
        let (status, text) = self.send(operation, Method::GET, url, None).await?;
        Self::successful(operation, status, text)
    }

    /// POST a JSON body; a non-success status is an error.
    pub async fn post(&self, operation: &str, url: &str, body: &Value) -> Result<String> {
        let (status, text) = self.send(operation, Method::POST, url, Some(body)).await?;
        Self::successful(operation, status, text)
    }

    /// PUT a JSON body and return whatever the bridge answered.
    ///
    /// A completed round trip is enough here: the bridge reports the outcome
    /// per field inside the body, so a non-success status is only logged.
    pub async fn put(&self, operation: &str, url: &str, body: &Value) -> Result<String> {
        let (status, text) = self.send(operation, Method::PUT, url, Some(body)).await?;
        if !status.is_success() {
            warn!("{} answered with http status {}", operation, status.as_u16());
        }
        Ok(text)
    }

    fn successful(operation: &str, status: StatusCode, text: String) -> Result<String> {
        if status.is_success() {
            Ok(text)
        } else {
            Err(Error::HttpStatus {
                status: status.as_u16(),
                operation: operation.to_string(),
            })
        }
    }

    /// Send a request and return the status with the raw reply body.
    ///
    /// Only transport failures are errors here; the caller decides what a
    /// status means and decodes the body, since it knows the expected shape.
    async fn send(
        &self,
        operation: &str,
        method: Method,
        url: &str,
        body: Option<&Value>,
    ) -> Result<(StatusCode, String)> {
        self.history.lock().await.record(
            MessageType::Send,
            operation,
            body.unwrap_or(&Value::Null),
        );

        match self.exchange(method, url, body).await {
            Ok((status, text)) => {
                debug!("{} reply ({}): {}", operation, status.as_u16(), text);
                let recorded = serde_json::from_str::<Value>(&text)
                    .unwrap_or_else(|_| Value::String(text.clone()));
                let mut history = self.history.lock().await;
                history.record(MessageType::Receive, operation, &recorded);
                if !status.is_success() {
                    history.record_error(&format!(
                        "http status {} for {}",
                        status.as_u16(),
                        operation
                    ));
                }
                Ok((status, text))
            }
            Err(e) => {
                self.history.lock().await.record_error(&e.to_string());
                Err(e)
            }
        }
    }

    async fn exchange(
        &self,
        method: Method,
        url: &str,
        body: Option<&Value>,
    ) -> Result<(StatusCode, String)> {
        let mut request = self.http.request(method, url);
        if let Some(body) = body {
            request = request.json(body);
        }

        // Authenticated URLs carry the access token; keep it out of errors.
        let response = request.send().await.map_err(|e| e.without_url())?;
        let status = response.status();
        let text = response.text().await.map_err(|e| e.without_url())?;
        Ok((status, text))
    }
}
