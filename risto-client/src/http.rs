//! HTTP transport for the order and menu services
//!
//! Every endpoint wraps its payload in `{success, data, message}`. This
//! module unwraps the envelope and folds every failure mode into
//! [`ClientError`]: transport errors, non-2xx statuses, `success: false`
//! and malformed bodies.

use crate::{ClientError, ClientResult};
use reqwest::{Client, Method, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::response::ApiResponse;
use std::time::Duration;

/// Network HTTP client bound to one service base URL
#[derive(Debug, Clone)]
pub struct NetworkHttpClient {
    client: Client,
    base_url: String,
}

impl NetworkHttpClient {
    pub fn new(base_url: &str, timeout: Duration) -> ClientResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base_url))
    }

    /// Reuse an existing connection pool
    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// GET returning `data`
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&'static str, String)],
    ) -> ClientResult<T> {
        let req = self.client.get(self.url(path)).query(query);
        let envelope = self.send::<T>(Method::GET, path, req).await?;
        require_data(envelope, path)
    }

    /// GET a list, skipping rows that do not decode as `T`
    ///
    /// One row with an unknown status or a missing field must not blank a
    /// whole board, so each row is decoded on its own.
    pub async fn get_list<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&'static str, String)],
    ) -> ClientResult<Vec<T>> {
        let rows: Vec<serde_json::Value> = self.get(path, query).await?;
        Ok(decode_rows(rows, path))
    }

    /// POST with a JSON body, returning `data`
    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let req = self.client.post(self.url(path)).json(body);
        let envelope = self.send::<T>(Method::POST, path, req).await?;
        require_data(envelope, path)
    }

    /// PUT with a JSON body, returning `data`
    pub async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let req = self.client.put(self.url(path)).json(body);
        let envelope = self.send::<T>(Method::PUT, path, req).await?;
        require_data(envelope, path)
    }

    /// DELETE; the envelope may omit `data`
    pub async fn delete(&self, path: &str) -> ClientResult<()> {
        let req = self.client.delete(self.url(path));
        self.send::<serde_json::Value>(Method::DELETE, path, req)
            .await
            .map(|_| ())
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        req: RequestBuilder,
    ) -> ClientResult<ApiResponse<T>> {
        let response = req.send().await.map_err(|e| {
            tracing::warn!(method = %method, path = %path, error = %e, "Request failed");
            ClientError::from(e)
        })?;
        let status = response.status();
        let body = response.text().await?;

        let result = Self::handle_response::<T>(status, &body);
        if let Err(e) = &result {
            tracing::warn!(
                method = %method,
                path = %path,
                status = status.as_u16(),
                error = %e,
                "Service call failed"
            );
        }
        result
    }

    fn handle_response<T: DeserializeOwned>(
        status: reqwest::StatusCode,
        body: &str,
    ) -> ClientResult<ApiResponse<T>> {
        if !status.is_success() {
            // Error bodies are parsed loosely: only the message matters
            let message = serde_json::from_str::<ApiResponse<serde_json::Value>>(body)
                .map(|env| env.failure_message())
                .unwrap_or_else(|_| {
                    status
                        .canonical_reason()
                        .map(|r| format!("{} {}", status.as_u16(), r))
                        .unwrap_or_else(|| format!("HTTP {}", status.as_u16()))
                });
            return Err(ClientError::api(Some(status.as_u16()), message));
        }

        let envelope: ApiResponse<T> = serde_json::from_str(body)
            .map_err(|e| ClientError::InvalidResponse(e.to_string()))?;
        if !envelope.success {
            return Err(ClientError::api(Some(status.as_u16()), envelope.failure_message()));
        }
        Ok(envelope)
    }
}

fn require_data<T>(envelope: ApiResponse<T>, path: &str) -> ClientResult<T> {
    envelope
        .data
        .ok_or_else(|| ClientError::InvalidResponse(format!("missing data for {}", path)))
}

fn decode_rows<T: DeserializeOwned>(rows: Vec<serde_json::Value>, path: &str) -> Vec<T> {
    let total = rows.len();
    let decoded: Vec<T> = rows
        .into_iter()
        .enumerate()
        .filter_map(|(index, row)| match serde_json::from_value(row) {
            Ok(item) => Some(item),
            Err(e) => {
                tracing::warn!(path = %path, index, error = %e, "Skipping undecodable row");
                None
            }
        })
        .collect();
    if decoded.len() < total {
        tracing::debug!(path = %path, total, kept = decoded.len(), "List decoded partially");
    }
    decoded
}
