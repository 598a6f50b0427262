use std::time::Duration;

use futures::FutureExt;
use futures::future::BoxFuture;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;

use super::wire::{
    AddEventsRequest, EmailBatch, EventsResponse, FetchEmailsResponse, SummaryResponse,
    TextRequest,
};
use super::{Credentials, RemoteBackend};
use crate::core::event::RawEvent;
use crate::error::NetworkError;

/// HTTP client for the extraction service.
#[derive(Clone)]
pub struct HttpBackend {
    base_url: String,
    http: Client,
}

impl HttpBackend {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, NetworkError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| NetworkError::Request {
                endpoint: base_url.to_string(),
                message: format!("Failed to build HTTP client: {}", e),
            })?;
        Ok(Self::with_client(http, base_url))
    }

    /// Wrap an existing `reqwest::Client` (e.g. one shared by the host).
    pub fn with_client(http: Client, base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post_text<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        text: &str,
    ) -> Result<T, NetworkError> {
        let resp = self
            .http
            .post(self.url(endpoint))
            .json(&TextRequest { text })
            .send()
            .await
            .map_err(|e| request_error(endpoint, e))?;
        parse_response(endpoint, resp).await
    }
}

fn request_error(endpoint: &str, e: reqwest::Error) -> NetworkError {
    let message = if e.is_timeout() {
        format!("timed out: {}", e)
    } else {
        e.to_string()
    };
    NetworkError::Request {
        endpoint: endpoint.to_string(),
        message,
    }
}

async fn ensure_success(endpoint: &str, resp: Response) -> Result<Response, NetworkError> {
    if resp.status().is_success() {
        return Ok(resp);
    }
    let status = resp.status().as_u16();
    let body = resp.text().await.unwrap_or_default();
    Err(NetworkError::Status {
        endpoint: endpoint.to_string(),
        status,
        body,
    })
}

async fn parse_response<T: DeserializeOwned>(
    endpoint: &str,
    resp: Response,
) -> Result<T, NetworkError> {
    let resp = ensure_success(endpoint, resp).await?;
    resp.json::<T>().await.map_err(|e| NetworkError::Decode {
        endpoint: endpoint.to_string(),
        message: e.to_string(),
    })
}

impl RemoteBackend for HttpBackend {
    fn extract_events<'a>(
        &'a self,
        text: &'a str,
    ) -> BoxFuture<'a, Result<Vec<RawEvent>, NetworkError>> {
        async move {
            let resp: EventsResponse = self.post_text("/events", text).await?;
            log::debug!("/events returned {} events", resp.events.len());
            Ok(resp.events.into_iter().map(RawEvent::from).collect())
        }
        .boxed()
    }

    fn summarize<'a>(&'a self, text: &'a str) -> BoxFuture<'a, Result<String, NetworkError>> {
        async move {
            let resp: SummaryResponse = self.post_text("/summarize", text).await?;
            Ok(resp.summary)
        }
        .boxed()
    }

    fn fetch_emails(&self) -> BoxFuture<'_, Result<EmailBatch, NetworkError>> {
        async move {
            let endpoint = "/fetch-emails";
            let resp = self
                .http
                .get(self.url(endpoint))
                .send()
                .await
                .map_err(|e| request_error(endpoint, e))?;
            let resp: FetchEmailsResponse = parse_response(endpoint, resp).await?;
            Ok(EmailBatch::from(resp))
        }
        .boxed()
    }

    fn sign_out(&self) -> BoxFuture<'_, Result<(), NetworkError>> {
        async move {
            let endpoint = "/sign-out";
            let resp = self
                .http
                .post(self.url(endpoint))
                .send()
                .await
                .map_err(|e| request_error(endpoint, e))?;
            ensure_success(endpoint, resp).await?;
            Ok(())
        }
        .boxed()
    }

    fn save_credentials<'a>(
        &'a self,
        credentials: &'a Credentials,
    ) -> BoxFuture<'a, Result<(), NetworkError>> {
        async move {
            let endpoint = "/save-credentials";
            let resp = self
                .http
                .post(self.url(endpoint))
                .json(credentials)
                .send()
                .await
                .map_err(|e| request_error(endpoint, e))?;
            ensure_success(endpoint, resp).await?;
            Ok(())
        }
        .boxed()
    }

    fn add_events<'a>(&'a self, events: &'a [RawEvent]) -> BoxFuture<'a, Result<(), NetworkError>> {
        async move {
            let endpoint = "/add-events";
            let resp = self
                .http
                .post(self.url(endpoint))
                .json(&AddEventsRequest { events })
                .send()
                .await
                .map_err(|e| request_error(endpoint, e))?;
            ensure_success(endpoint, resp).await?;
            Ok(())
        }
        .boxed()
    }
}
