pub mod http;
pub mod wire;

use std::fmt;

use futures::future::BoxFuture;
use serde::Serialize;

use crate::core::event::RawEvent;
use crate::error::NetworkError;

pub use http::HttpBackend;
pub use wire::EmailBatch;

/// Account credentials for the legacy save-credentials flow.
#[derive(Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// The remote service that extracts events and summaries and owns the mail account.
pub trait RemoteBackend: Send + Sync {
    fn extract_events<'a>(&'a self, text: &'a str)
    -> BoxFuture<'a, Result<Vec<RawEvent>, NetworkError>>;

    fn summarize<'a>(&'a self, text: &'a str) -> BoxFuture<'a, Result<String, NetworkError>>;

    fn fetch_emails(&self) -> BoxFuture<'_, Result<EmailBatch, NetworkError>>;

    fn sign_out(&self) -> BoxFuture<'_, Result<(), NetworkError>>;

    fn save_credentials<'a>(
        &'a self,
        credentials: &'a Credentials,
    ) -> BoxFuture<'a, Result<(), NetworkError>>;

    fn add_events<'a>(&'a self, events: &'a [RawEvent]) -> BoxFuture<'a, Result<(), NetworkError>>;
}
