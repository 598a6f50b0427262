//! Which text source is active, and the transitions between them.
//!
//! Transitions are split the way a message loop needs them: `begin_*` moves the
//! state synchronously and hands out a [`FetchTicket`]; `complete_*` applies the
//! remote result only if that ticket is still the current one. Results that
//! arrive after the user switched source or disconnected are dropped. The async
//! helpers (`connect_account`, `disconnect_account`, ...) drive both halves for
//! hosts that can hold the session across an await.

use uuid::Uuid;

use crate::archive::{self, ArchiveTextExtractor};
use crate::error::{NetworkError, SessionError};
use crate::sync::{Credentials, EmailBatch, RemoteBackend};

pub const NO_EMAIL_CONTENT: &str = "No email content found.";
pub const UNKNOWN_IDENTITY: &str = "Unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    FileSelected,
    Fetching,
    Connected,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveSource {
    None,
    File,
    Account,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    Disconnected,
    Connecting,
    Connected,
}

/// Snapshot the host renders from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub phase: Phase,
    pub active_source: ActiveSource,
    pub connection: ConnectionStatus,
    pub identity: Option<String>,
    pub file_name: Option<String>,
    pub text: Option<String>,
    pub error: Option<String>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            phase: Phase::Idle,
            active_source: ActiveSource::None,
            connection: ConnectionStatus::Disconnected,
            identity: None,
            file_name: None,
            text: None,
            error: None,
        }
    }
}

impl SessionState {
    /// "File selected: notes.zip" / "Connected as me@example.com"
    pub fn status_line(&self) -> Option<String> {
        match (self.active_source, &self.file_name, &self.identity) {
            (ActiveSource::File, Some(name), _) => Some(format!("File selected: {}", name)),
            (ActiveSource::Account, _, Some(who)) if self.connection == ConnectionStatus::Connected => {
                Some(format!("Connected as {}", who))
            }
            (ActiveSource::Account, _, _) if self.connection == ConnectionStatus::Connecting => {
                Some("Connecting...".to_string())
            }
            _ => None,
        }
    }
}

/// Proof that a remote request was started; stale tickets are ignored on completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket(u64);

/// Owns the active text source for one host view.
#[derive(Debug)]
pub struct SourceSession {
    id: Uuid,
    state: SessionState,
    extractor: ArchiveTextExtractor,
    last_token: u64,
    pending: Option<FetchTicket>,
    sign_out: Option<FetchTicket>,
    // Identity to fall back on when the fetch response carries none.
    pending_identity: Option<String>,
}

impl Default for SourceSession {
    fn default() -> Self {
        Self::new(ArchiveTextExtractor::default())
    }
}

impl SourceSession {
    pub fn new(extractor: ArchiveTextExtractor) -> Self {
        Self {
            id: Uuid::new_v4(),
            state: SessionState::default(),
            extractor,
            last_token: 0,
            pending: None,
            sign_out: None,
            pending_identity: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Text for the calendar and summarizer consumers.
    pub fn text(&self) -> Option<&str> {
        self.state.text.as_deref()
    }

    pub fn is_fetching(&self) -> bool {
        self.pending.is_some()
    }

    // --- File source ---

    /// Validate the picked file's type, then extract it.
    pub fn select_upload(&mut self, file_name: &str, content_type: Option<&str>, bytes: &[u8]) -> Phase {
        if let Err(e) = archive::validate_upload(file_name, content_type) {
            log::info!("[{}] Rejected upload {}: {}", self.id, file_name, e);
            self.switch_to_file(None);
            self.fail(e.to_string());
            return self.state.phase;
        }
        self.switch_to_file(Some(file_name.to_string()));
        self.extract_into_state(bytes)
    }

    /// Replace whatever source was active with the archive's first text entry.
    pub fn select_file(&mut self, bytes: &[u8]) -> Phase {
        self.switch_to_file(None);
        self.extract_into_state(bytes)
    }

    fn switch_to_file(&mut self, file_name: Option<String>) {
        if let Some(ticket) = self.pending.take() {
            log::info!("[{}] Abandoning in-flight fetch {:?} for file source", self.id, ticket);
        }
        self.sign_out = None;
        self.pending_identity = None;
        self.state = SessionState {
            active_source: ActiveSource::File,
            file_name,
            ..SessionState::default()
        };
    }

    fn extract_into_state(&mut self, bytes: &[u8]) -> Phase {
        match self.extractor.extract(bytes) {
            Ok(text) => {
                log::info!("[{}] File source ready ({} chars)", self.id, text.len());
                self.state.phase = Phase::FileSelected;
                self.state.text = Some(text);
            }
            Err(e) => {
                log::warn!("[{}] Archive extraction failed: {}", self.id, e);
                self.fail(e.to_string());
            }
        }
        self.state.phase
    }

    // --- Account source ---

    /// Start connecting. Returns `None` (and changes nothing) while a fetch is in flight.
    pub fn begin_connect(&mut self) -> Option<FetchTicket> {
        if self.state.connection == ConnectionStatus::Connecting {
            log::debug!("[{}] Connect ignored: already connecting", self.id);
            return None;
        }
        let ticket = self.next_ticket();
        self.pending = Some(ticket);
        self.sign_out = None;
        self.pending_identity = None;
        self.state = SessionState {
            phase: Phase::Fetching,
            active_source: ActiveSource::Account,
            connection: ConnectionStatus::Connecting,
            ..SessionState::default()
        };
        log::info!("[{}] Connecting account (fetch {:?})", self.id, ticket);
        Some(ticket)
    }

    /// Apply a fetch result. Returns `false` if the ticket was stale and the
    /// result was discarded.
    pub fn complete_connect(
        &mut self,
        ticket: FetchTicket,
        result: Result<EmailBatch, NetworkError>,
    ) -> bool {
        if self.pending != Some(ticket) {
            log::info!("[{}] Discarding stale fetch result {:?}", self.id, ticket);
            return false;
        }
        self.pending = None;
        let fallback_identity = self.pending_identity.take();

        match result {
            Ok(batch) => {
                let identity = batch
                    .identity
                    .or(fallback_identity)
                    .unwrap_or_else(|| UNKNOWN_IDENTITY.to_string());
                let text = if batch.bodies.is_empty() {
                    NO_EMAIL_CONTENT.to_string()
                } else {
                    batch.bodies.join("\n\n")
                };
                log::info!(
                    "[{}] Connected as {} ({} emails)",
                    self.id,
                    identity,
                    batch.bodies.len()
                );
                self.state.phase = Phase::Connected;
                self.state.connection = ConnectionStatus::Connected;
                self.state.identity = Some(identity);
                self.state.text = Some(text);
                self.state.error = None;
            }
            Err(e) => {
                log::error!("[{}] Email fetch failed: {}", self.id, e);
                self.state.connection = ConnectionStatus::Disconnected;
                self.state.active_source = ActiveSource::None;
                self.state.identity = None;
                self.fail(format!("Failed to fetch emails: {}", e));
            }
        }
        true
    }

    pub async fn connect_account(&mut self, backend: &dyn RemoteBackend) -> Phase {
        let Some(ticket) = self.begin_connect() else {
            return self.state.phase;
        };
        let result = backend.fetch_emails().await;
        self.complete_connect(ticket, result);
        self.state.phase
    }

    /// Legacy flow: hand the service a mailbox login, then fetch as usual.
    pub async fn connect_with_credentials(
        &mut self,
        backend: &dyn RemoteBackend,
        credentials: &Credentials,
    ) -> Phase {
        let Some(ticket) = self.begin_connect() else {
            return self.state.phase;
        };
        self.pending_identity = Some(credentials.email.clone());

        let result = match backend.save_credentials(credentials).await {
            Ok(()) => backend.fetch_emails().await,
            Err(e) => Err(e),
        };
        self.complete_connect(ticket, result);
        self.state.phase
    }

    /// Reset the account source locally. Valid while connected, or while
    /// connecting (the in-flight result will be discarded). The returned ticket
    /// goes back to [`complete_disconnect`](Self::complete_disconnect).
    pub fn begin_disconnect(&mut self) -> Result<FetchTicket, SessionError> {
        if self.state.connection == ConnectionStatus::Disconnected {
            return Err(SessionError::NotConnected);
        }
        if let Some(ticket) = self.pending.take() {
            log::info!("[{}] Disconnect abandons fetch {:?}", self.id, ticket);
        }
        self.pending_identity = None;
        let ticket = self.next_ticket();
        self.sign_out = Some(ticket);
        log::info!("[{}] Disconnected {:?} (sign-out {:?})", self.id, self.state.identity, ticket);
        self.state = SessionState::default();
        Ok(ticket)
    }

    /// Record the remote sign-out outcome. A failure is reported but the local
    /// reset stands. Returns `false` if a newer source action superseded the
    /// sign-out and the result was discarded.
    pub fn complete_disconnect(
        &mut self,
        ticket: FetchTicket,
        result: Result<(), NetworkError>,
    ) -> bool {
        let idle = self.state.phase == Phase::Idle && self.state.active_source == ActiveSource::None;
        if self.sign_out != Some(ticket) || !idle {
            log::info!("[{}] Discarding stale sign-out result {:?}", self.id, ticket);
            return false;
        }
        self.sign_out = None;
        if let Err(e) = result {
            log::warn!("[{}] Sign-out failed: {}", self.id, e);
            self.state.error = Some(format!("Sign-out failed: {}", e));
        }
        true
    }

    pub async fn disconnect_account(
        &mut self,
        backend: &dyn RemoteBackend,
    ) -> Result<(), SessionError> {
        let ticket = self.begin_disconnect()?;
        let result = backend.sign_out().await;
        self.complete_disconnect(ticket, result);
        Ok(())
    }

    fn next_ticket(&mut self) -> FetchTicket {
        self.last_token += 1;
        FetchTicket(self.last_token)
    }

    fn fail(&mut self, message: String) {
        self.state.phase = Phase::Error;
        self.state.text = None;
        self.state.error = Some(message);
    }
}
