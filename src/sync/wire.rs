//! JSON shapes spoken by the extraction service, and their normalization into
//! the crate's own types.

use serde::{Deserialize, Serialize};

use crate::core::event::{Field, NO_DATE, NO_EVENT, NO_TIME, RawEvent};

#[derive(Debug, Serialize)]
pub struct TextRequest<'a> {
    pub text: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireEvent {
    #[serde(rename = "Time", default)]
    pub time: Option<String>,
    #[serde(rename = "Event", default)]
    pub event: Option<String>,
    #[serde(rename = "Date", default)]
    pub date: Option<String>,
}

impl From<WireEvent> for RawEvent {
    fn from(w: WireEvent) -> Self {
        RawEvent {
            time: Field::from_wire(w.time, NO_TIME),
            title: Field::from_wire(w.event, NO_EVENT),
            date: Field::from_wire(w.date, NO_DATE),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventsResponse {
    #[serde(default)]
    pub events: Vec<WireEvent>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SummaryResponse {
    pub summary: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireEmail {
    #[serde(default)]
    pub body: Option<String>,
}

/// `/fetch-emails` answers either `{user_email, emailBodies}` or `{emails: [{body}]}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FetchEmailsResponse {
    #[serde(default)]
    pub user_email: Option<String>,
    #[serde(rename = "emailBodies", default)]
    pub email_bodies: Option<Vec<String>>,
    #[serde(default)]
    pub emails: Option<Vec<WireEmail>>,
}

/// Email bodies fetched for the connected account.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmailBatch {
    pub identity: Option<String>,
    pub bodies: Vec<String>,
}

impl From<FetchEmailsResponse> for EmailBatch {
    fn from(resp: FetchEmailsResponse) -> Self {
        let bodies = match (resp.email_bodies, resp.emails) {
            (Some(bodies), _) => bodies,
            (None, Some(emails)) => emails.into_iter().filter_map(|e| e.body).collect(),
            (None, None) => Vec::new(),
        };
        let identity = resp.user_email.filter(|s| !s.trim().is_empty());
        EmailBatch { identity, bodies }
    }
}

#[derive(Debug, Serialize)]
pub struct AddEventsRequest<'a> {
    pub events: &'a [RawEvent],
}
