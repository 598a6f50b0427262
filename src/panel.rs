//! The two consumers of session text: the date-grouped calendar and the
//! summarizer, plus the push of extracted events to an external calendar.

use crate::core::event::RawEvent;
use crate::core::slot::CalendarSlot;
use crate::core::summary;
use crate::core::view::CalendarView;
use crate::error::{NetworkError, SlotError};
use crate::sync::RemoteBackend;

/// Ask the service for events in `text` and build the grouped view.
pub async fn load_calendar(
    backend: &dyn RemoteBackend,
    text: &str,
) -> Result<CalendarView, NetworkError> {
    let events = backend.extract_events(text).await?;
    let view = CalendarView::build(&events);
    log::info!(
        "Calendar: {} events in {} groups",
        view.task_count(),
        view.groups.len()
    );
    Ok(view)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Summary {
    /// Produced by the summarization service.
    Remote(String),
    /// Local word-limited preview, used when the service could not be reached.
    Preview(String),
}

impl Summary {
    pub fn text(&self) -> &str {
        match self {
            Self::Remote(s) | Self::Preview(s) => s,
        }
    }
}

pub async fn summarize(backend: &dyn RemoteBackend, text: &str, word_limit: usize) -> Summary {
    if text.trim().is_empty() {
        return Summary::Preview(summary::EMPTY_SUMMARY_PROMPT.to_string());
    }
    match backend.summarize(text).await {
        Ok(s) => Summary::Remote(s),
        Err(e) => {
            log::warn!("Summarizer unavailable, using local preview: {}", e);
            Summary::Preview(summary::preview(text, word_limit))
        }
    }
}

/// Outcome of pushing events to the external calendar.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PushReport {
    pub pushed: usize,
    /// Events that could not be turned into a calendar slot, with the reason.
    pub rejected: Vec<(RawEvent, SlotError)>,
}

/// Validate each event locally and send the valid ones in one request.
pub async fn push_to_calendar(
    backend: &dyn RemoteBackend,
    events: &[RawEvent],
) -> Result<PushReport, NetworkError> {
    let mut report = PushReport::default();
    let mut valid = Vec::new();

    for event in events {
        match CalendarSlot::from_event(event) {
            Ok(_) => valid.push(event.clone()),
            Err(e) => {
                log::info!("Not pushing {:?}: {}", event.title_label(), e);
                report.rejected.push((event.clone(), e));
            }
        }
    }

    if valid.is_empty() {
        return Ok(report);
    }

    backend.add_events(&valid).await?;
    report.pushed = valid.len();
    log::info!("Pushed {} events to calendar", report.pushed);
    Ok(report)
}
