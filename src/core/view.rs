use std::collections::HashSet;

use super::date::{self, INVALID_DATE_LABEL};
use super::event::{NO_DATE, RawEvent};
use super::group::{self, DateBucket};

/// One date's tasks, ready to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskGroup {
    /// Canonical `YYYY-MM-DD`; `None` when the raw date is missing or unparseable.
    pub key: Option<String>,
    pub raw: DateBucket,
    pub label: String,
    pub tasks: Vec<RawEvent>,
}

impl TaskGroup {
    /// Stable identifier for expansion state.
    pub fn view_key(&self) -> &str {
        self.key.as_deref().unwrap_or_else(|| self.raw.as_str())
    }
}

/// Aggregated calendar view data: dated groups chronologically, then the rest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CalendarView {
    pub groups: Vec<TaskGroup>,
}

impl CalendarView {
    pub fn build(events: &[RawEvent]) -> Self {
        let mut dated = Vec::new();
        let mut rest = Vec::new();

        for (bucket, tasks) in group::group(events).into_buckets() {
            let normalized = match &bucket {
                DateBucket::Dated(raw) => Some(date::normalize(raw)),
                DateBucket::Undated => None,
            };
            match normalized {
                Some(Ok(n)) => dated.push(TaskGroup {
                    key: Some(n.key),
                    raw: bucket,
                    label: n.label,
                    tasks,
                }),
                Some(Err(e)) => {
                    log::debug!("Ungroupable event date: {}", e);
                    rest.push(TaskGroup {
                        key: None,
                        raw: bucket,
                        label: INVALID_DATE_LABEL.to_string(),
                        tasks,
                    });
                }
                None => rest.push(TaskGroup {
                    key: None,
                    raw: bucket,
                    label: NO_DATE.to_string(),
                    tasks,
                }),
            }
        }

        // Distinct raw strings can normalize to the same day ("5-3-26" / "05-03-26").
        dated.sort_by(|a, b| a.key.cmp(&b.key));
        let mut merged: Vec<TaskGroup> = Vec::with_capacity(dated.len());
        for g in dated {
            match merged.last_mut() {
                Some(last) if last.key == g.key => last.tasks.extend(g.tasks),
                _ => merged.push(g),
            }
        }
        merged.extend(rest);

        Self { groups: merged }
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn task_count(&self) -> usize {
        self.groups.iter().map(|g| g.tasks.len()).sum()
    }
}

/// Which groups are expanded in the host view.
#[derive(Debug, Clone, Default)]
pub struct ExpansionSet {
    expanded: HashSet<String>,
}

impl ExpansionSet {
    pub fn toggle(&mut self, key: &str) {
        if !self.expanded.remove(key) {
            self.expanded.insert(key.to_string());
        }
    }

    pub fn is_expanded(&self, key: &str) -> bool {
        self.expanded.contains(key)
    }

    pub fn expand_all(&mut self, view: &CalendarView) {
        self.expanded
            .extend(view.groups.iter().map(|g| g.view_key().to_string()));
    }

    pub fn collapse_all(&mut self) {
        self.expanded.clear();
    }

    /// Drop keys that no longer exist after the text changed.
    pub fn retain_in(&mut self, view: &CalendarView) {
        let live: HashSet<&str> = view.groups.iter().map(|g| g.view_key()).collect();
        self.expanded.retain(|k| live.contains(k.as_str()));
    }
}
