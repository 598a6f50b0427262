use serde::{Serialize, Serializer};

pub const NO_TIME: &str = "No Time";
pub const NO_EVENT: &str = "No Event";
pub const NO_DATE: &str = "No Date";

/// A value the extraction service may or may not have produced.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Field<T> {
    Missing,
    Present(T),
}

impl<T> Field<T> {
    pub fn is_present(&self) -> bool {
        matches!(self, Self::Present(_))
    }

    pub fn present(self) -> Option<T> {
        match self {
            Self::Missing => None,
            Self::Present(v) => Some(v),
        }
    }
}

impl Field<String> {
    /// Build from a wire value. Blank strings and the service's own sentinel
    /// count as missing.
    pub fn from_wire(value: Option<String>, sentinel: &str) -> Self {
        match value {
            Some(v) if !v.trim().is_empty() && v.trim() != sentinel => Self::Present(v),
            _ => Self::Missing,
        }
    }

    pub fn as_str_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        match self {
            Self::Missing => fallback,
            Self::Present(v) => v.as_str(),
        }
    }
}

/// One event extracted from free text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEvent {
    pub time: Field<String>,
    pub title: Field<String>,
    pub date: Field<String>,
}

impl RawEvent {
    pub fn new(
        time: impl Into<String>,
        title: impl Into<String>,
        date: impl Into<String>,
    ) -> Self {
        Self {
            time: Field::from_wire(Some(time.into()), NO_TIME),
            title: Field::from_wire(Some(title.into()), NO_EVENT),
            date: Field::from_wire(Some(date.into()), NO_DATE),
        }
    }

    pub fn time_label(&self) -> &str {
        self.time.as_str_or(NO_TIME)
    }

    pub fn title_label(&self) -> &str {
        self.title.as_str_or(NO_EVENT)
    }

    pub fn date_label(&self) -> &str {
        self.date.as_str_or(NO_DATE)
    }
}

/// Outbound shape used by the calendar push endpoint: sentinels fill the gaps.
impl Serialize for RawEvent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;
        let mut s = serializer.serialize_struct("RawEvent", 3)?;
        s.serialize_field("time", self.time_label())?;
        s.serialize_field("title", self.title_label())?;
        s.serialize_field("date", self.date_label())?;
        s.end()
    }
}
