use std::sync::LazyLock;

use chrono::{NaiveDateTime, NaiveTime};
use regex::Regex;

use super::date;
use super::event::{Field, RawEvent};
use crate::error::SlotError;

static CLOCK_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d{2}:\d{2}").unwrap());

/// A concrete start/end pair the external calendar will accept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarSlot {
    pub title: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl CalendarSlot {
    /// Two `HH:MM` tokens give start and end; otherwise the first token is both.
    pub fn from_event(event: &RawEvent) -> Result<Self, SlotError> {
        let day = match &event.date {
            Field::Present(raw) => date::normalize(raw)
                .map_err(|_| SlotError::Date(raw.clone()))?
                .date,
            Field::Missing => return Err(SlotError::Date(event.date_label().to_string())),
        };

        let raw_time = event.time_label().trim().to_lowercase();
        let tokens: Vec<&str> = CLOCK_RE.find_iter(&raw_time).map(|m| m.as_str()).collect();
        let (start, end) = match tokens.as_slice() {
            [] => return Err(SlotError::Time(raw_time)),
            [start, end] => (*start, *end),
            [start, ..] => (*start, *start),
        };

        let parse = |hm: &str| {
            NaiveTime::parse_from_str(hm, "%H:%M").map_err(|_| SlotError::Time(hm.to_string()))
        };

        Ok(Self {
            title: event.title_label().to_string(),
            start: day.and_time(parse(start)?),
            end: day.and_time(parse(end)?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 5)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn range_gives_start_and_end() {
        let slot = CalendarSlot::from_event(&RawEvent::new("14:00, 15:30", "Review", "05-03-26"))
            .unwrap();
        assert_eq!(slot.start, at(14, 0));
        assert_eq!(slot.end, at(15, 30));
        assert_eq!(slot.title, "Review");
    }

    #[test]
    fn single_time_is_zero_length() {
        let slot = CalendarSlot::from_event(&RawEvent::new("at 09:05 sharp", "Standup", "05-03-26"))
            .unwrap();
        assert_eq!(slot.start, at(9, 5));
        assert_eq!(slot.end, slot.start);
    }

    #[test]
    fn three_times_use_the_first() {
        let slot =
            CalendarSlot::from_event(&RawEvent::new("08:00 10:00 12:00", "X", "05-03-26")).unwrap();
        assert_eq!(slot.start, at(8, 0));
        assert_eq!(slot.end, at(8, 0));
    }

    #[test]
    fn rejects_missing_time_and_bad_dates() {
        assert_eq!(
            CalendarSlot::from_event(&RawEvent::new("", "X", "05-03-26")),
            Err(SlotError::Time("no time".to_string()))
        );
        assert_eq!(
            CalendarSlot::from_event(&RawEvent::new("9am", "X", "05-03-26")),
            Err(SlotError::Time("9am".to_string()))
        );
        assert_eq!(
            CalendarSlot::from_event(&RawEvent::new("09:00", "X", "")),
            Err(SlotError::Date("No Date".to_string()))
        );
        assert_eq!(
            CalendarSlot::from_event(&RawEvent::new("09:00", "X", "2026-03-05")),
            Err(SlotError::Date("2026-03-05".to_string()))
        );
        assert_eq!(
            CalendarSlot::from_event(&RawEvent::new("27:00", "X", "05-03-26")),
            Err(SlotError::Time("27:00".to_string()))
        );
    }
}
