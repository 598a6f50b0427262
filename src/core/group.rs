use std::collections::HashMap;

use super::event::{Field, NO_DATE, RawEvent};

/// Bucket key: the raw date string as the service produced it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DateBucket {
    Dated(String),
    Undated,
}

impl DateBucket {
    pub fn of(event: &RawEvent) -> Self {
        match &event.date {
            Field::Present(raw) => Self::Dated(raw.clone()),
            Field::Missing => Self::Undated,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Dated(raw) => raw,
            Self::Undated => NO_DATE,
        }
    }
}

/// Events partitioned by raw date, buckets in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupedEvents {
    buckets: Vec<(DateBucket, Vec<RawEvent>)>,
}

impl GroupedEvents {
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn event_count(&self) -> usize {
        self.buckets.iter().map(|(_, events)| events.len()).sum()
    }

    pub fn get(&self, bucket: &DateBucket) -> Option<&[RawEvent]> {
        self.buckets
            .iter()
            .find(|(b, _)| b == bucket)
            .map(|(_, events)| events.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&DateBucket, &[RawEvent])> {
        self.buckets.iter().map(|(b, events)| (b, events.as_slice()))
    }

    pub fn into_buckets(self) -> Vec<(DateBucket, Vec<RawEvent>)> {
        self.buckets
    }
}

/// Single pass, stable: every event lands in exactly one bucket, in input order.
pub fn group(events: &[RawEvent]) -> GroupedEvents {
    let mut index: HashMap<DateBucket, usize> = HashMap::new();
    let mut buckets: Vec<(DateBucket, Vec<RawEvent>)> = Vec::new();

    for event in events {
        let bucket = DateBucket::of(event);
        match index.get(&bucket) {
            Some(&i) => buckets[i].1.push(event.clone()),
            None => {
                index.insert(bucket.clone(), buckets.len());
                buckets.push((bucket, vec![event.clone()]));
            }
        }
    }

    GroupedEvents { buckets }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ev(time: &str, title: &str, date: &str) -> RawEvent {
        RawEvent::new(time, title, date)
    }

    fn sample() -> Vec<RawEvent> {
        vec![
            ev("10:00", "Dentist", "06-03-26"),
            ev("09:00", "Standup", "05-03-26"),
            ev("", "Call mum", ""),
            ev("08:00", "Gym", "06-03-26"),
            ev("14:00", "Review", "No Date"),
            ev("11:00", "Lunch", "05-03-26"),
        ]
    }

    #[test]
    fn buckets_in_first_seen_order() {
        let grouped = group(&sample());
        let keys: Vec<&str> = grouped.iter().map(|(b, _)| b.as_str()).collect();
        assert_eq!(keys, vec!["06-03-26", "05-03-26", "No Date"]);
    }

    #[test]
    fn tasks_keep_input_order_within_bucket() {
        let grouped = group(&sample());
        let titles: Vec<&str> = grouped
            .get(&DateBucket::Dated("06-03-26".to_string()))
            .unwrap()
            .iter()
            .map(|e| e.title_label())
            .collect();
        // 10:00 before 08:00: no time-of-day sort
        assert_eq!(titles, vec!["Dentist", "Gym"]);
    }

    #[test]
    fn missing_and_sentinel_dates_share_one_bucket() {
        let grouped = group(&sample());
        let undated = grouped.get(&DateBucket::Undated).unwrap();
        assert_eq!(undated.len(), 2);
        assert_eq!(undated[0].title_label(), "Call mum");
        assert_eq!(undated[1].title_label(), "Review");
    }

    #[test]
    fn partition_is_total() {
        let events = sample();
        let grouped = group(&events);
        assert_eq!(grouped.event_count(), events.len());

        for event in &events {
            let hits = grouped
                .iter()
                .filter(|(_, bucket)| bucket.contains(event))
                .count();
            assert_eq!(hits, 1, "{:?} should land in exactly one bucket", event);
        }
    }

    #[test]
    fn grouping_is_idempotent() {
        let events = sample();
        assert_eq!(group(&events), group(&events));
    }

    #[test]
    fn bucket_key_is_the_untouched_raw_string() {
        let grouped = group(&[ev("09:00", "Standup", " 05-03-26"), ev("11:00", "Lunch", "05-03-26")]);
        assert_eq!(grouped.len(), 2);
        assert!(grouped.get(&DateBucket::Dated(" 05-03-26".to_string())).is_some());
        assert!(grouped.get(&DateBucket::Dated("05-03-26".to_string())).is_some());
    }

    #[test]
    fn empty_input() {
        let grouped = group(&[]);
        assert!(grouped.is_empty());
        assert_eq!(grouped.event_count(), 0);
    }
}
