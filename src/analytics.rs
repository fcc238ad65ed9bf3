//! Pure derivations over the event log. Every function takes the reference
//! time as an argument and touches no ambient state, so a given snapshot
//! always yields the same figures.

use crate::errors::AnalyticsError;
use crate::models::{
    AccidentRecord, AnalyticsResponse, AnalyticsSummary, AppData, DayBucket, EventRecord,
    EventType,
};
use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Utc};
use std::collections::BTreeMap;

const SECONDS_PER_HOUR: f64 = 3600.0;

pub fn event_time(event: &EventRecord) -> Result<DateTime<FixedOffset>, AnalyticsError> {
    parse_timestamp("event", &event.timestamp)
}

pub fn accident_time(accident: &AccidentRecord) -> Result<DateTime<FixedOffset>, AnalyticsError> {
    parse_timestamp("accident", &accident.estimated_time)
}

fn parse_timestamp(
    record: &'static str,
    raw: &str,
) -> Result<DateTime<FixedOffset>, AnalyticsError> {
    DateTime::parse_from_rfc3339(raw).map_err(|source| AnalyticsError::InvalidRecord {
        record,
        timestamp: raw.to_string(),
        source,
    })
}

fn hours_between(earlier: DateTime<Utc>, later: DateTime<Utc>) -> f64 {
    (later - earlier).num_seconds() as f64 / SECONDS_PER_HOUR
}

#[derive(Debug, Clone, Copy, Default)]
pub struct IntervalStats {
    pub count: u64,
    pub average_interval_hours: f64,
    pub time_since_last_hours: f64,
}

/// Interval and recency figures for one event type.
///
/// Events inside the window are sorted ascending and adjacent gaps averaged,
/// so input order never matters. Fewer than two windowed events yield an
/// average of `0.0`. Recency is measured against the newest event of the
/// type across the whole log; with no such event it is the `0.0` sentinel
/// and `count` is the signal callers must check.
pub fn interval_stats(
    events: &[EventRecord],
    kind: EventType,
    now: DateTime<Utc>,
    window_days: i64,
) -> Result<IntervalStats, AnalyticsError> {
    let window_start = now - Duration::days(window_days);

    let mut times = Vec::new();
    for event in events.iter().filter(|event| event.event_type == kind) {
        times.push(event_time(event)?.with_timezone(&Utc));
    }
    times.sort();

    let windowed: Vec<DateTime<Utc>> = times
        .iter()
        .copied()
        .filter(|time| *time >= window_start)
        .collect();

    let gaps: Vec<f64> = windowed
        .windows(2)
        .map(|pair| hours_between(pair[0], pair[1]))
        .collect();
    let average_interval_hours = if gaps.is_empty() {
        0.0
    } else {
        gaps.iter().sum::<f64>() / gaps.len() as f64
    };

    let time_since_last_hours = match times.last() {
        Some(last) => hours_between(*last, now),
        None => 0.0,
    };

    Ok(IntervalStats {
        count: windowed.len() as u64,
        average_interval_hours,
        time_since_last_hours,
    })
}

/// How overdue the next event is, as a percentage of the typical interval.
/// A zero average (no measurable history) maps to `0.0` rather than a
/// division error; never NaN or infinite.
pub fn percentage_elapsed(time_since_last_hours: f64, average_interval_hours: f64) -> f64 {
    if average_interval_hours > 0.0 {
        time_since_last_hours / average_interval_hours * 100.0
    } else {
        0.0
    }
}

pub fn last_event_time(
    events: &[EventRecord],
    kind: EventType,
) -> Result<Option<DateTime<Utc>>, AnalyticsError> {
    let mut latest: Option<DateTime<Utc>> = None;
    for event in events.iter().filter(|event| event.event_type == kind) {
        let time = event_time(event)?.with_timezone(&Utc);
        if latest.is_none_or(|current| time > current) {
            latest = Some(time);
        }
    }
    Ok(latest)
}

/// Per-day event counts for the timeline, ascending by date. Events land in
/// the calendar date of the offset they were recorded with. The series is
/// sparse: days with no events are absent.
pub fn day_buckets(
    events: &[EventRecord],
    now: DateTime<Utc>,
    window_days: i64,
) -> Result<Vec<DayBucket>, AnalyticsError> {
    let window_start = now - Duration::days(window_days);
    let mut days: BTreeMap<NaiveDate, (u64, u64)> = BTreeMap::new();

    for event in events {
        let stamped = event_time(event)?;
        if stamped.with_timezone(&Utc) < window_start {
            continue;
        }
        let entry = days.entry(stamped.date_naive()).or_default();
        match event.event_type {
            EventType::Pee => entry.0 += 1,
            EventType::Poo => entry.1 += 1,
        }
    }

    Ok(days
        .into_iter()
        .map(|(date, (pee, poo))| DayBucket {
            date: date.format("%Y-%m-%d").to_string(),
            pee,
            poo,
        })
        .collect())
}

pub fn accident_count(
    accidents: &[AccidentRecord],
    kind: EventType,
    now: DateTime<Utc>,
    window_days: i64,
) -> Result<u64, AnalyticsError> {
    let window_start = now - Duration::days(window_days);
    let mut count = 0;
    for accident in accidents.iter().filter(|accident| accident.event_type == kind) {
        if accident_time(accident)?.with_timezone(&Utc) >= window_start {
            count += 1;
        }
    }
    Ok(count)
}

pub fn summary_for_type(
    events: &[EventRecord],
    accidents: &[AccidentRecord],
    kind: EventType,
    now: DateTime<Utc>,
    window_days: i64,
) -> Result<AnalyticsSummary, AnalyticsError> {
    let stats = interval_stats(events, kind, now, window_days)?;
    Ok(AnalyticsSummary {
        count: stats.count,
        average_interval_hours: stats.average_interval_hours,
        time_since_last_hours: stats.time_since_last_hours,
        current_percentage: percentage_elapsed(
            stats.time_since_last_hours,
            stats.average_interval_hours,
        ),
        accidents: accident_count(accidents, kind, now, window_days)?,
    })
}

pub fn build_analytics_at(
    now: DateTime<Utc>,
    window_days: i64,
    data: &AppData,
) -> Result<AnalyticsResponse, AnalyticsError> {
    Ok(AnalyticsResponse {
        period_days: window_days,
        pee: summary_for_type(&data.events, &data.accidents, EventType::Pee, now, window_days)?,
        poo: summary_for_type(&data.events, &data.accidents, EventType::Poo, now, window_days)?,
    })
}
