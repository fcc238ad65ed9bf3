//! Device-facing status: turns the analytics figures into the LED color ramp
//! and alarm flag the firmware polls for.

use crate::analytics::{interval_stats, last_event_time, percentage_elapsed};
use crate::errors::AnalyticsError;
use crate::models::{AppData, EventType, Rgb, StatusResponse};
use chrono::{DateTime, Utc};

pub const ALARM_THRESHOLD_PCT: f64 = 90.0;

/// Typical intervals, used only while the log is too thin for a measured
/// average. Status policy; the analytics summary never substitutes these.
fn fallback_interval_hours(kind: EventType) -> f64 {
    match kind {
        EventType::Pee => 4.0,
        EventType::Poo => 12.0,
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TypeStatus {
    pub color: Rgb,
    pub alarm: bool,
    pub time_since_hours: f64,
    pub percentage: f64,
}

/// Ramp green through yellow to red as the percentage climbs:
/// solid green below 60, green-to-yellow across 60-75, yellow-to-red across
/// 75-90, solid red from 90 up (the device flashes red on its own).
pub fn led_color(percentage: f64) -> Rgb {
    if percentage < 60.0 {
        Rgb { r: 0, g: 255, b: 0 }
    } else if percentage < 75.0 {
        let progress = (percentage - 60.0) / 15.0;
        Rgb {
            r: (255.0 * progress) as u8,
            g: 255,
            b: 0,
        }
    } else if percentage < 90.0 {
        let progress = (percentage - 75.0) / 15.0;
        Rgb {
            r: 255,
            g: (255.0 * (1.0 - progress)) as u8,
            b: 0,
        }
    } else {
        Rgb { r: 255, g: 0, b: 0 }
    }
}

/// A type with no events at all reads as urgent so a fresh install nags
/// until the first logging happens.
pub fn status_for_type(
    data: &AppData,
    kind: EventType,
    now: DateTime<Utc>,
    window_days: i64,
) -> Result<TypeStatus, AnalyticsError> {
    if last_event_time(&data.events, kind)?.is_none() {
        return Ok(TypeStatus {
            color: Rgb { r: 255, g: 0, b: 0 },
            alarm: true,
            time_since_hours: 0.0,
            percentage: 100.0,
        });
    }

    let stats = interval_stats(&data.events, kind, now, window_days)?;
    let average = if stats.average_interval_hours > 0.0 {
        stats.average_interval_hours
    } else {
        fallback_interval_hours(kind)
    };
    let percentage = percentage_elapsed(stats.time_since_last_hours, average);

    Ok(TypeStatus {
        color: led_color(percentage),
        alarm: percentage >= ALARM_THRESHOLD_PCT,
        time_since_hours: stats.time_since_last_hours,
        percentage,
    })
}

pub fn build_status_at(
    now: DateTime<Utc>,
    window_days: i64,
    data: &AppData,
) -> Result<StatusResponse, AnalyticsError> {
    let pee = status_for_type(data, EventType::Pee, now, window_days)?;
    let poo = status_for_type(data, EventType::Poo, now, window_days)?;

    Ok(StatusResponse {
        pee: pee.color,
        poo: poo.color,
        pee_alarm: pee.alarm,
        poo_alarm: poo.alarm,
        pee_time_since: pee.time_since_hours,
        poo_time_since: poo.time_since_hours,
        pee_percentage: pee.percentage,
        poo_percentage: poo.percentage,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EventRecord;
    use chrono::TimeZone;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    fn pee_at(timestamp: &str) -> EventRecord {
        EventRecord {
            event_type: EventType::Pee,
            timestamp: timestamp.to_string(),
        }
    }

    #[test]
    fn color_ramp_hits_the_documented_bands() {
        assert_eq!(led_color(0.0), Rgb { r: 0, g: 255, b: 0 });
        assert_eq!(led_color(59.9), Rgb { r: 0, g: 255, b: 0 });
        assert_eq!(led_color(67.5), Rgb { r: 127, g: 255, b: 0 });
        assert_eq!(led_color(82.5), Rgb { r: 255, g: 127, b: 0 });
        assert_eq!(led_color(90.0), Rgb { r: 255, g: 0, b: 0 });
        assert_eq!(led_color(250.0), Rgb { r: 255, g: 0, b: 0 });
    }

    #[test]
    fn no_events_reads_as_urgent() {
        let data = AppData::default();
        let status =
            status_for_type(&data, EventType::Pee, at(2026, 3, 2, 8, 0), 7).expect("status");

        assert!(status.alarm);
        assert_eq!(status.percentage, 100.0);
        assert_eq!(status.color, Rgb { r: 255, g: 0, b: 0 });
        assert_eq!(status.time_since_hours, 0.0);
    }

    #[test]
    fn thin_history_falls_back_to_typical_interval() {
        // One pee event six hours ago: no measurable average, so the 4 h
        // typical interval applies and the device is well overdue.
        let data = AppData {
            events: vec![pee_at("2026-03-02T06:00:00Z")],
            accidents: Vec::new(),
        };
        let status =
            status_for_type(&data, EventType::Pee, at(2026, 3, 2, 12, 0), 7).expect("status");

        assert_eq!(status.percentage, 150.0);
        assert!(status.alarm);
        assert_eq!(status.color, Rgb { r: 255, g: 0, b: 0 });
    }

    #[test]
    fn measured_average_takes_priority_over_fallback() {
        let data = AppData {
            events: vec![
                pee_at("2026-03-02T02:00:00Z"),
                pee_at("2026-03-02T06:00:00Z"),
                pee_at("2026-03-02T10:00:00Z"),
            ],
            accidents: Vec::new(),
        };
        let status =
            status_for_type(&data, EventType::Pee, at(2026, 3, 2, 12, 0), 7).expect("status");

        assert_eq!(status.percentage, 50.0);
        assert!(!status.alarm);
        assert_eq!(status.color, Rgb { r: 0, g: 255, b: 0 });
    }

    #[test]
    fn response_carries_both_types_independently() {
        let data = AppData {
            events: vec![pee_at("2026-03-02T11:00:00Z")],
            accidents: Vec::new(),
        };
        let response = build_status_at(at(2026, 3, 2, 12, 0), 7, &data).expect("status");

        // Pee logged an hour ago against the 4 h fallback: still green.
        assert_eq!(response.pee_percentage, 25.0);
        assert!(!response.pee_alarm);
        // Poo has never been logged: urgent.
        assert!(response.poo_alarm);
        assert_eq!(response.poo_percentage, 100.0);
        assert_eq!(response.poo, Rgb { r: 255, g: 0, b: 0 });
    }
}
