use serde::{Deserialize, Serialize};

/// Kind of bathroom event. Interval math never mixes the two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    Pee,
    Poo,
}

impl EventType {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pee" => Some(Self::Pee),
            "poo" => Some(Self::Poo),
            _ => None,
        }
    }
}

/// A witnessed bathroom event. Timestamps are stored as RFC 3339 strings
/// with whatever offset they were logged in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRecord {
    pub event_type: EventType,
    pub timestamp: String,
}

/// An unwitnessed event logged after the fact with a user-estimated time.
/// Accidents count separately and never feed interval or recency math.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccidentRecord {
    pub event_type: EventType,
    pub estimated_time: String,
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppData {
    pub events: Vec<EventRecord>,
    pub accidents: Vec<AccidentRecord>,
}

#[derive(Debug, Deserialize)]
pub struct LogEventRequest {
    pub event_type: String,
    pub timestamp: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LogAccidentRequest {
    pub event_type: String,
    pub estimated_time: String,
    pub location: String,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct HistoryParams {
    pub event_type: Option<String>,
    pub days: Option<i64>,
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct WindowParams {
    pub days: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct LogEventResponse {
    pub success: bool,
    pub event_type: EventType,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
pub struct LogAccidentResponse {
    pub success: bool,
    pub event_type: EventType,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub events: Vec<EventRecord>,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct AccidentsResponse {
    pub accidents: Vec<AccidentRecord>,
    pub count: usize,
}

/// Derived statistics for one event type over a lookback window.
/// Values are raw and unrounded; display formatting belongs to consumers.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsSummary {
    pub count: u64,
    pub average_interval_hours: f64,
    pub time_since_last_hours: f64,
    pub current_percentage: f64,
    pub accidents: u64,
}

#[derive(Debug, Serialize)]
pub struct AnalyticsResponse {
    pub period_days: i64,
    pub pee: AnalyticsSummary,
    pub poo: AnalyticsSummary,
}

/// One calendar day of the timeline series. The date is the local date of
/// the recorded offset, formatted `%Y-%m-%d`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayBucket {
    pub date: String,
    pub pee: u64,
    pub poo: u64,
}

#[derive(Debug, Serialize)]
pub struct TimelineResponse {
    pub period_days: i64,
    pub buckets: Vec<DayBucket>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Shape polled by the device firmware: one LED color and alarm flag per
/// event type, plus the recency figures behind them.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub pee: Rgb,
    pub poo: Rgb,
    pub pee_alarm: bool,
    pub poo_alarm: bool,
    pub pee_time_since: f64,
    pub poo_time_since: f64,
    pub pee_percentage: f64,
    pub poo_percentage: f64,
}
