use crate::analytics::{self, build_analytics_at, day_buckets};
use crate::errors::AppError;
use crate::models::{
    AccidentRecord, AccidentsResponse, AnalyticsResponse, EventRecord, EventType, HistoryParams,
    HistoryResponse, LogAccidentRequest, LogAccidentResponse, LogEventRequest, LogEventResponse,
    StatusResponse, TimelineResponse, WindowParams,
};
use crate::state::AppState;
use crate::status::build_status_at;
use crate::storage::persist_data;
use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{DateTime, Duration, SecondsFormat, Utc};

const DEFAULT_WINDOW_DAYS: i64 = 7;
const DEFAULT_HISTORY_LIMIT: usize = 100;

pub async fn index() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "message": "Puppy Bathroom Tracker API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "status": "/api/status",
            "log_event": "/api/events",
            "history": "/api/history",
            "analytics": "/api/analytics",
            "timeline": "/api/timeline",
            "accidents": "/api/accidents",
        },
    }))
}

pub async fn get_status(State(state): State<AppState>) -> Result<Json<StatusResponse>, AppError> {
    let data = state.log.lock().await;
    let status = build_status_at(Utc::now(), DEFAULT_WINDOW_DAYS, &data)?;
    Ok(Json(status))
}

pub async fn log_event(
    State(state): State<AppState>,
    Json(payload): Json<LogEventRequest>,
) -> Result<Json<LogEventResponse>, AppError> {
    let kind = parse_event_type(&payload.event_type)?;
    let timestamp = match payload.timestamp {
        Some(raw) => validate_timestamp(raw)?,
        None => now_string(),
    };

    let mut data = state.log.lock().await;
    data.events.push(EventRecord {
        event_type: kind,
        timestamp: timestamp.clone(),
    });
    persist_data(&state.log_path, &data).await?;

    Ok(Json(LogEventResponse {
        success: true,
        event_type: kind,
        timestamp,
    }))
}

pub async fn get_history(
    State(state): State<AppState>,
    Query(params): Query<HistoryParams>,
) -> Result<Json<HistoryResponse>, AppError> {
    let kind = params
        .event_type
        .as_deref()
        .map(parse_event_type)
        .transpose()?;
    let days = resolve_days(params.days)?;
    let limit = params.limit.unwrap_or(DEFAULT_HISTORY_LIMIT);
    let window_start = Utc::now() - Duration::days(days);

    let data = state.log.lock().await;
    let mut rows: Vec<(DateTime<Utc>, EventRecord)> = Vec::new();
    for event in &data.events {
        if kind.is_some_and(|kind| event.event_type != kind) {
            continue;
        }
        let time = analytics::event_time(event)?.with_timezone(&Utc);
        if time >= window_start {
            rows.push((time, event.clone()));
        }
    }
    drop(data);

    rows.sort_by(|a, b| b.0.cmp(&a.0));
    rows.truncate(limit);
    let events: Vec<EventRecord> = rows.into_iter().map(|(_, event)| event).collect();
    let count = events.len();

    Ok(Json(HistoryResponse { events, count }))
}

pub async fn get_analytics(
    State(state): State<AppState>,
    Query(params): Query<WindowParams>,
) -> Result<Json<AnalyticsResponse>, AppError> {
    let days = resolve_days(params.days)?;
    let data = state.log.lock().await;
    let analytics = build_analytics_at(Utc::now(), days, &data)?;
    Ok(Json(analytics))
}

pub async fn get_timeline(
    State(state): State<AppState>,
    Query(params): Query<WindowParams>,
) -> Result<Json<TimelineResponse>, AppError> {
    let days = resolve_days(params.days)?;
    let data = state.log.lock().await;
    let buckets = day_buckets(&data.events, Utc::now(), days)?;
    Ok(Json(TimelineResponse {
        period_days: days,
        buckets,
    }))
}

pub async fn log_accident(
    State(state): State<AppState>,
    Json(payload): Json<LogAccidentRequest>,
) -> Result<Json<LogAccidentResponse>, AppError> {
    let kind = parse_event_type(&payload.event_type)?;
    let estimated_time = validate_timestamp(payload.estimated_time)?;
    let location = payload.location.trim().to_string();
    if location.is_empty() {
        return Err(AppError::bad_request("location must not be empty"));
    }

    let mut data = state.log.lock().await;
    data.accidents.push(AccidentRecord {
        event_type: kind,
        estimated_time,
        location,
        notes: payload.notes,
    });
    persist_data(&state.log_path, &data).await?;

    Ok(Json(LogAccidentResponse {
        success: true,
        event_type: kind,
    }))
}

pub async fn get_accidents(
    State(state): State<AppState>,
    Query(params): Query<WindowParams>,
) -> Result<Json<AccidentsResponse>, AppError> {
    let days = resolve_days(params.days)?;
    let window_start = Utc::now() - Duration::days(days);

    let data = state.log.lock().await;
    let mut rows: Vec<(DateTime<Utc>, AccidentRecord)> = Vec::new();
    for accident in &data.accidents {
        let time = analytics::accident_time(accident)?.with_timezone(&Utc);
        if time >= window_start {
            rows.push((time, accident.clone()));
        }
    }
    drop(data);

    rows.sort_by(|a, b| b.0.cmp(&a.0));
    let accidents: Vec<AccidentRecord> = rows.into_iter().map(|(_, accident)| accident).collect();
    let count = accidents.len();

    Ok(Json(AccidentsResponse { accidents, count }))
}

fn parse_event_type(raw: &str) -> Result<EventType, AppError> {
    EventType::parse(raw.trim())
        .ok_or_else(|| AppError::bad_request("event_type must be 'pee' or 'poo'"))
}

fn validate_timestamp(raw: String) -> Result<String, AppError> {
    DateTime::parse_from_rfc3339(&raw)
        .map_err(|err| AppError::bad_request(format!("timestamp must be RFC 3339: {err}")))?;
    Ok(raw)
}

fn resolve_days(days: Option<i64>) -> Result<i64, AppError> {
    let days = days.unwrap_or(DEFAULT_WINDOW_DAYS);
    if days < 1 {
        return Err(AppError::bad_request("days must be at least 1"));
    }
    Ok(days)
}

fn now_string() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}
