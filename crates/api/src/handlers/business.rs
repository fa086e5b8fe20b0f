use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use chrono_tz::Tz;
use nexusone_core::{
    availability::validate_schedule,
    errors::BookingError,
    models::business::{
        BusinessSchedule, BusinessScheduleResponse, CreateBusinessScheduleRequest,
        UpdateBusinessScheduleRequest,
    },
};
use nexusone_db::repositories::business::{self, BusinessScheduleChanges};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::{middleware::error_handling::AppError, ApiState};

/// Parses an IANA timezone name.
pub fn parse_timezone(name: &str) -> Result<Tz, BookingError> {
    name.parse::<Tz>()
        .map_err(|_| BookingError::InvalidConfiguration(format!("Unknown timezone: {}", name)))
}

/// Checks a schedule before it is stored, so the slot generator never sees
/// one it would reject.
pub fn validate_business_schedule(schedule: &BusinessSchedule) -> Result<(), BookingError> {
    if schedule.name.trim().is_empty() {
        return Err(BookingError::Validation("Business name cannot be empty".to_string()));
    }
    parse_timezone(&schedule.timezone)?;
    validate_schedule(schedule)
}

/// Loads a business schedule or fails with `NotFound`.
pub async fn load_schedule(state: &ApiState, id: Uuid) -> Result<BusinessSchedule, AppError> {
    let row = business::get_business_schedule_by_id(&state.db_pool, id)
        .await
        .map_err(BookingError::Database)?
        .ok_or_else(|| BookingError::NotFound(format!("Business with ID {} not found", id)))?;

    Ok(row.into())
}

#[axum::debug_handler]
pub async fn create_business_schedule(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<CreateBusinessScheduleRequest>,
) -> Result<(StatusCode, Json<BusinessScheduleResponse>), AppError> {
    let candidate = BusinessSchedule {
        id: Uuid::nil(),
        name: payload.name,
        working_days: payload.working_days,
        time_slot_duration: payload.time_slot_duration,
        advance_booking_days: payload.advance_booking_days,
        timezone: payload.timezone,
        created_at: Utc::now(),
    };
    validate_business_schedule(&candidate)?;

    let row = business::create_business_schedule(
        &state.db_pool,
        &candidate.name,
        &candidate.working_days,
        candidate.time_slot_duration,
        candidate.advance_booking_days,
        &candidate.timezone,
    )
    .await
    .map_err(BookingError::Database)?;

    info!("Created business schedule {} ({})", row.id, row.name);

    let schedule: BusinessSchedule = row.into();
    Ok((StatusCode::CREATED, Json(schedule.into())))
}

#[axum::debug_handler]
pub async fn get_business_schedule(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<BusinessScheduleResponse>, AppError> {
    let schedule = load_schedule(&state, id).await?;
    Ok(Json(schedule.into()))
}

#[axum::debug_handler]
pub async fn update_business_schedule(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateBusinessScheduleRequest>,
) -> Result<Json<BusinessScheduleResponse>, AppError> {
    let current = load_schedule(&state, id).await?;

    // Validate the schedule as it will look after the update
    let merged = BusinessSchedule {
        name: payload.name.clone().unwrap_or(current.name),
        working_days: payload.working_days.clone().unwrap_or(current.working_days),
        time_slot_duration: payload.time_slot_duration.unwrap_or(current.time_slot_duration),
        advance_booking_days: payload
            .advance_booking_days
            .unwrap_or(current.advance_booking_days),
        timezone: payload.timezone.clone().unwrap_or(current.timezone),
        ..current
    };
    validate_business_schedule(&merged)?;

    let row = business::update_business_schedule(
        &state.db_pool,
        id,
        BusinessScheduleChanges {
            name: Some(&merged.name),
            working_days: Some(&merged.working_days),
            time_slot_duration: Some(merged.time_slot_duration),
            advance_booking_days: Some(merged.advance_booking_days),
            timezone: Some(&merged.timezone),
        },
    )
    .await
    .map_err(BookingError::Database)?;

    info!("Updated business schedule {}", id);

    let schedule: BusinessSchedule = row.into();
    Ok(Json(schedule.into()))
}
