//! # Availability Handlers
//!
//! Serves the free appointment slots of a business.
//!
//! The slot computation itself lives in `nexusone_core::availability`. This
//! module only resolves the inputs it needs from the request:
//!
//! 1. The lookahead: the `days_ahead` query parameter, or the configured
//!    default, capped by the booking horizon of the business
//! 2. "Today", taken from the current instant in the business's timezone,
//!    so a business in Auckland and one in Lima see different windows at
//!    the same moment
//! 3. The booked-slot source, backed by the appointments table

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{DateTime, NaiveDate, Utc};
use nexusone_core::{
    availability::{self, BookedSlotSource, MAX_DAYS_AHEAD},
    errors::BookingError,
    models::{
        appointment::{AppointmentSlot, AvailableSlotsResponse},
        business::BusinessSchedule,
    },
};
use nexusone_db::repositories::appointment::PgBookedSlots;
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    handlers::business::{load_schedule, parse_timezone},
    middleware::error_handling::AppError,
    ApiState,
};

/// Query parameters for the available slots endpoint
#[derive(Debug, Deserialize)]
pub struct SlotsQuery {
    /// Number of days to enumerate, starting tomorrow
    pub days_ahead: Option<u32>,
}

/// Number of days ahead a business takes bookings: `advance_booking_days`
/// when positive, never more than [`MAX_DAYS_AHEAD`].
pub fn booking_horizon(advance_booking_days: i32) -> u32 {
    match u32::try_from(advance_booking_days) {
        Ok(limit) if limit > 0 => limit.min(MAX_DAYS_AHEAD),
        _ => MAX_DAYS_AHEAD,
    }
}

/// Picks the lookahead for a request, capped by the booking horizon so that
/// every listed slot can be booked.
pub fn effective_days_ahead(requested: Option<u32>, default: u32, advance_booking_days: i32) -> u32 {
    requested
        .unwrap_or(default)
        .min(booking_horizon(advance_booking_days))
}

/// Number of days the generator must cover, starting tomorrow, to reach `date`.
///
/// # Errors
///
/// * `BookingError::Validation` - `date` is not inside the booking horizon
pub fn days_to_reach(date: NaiveDate, today: NaiveDate, horizon: u32) -> Result<u32, BookingError> {
    let (start, end) = availability::booking_window(today, horizon)?;
    if date < start || date >= end {
        return Err(BookingError::Validation(format!(
            "{} is outside the booking window {} to {}",
            date,
            start,
            end.pred_opt().unwrap_or(start)
        )));
    }

    let offset = (date - start).num_days() + 1;
    Ok(u32::try_from(offset).unwrap_or(horizon))
}

/// Converts `now` to a calendar date in the business's timezone.
pub fn local_today(timezone: &str, now: DateTime<Utc>) -> Result<NaiveDate, AppError> {
    let tz = parse_timezone(timezone)?;
    Ok(now.with_timezone(&tz).date_naive())
}

/// Runs the slot generator for `schedule` as of `now`.
///
/// # Errors
///
/// * `BookingError::InvalidConfiguration` - Unknown timezone or a schedule
///   the generator rejects
/// * `BookingError::AvailabilityLookupFailed` - Bookings could not be read
pub async fn resolve_available_slots<S>(
    schedule: &BusinessSchedule,
    days_ahead: u32,
    now: DateTime<Utc>,
    source: &S,
) -> Result<Vec<AppointmentSlot>, AppError>
where
    S: BookedSlotSource + ?Sized,
{
    let today = local_today(&schedule.timezone, now)?;
    let slots = availability::get_available_slots(schedule, days_ahead, today, source).await?;
    Ok(slots)
}

/// Lists free slots of a business
///
/// # Endpoint
///
/// ```text
/// GET /api/businesses/:id/slots?days_ahead=7
/// ```
///
/// # Errors
///
/// * `BookingError::NotFound` - Unknown business
/// * `BookingError::InvalidConfiguration` - The stored schedule cannot be enumerated
/// * `BookingError::AvailabilityLookupFailed` - Bookings could not be read
#[axum::debug_handler]
pub async fn list_available_slots(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Query(query): Query<SlotsQuery>,
) -> Result<Json<AvailableSlotsResponse>, AppError> {
    let schedule = load_schedule(&state, id).await?;
    let days_ahead = effective_days_ahead(
        query.days_ahead,
        state.default_days_ahead,
        schedule.advance_booking_days,
    );

    let source = PgBookedSlots::new(state.db_pool.clone());
    let slots = resolve_available_slots(&schedule, days_ahead, Utc::now(), &source).await?;

    Ok(Json(AvailableSlotsResponse {
        business_id: schedule.id,
        slots,
    }))
}
