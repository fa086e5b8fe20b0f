use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{NaiveDate, Utc};
use nexusone_core::{
    errors::BookingError,
    models::appointment::{
        Appointment, AppointmentResponse, AppointmentSlot, BookAppointmentRequest,
    },
};
use nexusone_db::repositories::appointment::{self, NewAppointment, PgBookedSlots};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::{
    handlers::{
        availability::{booking_horizon, days_to_reach, local_today, resolve_available_slots},
        business::load_schedule,
    },
    middleware::error_handling::AppError,
    ApiState,
};

/// Finds the requested slot among the free ones.
pub fn find_open_slot<'a>(
    slots: &'a [AppointmentSlot],
    date: NaiveDate,
    time: &str,
) -> Result<&'a AppointmentSlot, BookingError> {
    slots
        .iter()
        .find(|slot| slot.date == date && slot.time == time)
        .ok_or_else(|| BookingError::SlotTaken(format!("{} {} is not an open slot", date, time)))
}

pub fn validate_booking_request(request: &BookAppointmentRequest) -> Result<(), BookingError> {
    if request.customer_phone.trim().is_empty() {
        return Err(BookingError::Validation("customer_phone cannot be empty".to_string()));
    }
    Ok(())
}

/// Books one slot for a customer.
///
/// The date must lie inside the business's booking horizon and the slot must
/// be open according to the generator. Two concurrent bookings
/// of the same slot can both pass that check; the conditional insert lets only
/// one of them through and the other gets `409 Conflict`.
#[axum::debug_handler]
pub async fn book_appointment(
    State(state): State<Arc<ApiState>>,
    Path(business_id): Path<Uuid>,
    Json(payload): Json<BookAppointmentRequest>,
) -> Result<(StatusCode, Json<AppointmentResponse>), AppError> {
    validate_booking_request(&payload)?;

    let schedule = load_schedule(&state, business_id).await?;
    let now = Utc::now();
    let today = local_today(&schedule.timezone, now)?;
    let days = days_to_reach(
        payload.date,
        today,
        booking_horizon(schedule.advance_booking_days),
    )?;

    let source = PgBookedSlots::new(state.db_pool.clone());
    let slots = resolve_available_slots(&schedule, days, now, &source).await?;
    let slot = find_open_slot(&slots, payload.date, &payload.time)?;

    let created = appointment::create_appointment(
        &state.db_pool,
        NewAppointment {
            business_id,
            customer_phone: payload.customer_phone.trim(),
            customer_name: payload.customer_name.as_deref(),
            date: slot.date,
            time: &slot.time,
            duration: slot.duration,
        },
    )
    .await
    .map_err(BookingError::Database)?
    .ok_or_else(|| BookingError::SlotTaken(format!("{} was booked by someone else", slot.id)))?;

    let appointment = Appointment::try_from(created).map_err(BookingError::Database)?;
    info!(
        "Booked appointment {} for business {} at {} {}",
        appointment.id, business_id, appointment.date, appointment.time
    );

    Ok((StatusCode::CREATED, Json(appointment.into())))
}

#[axum::debug_handler]
pub async fn cancel_appointment(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<AppointmentResponse>, AppError> {
    let Some(cancelled) = appointment::cancel_appointment(&state.db_pool, id)
        .await
        .map_err(BookingError::Database)?
    else {
        let existing = appointment::get_appointment_by_id(&state.db_pool, id)
            .await
            .map_err(BookingError::Database)?;
        return Err(match existing {
            Some(_) => BookingError::Validation(format!("Appointment {} is already cancelled", id)),
            None => BookingError::NotFound(format!("Appointment with ID {} not found", id)),
        }
        .into());
    };

    let appointment = Appointment::try_from(cancelled).map_err(BookingError::Database)?;
    info!("Cancelled appointment {}", appointment.id);

    Ok(Json(appointment.into()))
}
