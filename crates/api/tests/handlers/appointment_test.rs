use axum::{http::StatusCode, Json};
use chrono::{NaiveDate, Utc};
use mockall::predicate;
use nexusone_api::{
    handlers::{
        appointment::{find_open_slot, validate_booking_request},
        availability::{booking_horizon, days_to_reach, local_today, resolve_available_slots},
    },
    middleware::error_handling::AppError,
};
use nexusone_core::{
    errors::BookingError,
    models::{
        appointment::{
            Appointment, AppointmentResponse, AppointmentSlot, AppointmentStatus,
            BookAppointmentRequest,
        },
        business::BusinessSchedule,
    },
};
use nexusone_db::models::DbAppointment;
use pretty_assertions::assert_eq;
use uuid::Uuid;

use crate::test_utils::{monday_morning, next_monday, schedule_row, wednesday_noon, TestContext};

fn request(date: NaiveDate, time: &str) -> BookAppointmentRequest {
    BookAppointmentRequest {
        customer_phone: "+34600111222".to_string(),
        customer_name: Some("Lucia".to_string()),
        date,
        time: time.to_string(),
    }
}

// Mirrors the booking handler against mocked repositories
async fn test_book_wrapper(
    ctx: &mut TestContext,
    business_id: Uuid,
    payload: BookAppointmentRequest,
) -> Result<(StatusCode, Json<AppointmentResponse>), AppError> {
    validate_booking_request(&payload)?;

    let schedule: BusinessSchedule = ctx
        .business_repo
        .get_business_schedule_by_id(business_id)
        .await?
        .ok_or_else(|| BookingError::NotFound(format!("Business with ID {} not found", business_id)))?
        .into();
    let today = local_today(&schedule.timezone, wednesday_noon())?;
    let days = days_to_reach(
        payload.date,
        today,
        booking_horizon(schedule.advance_booking_days),
    )?;

    let slots = resolve_available_slots(&schedule, days, wednesday_noon(), &ctx.appointment_repo).await?;
    let slot = find_open_slot(&slots, payload.date, &payload.time)?;

    let created = ctx
        .appointment_repo
        .create_appointment(
            business_id,
            payload.customer_phone.clone(),
            slot.date,
            slot.time.clone(),
            slot.duration,
        )
        .await?
        .ok_or_else(|| BookingError::SlotTaken(format!("{} was booked by someone else", slot.id)))?;

    let appointment = Appointment::try_from(created)?;
    Ok((StatusCode::CREATED, Json(appointment.into())))
}

fn appointment_row(business_id: Uuid, date: NaiveDate, time: String, duration: i32) -> DbAppointment {
    DbAppointment {
        id: Uuid::new_v4(),
        business_id,
        customer_phone: "+34600111222".to_string(),
        customer_name: Some("Lucia".to_string()),
        appointment_date: date,
        appointment_time: time,
        duration,
        status: "confirmed".to_string(),
        created_at: Utc::now(),
    }
}

#[test]
fn test_find_open_slot() {
    let slots = vec![
        AppointmentSlot::new(next_monday(), "09:00".to_string(), 30),
        AppointmentSlot::new(next_monday(), "09:30".to_string(), 30),
    ];

    let slot = find_open_slot(&slots, next_monday(), "09:30").unwrap();
    assert_eq!(slot.id, "2025-06-09-09:30");

    let missing = find_open_slot(&slots, next_monday(), "10:00");
    assert!(matches!(missing, Err(BookingError::SlotTaken(_))));
}

#[test]
fn test_blank_phone_is_rejected() {
    let mut payload = request(next_monday(), "09:00");
    payload.customer_phone = "   ".to_string();

    let result = validate_booking_request(&payload);

    assert!(matches!(result, Err(BookingError::Validation(_))));
}

#[tokio::test]
async fn test_book_open_slot() {
    let mut ctx = TestContext::new();
    let business_id = Uuid::new_v4();

    ctx.business_repo
        .expect_get_business_schedule_by_id()
        .returning(move |id| Ok(Some(schedule_row(id, monday_morning(), "UTC"))));
    ctx.appointment_repo
        .expect_booked_slots()
        .times(1)
        .returning(|_, _, _| Ok(Vec::new()));
    ctx.appointment_repo
        .expect_create_appointment()
        .with(
            predicate::eq(business_id),
            predicate::always(),
            predicate::eq(next_monday()),
            predicate::eq("09:30".to_string()),
            predicate::eq(30),
        )
        .times(1)
        .returning(|business_id, _, date, time, duration| {
            Ok(Some(appointment_row(business_id, date, time, duration)))
        });

    let (status, Json(response)) =
        test_book_wrapper(&mut ctx, business_id, request(next_monday(), "09:30"))
            .await
            .unwrap();

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(response.status, AppointmentStatus::Confirmed);
    assert_eq!(response.time, "09:30");
    assert_eq!(response.business_id, business_id);
}

#[tokio::test]
async fn test_book_slot_outside_working_hours_conflicts() {
    let mut ctx = TestContext::new();
    let business_id = Uuid::new_v4();

    ctx.business_repo
        .expect_get_business_schedule_by_id()
        .returning(move |id| Ok(Some(schedule_row(id, monday_morning(), "UTC"))));
    ctx.appointment_repo
        .expect_booked_slots()
        .returning(|_, _, _| Ok(Vec::new()));
    ctx.appointment_repo.expect_create_appointment().never();

    let error = test_book_wrapper(&mut ctx, business_id, request(next_monday(), "10:00"))
        .await
        .unwrap_err();

    assert!(matches!(error.0, BookingError::SlotTaken(_)));
    assert_eq!(error.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_losing_the_insert_race_conflicts() {
    let mut ctx = TestContext::new();
    let business_id = Uuid::new_v4();

    ctx.business_repo
        .expect_get_business_schedule_by_id()
        .returning(move |id| Ok(Some(schedule_row(id, monday_morning(), "UTC"))));
    ctx.appointment_repo
        .expect_booked_slots()
        .returning(|_, _, _| Ok(Vec::new()));
    // Another request confirmed the slot between the check and the insert
    ctx.appointment_repo
        .expect_create_appointment()
        .times(1)
        .returning(|_, _, _, _, _| Ok(None));

    let error = test_book_wrapper(&mut ctx, business_id, request(next_monday(), "09:00"))
        .await
        .unwrap_err();

    assert!(matches!(error.0, BookingError::SlotTaken(_)));
}

#[tokio::test]
async fn test_book_unknown_business() {
    let mut ctx = TestContext::new();

    ctx.business_repo
        .expect_get_business_schedule_by_id()
        .returning(|_| Ok(None));

    let error = test_book_wrapper(&mut ctx, Uuid::new_v4(), request(next_monday(), "09:00"))
        .await
        .unwrap_err();

    assert_eq!(error.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_book_beyond_default_lookahead_without_advance_limit() {
    let mut ctx = TestContext::new();
    let business_id = Uuid::new_v4();
    // Twelve days after the Wednesday the clock is set to
    let later_monday = NaiveDate::from_ymd_opt(2025, 6, 16).unwrap();

    ctx.business_repo
        .expect_get_business_schedule_by_id()
        .returning(move |id| {
            let mut row = schedule_row(id, monday_morning(), "UTC");
            row.advance_booking_days = 0;
            Ok(Some(row))
        });
    ctx.appointment_repo
        .expect_booked_slots()
        .with(
            predicate::eq(business_id),
            predicate::eq(NaiveDate::from_ymd_opt(2025, 6, 5).unwrap()),
            predicate::eq(NaiveDate::from_ymd_opt(2025, 6, 17).unwrap()),
        )
        .times(1)
        .returning(|_, _, _| Ok(Vec::new()));
    ctx.appointment_repo
        .expect_create_appointment()
        .times(1)
        .returning(|business_id, _, date, time, duration| {
            Ok(Some(appointment_row(business_id, date, time, duration)))
        });

    let (status, Json(response)) =
        test_book_wrapper(&mut ctx, business_id, request(later_monday, "09:00"))
            .await
            .unwrap();

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(response.date, later_monday);
}

#[tokio::test]
async fn test_book_outside_horizon_is_rejected() {
    let mut ctx = TestContext::new();
    let business_id = Uuid::new_v4();
    // The schedule takes bookings 30 days ahead
    let far_monday = NaiveDate::from_ymd_opt(2025, 8, 4).unwrap();

    ctx.business_repo
        .expect_get_business_schedule_by_id()
        .returning(move |id| Ok(Some(schedule_row(id, monday_morning(), "UTC"))));
    ctx.appointment_repo.expect_booked_slots().never();
    ctx.appointment_repo.expect_create_appointment().never();

    let error = test_book_wrapper(&mut ctx, business_id, request(far_monday, "09:00"))
        .await
        .unwrap_err();

    assert!(matches!(error.0, BookingError::Validation(_)));
    assert_eq!(error.status(), StatusCode::BAD_REQUEST);
}
