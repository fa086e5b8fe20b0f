use chrono::Utc;
use nexusone_api::handlers::business::{parse_timezone, validate_business_schedule};
use nexusone_core::{
    errors::BookingError,
    models::business::{BusinessSchedule, BusinessScheduleResponse, WorkingDays},
};
use pretty_assertions::assert_eq;
use rstest::rstest;
use uuid::Uuid;

use crate::test_utils::{monday_morning, schedule_row, TestContext};

fn schedule(name: &str, working_days: WorkingDays, duration: i32, timezone: &str) -> BusinessSchedule {
    BusinessSchedule {
        id: Uuid::new_v4(),
        name: name.to_string(),
        working_days,
        time_slot_duration: duration,
        advance_booking_days: 30,
        timezone: timezone.to_string(),
        created_at: Utc::now(),
    }
}

#[rstest]
#[case("UTC")]
#[case("Europe/Madrid")]
#[case("America/Sao_Paulo")]
fn test_known_timezones_parse(#[case] name: &str) {
    assert!(parse_timezone(name).is_ok());
}

#[test]
fn test_valid_schedule_passes() {
    let schedule = schedule("Barber shop", monday_morning(), 30, "Europe/Madrid");

    assert!(validate_business_schedule(&schedule).is_ok());
}

#[test]
fn test_blank_name_is_a_validation_error() {
    let schedule = schedule("  ", monday_morning(), 30, "UTC");

    let result = validate_business_schedule(&schedule);

    assert!(matches!(result, Err(BookingError::Validation(_))));
}

#[rstest]
#[case(monday_morning(), 0, "UTC")]
#[case(monday_morning(), 30, "Not/AZone")]
#[case(WorkingDays::default(), 30, "UTC")]
fn test_degenerate_schedules_are_rejected(
    #[case] working_days: WorkingDays,
    #[case] duration: i32,
    #[case] timezone: &str,
) {
    let schedule = schedule("Barber shop", working_days, duration, timezone);

    let result = validate_business_schedule(&schedule);

    assert!(matches!(result, Err(BookingError::InvalidConfiguration(_))));
}

#[tokio::test]
async fn test_stored_schedule_round_trips_to_response() {
    let mut ctx = TestContext::new();
    let id = Uuid::new_v4();

    ctx.business_repo
        .expect_get_business_schedule_by_id()
        .times(1)
        .returning(move |id| Ok(Some(schedule_row(id, monday_morning(), "Europe/Madrid"))));

    let row = ctx
        .business_repo
        .get_business_schedule_by_id(id)
        .await
        .unwrap()
        .unwrap();
    let schedule: BusinessSchedule = row.into();
    let response = BusinessScheduleResponse::from(schedule);

    assert_eq!(response.id, id);
    assert_eq!(response.working_days, monday_morning());
    assert_eq!(response.timezone, "Europe/Madrid");
}
