use crate::models::DbBusinessSchedule;
use chrono::Utc;
use eyre::{eyre, Result};
use nexusone_core::models::business::WorkingDays;
use sqlx::{types::Json, Pool, Postgres};
use uuid::Uuid;

pub async fn create_business_schedule(
    pool: &Pool<Postgres>,
    name: &str,
    working_days: &WorkingDays,
    time_slot_duration: i32,
    advance_booking_days: i32,
    timezone: &str,
) -> Result<DbBusinessSchedule> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    tracing::debug!(
        "Creating business schedule: id={}, name={}, slot_duration={}, timezone={}",
        id, name, time_slot_duration, timezone
    );

    let schedule = sqlx::query_as::<_, DbBusinessSchedule>(
        r#"
        INSERT INTO business_schedules
            (id, name, working_days, time_slot_duration, advance_booking_days, timezone, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING id, name, working_days, time_slot_duration, advance_booking_days, timezone, created_at
        "#,
    )
    .bind(id)
    .bind(name)
    .bind(Json(working_days))
    .bind(time_slot_duration)
    .bind(advance_booking_days)
    .bind(timezone)
    .bind(now)
    .fetch_one(pool)
    .await?;

    tracing::debug!("Business schedule created successfully: id={}", id);
    Ok(schedule)
}

pub async fn get_business_schedule_by_id(
    pool: &Pool<Postgres>,
    id: Uuid,
) -> Result<Option<DbBusinessSchedule>> {
    tracing::debug!("Getting business schedule by id: {}", id);

    let schedule = sqlx::query_as::<_, DbBusinessSchedule>(
        r#"
        SELECT id, name, working_days, time_slot_duration, advance_booking_days, timezone, created_at
        FROM business_schedules
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    if schedule.is_none() {
        tracing::debug!("Business schedule not found: id={}", id);
    }

    Ok(schedule)
}

/// Fields left as `None` keep their stored value.
pub struct BusinessScheduleChanges<'a> {
    pub name: Option<&'a str>,
    pub working_days: Option<&'a WorkingDays>,
    pub time_slot_duration: Option<i32>,
    pub advance_booking_days: Option<i32>,
    pub timezone: Option<&'a str>,
}

pub async fn update_business_schedule(
    pool: &Pool<Postgres>,
    id: Uuid,
    changes: BusinessScheduleChanges<'_>,
) -> Result<DbBusinessSchedule> {
    let schedule = get_business_schedule_by_id(pool, id)
        .await?
        .ok_or_else(|| eyre!("Business schedule not found"))?;

    let name = changes.name.unwrap_or(&schedule.name);
    let working_days = changes.working_days.unwrap_or(&schedule.working_days.0);
    let time_slot_duration = changes.time_slot_duration.unwrap_or(schedule.time_slot_duration);
    let advance_booking_days = changes
        .advance_booking_days
        .unwrap_or(schedule.advance_booking_days);
    let timezone = changes.timezone.unwrap_or(&schedule.timezone);

    let updated_schedule = sqlx::query_as::<_, DbBusinessSchedule>(
        r#"
        UPDATE business_schedules
        SET name = $2, working_days = $3, time_slot_duration = $4,
            advance_booking_days = $5, timezone = $6
        WHERE id = $1
        RETURNING id, name, working_days, time_slot_duration, advance_booking_days, timezone, created_at
        "#,
    )
    .bind(id)
    .bind(name)
    .bind(Json(working_days))
    .bind(time_slot_duration)
    .bind(advance_booking_days)
    .bind(timezone)
    .fetch_one(pool)
    .await?;

    Ok(updated_schedule)
}
