use crate::{
    models::{DbAppointment, DbBookedSlot},
    DbPool,
};
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use eyre::Result;
use nexusone_core::{availability::BookedSlotSource, models::appointment::BookedSlot};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

/// Confirmed bookings of a business with `from <= date < to`.
pub async fn get_booked_slots(
    pool: &Pool<Postgres>,
    business_id: Uuid,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Vec<DbBookedSlot>> {
    let slots = sqlx::query_as::<_, DbBookedSlot>(
        r#"
        SELECT appointment_date, appointment_time
        FROM appointments
        WHERE business_id = $1
          AND status = 'confirmed'
          AND appointment_date >= $2
          AND appointment_date < $3
        ORDER BY appointment_date ASC, appointment_time ASC
        "#,
    )
    .bind(business_id)
    .bind(from)
    .bind(to)
    .fetch_all(pool)
    .await?;

    Ok(slots)
}

pub struct NewAppointment<'a> {
    pub business_id: Uuid,
    pub customer_phone: &'a str,
    pub customer_name: Option<&'a str>,
    pub date: NaiveDate,
    pub time: &'a str,
    pub duration: i32,
}

/// Inserts a confirmed appointment.
///
/// Returns `None` when another confirmed appointment already holds the same
/// `(business, date, time)`. The partial unique index makes this the single
/// arbiter between concurrent bookings.
pub async fn create_appointment(
    pool: &Pool<Postgres>,
    appointment: NewAppointment<'_>,
) -> Result<Option<DbAppointment>> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    tracing::debug!(
        "Booking appointment: business={}, date={}, time={}",
        appointment.business_id, appointment.date, appointment.time
    );

    let created = sqlx::query_as::<_, DbAppointment>(
        r#"
        INSERT INTO appointments
            (id, business_id, customer_phone, customer_name, appointment_date,
             appointment_time, duration, status, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, 'confirmed', $8)
        ON CONFLICT (business_id, appointment_date, appointment_time)
            WHERE status = 'confirmed'
            DO NOTHING
        RETURNING id, business_id, customer_phone, customer_name, appointment_date,
                  appointment_time, duration, status, created_at
        "#,
    )
    .bind(id)
    .bind(appointment.business_id)
    .bind(appointment.customer_phone)
    .bind(appointment.customer_name)
    .bind(appointment.date)
    .bind(appointment.time)
    .bind(appointment.duration)
    .bind(now)
    .fetch_optional(pool)
    .await?;

    if created.is_none() {
        tracing::debug!(
            "Slot already taken: business={}, date={}, time={}",
            appointment.business_id, appointment.date, appointment.time
        );
    }

    Ok(created)
}

pub async fn get_appointment_by_id(
    pool: &Pool<Postgres>,
    id: Uuid,
) -> Result<Option<DbAppointment>> {
    let appointment = sqlx::query_as::<_, DbAppointment>(
        r#"
        SELECT id, business_id, customer_phone, customer_name, appointment_date,
               appointment_time, duration, status, created_at
        FROM appointments
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(appointment)
}

/// Marks a confirmed appointment as cancelled, freeing its slot.
///
/// Returns `None` if the appointment does not exist or is already cancelled.
pub async fn cancel_appointment(
    pool: &Pool<Postgres>,
    id: Uuid,
) -> Result<Option<DbAppointment>> {
    let appointment = sqlx::query_as::<_, DbAppointment>(
        r#"
        UPDATE appointments
        SET status = 'cancelled'
        WHERE id = $1 AND status = 'confirmed'
        RETURNING id, business_id, customer_phone, customer_name, appointment_date,
                  appointment_time, duration, status, created_at
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(appointment)
}

/// Reads confirmed bookings from PostgreSQL for the slot generator.
#[derive(Clone)]
pub struct PgBookedSlots {
    pool: DbPool,
}

impl PgBookedSlots {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookedSlotSource for PgBookedSlots {
    async fn booked_slots(
        &self,
        business_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<BookedSlot>> {
        let rows = get_booked_slots(&self.pool, business_id, from, to).await?;
        Ok(rows.into_iter().map(BookedSlot::from).collect())
    }
}
