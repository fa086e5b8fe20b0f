use chrono::{DateTime, NaiveDate, Utc};
use eyre::{eyre, Result};
use nexusone_core::models::{
    appointment::{Appointment, AppointmentStatus, BookedSlot},
    business::{BusinessSchedule, WorkingDays},
};
use sqlx::{types::Json, FromRow};
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct DbBusinessSchedule {
    pub id: Uuid,
    pub name: String,
    pub working_days: Json<WorkingDays>,
    pub time_slot_duration: i32,
    pub advance_booking_days: i32,
    pub timezone: String,
    pub created_at: DateTime<Utc>,
}

impl From<DbBusinessSchedule> for BusinessSchedule {
    fn from(row: DbBusinessSchedule) -> Self {
        Self {
            id: row.id,
            name: row.name,
            working_days: row.working_days.0,
            time_slot_duration: row.time_slot_duration,
            advance_booking_days: row.advance_booking_days,
            timezone: row.timezone,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct DbAppointment {
    pub id: Uuid,
    pub business_id: Uuid,
    pub customer_phone: String,
    pub customer_name: Option<String>,
    pub appointment_date: NaiveDate,
    pub appointment_time: String,
    pub duration: i32,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<DbAppointment> for Appointment {
    type Error = eyre::Report;

    fn try_from(row: DbAppointment) -> Result<Self> {
        let status = AppointmentStatus::parse(&row.status)
            .ok_or_else(|| eyre!("Unknown appointment status: {}", row.status))?;

        Ok(Self {
            id: row.id,
            business_id: row.business_id,
            customer_phone: row.customer_phone,
            customer_name: row.customer_name,
            date: row.appointment_date,
            time: row.appointment_time,
            duration: row.duration,
            status,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct DbBookedSlot {
    pub appointment_date: NaiveDate,
    pub appointment_time: String,
}

impl From<DbBookedSlot> for BookedSlot {
    fn from(row: DbBookedSlot) -> Self {
        Self {
            date: row.appointment_date,
            time: row.appointment_time,
        }
    }
}
