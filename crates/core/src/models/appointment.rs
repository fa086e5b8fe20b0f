use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A candidate bookable unit. Computed per request, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentSlot {
    /// `<YYYY-MM-DD>-<HH:MM>`
    pub id: String,
    pub date: NaiveDate,
    /// Start time, `HH:MM`
    pub time: String,
    /// Minutes
    pub duration: i32,
    pub available: bool,
}

impl AppointmentSlot {
    pub fn new(date: NaiveDate, time: String, duration: i32) -> Self {
        Self {
            id: format!("{}-{}", date.format("%Y-%m-%d"), time),
            date,
            time,
            duration,
            available: true,
        }
    }

    /// The `(date, time)` key bookings are matched on.
    pub fn key(&self) -> (NaiveDate, &str) {
        (self.date, self.time.as_str())
    }
}

/// The `(date, time)` key of a confirmed booking.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BookedSlot {
    pub date: NaiveDate,
    pub time: String,
}

impl BookedSlot {
    pub fn key(&self) -> (NaiveDate, &str) {
        (self.date, self.time.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Confirmed,
    Cancelled,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Confirmed => "confirmed",
            AppointmentStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "confirmed" => Some(AppointmentStatus::Confirmed),
            "cancelled" => Some(AppointmentStatus::Cancelled),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub business_id: Uuid,
    pub customer_phone: String,
    pub customer_name: Option<String>,
    pub date: NaiveDate,
    pub time: String,
    pub duration: i32,
    pub status: AppointmentStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailableSlotsResponse {
    pub business_id: Uuid,
    pub slots: Vec<AppointmentSlot>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookAppointmentRequest {
    pub customer_phone: String,
    pub customer_name: Option<String>,
    pub date: NaiveDate,
    pub time: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentResponse {
    pub id: Uuid,
    pub business_id: Uuid,
    pub customer_phone: String,
    pub customer_name: Option<String>,
    pub date: NaiveDate,
    pub time: String,
    pub duration: i32,
    pub status: AppointmentStatus,
    pub created_at: DateTime<Utc>,
}

impl From<Appointment> for AppointmentResponse {
    fn from(appointment: Appointment) -> Self {
        Self {
            id: appointment.id,
            business_id: appointment.business_id,
            customer_phone: appointment.customer_phone,
            customer_name: appointment.customer_name,
            date: appointment.date,
            time: appointment.time,
            duration: appointment.duration,
            status: appointment.status,
            created_at: appointment.created_at,
        }
    }
}
