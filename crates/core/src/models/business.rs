use chrono::{DateTime, NaiveTime, Utc, Weekday};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Format used for working-hour boundaries and slot start times.
pub const TIME_FORMAT: &str = "%H:%M";

/// Opening hours for a single weekday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingDay {
    pub enabled: bool,
    /// Opening time, `HH:MM`
    pub start: String,
    /// Closing time, `HH:MM`. The last slot must start before this.
    pub end: String,
}

impl WorkingDay {
    pub fn new(start: &str, end: &str) -> Self {
        Self {
            enabled: true,
            start: start.to_string(),
            end: end.to_string(),
        }
    }

    pub fn closed() -> Self {
        Self {
            enabled: false,
            start: String::new(),
            end: String::new(),
        }
    }

    /// Parses `start` and `end` into times of day.
    pub fn hours(&self) -> Result<(NaiveTime, NaiveTime), chrono::ParseError> {
        let start = NaiveTime::parse_from_str(&self.start, TIME_FORMAT)?;
        let end = NaiveTime::parse_from_str(&self.end, TIME_FORMAT)?;
        Ok((start, end))
    }
}

/// Per-weekday opening hours. A weekday without an entry is closed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingDays {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monday: Option<WorkingDay>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tuesday: Option<WorkingDay>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wednesday: Option<WorkingDay>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thursday: Option<WorkingDay>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub friday: Option<WorkingDay>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saturday: Option<WorkingDay>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sunday: Option<WorkingDay>,
}

impl WorkingDays {
    pub fn get(&self, weekday: Weekday) -> Option<&WorkingDay> {
        match weekday {
            Weekday::Mon => self.monday.as_ref(),
            Weekday::Tue => self.tuesday.as_ref(),
            Weekday::Wed => self.wednesday.as_ref(),
            Weekday::Thu => self.thursday.as_ref(),
            Weekday::Fri => self.friday.as_ref(),
            Weekday::Sat => self.saturday.as_ref(),
            Weekday::Sun => self.sunday.as_ref(),
        }
    }

    pub fn set(&mut self, weekday: Weekday, day: WorkingDay) {
        let slot = match weekday {
            Weekday::Mon => &mut self.monday,
            Weekday::Tue => &mut self.tuesday,
            Weekday::Wed => &mut self.wednesday,
            Weekday::Thu => &mut self.thursday,
            Weekday::Fri => &mut self.friday,
            Weekday::Sat => &mut self.saturday,
            Weekday::Sun => &mut self.sunday,
        };
        *slot = Some(day);
    }

    /// Returns the entry for `weekday` only when that day is open.
    pub fn enabled(&self, weekday: Weekday) -> Option<&WorkingDay> {
        self.get(weekday).filter(|day| day.enabled)
    }

    /// True when no weekday has been configured at all.
    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    /// Iterates the configured weekdays, Monday first.
    pub fn iter(&self) -> impl Iterator<Item = (Weekday, &WorkingDay)> {
        [
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
            Weekday::Sat,
            Weekday::Sun,
        ]
        .into_iter()
        .filter_map(move |weekday| self.get(weekday).map(|day| (weekday, day)))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusinessSchedule {
    pub id: Uuid,
    pub name: String,
    pub working_days: WorkingDays,
    /// Slot length in minutes
    pub time_slot_duration: i32,
    /// How far ahead customers may book. Zero or negative means no limit.
    pub advance_booking_days: i32,
    /// IANA timezone name, e.g. `Europe/Madrid`
    pub timezone: String,
    pub created_at: DateTime<Utc>,
}

fn default_timezone() -> String {
    "UTC".to_string()
}

fn default_advance_booking_days() -> i32 {
    30
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBusinessScheduleRequest {
    pub name: String,
    pub working_days: WorkingDays,
    pub time_slot_duration: i32,
    #[serde(default = "default_advance_booking_days")]
    pub advance_booking_days: i32,
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateBusinessScheduleRequest {
    pub name: Option<String>,
    pub working_days: Option<WorkingDays>,
    pub time_slot_duration: Option<i32>,
    pub advance_booking_days: Option<i32>,
    pub timezone: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusinessScheduleResponse {
    pub id: Uuid,
    pub name: String,
    pub working_days: WorkingDays,
    pub time_slot_duration: i32,
    pub advance_booking_days: i32,
    pub timezone: String,
    pub created_at: DateTime<Utc>,
}

impl From<BusinessSchedule> for BusinessScheduleResponse {
    fn from(schedule: BusinessSchedule) -> Self {
        Self {
            id: schedule.id,
            name: schedule.name,
            working_days: schedule.working_days,
            time_slot_duration: schedule.time_slot_duration,
            advance_booking_days: schedule.advance_booking_days,
            timezone: schedule.timezone,
            created_at: schedule.created_at,
        }
    }
}
