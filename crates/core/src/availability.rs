//! # Appointment Slot Availability
//!
//! Computes the bookable slots of a business over a rolling window of days.
//!
//! ## Algorithm
//!
//! 1. The window starts tomorrow (in the business's local calendar) and
//!    covers `days_ahead` consecutive days
//! 2. Each open weekday is cut into `time_slot_duration`-minute slots from
//!    its start time up to, but excluding, its end time
//! 3. Confirmed bookings for the same window are fetched once through a
//!    [`BookedSlotSource`]
//! 4. Candidates whose `(date, time)` key equals a booking are dropped
//!
//! Matching is an exact comparison of slot keys. A booking that starts
//! between two slot boundaries does not hide either neighbour.
//!
//! The computation itself is pure: "today" is passed in and the only I/O is
//! the single lookup in step 3. A failed lookup is reported as
//! [`BookingError::AvailabilityLookupFailed`] and never as an empty list.

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::{Datelike, Days, Duration, NaiveDate, NaiveTime};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::{
    errors::{BookingError, BookingResult},
    models::{
        appointment::{AppointmentSlot, BookedSlot},
        business::{BusinessSchedule, TIME_FORMAT, WorkingDay},
    },
};

/// Lookahead used when the caller does not ask for a specific number of days.
pub const DEFAULT_DAYS_AHEAD: u32 = 7;

/// Longest lookahead served, whatever the caller or the business asks for.
pub const MAX_DAYS_AHEAD: u32 = 365;

/// Read access to confirmed bookings.
#[async_trait]
pub trait BookedSlotSource: Send + Sync {
    /// Confirmed bookings of `business_id` with `from <= date < to`.
    async fn booked_slots(
        &self,
        business_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> eyre::Result<Vec<BookedSlot>>;
}

/// Returns the half-open `[start, end)` window of bookable dates.
///
/// Fails with `BookingError::Validation` when the window runs past the last
/// representable date.
pub fn booking_window(today: NaiveDate, days_ahead: u32) -> BookingResult<(NaiveDate, NaiveDate)> {
    let out_of_range = || {
        BookingError::Validation(format!(
            "a window of {} days after {} is out of range",
            days_ahead, today
        ))
    };

    let start = today.checked_add_days(Days::new(1)).ok_or_else(out_of_range)?;
    let end = start
        .checked_add_days(Days::new(u64::from(days_ahead)))
        .ok_or_else(out_of_range)?;
    Ok((start, end))
}

/// Rejects schedules the generator cannot enumerate.
pub fn validate_schedule(schedule: &BusinessSchedule) -> BookingResult<()> {
    if schedule.time_slot_duration <= 0 {
        return Err(BookingError::InvalidConfiguration(format!(
            "time_slot_duration must be positive, got {}",
            schedule.time_slot_duration
        )));
    }

    if schedule.working_days.is_empty() {
        return Err(BookingError::InvalidConfiguration(
            "working_days must configure at least one weekday".to_string(),
        ));
    }

    for (_, day) in schedule.working_days.iter().filter(|(_, day)| day.enabled) {
        parse_hours(day)?;
    }

    Ok(())
}

fn parse_hours(day: &WorkingDay) -> BookingResult<(NaiveTime, NaiveTime)> {
    day.hours().map_err(|e| {
        BookingError::InvalidConfiguration(format!(
            "working hours {}-{} are not HH:MM: {}",
            day.start, day.end, e
        ))
    })
}

/// Slots of one day. Stops at `end` or at midnight, whichever comes first.
fn day_slots(date: NaiveDate, start: NaiveTime, end: NaiveTime, duration: i32) -> Vec<AppointmentSlot> {
    let step = Duration::minutes(i64::from(duration));

    std::iter::successors(Some(start), |current| {
        let (next, wrapped) = current.overflowing_add_signed(step);
        (wrapped == 0).then_some(next)
    })
    .take_while(|time| *time < end)
    .map(|time| AppointmentSlot::new(date, time.format(TIME_FORMAT).to_string(), duration))
    .collect()
}

/// Enumerates every slot of the open days in `[window_start, window_start + days_ahead)`,
/// in chronological order.
pub fn generate_candidate_slots(
    schedule: &BusinessSchedule,
    window_start: NaiveDate,
    days_ahead: u32,
) -> BookingResult<Vec<AppointmentSlot>> {
    validate_schedule(schedule)?;

    let mut candidates = Vec::new();
    for date in window_start.iter_days().take(days_ahead as usize) {
        let Some(day) = schedule.working_days.enabled(date.weekday()) else {
            continue;
        };

        let (start, end) = parse_hours(day)?;
        candidates.extend(day_slots(date, start, end, schedule.time_slot_duration));
    }

    Ok(candidates)
}

/// Drops every candidate that matches a booked slot.
pub fn exclude_booked(candidates: Vec<AppointmentSlot>, booked: &[BookedSlot]) -> Vec<AppointmentSlot> {
    let taken: HashSet<(NaiveDate, &str)> = booked.iter().map(BookedSlot::key).collect();

    candidates
        .into_iter()
        .filter(|slot| !taken.contains(&slot.key()))
        .collect()
}

/// Lists the slots of `schedule` that are still free over the next `days_ahead` days.
///
/// # Arguments
///
/// * `schedule` - Working hours and slot length of the business
/// * `days_ahead` - Number of days to enumerate, starting tomorrow
/// * `today` - Current date in the business's timezone
/// * `source` - Where confirmed bookings are read from
///
/// # Errors
///
/// * `BookingError::InvalidConfiguration` - Non-positive slot length, no
///   configured weekday, or working hours that are not `HH:MM`
/// * `BookingError::Validation` - The window runs past the last representable date
/// * `BookingError::AvailabilityLookupFailed` - The booking lookup failed
pub async fn get_available_slots<S>(
    schedule: &BusinessSchedule,
    days_ahead: u32,
    today: NaiveDate,
    source: &S,
) -> BookingResult<Vec<AppointmentSlot>>
where
    S: BookedSlotSource + ?Sized,
{
    let (window_start, window_end) = booking_window(today, days_ahead)?;
    let candidates = generate_candidate_slots(schedule, window_start, days_ahead)?;

    debug!(
        "Generated {} candidate slots for business {} between {} and {}",
        candidates.len(),
        schedule.id,
        window_start,
        window_end
    );

    if candidates.is_empty() {
        return Ok(candidates);
    }

    let booked = source
        .booked_slots(schedule.id, window_start, window_end)
        .await
        .map_err(|e| {
            warn!("Booked slot lookup failed for business {}: {}", schedule.id, e);
            BookingError::AvailabilityLookupFailed(e)
        })?;

    let available = exclude_booked(candidates, &booked);
    debug!(
        "{} slots available for business {} after excluding {} bookings",
        available.len(),
        schedule.id,
        booked.len()
    );

    Ok(available)
}
