/// Booking and cancelling appointments
pub mod appointment;
/// Free slot queries
pub mod availability;
/// Business schedule management
pub mod business;
