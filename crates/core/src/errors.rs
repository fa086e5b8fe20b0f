use thiserror::Error;

#[derive(Error, Debug)]
pub enum BookingError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid schedule configuration: {0}")]
    InvalidConfiguration(String),

    /// The booked-slot lookup failed, so availability could not be checked.
    /// Distinct from an empty result, which means the window is fully booked.
    #[error("Availability lookup failed: {0}")]
    AvailabilityLookupFailed(#[source] eyre::Report),

    #[error("Slot not available: {0}")]
    SlotTaken(String),

    #[error("Database error: {0}")]
    Database(#[from] eyre::Report),

    #[error("Internal server error: {0}")]
    Internal(#[from] Box<dyn std::error::Error + Send + Sync>),
}

pub type BookingResult<T> = Result<T, BookingError>;
