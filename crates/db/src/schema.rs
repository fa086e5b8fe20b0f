use eyre::Result;
use sqlx::{Pool, Postgres};
use tracing::info;

pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    // Create business_schedules table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS business_schedules (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            name VARCHAR(255) NOT NULL,
            working_days JSONB NOT NULL,
            time_slot_duration INTEGER NOT NULL,
            advance_booking_days INTEGER NOT NULL DEFAULT 30,
            timezone VARCHAR(64) NOT NULL DEFAULT 'UTC',
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT positive_slot_duration CHECK (time_slot_duration > 0)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create appointments table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS appointments (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            business_id UUID NOT NULL REFERENCES business_schedules(id),
            customer_phone VARCHAR(32) NOT NULL,
            customer_name VARCHAR(255) NULL,
            appointment_date DATE NOT NULL,
            appointment_time VARCHAR(5) NOT NULL,
            duration INTEGER NOT NULL,
            status VARCHAR(16) NOT NULL DEFAULT 'confirmed',
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT valid_status CHECK (status IN ('confirmed', 'cancelled'))
        );
        "#,
    )
    .execute(pool)
    .await?;

    // At most one confirmed booking per slot; cancelled rows free the slot again
    sqlx::query(
        r#"
        CREATE UNIQUE INDEX IF NOT EXISTS uniq_confirmed_appointment_slot
        ON appointments(business_id, appointment_date, appointment_time)
        WHERE status = 'confirmed';
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_appointments_business_date
        ON appointments(business_id, appointment_date);
        "#,
    )
    .execute(pool)
    .await?;

    info!("Database schema initialized successfully.");
    Ok(())
}
