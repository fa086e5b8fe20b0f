use async_trait::async_trait;
use chrono::NaiveDate;
use mockall::mock;
use nexusone_core::{
    availability::BookedSlotSource,
    models::{appointment::BookedSlot, business::WorkingDays},
};
use uuid::Uuid;

use crate::models::{DbAppointment, DbBusinessSchedule};

// Mock repositories for testing
mock! {
    pub BusinessRepo {
        pub async fn create_business_schedule(
            &self,
            name: String,
            working_days: WorkingDays,
            time_slot_duration: i32,
            advance_booking_days: i32,
            timezone: String,
        ) -> eyre::Result<DbBusinessSchedule>;

        pub async fn get_business_schedule_by_id(
            &self,
            id: Uuid,
        ) -> eyre::Result<Option<DbBusinessSchedule>>;
    }
}

mock! {
    pub AppointmentRepo {
        pub async fn create_appointment(
            &self,
            business_id: Uuid,
            customer_phone: String,
            date: NaiveDate,
            time: String,
            duration: i32,
        ) -> eyre::Result<Option<DbAppointment>>;

        pub async fn cancel_appointment(
            &self,
            id: Uuid,
        ) -> eyre::Result<Option<DbAppointment>>;
    }

    #[async_trait]
    impl BookedSlotSource for AppointmentRepo {
        async fn booked_slots(
            &self,
            business_id: Uuid,
            from: NaiveDate,
            to: NaiveDate,
        ) -> eyre::Result<Vec<BookedSlot>>;
    }
}
