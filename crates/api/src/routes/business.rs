use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/businesses",
            post(handlers::business::create_business_schedule),
        )
        .route(
            "/api/businesses/:id",
            get(handlers::business::get_business_schedule)
                .put(handlers::business::update_business_schedule),
        )
}
