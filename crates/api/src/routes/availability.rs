use axum::{routing::get, Router};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new().route(
        "/api/businesses/:id/slots",
        get(handlers::availability::list_available_slots),
    )
}
