use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/booking/create", post(handlers::booking::create_booking))
        .route("/booking/all", get(handlers::booking::get_all_bookings))
        .route(
            "/booking/date/:date",
            get(handlers::booking::get_bookings_by_date),
        )
        .route(
            "/booking/:id",
            get(handlers::booking::get_booking).delete(handlers::booking::cancel_booking),
        )
}
