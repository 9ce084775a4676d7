use axum::{
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/time/add", post(handlers::time_slot::create_slot))
        .route("/time/date/:date", get(handlers::time_slot::get_slots_by_date))
        .route("/time/week/all", get(handlers::time_slot::get_weekly_slots))
        .route("/time/:id", delete(handlers::time_slot::delete_slot))
}
