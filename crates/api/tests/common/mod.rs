#![allow(dead_code)]

use std::sync::Arc;

use axum_test::TestServer;
use serde_json::{json, Value};
use slotbook_api::{app, ApiState};
use slotbook_core::business_time::BusinessTime;
use slotbook_core::store::memory::MemoryStore;
use slotbook_core::store::{BookingStore, SlotStore};

pub struct TestContext {
    pub store: Arc<MemoryStore>,
    pub server: TestServer,
}

impl TestContext {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let state = Arc::new(ApiState::with_store(store.clone(), BusinessTime::default()));
        let server = TestServer::new(app(state)).unwrap();
        Self { store, server }
    }
}

/// Server over arbitrary store implementations, such as mocks.
pub fn server_with(slots: Arc<dyn SlotStore>, bookings: Arc<dyn BookingStore>) -> TestServer {
    let state = Arc::new(ApiState::new(slots, bookings, BusinessTime::default()));
    TestServer::new(app(state)).unwrap()
}

pub fn slot_body(date: &str, start: &str, end: &str) -> Value {
    json!({ "date": date, "timeStart": start, "timeEnd": end })
}

pub fn booking_body(date: &str, start: &str, end: &str) -> Value {
    json!({
        "date": date,
        "timeStart": start,
        "timeEnd": end,
        "name": "Jane",
        "email": "jane@x.com",
        "phone": "1234567890",
        "service": "SEO",
        "location": "NY"
    })
}
