use axum::body::to_bytes;
use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::Value;
use slotbook_api::middleware::error_handling::{map_error, AppError};
use slotbook_core::errors::BookingError;

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[rstest]
#[case(BookingError::NotFound("slot".into()), StatusCode::NOT_FOUND)]
#[case(BookingError::InvalidRange("end before start".into()), StatusCode::BAD_REQUEST)]
#[case(BookingError::SlotClash("09:00".into()), StatusCode::BAD_REQUEST)]
#[case(BookingError::AlreadyBooked("slot".into()), StatusCode::BAD_REQUEST)]
#[case(BookingError::SlotBooked("slot".into()), StatusCode::BAD_REQUEST)]
#[case(BookingError::Validation("name".into()), StatusCode::BAD_REQUEST)]
fn test_client_error_status(#[case] err: BookingError, #[case] expected: StatusCode) {
    assert_eq!(AppError(err).status(), expected);
}

#[tokio::test]
async fn test_client_error_keeps_message() {
    let response = map_error(BookingError::SlotClash("overlaps 09:00-09:30".into()));

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Slot clash: overlaps 09:00-09:30");
}

#[tokio::test]
async fn test_database_error_hides_details() {
    let response = map_error(BookingError::Database(eyre::eyre!(
        "password authentication failed for user postgres"
    )));

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Internal server error");
}

#[test]
fn test_internal_error_from_report() {
    let err: AppError = eyre::eyre!("pool timed out").into();

    assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
