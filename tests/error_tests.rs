// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::http::StatusCode;
use axum::response::IntoResponse;
use wellness_tracker::error::AppError;
use wellness_tracker::models::RecordError;

#[test]
fn test_client_errors_map_to_4xx() {
    let err = AppError::BadRequest("days out of range".to_string());
    assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);

    let err = AppError::InvalidRecord {
        index: 3,
        source: RecordError::MissingDate,
    };
    assert_eq!(
        err.to_string(),
        "Invalid record at index 3: Row has neither a date nor a timestamp"
    );
    assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);

    let err = AppError::NotFound("/api/nope".to_string());
    assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
}

#[test]
fn test_server_errors_hide_details() {
    let err = AppError::Backend("HTTP 503: upstream down".to_string());
    assert_eq!(err.into_response().status(), StatusCode::BAD_GATEWAY);

    let err: AppError = anyhow::anyhow!("boom").into();
    assert!(matches!(err, AppError::Internal(_)));
    assert_eq!(
        err.into_response().status(),
        StatusCode::INTERNAL_SERVER_ERROR
    );
}
