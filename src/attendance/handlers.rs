use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::json;
use tracing::instrument;

use crate::{
    attendance::{
        dto::{MarkAttendanceRequest, MarkedResponse},
        services::{parse_suffix, record_check_in, CheckIn},
    },
    error::ApiError,
    state::AppState,
};

pub fn kiosk_routes() -> Router<AppState> {
    Router::new().route("/attendance/mark/", post(mark_attendance))
}

/// 201 on the first check-in of the day, 200 on repeats.
#[instrument(skip(state, payload))]
pub async fn mark_attendance(
    State(state): State<AppState>,
    Json(payload): Json<MarkAttendanceRequest>,
) -> Result<Response, ApiError> {
    let suffix = parse_suffix(&payload.last_4_digits)?;
    let outcome = record_check_in(state.store.as_ref(), state.clock.as_ref(), suffix).await?;

    Ok(match outcome {
        CheckIn::AlreadyMarked => (
            StatusCode::OK,
            Json(json!({ "message": "Attendance already marked" })),
        )
            .into_response(),
        CheckIn::Marked { member, status } => (
            StatusCode::CREATED,
            Json(MarkedResponse {
                message: "Attendance marked successfully",
                name: member.name,
                status: status.label(),
                color: status.color(),
                expiry_date: member.end_date,
            }),
        )
            .into_response(),
    })
}
