use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    error::ApiError,
    members::{
        dto::{
            AttendanceHistoryResponse, CreateMemberRequest, CreatedMemberResponse,
            MemberListItem, MemberListResponse, MessageResponse, RenewMemberRequest,
            RenewalResponse, UpdateMemberRequest,
        },
        repo_types::{MemberFields, NewPayment},
        services::{
            compute_renewal, first_end_date, joining_date, present_dates, validate_amount,
            validate_end_after_start, validate_member_fields,
        },
    },
    state::AppState,
};

pub fn member_routes() -> Router<AppState> {
    Router::new()
        .route("/members/", get(list_members).post(create_member))
        .route("/members/archived/", get(list_archived))
        .route("/members/:id/", delete(archive_member))
        .route("/members/:id/restore/", post(restore_member))
        .route("/members/:id/permanent-delete/", delete(purge_member))
        .route("/members/:id/edit/", put(edit_member))
        .route("/members/:id/renew/", post(renew_member))
        .route("/members/:id/attendance-history/", get(attendance_history))
}

#[instrument(skip(state))]
pub async fn list_members(
    State(state): State<AppState>,
) -> Result<Json<MemberListResponse>, ApiError> {
    let members = state.store.list_members(true).await?;
    Ok(Json(member_list(members)))
}

#[instrument(skip(state))]
pub async fn list_archived(
    State(state): State<AppState>,
) -> Result<Json<MemberListResponse>, ApiError> {
    let members = state.store.list_members(false).await?;
    Ok(Json(member_list(members)))
}

fn member_list(members: Vec<crate::members::repo_types::Member>) -> MemberListResponse {
    let members: Vec<MemberListItem> = members.into_iter().map(Into::into).collect();
    MemberListResponse {
        count: members.len(),
        members,
    }
}

#[instrument(skip(state, payload))]
pub async fn create_member(
    State(state): State<AppState>,
    Json(payload): Json<CreateMemberRequest>,
) -> Result<(StatusCode, Json<CreatedMemberResponse>), ApiError> {
    let (name, phone) = validate_member_fields(&payload.name, &payload.phone)?;
    let new = MemberFields {
        name,
        phone,
        start_date: payload.start_date,
        end_date: first_end_date(payload.start_date)?,
    };

    let member = state.store.insert_member(&new).await.map_err(|e| {
        warn!(error = %e, "create member rejected");
        ApiError::from(e)
    })?;

    info!(member_id = member.id, end_date = %member.end_date, "member added");
    Ok((
        StatusCode::CREATED,
        Json(CreatedMemberResponse {
            message: "Member added successfully",
            id: member.id,
            name: member.name,
            end_date: member.end_date,
        }),
    ))
}

#[instrument(skip(state))]
pub async fn archive_member(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    if !state.store.set_member_active(id, false).await? {
        return Err(ApiError::NotFound("Member not found"));
    }
    info!(member_id = id, "member archived");
    Ok(Json(MessageResponse {
        message: "Member archived successfully",
    }))
}

#[instrument(skip(state))]
pub async fn restore_member(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    if !state.store.set_member_active(id, true).await? {
        return Err(ApiError::NotFound("Archived member not found"));
    }
    info!(member_id = id, "member restored");
    Ok(Json(MessageResponse {
        message: "Member restored successfully",
    }))
}

/// Only archived members can be removed for good.
#[instrument(skip(state))]
pub async fn purge_member(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    if !state.store.delete_archived_member(id).await? {
        return Err(ApiError::NotFound("Archived member not found"));
    }
    info!(member_id = id, "member permanently deleted");
    Ok(Json(MessageResponse {
        message: "Member permanently deleted",
    }))
}

#[instrument(skip(state, payload))]
pub async fn edit_member(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateMemberRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let (name, phone) = validate_member_fields(&payload.name, &payload.phone)?;
    validate_end_after_start(payload.start_date, payload.end_date)?;
    let update = MemberFields {
        name,
        phone,
        start_date: payload.start_date,
        end_date: payload.end_date,
    };

    if !state.store.update_member(id, &update).await? {
        return Err(ApiError::NotFound("Member not found"));
    }
    info!(member_id = id, "member updated");
    Ok(Json(MessageResponse {
        message: "Member updated successfully",
    }))
}

#[instrument(skip(state, payload))]
pub async fn renew_member(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<RenewMemberRequest>,
) -> Result<Json<RenewalResponse>, ApiError> {
    let amount = validate_amount(payload.amount)?;

    let member = match state.store.find_member(id).await? {
        Some(m) if m.is_active => m,
        _ => return Err(ApiError::NotFound("Member not found")),
    };

    let renewal = compute_renewal(member.end_date, payload.payment_date)?;
    let payment = amount.map(|amount| NewPayment {
        paid_on: payload.payment_date,
        amount,
    });

    // the member may have been archived since it was read
    if !state
        .store
        .renew_member(id, renewal.new_end_date, payment)
        .await?
    {
        return Err(ApiError::NotFound("Member not found"));
    }

    info!(
        member_id = id,
        old_end_date = %member.end_date,
        new_end_date = %renewal.new_end_date,
        gap_days = renewal.gap_days,
        "membership renewed"
    );
    Ok(Json(RenewalResponse {
        message: "Membership renewed successfully",
        new_end_date: renewal.new_end_date,
        gap_days: renewal.gap_days,
    }))
}

/// Works for archived members too.
#[instrument(skip(state))]
pub async fn attendance_history(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<AttendanceHistoryResponse>, ApiError> {
    let member = state
        .store
        .find_member(id)
        .await?
        .ok_or(ApiError::NotFound("Member not found"))?;
    let rows = state.store.attendance_for_member(id).await?;

    Ok(Json(AttendanceHistoryResponse {
        joining_date: joining_date(state.clock.as_ref(), &member),
        present_dates: present_dates(state.clock.as_ref(), &rows),
    }))
}
