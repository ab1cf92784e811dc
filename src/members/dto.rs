use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::Date;

use crate::members::repo_types::Member;

/// Request body for adding a member; the expiry is always derived.
#[derive(Debug, Deserialize)]
pub struct CreateMemberRequest {
    pub name: String,
    pub phone: String,
    pub start_date: Date,
}

/// Full replacement of the editable member fields.
#[derive(Debug, Deserialize)]
pub struct UpdateMemberRequest {
    pub name: String,
    pub phone: String,
    pub start_date: Date,
    pub end_date: Date,
}

#[derive(Debug, Deserialize)]
pub struct RenewMemberRequest {
    pub payment_date: Date,
    #[serde(default)]
    pub amount: Option<Decimal>,
}

#[derive(Debug, Serialize)]
pub struct MemberListItem {
    pub id: i64,
    pub name: String,
    pub phone: String,
    pub start_date: Date,
    pub end_date: Date,
}

impl From<Member> for MemberListItem {
    fn from(m: Member) -> Self {
        Self {
            id: m.id,
            name: m.name,
            phone: m.phone,
            start_date: m.start_date,
            end_date: m.end_date,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MemberListResponse {
    pub count: usize,
    pub members: Vec<MemberListItem>,
}

#[derive(Debug, Serialize)]
pub struct CreatedMemberResponse {
    pub message: &'static str,
    pub id: i64,
    pub name: String,
    pub end_date: Date,
}

#[derive(Debug, Serialize)]
pub struct RenewalResponse {
    pub message: &'static str,
    pub new_end_date: Date,
    pub gap_days: i64,
}

#[derive(Debug, Serialize)]
pub struct AttendanceHistoryResponse {
    pub joining_date: Date,
    pub present_dates: Vec<Date>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}
