use serde::{Deserialize, Serialize};
use time::Date;

#[derive(Debug, Deserialize)]
pub struct MarkAttendanceRequest {
    pub last_4_digits: String,
}

/// Body of a first check-in for the day.
#[derive(Debug, Serialize)]
pub struct MarkedResponse {
    pub message: &'static str,
    pub name: String,
    pub status: &'static str,
    pub color: &'static str,
    pub expiry_date: Date,
}
