use sqlx::FromRow;
use time::{Date, OffsetDateTime};

/// One check-in; unique per (member_id, date).
#[derive(Debug, Clone, FromRow)]
pub struct Attendance {
    pub id: i64,
    pub member_id: i64,
    pub date: Date,
    pub created_at: OffsetDateTime,
}

/// Attendance joined with the member it belongs to.
#[derive(Debug, Clone, FromRow)]
pub struct Visit {
    pub member_id: i64,
    pub name: String,
    pub end_date: Date,
}
