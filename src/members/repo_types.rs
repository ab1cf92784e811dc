use rust_decimal::Decimal;
use sqlx::FromRow;
use time::{Date, OffsetDateTime};

/// Member record in the database.
#[derive(Debug, Clone, FromRow)]
pub struct Member {
    pub id: i64,
    pub name: String,
    pub phone: String,
    pub start_date: Date,
    pub end_date: Date,       // membership expiry
    pub is_active: bool,      // false once archived
    pub created_at: OffsetDateTime,
}

/// Owner-editable columns, used for both inserts and edits.
#[derive(Debug, Clone)]
pub struct MemberFields {
    pub name: String,
    pub phone: String,
    pub start_date: Date,
    pub end_date: Date,
}

/// Row for `payments`, written alongside a renewal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewPayment {
    pub paid_on: Date,
    pub amount: Decimal,
}
