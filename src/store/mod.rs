use axum::async_trait;
use time::Date;
use uuid::Uuid;

use crate::{
    attendance::repo_types::{Attendance, Visit},
    auth::repo_types::Owner,
    members::repo_types::{Member, MemberFields, NewPayment},
    settings::repo_types::GymSettings,
};

#[cfg(test)]
pub mod memory;
pub mod postgres;

pub use postgres::PgStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("phone number already registered")]
    DuplicatePhone,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Outcome of a check-in insert.
#[derive(Debug, Clone)]
pub enum AttendanceInsert {
    Created(Attendance),
    AlreadyMarked,
}

/// Persistence boundary for every record the service owns.
///
/// Mutations that only apply to members in a given lifecycle state
/// (active vs archived) filter on that state in the same statement and
/// report whether a row matched.
#[async_trait]
pub trait GymStore: Send + Sync {
    async fn list_members(&self, active: bool) -> StoreResult<Vec<Member>>;
    async fn find_member(&self, id: i64) -> StoreResult<Option<Member>>;
    /// Active members whose phone ends with `suffix`; at most two rows.
    async fn find_active_by_phone_suffix(&self, suffix: &str) -> StoreResult<Vec<Member>>;
    async fn insert_member(&self, new: &MemberFields) -> StoreResult<Member>;
    /// Full update of an active member.
    async fn update_member(&self, id: i64, update: &MemberFields) -> StoreResult<bool>;
    /// Flips `is_active` to `active`, only if it currently holds the opposite value.
    async fn set_member_active(&self, id: i64, active: bool) -> StoreResult<bool>;
    async fn delete_archived_member(&self, id: i64) -> StoreResult<bool>;
    /// Moves an active member's expiry and records the payment, atomically.
    async fn renew_member(
        &self,
        id: i64,
        new_end_date: Date,
        payment: Option<NewPayment>,
    ) -> StoreResult<bool>;

    async fn insert_attendance(&self, member_id: i64, date: Date) -> StoreResult<AttendanceInsert>;
    async fn attendance_for_member(&self, member_id: i64) -> StoreResult<Vec<Attendance>>;
    async fn visits_on(&self, date: Date) -> StoreResult<Vec<Visit>>;

    async fn load_settings(&self) -> StoreResult<Option<GymSettings>>;
    async fn save_settings(&self, settings: &GymSettings) -> StoreResult<GymSettings>;

    async fn find_owner_by_email(&self, email: &str) -> StoreResult<Option<Owner>>;
    async fn find_owner_by_id(&self, id: Uuid) -> StoreResult<Option<Owner>>;
    async fn create_owner(&self, email: &str, password_hash: &str) -> StoreResult<Owner>;
}
