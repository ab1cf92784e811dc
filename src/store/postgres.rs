use anyhow::Context;
use axum::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};
use time::Date;
use uuid::Uuid;

use super::{AttendanceInsert, GymStore, StoreError, StoreResult};
use crate::{
    attendance::{
        self,
        repo_types::{Attendance, Visit},
    },
    auth::{self, repo_types::Owner},
    members::{
        self,
        repo_types::{Member, MemberFields, NewPayment},
    },
    settings::{self, repo_types::GymSettings},
};

const MEMBER_PHONE_KEY: &str = "members_phone_key";
const ATTENDANCE_MEMBER_DATE_KEY: &str = "attendance_member_date_key";

#[derive(Clone)]
pub struct PgStore {
    db: PgPool,
}

impl PgStore {
    pub async fn connect(database_url: &str) -> anyhow::Result<Self> {
        let db = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await
            .context("connect to database")?;
        Ok(Self { db })
    }

    pub fn pool(&self) -> &PgPool {
        &self.db
    }
}

/// Name of the unique constraint `err` violated, if that is what it is.
fn violated_unique_key(err: &anyhow::Error) -> Option<String> {
    let db_err = err.downcast_ref::<sqlx::Error>()?.as_database_error()?;
    if !db_err.is_unique_violation() {
        return None;
    }
    db_err.constraint().map(str::to_owned)
}

fn classify_member_write(err: anyhow::Error) -> StoreError {
    match violated_unique_key(&err).as_deref() {
        Some(MEMBER_PHONE_KEY) => StoreError::DuplicatePhone,
        _ => StoreError::Other(err),
    }
}

#[async_trait]
impl GymStore for PgStore {
    async fn list_members(&self, active: bool) -> StoreResult<Vec<Member>> {
        Ok(members::repo::list_by_state(&self.db, active).await?)
    }

    async fn find_member(&self, id: i64) -> StoreResult<Option<Member>> {
        Ok(members::repo::find_by_id(&self.db, id).await?)
    }

    async fn find_active_by_phone_suffix(&self, suffix: &str) -> StoreResult<Vec<Member>> {
        Ok(members::repo::find_active_by_phone_suffix(&self.db, suffix).await?)
    }

    async fn insert_member(&self, new: &MemberFields) -> StoreResult<Member> {
        members::repo::insert(&self.db, new)
            .await
            .map_err(classify_member_write)
    }

    async fn update_member(&self, id: i64, update: &MemberFields) -> StoreResult<bool> {
        members::repo::update_active(&self.db, id, update)
            .await
            .map_err(classify_member_write)
    }

    async fn set_member_active(&self, id: i64, active: bool) -> StoreResult<bool> {
        Ok(members::repo::set_active(&self.db, id, active).await?)
    }

    async fn delete_archived_member(&self, id: i64) -> StoreResult<bool> {
        Ok(members::repo::delete_archived(&self.db, id).await?)
    }

    async fn renew_member(
        &self,
        id: i64,
        new_end_date: Date,
        payment: Option<NewPayment>,
    ) -> StoreResult<bool> {
        Ok(members::repo::renew(&self.db, id, new_end_date, payment).await?)
    }

    async fn insert_attendance(&self, member_id: i64, date: Date) -> StoreResult<AttendanceInsert> {
        match attendance::repo::insert(&self.db, member_id, date).await {
            Ok(row) => Ok(AttendanceInsert::Created(row)),
            Err(e) if violated_unique_key(&e).as_deref() == Some(ATTENDANCE_MEMBER_DATE_KEY) => {
                Ok(AttendanceInsert::AlreadyMarked)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn attendance_for_member(&self, member_id: i64) -> StoreResult<Vec<Attendance>> {
        Ok(attendance::repo::list_by_member(&self.db, member_id).await?)
    }

    async fn visits_on(&self, date: Date) -> StoreResult<Vec<Visit>> {
        Ok(attendance::repo::visits_on(&self.db, date).await?)
    }

    async fn load_settings(&self) -> StoreResult<Option<GymSettings>> {
        Ok(settings::repo::load(&self.db).await?)
    }

    async fn save_settings(&self, gym: &GymSettings) -> StoreResult<GymSettings> {
        Ok(settings::repo::save(&self.db, gym).await?)
    }

    async fn find_owner_by_email(&self, email: &str) -> StoreResult<Option<Owner>> {
        Ok(auth::repo::find_by_email(&self.db, email).await?)
    }

    async fn find_owner_by_id(&self, id: Uuid) -> StoreResult<Option<Owner>> {
        Ok(auth::repo::find_by_id(&self.db, id).await?)
    }

    async fn create_owner(&self, email: &str, password_hash: &str) -> StoreResult<Owner> {
        Ok(auth::repo::create(&self.db, email, password_hash).await?)
    }
}
