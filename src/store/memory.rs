use std::sync::Mutex;

use axum::async_trait;
use rust_decimal::Decimal;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use super::{AttendanceInsert, GymStore, StoreError, StoreResult};
use crate::{
    attendance::repo_types::{Attendance, Visit},
    auth::repo_types::Owner,
    members::repo_types::{Member, MemberFields, NewPayment},
    settings::repo_types::GymSettings,
};

#[derive(Debug, Clone)]
pub struct Payment {
    pub id: i64,
    pub member_id: i64,
    pub paid_on: Date,
    pub amount: Decimal,
}

/// Store backed by vectors, mirroring the constraints of the SQL schema.
pub struct InMemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
pub struct Inner {
    pub members: Vec<Member>,
    pub attendance: Vec<Attendance>,
    pub payments: Vec<Payment>,
    pub settings: Option<GymSettings>,
    pub owners: Vec<Owner>,
    next_id: i64,
    /// Stamp used for `created_at` columns.
    pub now: Option<OffsetDateTime>,
}

impl Inner {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn stamp(&self) -> OffsetDateTime {
        self.now.unwrap_or_else(OffsetDateTime::now_utc)
    }

    fn phone_taken(&self, phone: &str, except: Option<i64>) -> bool {
        self.members
            .iter()
            .any(|m| m.phone == phone && Some(m.id) != except)
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                settings: Some(GymSettings::default()),
                ..Inner::default()
            }),
        }
    }

    /// Direct access for arranging and inspecting test state.
    pub fn with<R>(&self, f: impl FnOnce(&mut Inner) -> R) -> R {
        let mut guard = self.inner.lock().unwrap();
        f(&mut guard)
    }

    /// Inserts a member with an explicit expiry and creation stamp.
    pub fn seed_member(
        &self,
        name: &str,
        phone: &str,
        start_date: Date,
        end_date: Date,
        is_active: bool,
    ) -> i64 {
        self.with(|inner| {
            let id = inner.next_id();
            let created_at = inner.stamp();
            inner.members.push(Member {
                id,
                name: name.into(),
                phone: phone.into(),
                start_date,
                end_date,
                is_active,
                created_at,
            });
            id
        })
    }
}

#[async_trait]
impl GymStore for InMemoryStore {
    async fn list_members(&self, active: bool) -> StoreResult<Vec<Member>> {
        self.with(|inner| {
            let mut rows: Vec<Member> = inner
                .members
                .iter()
                .filter(|m| m.is_active == active)
                .cloned()
                .collect();
            rows.sort_by(|a, b| b.id.cmp(&a.id));
            Ok(rows)
        })
    }

    async fn find_member(&self, id: i64) -> StoreResult<Option<Member>> {
        self.with(|inner| Ok(inner.members.iter().find(|m| m.id == id).cloned()))
    }

    async fn find_active_by_phone_suffix(&self, suffix: &str) -> StoreResult<Vec<Member>> {
        self.with(|inner| {
            Ok(inner
                .members
                .iter()
                .filter(|m| m.is_active && m.phone.ends_with(suffix))
                .take(2)
                .cloned()
                .collect())
        })
    }

    async fn insert_member(&self, new: &MemberFields) -> StoreResult<Member> {
        self.with(|inner| {
            if inner.phone_taken(&new.phone, None) {
                return Err(StoreError::DuplicatePhone);
            }
            let member = Member {
                id: inner.next_id(),
                name: new.name.clone(),
                phone: new.phone.clone(),
                start_date: new.start_date,
                end_date: new.end_date,
                is_active: true,
                created_at: inner.stamp(),
            };
            inner.members.push(member.clone());
            Ok(member)
        })
    }

    async fn update_member(&self, id: i64, update: &MemberFields) -> StoreResult<bool> {
        self.with(|inner| {
            if !inner.members.iter().any(|m| m.id == id && m.is_active) {
                return Ok(false);
            }
            if inner.phone_taken(&update.phone, Some(id)) {
                return Err(StoreError::DuplicatePhone);
            }
            let member = inner
                .members
                .iter_mut()
                .find(|m| m.id == id)
                .expect("checked above");
            member.name = update.name.clone();
            member.phone = update.phone.clone();
            member.start_date = update.start_date;
            member.end_date = update.end_date;
            Ok(true)
        })
    }

    async fn set_member_active(&self, id: i64, active: bool) -> StoreResult<bool> {
        self.with(|inner| {
            match inner
                .members
                .iter_mut()
                .find(|m| m.id == id && m.is_active != active)
            {
                Some(member) => {
                    member.is_active = active;
                    Ok(true)
                }
                None => Ok(false),
            }
        })
    }

    async fn delete_archived_member(&self, id: i64) -> StoreResult<bool> {
        self.with(|inner| {
            let before = inner.members.len();
            inner.members.retain(|m| !(m.id == id && !m.is_active));
            if inner.members.len() == before {
                return Ok(false);
            }
            inner.attendance.retain(|a| a.member_id != id);
            inner.payments.retain(|p| p.member_id != id);
            Ok(true)
        })
    }

    async fn renew_member(
        &self,
        id: i64,
        new_end_date: Date,
        payment: Option<NewPayment>,
    ) -> StoreResult<bool> {
        self.with(|inner| {
            let Some(member) = inner.members.iter_mut().find(|m| m.id == id && m.is_active)
            else {
                return Ok(false);
            };
            member.end_date = new_end_date;
            if let Some(payment) = payment {
                let payment_id = inner.next_id();
                inner.payments.push(Payment {
                    id: payment_id,
                    member_id: id,
                    paid_on: payment.paid_on,
                    amount: payment.amount,
                });
            }
            Ok(true)
        })
    }

    async fn insert_attendance(&self, member_id: i64, date: Date) -> StoreResult<AttendanceInsert> {
        self.with(|inner| {
            if inner
                .attendance
                .iter()
                .any(|a| a.member_id == member_id && a.date == date)
            {
                return Ok(AttendanceInsert::AlreadyMarked);
            }
            let row = Attendance {
                id: inner.next_id(),
                member_id,
                date,
                created_at: inner.stamp(),
            };
            inner.attendance.push(row.clone());
            Ok(AttendanceInsert::Created(row))
        })
    }

    async fn attendance_for_member(&self, member_id: i64) -> StoreResult<Vec<Attendance>> {
        self.with(|inner| {
            let mut rows: Vec<Attendance> = inner
                .attendance
                .iter()
                .filter(|a| a.member_id == member_id)
                .cloned()
                .collect();
            rows.sort_by_key(|a| a.created_at);
            Ok(rows)
        })
    }

    async fn visits_on(&self, date: Date) -> StoreResult<Vec<Visit>> {
        self.with(|inner| {
            let rows: Vec<Visit> = inner
                .attendance
                .iter()
                .filter(|a| a.date == date)
                .filter_map(|a| {
                    let m = inner.members.iter().find(|m| m.id == a.member_id)?;
                    Some(Visit {
                        member_id: m.id,
                        name: m.name.clone(),
                        end_date: m.end_date,
                    })
                })
                .collect();
            Ok(rows)
        })
    }

    async fn load_settings(&self) -> StoreResult<Option<GymSettings>> {
        self.with(|inner| Ok(inner.settings))
    }

    async fn save_settings(&self, gym: &GymSettings) -> StoreResult<GymSettings> {
        self.with(|inner| {
            inner.settings = Some(*gym);
            Ok(*gym)
        })
    }

    async fn find_owner_by_email(&self, email: &str) -> StoreResult<Option<Owner>> {
        self.with(|inner| Ok(inner.owners.iter().find(|o| o.email == email).cloned()))
    }

    async fn find_owner_by_id(&self, id: Uuid) -> StoreResult<Option<Owner>> {
        self.with(|inner| Ok(inner.owners.iter().find(|o| o.id == id).cloned()))
    }

    async fn create_owner(&self, email: &str, password_hash: &str) -> StoreResult<Owner> {
        self.with(|inner| {
            let owner = Owner {
                id: Uuid::new_v4(),
                email: email.into(),
                password_hash: password_hash.into(),
                created_at: inner.stamp(),
            };
            inner.owners.push(owner.clone());
            Ok(owner)
        })
    }
}
