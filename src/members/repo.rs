use anyhow::Context;
use sqlx::{PgPool, Postgres, Transaction};
use time::Date;

use crate::members::repo_types::{Member, MemberFields, NewPayment};

const MEMBER_COLUMNS: &str = "id, name, phone, start_date, end_date, is_active, created_at";

/// Active or archived members, newest first.
pub async fn list_by_state(db: &PgPool, active: bool) -> anyhow::Result<Vec<Member>> {
    let rows = sqlx::query_as::<_, Member>(&format!(
        "SELECT {MEMBER_COLUMNS} FROM members WHERE is_active = $1 ORDER BY id DESC"
    ))
    .bind(active)
    .fetch_all(db)
    .await
    .context("list members")?;
    Ok(rows)
}

pub async fn find_by_id(db: &PgPool, id: i64) -> anyhow::Result<Option<Member>> {
    let row = sqlx::query_as::<_, Member>(&format!(
        "SELECT {MEMBER_COLUMNS} FROM members WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(db)
    .await
    .context("find member")?;
    Ok(row)
}

/// `suffix` is digits only, so it is safe inside a LIKE pattern.
pub async fn find_active_by_phone_suffix(db: &PgPool, suffix: &str) -> anyhow::Result<Vec<Member>> {
    let rows = sqlx::query_as::<_, Member>(&format!(
        r#"
        SELECT {MEMBER_COLUMNS}
          FROM members
         WHERE is_active AND phone LIKE '%' || $1
         ORDER BY id
         LIMIT 2
        "#
    ))
    .bind(suffix)
    .fetch_all(db)
    .await
    .context("find member by phone suffix")?;
    Ok(rows)
}

pub async fn insert(db: &PgPool, new: &MemberFields) -> anyhow::Result<Member> {
    let row = sqlx::query_as::<_, Member>(&format!(
        r#"
        INSERT INTO members (name, phone, start_date, end_date)
        VALUES ($1, $2, $3, $4)
        RETURNING {MEMBER_COLUMNS}
        "#
    ))
    .bind(&new.name)
    .bind(&new.phone)
    .bind(new.start_date)
    .bind(new.end_date)
    .fetch_one(db)
    .await
    .context("insert member")?;
    Ok(row)
}

pub async fn update_active(db: &PgPool, id: i64, update: &MemberFields) -> anyhow::Result<bool> {
    let res = sqlx::query(
        r#"
        UPDATE members
           SET name = $2, phone = $3, start_date = $4, end_date = $5
         WHERE id = $1 AND is_active
        "#,
    )
    .bind(id)
    .bind(&update.name)
    .bind(&update.phone)
    .bind(update.start_date)
    .bind(update.end_date)
    .execute(db)
    .await
    .context("update member")?;
    Ok(res.rows_affected() == 1)
}

pub async fn set_active(db: &PgPool, id: i64, active: bool) -> anyhow::Result<bool> {
    let res = sqlx::query("UPDATE members SET is_active = $2 WHERE id = $1 AND is_active = NOT $2")
        .bind(id)
        .bind(active)
        .execute(db)
        .await
        .context("toggle member is_active")?;
    Ok(res.rows_affected() == 1)
}

/// Attendance and payments go with the member (ON DELETE CASCADE).
pub async fn delete_archived(db: &PgPool, id: i64) -> anyhow::Result<bool> {
    let res = sqlx::query("DELETE FROM members WHERE id = $1 AND NOT is_active")
        .bind(id)
        .execute(db)
        .await
        .context("delete archived member")?;
    Ok(res.rows_affected() == 1)
}

pub async fn renew(
    db: &PgPool,
    id: i64,
    new_end_date: Date,
    payment: Option<NewPayment>,
) -> anyhow::Result<bool> {
    let mut tx = db.begin().await.context("begin renewal")?;

    let res = sqlx::query("UPDATE members SET end_date = $2 WHERE id = $1 AND is_active")
        .bind(id)
        .bind(new_end_date)
        .execute(&mut *tx)
        .await
        .context("update member end_date")?;
    if res.rows_affected() != 1 {
        tx.rollback().await.context("rollback renewal")?;
        return Ok(false);
    }

    if let Some(payment) = payment {
        insert_payment_tx(&mut tx, id, payment).await?;
    }

    tx.commit().await.context("commit renewal")?;
    Ok(true)
}

async fn insert_payment_tx(
    tx: &mut Transaction<'_, Postgres>,
    member_id: i64,
    payment: NewPayment,
) -> anyhow::Result<()> {
    sqlx::query("INSERT INTO payments (member_id, paid_on, amount) VALUES ($1, $2, $3)")
        .bind(member_id)
        .bind(payment.paid_on)
        .bind(payment.amount)
        .execute(&mut **tx)
        .await
        .context("insert payment")?;
    Ok(())
}
