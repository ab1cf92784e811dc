use anyhow::Context;
use sqlx::PgPool;
use time::Date;

use crate::attendance::repo_types::{Attendance, Visit};

/// Plain insert; a second check-in for the same day fails on
/// `attendance_member_date_key`.
pub async fn insert(db: &PgPool, member_id: i64, date: Date) -> anyhow::Result<Attendance> {
    let row = sqlx::query_as::<_, Attendance>(
        r#"
        INSERT INTO attendance (member_id, date)
        VALUES ($1, $2)
        RETURNING id, member_id, date, created_at
        "#,
    )
    .bind(member_id)
    .bind(date)
    .fetch_one(db)
    .await
    .context("insert attendance")?;
    Ok(row)
}

pub async fn list_by_member(db: &PgPool, member_id: i64) -> anyhow::Result<Vec<Attendance>> {
    let rows = sqlx::query_as::<_, Attendance>(
        r#"
        SELECT id, member_id, date, created_at
          FROM attendance
         WHERE member_id = $1
         ORDER BY created_at ASC
        "#,
    )
    .bind(member_id)
    .fetch_all(db)
    .await
    .context("list attendance by member")?;
    Ok(rows)
}

pub async fn visits_on(db: &PgPool, date: Date) -> anyhow::Result<Vec<Visit>> {
    let rows = sqlx::query_as::<_, Visit>(
        r#"
        SELECT a.member_id, m.name, m.end_date
          FROM attendance a
          JOIN members m ON m.id = a.member_id
         WHERE a.date = $1
         ORDER BY a.created_at ASC
        "#,
    )
    .bind(date)
    .fetch_all(db)
    .await
    .context("list visits by date")?;
    Ok(rows)
}
