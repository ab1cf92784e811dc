use anyhow::Context;
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::repo_types::Owner;

/// Find an owner by email.
pub async fn find_by_email(db: &PgPool, email: &str) -> anyhow::Result<Option<Owner>> {
    let owner = sqlx::query_as::<_, Owner>(
        r#"
        SELECT id, email, password_hash, created_at
        FROM owners
        WHERE email = $1
        "#,
    )
    .bind(email)
    .fetch_optional(db)
    .await
    .context("find owner by email")?;
    Ok(owner)
}

pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<Owner>> {
    let owner = sqlx::query_as::<_, Owner>(
        r#"SELECT id, email, password_hash, created_at FROM owners WHERE id = $1"#,
    )
    .bind(id)
    .fetch_optional(db)
    .await
    .context("find owner by id")?;
    Ok(owner)
}

/// Create a new owner with an already hashed password.
pub async fn create(db: &PgPool, email: &str, password_hash: &str) -> anyhow::Result<Owner> {
    let owner = sqlx::query_as::<_, Owner>(
        r#"
        INSERT INTO owners (id, email, password_hash)
        VALUES ($1, $2, $3)
        RETURNING id, email, password_hash, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(email)
    .bind(password_hash)
    .fetch_one(db)
    .await
    .context("insert owner")?;
    Ok(owner)
}
