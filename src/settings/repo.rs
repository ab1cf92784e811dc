use anyhow::Context;
use sqlx::PgPool;

use crate::settings::repo_types::GymSettings;

pub async fn load(db: &PgPool) -> anyhow::Result<Option<GymSettings>> {
    let row = sqlx::query_as::<_, GymSettings>(
        "SELECT qr_active, grace_days FROM gym_config WHERE id",
    )
    .fetch_optional(db)
    .await
    .context("load gym config")?;
    Ok(row)
}

/// Writes the singleton row; the key is always TRUE so this can never
/// produce a second row.
pub async fn save(db: &PgPool, settings: &GymSettings) -> anyhow::Result<GymSettings> {
    let row = sqlx::query_as::<_, GymSettings>(
        r#"
        INSERT INTO gym_config (id, qr_active, grace_days)
        VALUES (TRUE, $1, $2)
        ON CONFLICT (id) DO UPDATE
           SET qr_active = EXCLUDED.qr_active,
               grace_days = EXCLUDED.grace_days
        RETURNING qr_active, grace_days
        "#,
    )
    .bind(settings.qr_active)
    .bind(settings.grace_days)
    .fetch_one(db)
    .await
    .context("save gym config")?;
    Ok(row)
}
