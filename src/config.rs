use anyhow::Context;
use serde::Deserialize;
use time::{format_description::FormatItem, macros::format_description, UtcOffset};

const OFFSET_FORMAT: &[FormatItem<'static>] =
    format_description!("[offset_hour sign:mandatory]:[offset_minute]");

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
    pub refresh_ttl_minutes: i64,
}

/// Owner account created at startup when it does not exist yet.
#[derive(Debug, Clone)]
pub struct OwnerSeed {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    /// Offset of the gym's wall clock; "today" and the check-in window use it.
    pub gym_offset: UtcOffset,
    pub owner_seed: Option<OwnerSeed>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL is not set")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET").context("JWT_SECRET is not set")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "gymdesk".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "gymdesk-owner".into()),
            ttl_minutes: std::env::var("JWT_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60),
            refresh_ttl_minutes: std::env::var("JWT_REFRESH_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60 * 24 * 14),
        };
        let gym_offset = parse_offset(
            &std::env::var("GYM_UTC_OFFSET").unwrap_or_else(|_| "+05:30".into()),
        )?;
        let owner_seed = match (std::env::var("OWNER_EMAIL"), std::env::var("OWNER_PASSWORD")) {
            (Ok(email), Ok(password)) => Some(OwnerSeed { email, password }),
            _ => None,
        };
        Ok(Self {
            database_url,
            jwt,
            gym_offset,
            owner_seed,
        })
    }
}

pub fn parse_offset(raw: &str) -> anyhow::Result<UtcOffset> {
    UtcOffset::parse(raw.trim(), OFFSET_FORMAT)
        .with_context(|| format!("invalid GYM_UTC_OFFSET {raw:?}, expected e.g. +05:30"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::offset;

    #[test]
    fn parses_signed_offsets() {
        assert_eq!(parse_offset("+05:30").unwrap(), offset!(+5:30));
        assert_eq!(parse_offset("-03:00").unwrap(), offset!(-3));
        assert_eq!(parse_offset(" +00:00 ").unwrap(), UtcOffset::UTC);
    }

    #[test]
    fn rejects_garbage_offset() {
        assert!(parse_offset("IST").is_err());
        assert!(parse_offset("5:30").is_err());
    }
}
