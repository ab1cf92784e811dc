use std::time::Duration;

use axum::extract::FromRef;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use lazy_static::lazy_static;
use regex::Regex;
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    auth::{
        claims::{Claims, TokenKind},
        dto::AuthResponse,
        password::{hash_password, verify_password},
        repo_types::Owner,
    },
    config::{JwtConfig, OwnerSeed},
    error::ApiError,
    state::AppState,
    store::GymStore,
};

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Signing and verification keys with their validation settings.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    issuer: String,
    audience: String,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl From<&JwtConfig> for JwtKeys {
    fn from(cfg: &JwtConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(cfg.secret.as_bytes()),
            decoding: DecodingKey::from_secret(cfg.secret.as_bytes()),
            issuer: cfg.issuer.clone(),
            audience: cfg.audience.clone(),
            access_ttl: Duration::from_secs(cfg.ttl_minutes.max(1) as u64 * 60),
            refresh_ttl: Duration::from_secs(cfg.refresh_ttl_minutes.max(1) as u64 * 60),
        }
    }
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        JwtKeys::from(&state.config.jwt)
    }
}

impl JwtKeys {
    fn sign_with_kind(&self, owner_id: Uuid, kind: TokenKind) -> anyhow::Result<String> {
        let now = OffsetDateTime::now_utc();
        let ttl = match kind {
            TokenKind::Access => self.access_ttl,
            TokenKind::Refresh => self.refresh_ttl,
        };
        let exp = now + TimeDuration::seconds(ttl.as_secs() as i64);
        let claims = Claims {
            sub: owner_id,
            iat: now.unix_timestamp() as usize,
            exp: exp.unix_timestamp() as usize,
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            kind,
        };
        let token = encode(&Header::default(), &claims, &self.encoding)?;
        debug!(owner_id = %owner_id, kind = ?kind, "jwt signed");
        Ok(token)
    }

    pub fn sign_access(&self, owner_id: Uuid) -> anyhow::Result<String> {
        self.sign_with_kind(owner_id, TokenKind::Access)
    }

    pub fn sign_refresh(&self, owner_id: Uuid) -> anyhow::Result<String> {
        self.sign_with_kind(owner_id, TokenKind::Refresh)
    }

    pub fn verify(&self, token: &str) -> anyhow::Result<Claims> {
        let mut validation = Validation::default();
        validation.set_audience(std::slice::from_ref(&self.audience));
        validation.set_issuer(std::slice::from_ref(&self.issuer));
        let data = decode::<Claims>(token, &self.decoding, &validation)?;
        Ok(data.claims)
    }

    pub fn verify_access(&self, token: &str) -> anyhow::Result<Claims> {
        let claims = self.verify(token)?;
        if claims.kind != TokenKind::Access {
            anyhow::bail!("not an access token");
        }
        Ok(claims)
    }

    pub fn verify_refresh(&self, token: &str) -> anyhow::Result<Claims> {
        let claims = self.verify(token)?;
        if claims.kind != TokenKind::Refresh {
            anyhow::bail!("not a refresh token");
        }
        Ok(claims)
    }

    /// Fresh access/refresh pair for `owner`.
    pub fn issue(&self, owner: Owner) -> anyhow::Result<AuthResponse> {
        Ok(AuthResponse {
            access_token: self.sign_access(owner.id)?,
            refresh_token: self.sign_refresh(owner.id)?,
            owner: owner.into(),
        })
    }
}

/// Resolves login credentials to an owner. Unknown email and wrong password
/// are indistinguishable to the caller.
pub async fn authenticate(
    store: &dyn GymStore,
    email: &str,
    password: &str,
) -> Result<Owner, ApiError> {
    let email = normalize_email(email);
    if !is_valid_email(&email) {
        return Err(ApiError::field("email", "Enter a valid email address."));
    }

    let Some(owner) = store.find_owner_by_email(&email).await? else {
        warn!(email = %email, "login unknown email");
        return Err(ApiError::Unauthorized("Invalid credentials".into()));
    };
    if !verify_password(password, &owner.password_hash)? {
        warn!(owner_id = %owner.id, "login invalid password");
        return Err(ApiError::Unauthorized("Invalid credentials".into()));
    }
    Ok(owner)
}

/// Creates the configured owner account unless it already exists.
pub async fn ensure_owner(store: &dyn GymStore, seed: &OwnerSeed) -> anyhow::Result<()> {
    let email = normalize_email(&seed.email);
    if !is_valid_email(&email) {
        anyhow::bail!("OWNER_EMAIL {email:?} is not a valid email");
    }
    if seed.password.len() < 8 {
        anyhow::bail!("OWNER_PASSWORD must be at least 8 characters");
    }
    if store.find_owner_by_email(&email).await?.is_some() {
        debug!(email = %email, "owner already present");
        return Ok(());
    }
    let hash = hash_password(&seed.password)?;
    let owner = store.create_owner(&email, &hash).await?;
    info!(owner_id = %owner.id, email = %owner.email, "owner account created");
    Ok(())
}
