use serde::Deserialize;

/// Both fields are required; the singleton is replaced as a whole.
#[derive(Debug, Deserialize)]
pub struct UpdateSettingsRequest {
    pub qr_active: bool,
    pub grace_days: i32,
}
