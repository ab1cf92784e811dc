use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub const DEFAULT_GRACE_DAYS: i32 = 4;

/// The `gym_config` singleton row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct GymSettings {
    pub qr_active: bool,
    pub grace_days: i32,
}

impl Default for GymSettings {
    fn default() -> Self {
        Self {
            qr_active: true,
            grace_days: DEFAULT_GRACE_DAYS,
        }
    }
}
