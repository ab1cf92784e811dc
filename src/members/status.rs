use time::{Date, Duration};

/// Lifecycle state of a membership on a given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberStatus {
    Active,
    Grace,
    Expired,
}

impl MemberStatus {
    pub fn label(self) -> &'static str {
        match self {
            MemberStatus::Active => "active",
            MemberStatus::Grace => "grace",
            MemberStatus::Expired => "expired",
        }
    }

    /// Display color shown on the kiosk.
    pub fn color(self) -> &'static str {
        match self {
            MemberStatus::Active => "green",
            MemberStatus::Grace => "orange",
            MemberStatus::Expired => "red",
        }
    }
}

/// Active through `end_date`, grace for `grace_days` after it, expired afterwards.
pub fn member_status(today: Date, end_date: Date, grace_days: i32) -> MemberStatus {
    if today <= end_date {
        MemberStatus::Active
    } else if end_date
        .checked_add(Duration::days(i64::from(grace_days)))
        .map_or(true, |last_grace_day| today <= last_grace_day)
    {
        MemberStatus::Grace
    } else {
        MemberStatus::Expired
    }
}
