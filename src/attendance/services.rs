use lazy_static::lazy_static;
use regex::Regex;
use time::{macros::time, Time};
use tracing::{debug, info, warn};

use crate::{
    clock::Clock,
    error::ApiError,
    members::{
        repo_types::Member,
        status::{member_status, MemberStatus},
    },
    store::{AttendanceInsert, GymStore},
};

const OPENS_AT: Time = time!(5:00);
const CLOSES_AT: Time = time!(23:00);

lazy_static! {
    static ref SUFFIX_RE: Regex = Regex::new(r"^[0-9]{4}$").unwrap();
}

#[derive(Debug)]
pub enum CheckIn {
    Marked { member: Member, status: MemberStatus },
    AlreadyMarked,
}

/// 05:00 through 23:00, both ends included.
pub fn within_check_in_hours(now: Time) -> bool {
    (OPENS_AT..=CLOSES_AT).contains(&now)
}

pub fn parse_suffix(raw: &str) -> Result<&str, ApiError> {
    let suffix = raw.trim();
    if !SUFFIX_RE.is_match(suffix) {
        return Err(ApiError::field("last_4_digits", "Enter the last 4 digits of your phone number."));
    }
    Ok(suffix)
}

/// Records today's check-in for the active member whose phone ends in
/// `suffix`. Repeating it the same day is a no-op.
pub async fn record_check_in(
    store: &dyn GymStore,
    clock: &dyn Clock,
    suffix: &str,
) -> Result<CheckIn, ApiError> {
    let settings = match store.load_settings().await? {
        Some(s) if s.qr_active => s,
        _ => return Err(ApiError::Forbidden("QR attendance disabled")),
    };

    let now = clock.now();
    if !within_check_in_hours(now.time()) {
        debug!(local_time = %now.time(), "check-in outside opening hours");
        return Err(ApiError::Forbidden(
            "Attendance allowed only between 5 AM and 11 PM",
        ));
    }

    let mut matches = store.find_active_by_phone_suffix(suffix).await?;
    let member = match matches.len() {
        0 => return Err(ApiError::NotFound("Member not found")),
        1 => matches.remove(0),
        _ => {
            warn!(suffix, "phone suffix matches several members");
            return Err(ApiError::BadRequest("Multiple members found. Contact owner."));
        }
    };

    let today = now.date();
    match store.insert_attendance(member.id, today).await? {
        AttendanceInsert::AlreadyMarked => {
            debug!(member_id = member.id, %today, "attendance already marked");
            Ok(CheckIn::AlreadyMarked)
        }
        AttendanceInsert::Created(row) => {
            let status = member_status(today, member.end_date, settings.grace_days);
            info!(
                member_id = row.member_id,
                attendance_id = row.id,
                date = %row.date,
                status = status.label(),
                "attendance marked"
            );
            Ok(CheckIn::Marked { member, status })
        }
    }
}
