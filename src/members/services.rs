use std::collections::BTreeSet;

use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;
use time::{Date, Duration};

use crate::{
    attendance::repo_types::Attendance,
    clock::Clock,
    error::{ApiError, FieldErrors},
    members::repo_types::Member,
};

/// Length of one membership period.
pub const MEMBERSHIP_DAYS: i64 = 30;
/// A renewal paid more than this many days after expiry starts a fresh period.
pub const LAPSE_THRESHOLD_DAYS: i64 = 15;

const NAME_MAX_CHARS: usize = 100;

lazy_static! {
    static ref PHONE_RE: Regex = Regex::new(r"^[0-9]{1,10}$").unwrap();
}

/// End date granted to a newly created membership.
pub fn first_end_date(start_date: Date) -> Result<Date, ApiError> {
    start_date
        .checked_add(Duration::days(MEMBERSHIP_DAYS))
        .ok_or_else(|| ApiError::field("start_date", "Date is too far in the future."))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Renewal {
    pub new_end_date: Date,
    /// Days late, never negative.
    pub gap_days: i64,
}

/// Lapsed memberships restart from the payment date; everything else,
/// early renewals included, extends the previous expiry.
pub fn compute_renewal(end_date: Date, payment_date: Date) -> Result<Renewal, ApiError> {
    let gap_days = (payment_date - end_date).whole_days();
    let base = if gap_days > LAPSE_THRESHOLD_DAYS {
        payment_date
    } else {
        end_date
    };
    let new_end_date = base
        .checked_add(Duration::days(MEMBERSHIP_DAYS))
        .ok_or_else(|| ApiError::field("payment_date", "Renewal would end past the last supported date."))?;
    Ok(Renewal {
        new_end_date,
        gap_days: gap_days.max(0),
    })
}

/// Distinct local calendar days the member checked in on, ascending.
pub fn present_dates(clock: &dyn Clock, rows: &[Attendance]) -> Vec<Date> {
    rows.iter()
        .map(|a| clock.local_date(a.created_at))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

pub fn joining_date(clock: &dyn Clock, member: &Member) -> Date {
    clock.local_date(member.created_at)
}

/// Trims and checks name and phone, collecting every field error.
pub fn validate_member_fields(name: &str, phone: &str) -> Result<(String, String), ApiError> {
    let name = name.trim().to_string();
    let phone = phone.trim().to_string();
    let mut errors = FieldErrors::new();

    if name.is_empty() {
        errors.entry("name").or_default().push("This field may not be blank.".into());
    } else if name.chars().count() > NAME_MAX_CHARS {
        errors
            .entry("name")
            .or_default()
            .push(format!("Ensure this field has no more than {NAME_MAX_CHARS} characters."));
    }
    if !PHONE_RE.is_match(&phone) {
        errors
            .entry("phone")
            .or_default()
            .push("Enter up to 10 digits.".into());
    }

    if errors.is_empty() {
        Ok((name, phone))
    } else {
        Err(ApiError::Validation(errors))
    }
}

pub fn validate_end_after_start(start_date: Date, end_date: Date) -> Result<(), ApiError> {
    if end_date < start_date {
        return Err(ApiError::field("end_date", "end_date must not be before start_date."));
    }
    Ok(())
}

pub fn validate_amount(amount: Option<Decimal>) -> Result<Option<Decimal>, ApiError> {
    let Some(amount) = amount else {
        return Ok(None);
    };
    if amount.is_sign_negative() {
        return Err(ApiError::field("amount", "Ensure this value is greater than or equal to 0."));
    }
    if amount.scale() > 2 {
        return Err(ApiError::field("amount", "Ensure that there are no more than 2 decimal places."));
    }
    // NUMERIC(8, 2)
    if amount >= Decimal::new(1_000_000, 0) {
        return Err(ApiError::field("amount", "Ensure that there are no more than 8 digits in total."));
    }
    Ok(Some(amount))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use time::macros::{date, datetime};

    #[test]
    fn first_month_is_thirty_days() {
        assert_eq!(first_end_date(date!(2024 - 01 - 01)).unwrap(), date!(2024 - 01 - 31));
        assert_eq!(first_end_date(date!(2024 - 02 - 15)).unwrap(), date!(2024 - 03 - 16));
    }

    #[test]
    fn dates_past_the_calendar_end_are_field_errors() {
        assert_eq!(first_end_date(date!(9999 - 12 - 01)).unwrap(), date!(9999 - 12 - 31));
        match first_end_date(date!(9999 - 12 - 15)) {
            Err(ApiError::Validation(fields)) => assert!(fields.contains_key("start_date")),
            other => panic!("unexpected {other:?}"),
        }

        // lapsed: restarts from the payment date
        match compute_renewal(date!(9999 - 11 - 01), date!(9999 - 12 - 20)) {
            Err(ApiError::Validation(fields)) => assert!(fields.contains_key("payment_date")),
            other => panic!("unexpected {other:?}"),
        }
        // on time: extends an expiry already at the last day
        assert!(compute_renewal(date!(9999 - 12 - 31), date!(9999 - 12 - 31)).is_err());
    }

    #[test]
    fn lapsed_renewal_restarts_from_payment() {
        let r = compute_renewal(date!(2024 - 01 - 10), date!(2024 - 01 - 31)).unwrap();
        assert_eq!(r.gap_days, 21);
        // 2024 is a leap year: Jan 31 + 30 days is Mar 1
        assert_eq!(r.new_end_date, date!(2024 - 03 - 01));
    }

    #[test]
    fn short_gap_extends_previous_expiry() {
        let r = compute_renewal(date!(2024 - 01 - 10), date!(2024 - 01 - 15)).unwrap();
        assert_eq!(r.gap_days, 5);
        assert_eq!(r.new_end_date, date!(2024 - 02 - 09));
    }

    #[test]
    fn gap_of_exactly_fifteen_still_extends() {
        let r = compute_renewal(date!(2024 - 01 - 10), date!(2024 - 01 - 25)).unwrap();
        assert_eq!(r.gap_days, 15);
        assert_eq!(r.new_end_date, date!(2024 - 02 - 09));

        let r = compute_renewal(date!(2024 - 01 - 10), date!(2024 - 01 - 26)).unwrap();
        assert_eq!(r.gap_days, 16);
        assert_eq!(r.new_end_date, date!(2024 - 02 - 25));
    }

    #[test]
    fn early_renewal_reports_zero_gap() {
        let r = compute_renewal(date!(2024 - 01 - 10), date!(2024 - 01 - 05)).unwrap();
        assert_eq!(r.gap_days, 0);
        assert_eq!(r.new_end_date, date!(2024 - 02 - 09));

        let on_time = compute_renewal(date!(2024 - 01 - 10), date!(2024 - 01 - 10)).unwrap();
        assert_eq!(on_time, r);
    }

    #[test]
    fn present_dates_are_distinct_local_days() {
        let clock = FixedClock(datetime!(2024-01-12 10:00 +5:30));
        let row = |id, created_at| Attendance {
            id,
            member_id: 1,
            date: date!(2024 - 01 - 01),
            created_at,
        };
        let rows = vec![
            row(1, datetime!(2024-01-11 02:00 UTC)),
            row(2, datetime!(2024-01-10 04:00 UTC)),
            // 19:00 UTC is 00:30 next day in +05:30
            row(3, datetime!(2024-01-10 19:00 UTC)),
        ];
        assert_eq!(
            present_dates(&clock, &rows),
            vec![date!(2024 - 01 - 10), date!(2024 - 01 - 11)]
        );
    }

    #[test]
    fn member_fields_are_trimmed_and_checked() {
        let (name, phone) = validate_member_fields("  Asha ", " 9876543210 ").unwrap();
        assert_eq!(name, "Asha");
        assert_eq!(phone, "9876543210");

        match validate_member_fields("", "12345678901") {
            Err(ApiError::Validation(fields)) => {
                assert!(fields.contains_key("name"));
                assert!(fields.contains_key("phone"));
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(validate_member_fields("Asha", "98-76").is_err());
    }

    #[test]
    fn amount_rules() {
        assert_eq!(validate_amount(None).unwrap(), None);
        assert_eq!(
            validate_amount(Some(Decimal::new(150050, 2))).unwrap(),
            Some(Decimal::new(150050, 2))
        );
        assert!(validate_amount(Some(Decimal::new(-1, 0))).is_err());
        assert!(validate_amount(Some(Decimal::new(1001, 3))).is_err());
        assert!(validate_amount(Some(Decimal::new(1_000_000, 0))).is_err());
    }

    #[test]
    fn end_date_before_start_is_rejected() {
        assert!(validate_end_after_start(date!(2024 - 01 - 10), date!(2024 - 01 - 09)).is_err());
        assert!(validate_end_after_start(date!(2024 - 01 - 10), date!(2024 - 01 - 10)).is_ok());
    }
}
