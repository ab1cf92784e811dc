use time::{Date, Duration};

use crate::{
    attendance::repo_types::Visit,
    dashboard::dto::{Bucket, DashboardSummary, MemberBrief},
    members::repo_types::Member,
};

/// The dashboard buckets on a fixed window rather than `gym_config.grace_days`.
pub const DASHBOARD_GRACE_DAYS: i64 = 4;
/// Members listed per bucket.
pub const BUCKET_PREVIEW: usize = 5;

/// Buckets active members by expiry and lists today's visits.
///
/// `members` are expected to be active; archived rows are skipped anyway.
pub fn summarize(today: Date, members: Vec<Member>, visits: Vec<Visit>) -> DashboardSummary {
    let grace_start = today - Duration::days(DASHBOARD_GRACE_DAYS);

    let mut active = Vec::new();
    let mut grace = Vec::new();
    let mut expired = Vec::new();
    for m in members.into_iter().filter(|m| m.is_active) {
        let brief = MemberBrief {
            id: m.id,
            name: m.name,
            end_date: m.end_date,
        };
        if brief.end_date >= today {
            active.push(brief);
        } else if brief.end_date >= grace_start {
            grace.push(brief);
        } else {
            expired.push(brief);
        }
    }

    let today_visits = Bucket {
        count: visits.len(),
        names: visits
            .into_iter()
            .map(|v| MemberBrief {
                id: v.member_id,
                name: v.name,
                end_date: v.end_date,
            })
            .collect(),
    };

    DashboardSummary {
        active_members: soonest_first(active),
        grace_members: soonest_first(grace),
        expired_members: soonest_first(expired),
        today_visits,
    }
}

fn soonest_first(mut members: Vec<MemberBrief>) -> Bucket {
    let count = members.len();
    members.sort_by_key(|m| (m.end_date, m.id));
    members.truncate(BUCKET_PREVIEW);
    Bucket {
        count,
        names: members,
    }
}
