use serde::Serialize;
use time::Date;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberBrief {
    pub id: i64,
    pub name: String,
    pub end_date: Date,
}

/// A count plus the members shown for it.
#[derive(Debug, Default, Serialize)]
pub struct Bucket {
    pub count: usize,
    pub names: Vec<MemberBrief>,
}

#[derive(Debug, Serialize)]
pub struct DashboardSummary {
    pub active_members: Bucket,
    pub grace_members: Bucket,
    pub expired_members: Bucket,
    pub today_visits: Bucket,
}
