//! Sprint task reference data, owned by the external planning system.

use crate::id::PersonId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A task scheduled within a sprint.
///
/// Read-only here; only the assignee and the date range matter to this
/// crate, for matching tasks against a reporting day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SprintTask {
    /// External identifier
    pub id: String,

    /// Short task code (e.g. "T-142")
    pub code: String,

    /// Task title
    pub title: String,

    /// Assigned team member
    pub assignee: PersonId,

    /// First scheduled day (inclusive)
    pub start_date: Option<NaiveDate>,

    /// Last scheduled day (inclusive)
    pub end_date: Option<NaiveDate>,
}

impl SprintTask {
    /// Whether this task's range covers `day`.
    ///
    /// Comparison at day granularity, inclusive on both ends. A task missing
    /// either date never covers anything.
    pub fn covers(&self, day: NaiveDate) -> bool {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => start <= day && day <= end,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(start: Option<&str>, end: Option<&str>) -> SprintTask {
        SprintTask {
            id: "1".to_string(),
            code: "T1".to_string(),
            title: "Sample".to_string(),
            assignee: PersonId::new("7"),
            start_date: start.map(|s| s.parse().unwrap()),
            end_date: end.map(|s| s.parse().unwrap()),
        }
    }

    #[test]
    fn covers_inclusive_range() {
        let t = task(Some("2024-01-01"), Some("2024-01-03"));
        assert!(t.covers("2024-01-01".parse().unwrap()));
        assert!(t.covers("2024-01-02".parse().unwrap()));
        assert!(t.covers("2024-01-03".parse().unwrap()));
        assert!(!t.covers("2023-12-31".parse().unwrap()));
        assert!(!t.covers("2024-01-04".parse().unwrap()));
    }

    #[test]
    fn covers_requires_both_dates() {
        let day = "2024-01-02".parse().unwrap();
        assert!(!task(Some("2024-01-01"), None).covers(day));
        assert!(!task(None, Some("2024-01-03")).covers(day));
        assert!(!task(None, None).covers(day));
    }
}
