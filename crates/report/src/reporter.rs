//! Sprint reporting service.

use async_trait::async_trait;
use standup_core::SprintId;
use standup_storage::{ImpedimentStore, MeetingFilter, MeetingStore, StorageError};

use crate::summary::{summarize, SprintDailySummary};

/// Errors from report computation.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// Persistence failure while loading the snapshot
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Sprint reporting service.
#[async_trait]
pub trait SprintReporter: Send + Sync {
    /// Compute the rollup for one sprint from current store state.
    async fn sprint_summary(&self, sprint_id: &SprintId) -> Result<SprintDailySummary, ReportError>;
}

/// Basic reporter implementation over read-only store snapshots.
pub struct BasicSprintReporter<S> {
    storage: std::sync::Arc<S>,
}

impl<S> BasicSprintReporter<S> {
    /// Create a new reporter.
    pub fn new(storage: S) -> Self {
        Self {
            storage: std::sync::Arc::new(storage),
        }
    }
}

#[async_trait]
impl<S: MeetingStore + ImpedimentStore + 'static> SprintReporter for BasicSprintReporter<S> {
    async fn sprint_summary(&self, sprint_id: &SprintId) -> Result<SprintDailySummary, ReportError> {
        let meetings = self
            .storage
            .list_meetings(sprint_id, &MeetingFilter::default())
            .await?;
        let impediments = self.storage.list_impediments().await?;
        Ok(summarize(&meetings, &impediments))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;
    use standup_core::{DailyMeeting, Impediment, PersonId, Personnel, Priority};
    use standup_storage::{ImpedimentStore, MeetingStore, MemoryStore};

    #[tokio::test]
    async fn summary_reflects_store_state() {
        let mut store = MemoryStore::new();
        let roster = vec![Personnel::new("1", "Ana", "Developer")];

        let mut done = DailyMeeting::new(
            SprintId::new("S1"),
            "2024-01-01".parse().unwrap(),
            &roster,
            None,
        );
        done.start(NaiveTime::parse_from_str("09:00", "%H:%M").unwrap())
            .unwrap();
        done.finish(NaiveTime::parse_from_str("09:10", "%H:%M").unwrap())
            .unwrap();
        let pending = DailyMeeting::new(
            SprintId::new("S1"),
            "2024-01-02".parse().unwrap(),
            &roster,
            None,
        );
        store.create_meeting(&done).await.unwrap();
        store.create_meeting(&pending).await.unwrap();

        let blocker =
            Impediment::new("Blocked", Priority::High, PersonId::new("1"), None, None).unwrap();
        store.create_impediment(&blocker).await.unwrap();

        let reporter = BasicSprintReporter::new(store);
        let summary = reporter.sprint_summary(&SprintId::new("S1")).await.unwrap();

        assert_eq!(summary.total_meetings, 2);
        assert_eq!(summary.completed_meetings, 1);
        assert_eq!(summary.average_attendance_pct, 100);
        assert_eq!(summary.open_impediments, 1);
        assert_eq!(summary.latest_meeting, Some(pending.id));
    }

    #[tokio::test]
    async fn empty_sprint_yields_zeroed_summary() {
        let reporter = BasicSprintReporter::new(MemoryStore::new());
        let summary = reporter.sprint_summary(&SprintId::new("S9")).await.unwrap();
        assert_eq!(summary.total_meetings, 0);
        assert_eq!(summary.average_attendance_pct, 0);
        assert!(summary.latest_meeting.is_none());
    }
}
