//! Storage trait abstraction.

use async_trait::async_trait;
use chrono::NaiveDate;
use standup_core::{
    DailyMeeting, Event, Impediment, ImpedimentId, ImpedimentState, MeetingId, MeetingState,
    Personnel, SprintId, SprintTask,
};

/// Error type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors that can occur at the persistence boundary.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Referenced entity does not exist
    #[error("not found: {0}")]
    NotFound(String),

    /// Concurrent modification detected
    #[error("conflict: {0}")]
    Conflict(String),

    /// Other error
    #[error("{0}")]
    Other(String),
}

/// Filter for listing meetings.
#[derive(Debug, Clone, Default)]
pub struct MeetingFilter {
    /// Only meetings on this date
    pub date: Option<NaiveDate>,

    /// Only meetings in this derived state
    pub state: Option<MeetingState>,
}

impl MeetingFilter {
    /// Whether a meeting passes this filter.
    pub fn matches(&self, meeting: &DailyMeeting) -> bool {
        if let Some(date) = self.date {
            if meeting.date != date {
                return false;
            }
        }
        if let Some(state) = self.state {
            if meeting.state() != state {
                return false;
            }
        }
        true
    }
}

/// Persistence for daily meetings.
///
/// `get` surfaces [`StorageError::NotFound`] for an unknown id, and `update`
/// surfaces [`StorageError::Conflict`] when the incoming entity's version
/// does not match the stored one. At most one of two concurrent writers of
/// the same meeting succeeds.
#[async_trait]
pub trait MeetingStore: Send + Sync {
    /// Persist a new meeting. Fails if the id already exists.
    async fn create_meeting(&mut self, meeting: &DailyMeeting) -> Result<DailyMeeting>;

    /// Load a meeting by ID.
    async fn get_meeting(&self, id: MeetingId) -> Result<DailyMeeting>;

    /// Replace a stored meeting, returning the entity with its bumped version.
    async fn update_meeting(&mut self, meeting: &DailyMeeting) -> Result<DailyMeeting>;

    /// List a sprint's meetings matching the filter, ordered by date.
    async fn list_meetings(
        &self,
        sprint_id: &SprintId,
        filter: &MeetingFilter,
    ) -> Result<Vec<DailyMeeting>>;

    /// Delete a meeting. Administrative escape hatch; the core never calls it.
    async fn delete_meeting(&mut self, id: MeetingId) -> Result<()>;
}

/// Persistence for impediments, with the same not-found/conflict contract
/// as [`MeetingStore`].
#[async_trait]
pub trait ImpedimentStore: Send + Sync {
    /// Persist a new impediment. Fails if the id already exists.
    async fn create_impediment(&mut self, impediment: &Impediment) -> Result<Impediment>;

    /// Load an impediment by ID.
    async fn get_impediment(&self, id: ImpedimentId) -> Result<Impediment>;

    /// Replace a stored impediment, returning the entity with its bumped version.
    async fn update_impediment(&mut self, impediment: &Impediment) -> Result<Impediment>;

    /// List all impediments, ordered by report date.
    async fn list_impediments(&self) -> Result<Vec<Impediment>>;

    /// List impediments in a given state.
    async fn list_impediments_by_state(&self, state: ImpedimentState) -> Result<Vec<Impediment>>;

    /// Delete an impediment.
    async fn delete_impediment(&mut self, id: ImpedimentId) -> Result<()>;
}

/// Read-only source of sprint tasks, used for response prefill.
#[async_trait]
pub trait TaskSource: Send + Sync {
    /// Tasks scheduled for a sprint, in the external system's order.
    async fn list_tasks_for_sprint(&self, sprint_id: &SprintId) -> Result<Vec<SprintTask>>;
}

/// Read-only source of a sprint's roster, used to seed responses.
#[async_trait]
pub trait RosterSource: Send + Sync {
    /// Team members expected in a sprint's daily meetings.
    async fn list_team_members(&self, sprint_id: &SprintId) -> Result<Vec<Personnel>>;
}

/// Append-only log of lifecycle transitions.
#[async_trait]
pub trait EventSink: Send + Sync {
    /// Append an event.
    async fn append_event(&mut self, event: &Event) -> Result<()>;

    /// List all events, ordered by timestamp.
    async fn list_events(&self) -> Result<Vec<Event>>;
}
