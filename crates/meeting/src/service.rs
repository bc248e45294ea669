//! Meeting orchestration service.

use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};
use standup_core::{
    ActorId, CoreError, DailyMeeting, Event, Impediment, ImpedimentId, MeetingId, PersonId,
    Personnel, ResponseField, SprintId,
};
use standup_storage::{
    EventSink, MeetingFilter, MeetingStore, RosterSource, StorageError, TaskSource,
};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::prefill;

/// Errors from meeting orchestration.
///
/// Core lifecycle errors and storage errors pass through unmodified so
/// callers can match on the original kind.
#[derive(Debug, thiserror::Error)]
pub enum MeetingError {
    /// Validation or lifecycle rule violation
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Persistence failure
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Orchestrates daily meetings over a store.
///
/// Every mutation is load, pure transition on the loaded copy, optimistic
/// update. A conflict from the store means someone else wrote first; the
/// caller retries once with fresh state.
pub struct MeetingService<S> {
    store: Arc<Mutex<S>>,
    actor: ActorId,
}

impl<S> MeetingService<S>
where
    S: MeetingStore + TaskSource + RosterSource + EventSink,
{
    /// Create a new meeting service acting as the system.
    pub fn new(store: S) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
            actor: ActorId::system(),
        }
    }

    /// Set the actor recorded on emitted events.
    pub fn with_actor(mut self, actor: ActorId) -> Self {
        self.actor = actor;
        self
    }

    /// Open a meeting for a sprint date.
    ///
    /// Seeds one response per roster member and prefills the standup answers
    /// from the sprint's task schedule.
    pub async fn open_meeting(
        &self,
        sprint_id: SprintId,
        date: NaiveDate,
        planned_minutes: Option<u32>,
    ) -> Result<DailyMeeting, MeetingError> {
        let mut store = self.store.lock().await;

        let roster = store.list_team_members(&sprint_id).await?;
        let tasks = store.list_tasks_for_sprint(&sprint_id).await?;
        debug!(%sprint_id, roster = roster.len(), tasks = tasks.len(), "opening meeting");

        let mut meeting = DailyMeeting::new(sprint_id, date, &roster, planned_minutes);
        prefill::apply(&mut meeting, &tasks);

        let created = store.create_meeting(&meeting).await?;
        let event = Event::new(
            self.actor.clone(),
            "meeting_opened",
            format!("daily for {} opened with {} participants", date, roster.len()),
        )
        .for_meeting(created.id);
        store.append_event(&event).await?;

        info!(meeting = %created.id, "meeting opened");
        Ok(created)
    }

    /// Start a meeting.
    pub async fn start_meeting(
        &self,
        id: MeetingId,
        at: NaiveTime,
    ) -> Result<DailyMeeting, MeetingError> {
        let mut store = self.store.lock().await;
        let mut meeting = store.get_meeting(id).await?;
        meeting.start(at)?;
        let updated = store.update_meeting(&meeting).await?;

        let event = Event::new(
            self.actor.clone(),
            "meeting_started",
            format!("daily started at {}", at),
        )
        .for_meeting(id);
        store.append_event(&event).await?;

        info!(meeting = %id, %at, "meeting started");
        Ok(updated)
    }

    /// Finish a meeting, recording its computed duration.
    pub async fn finish_meeting(
        &self,
        id: MeetingId,
        at: NaiveTime,
    ) -> Result<DailyMeeting, MeetingError> {
        let mut store = self.store.lock().await;
        let mut meeting = store.get_meeting(id).await?;
        meeting.finish(at)?;
        let updated = store.update_meeting(&meeting).await?;

        let event = Event::new(
            self.actor.clone(),
            "meeting_finished",
            format!("daily finished at {}", at),
        )
        .for_meeting(id);
        store.append_event(&event).await?;

        info!(meeting = %id, %at, "meeting finished");
        Ok(updated)
    }

    /// Record attendance for a participant.
    pub async fn set_attendance(
        &self,
        id: MeetingId,
        person: &PersonId,
        attended: bool,
        absence_reason: Option<String>,
    ) -> Result<DailyMeeting, MeetingError> {
        let mut store = self.store.lock().await;
        let mut meeting = store.get_meeting(id).await?;
        meeting.set_attendance(person, attended, absence_reason)?;
        Ok(store.update_meeting(&meeting).await?)
    }

    /// Update a free-text field of a participant's response.
    pub async fn update_field(
        &self,
        id: MeetingId,
        person: &PersonId,
        field: ResponseField,
        value: String,
    ) -> Result<DailyMeeting, MeetingError> {
        let mut store = self.store.lock().await;
        let mut meeting = store.get_meeting(id).await?;
        meeting.update_field(person, field, value)?;
        Ok(store.update_meeting(&meeting).await?)
    }

    /// Attach or clear a participant's embedded impediment.
    pub async fn set_impediment(
        &self,
        id: MeetingId,
        person: &PersonId,
        impediment: Option<Impediment>,
    ) -> Result<DailyMeeting, MeetingError> {
        let mut store = self.store.lock().await;
        let mut meeting = store.get_meeting(id).await?;
        meeting.set_impediment(person, impediment)?;
        Ok(store.update_meeting(&meeting).await?)
    }

    /// Append an ad-hoc participant to the roster.
    pub async fn add_participant(
        &self,
        id: MeetingId,
        member: &Personnel,
    ) -> Result<DailyMeeting, MeetingError> {
        let mut store = self.store.lock().await;
        let mut meeting = store.get_meeting(id).await?;
        meeting.add_participant(member)?;
        Ok(store.update_meeting(&meeting).await?)
    }

    /// Remove a participant and their response.
    pub async fn remove_participant(
        &self,
        id: MeetingId,
        person: &PersonId,
    ) -> Result<DailyMeeting, MeetingError> {
        let mut store = self.store.lock().await;
        let mut meeting = store.get_meeting(id).await?;
        meeting.remove_participant(person)?;
        Ok(store.update_meeting(&meeting).await?)
    }

    /// Replace the facilitator notes.
    pub async fn update_notes(
        &self,
        id: MeetingId,
        notes: String,
    ) -> Result<DailyMeeting, MeetingError> {
        let mut store = self.store.lock().await;
        let mut meeting = store.get_meeting(id).await?;
        meeting.notes = notes;
        meeting.updated_at = chrono::Utc::now();
        Ok(store.update_meeting(&meeting).await?)
    }

    /// Record that an impediment was raised in this meeting.
    pub async fn attach_impediment(
        &self,
        id: MeetingId,
        impediment_id: ImpedimentId,
    ) -> Result<DailyMeeting, MeetingError> {
        let mut store = self.store.lock().await;
        let mut meeting = store.get_meeting(id).await?;
        meeting.attach_impediment(impediment_id);
        let updated = store.update_meeting(&meeting).await?;

        let event = Event::new(self.actor.clone(), "impediment_raised", "blocker raised in daily")
            .for_meeting(id)
            .for_impediment(impediment_id);
        store.append_event(&event).await?;
        Ok(updated)
    }

    /// Load a meeting.
    pub async fn get_meeting(&self, id: MeetingId) -> Result<DailyMeeting, MeetingError> {
        Ok(self.store.lock().await.get_meeting(id).await?)
    }

    /// List a sprint's meetings.
    pub async fn list_meetings(
        &self,
        sprint_id: &SprintId,
        filter: &MeetingFilter,
    ) -> Result<Vec<DailyMeeting>, MeetingError> {
        Ok(self.store.lock().await.list_meetings(sprint_id, filter).await?)
    }
}
