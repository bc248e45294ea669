//! In-memory storage backend.
//!
//! HashMap-backed implementation of every collaborator trait, with fixed
//! task and roster data supplied at construction. Used as the test double
//! and for demo wiring; the version check mirrors the JSON backend so
//! conflict behavior is identical across backends.

use std::collections::HashMap;

use async_trait::async_trait;
use standup_core::{
    DailyMeeting, Event, Impediment, ImpedimentId, ImpedimentState, MeetingId, Personnel,
    SprintId, SprintTask,
};

use super::{
    EventSink, ImpedimentStore, MeetingFilter, MeetingStore, Result, RosterSource, StorageError,
    TaskSource,
};

/// In-memory storage backend.
#[derive(Default)]
pub struct MemoryStore {
    meetings: HashMap<MeetingId, DailyMeeting>,
    impediments: HashMap<ImpedimentId, Impediment>,
    events: Vec<Event>,
    tasks: HashMap<SprintId, Vec<SprintTask>>,
    rosters: HashMap<SprintId, Vec<Personnel>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the task source for a sprint.
    pub fn with_tasks(mut self, sprint_id: SprintId, tasks: Vec<SprintTask>) -> Self {
        self.tasks.insert(sprint_id, tasks);
        self
    }

    /// Seed the roster source for a sprint.
    pub fn with_roster(mut self, sprint_id: SprintId, members: Vec<Personnel>) -> Self {
        self.rosters.insert(sprint_id, members);
        self
    }
}

#[async_trait]
impl MeetingStore for MemoryStore {
    async fn create_meeting(&mut self, meeting: &DailyMeeting) -> Result<DailyMeeting> {
        if self.meetings.contains_key(&meeting.id) {
            return Err(StorageError::Conflict(format!(
                "meeting {} already exists",
                meeting.id
            )));
        }
        self.meetings.insert(meeting.id, meeting.clone());
        Ok(meeting.clone())
    }

    async fn get_meeting(&self, id: MeetingId) -> Result<DailyMeeting> {
        self.meetings
            .get(&id)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(format!("meeting {}", id)))
    }

    async fn update_meeting(&mut self, meeting: &DailyMeeting) -> Result<DailyMeeting> {
        let stored = self
            .meetings
            .get(&meeting.id)
            .ok_or_else(|| StorageError::NotFound(format!("meeting {}", meeting.id)))?;
        if stored.version != meeting.version {
            return Err(StorageError::Conflict(format!(
                "meeting {} was modified concurrently (stored v{}, incoming v{})",
                meeting.id, stored.version, meeting.version
            )));
        }
        let mut updated = meeting.clone();
        updated.version += 1;
        self.meetings.insert(updated.id, updated.clone());
        Ok(updated)
    }

    async fn list_meetings(
        &self,
        sprint_id: &SprintId,
        filter: &MeetingFilter,
    ) -> Result<Vec<DailyMeeting>> {
        let mut meetings: Vec<DailyMeeting> = self
            .meetings
            .values()
            .filter(|m| &m.sprint_id == sprint_id && filter.matches(m))
            .cloned()
            .collect();
        meetings.sort_by(|a, b| a.date.cmp(&b.date));
        Ok(meetings)
    }

    async fn delete_meeting(&mut self, id: MeetingId) -> Result<()> {
        self.meetings
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| StorageError::NotFound(format!("meeting {}", id)))
    }
}

#[async_trait]
impl ImpedimentStore for MemoryStore {
    async fn create_impediment(&mut self, impediment: &Impediment) -> Result<Impediment> {
        if self.impediments.contains_key(&impediment.id) {
            return Err(StorageError::Conflict(format!(
                "impediment {} already exists",
                impediment.id
            )));
        }
        self.impediments.insert(impediment.id, impediment.clone());
        Ok(impediment.clone())
    }

    async fn get_impediment(&self, id: ImpedimentId) -> Result<Impediment> {
        self.impediments
            .get(&id)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(format!("impediment {}", id)))
    }

    async fn update_impediment(&mut self, impediment: &Impediment) -> Result<Impediment> {
        let stored = self
            .impediments
            .get(&impediment.id)
            .ok_or_else(|| StorageError::NotFound(format!("impediment {}", impediment.id)))?;
        if stored.version != impediment.version {
            return Err(StorageError::Conflict(format!(
                "impediment {} was modified concurrently (stored v{}, incoming v{})",
                impediment.id, stored.version, impediment.version
            )));
        }
        let mut updated = impediment.clone();
        updated.version += 1;
        self.impediments.insert(updated.id, updated.clone());
        Ok(updated)
    }

    async fn list_impediments(&self) -> Result<Vec<Impediment>> {
        let mut impediments: Vec<Impediment> = self.impediments.values().cloned().collect();
        impediments.sort_by(|a, b| a.reported_on.cmp(&b.reported_on));
        Ok(impediments)
    }

    async fn list_impediments_by_state(&self, state: ImpedimentState) -> Result<Vec<Impediment>> {
        let mut impediments: Vec<Impediment> = self
            .impediments
            .values()
            .filter(|i| i.state == state)
            .cloned()
            .collect();
        impediments.sort_by(|a, b| a.reported_on.cmp(&b.reported_on));
        Ok(impediments)
    }

    async fn delete_impediment(&mut self, id: ImpedimentId) -> Result<()> {
        self.impediments
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| StorageError::NotFound(format!("impediment {}", id)))
    }
}

#[async_trait]
impl TaskSource for MemoryStore {
    async fn list_tasks_for_sprint(&self, sprint_id: &SprintId) -> Result<Vec<SprintTask>> {
        Ok(self.tasks.get(sprint_id).cloned().unwrap_or_default())
    }
}

#[async_trait]
impl RosterSource for MemoryStore {
    async fn list_team_members(&self, sprint_id: &SprintId) -> Result<Vec<Personnel>> {
        Ok(self.rosters.get(sprint_id).cloned().unwrap_or_default())
    }
}

#[async_trait]
impl EventSink for MemoryStore {
    async fn append_event(&mut self, event: &Event) -> Result<()> {
        self.events.push(event.clone());
        Ok(())
    }

    async fn list_events(&self) -> Result<Vec<Event>> {
        let mut events = self.events.clone();
        events.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
        Ok(events)
    }
}
