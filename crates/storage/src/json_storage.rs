//! JSON file storage implementation.
//!
//! Stores each entity as one pretty-printed JSON file under a `.standup`
//! root. Optimistic concurrency rides on the entity's own `version` field:
//! an update only lands when the incoming version matches the file on disk.
//! Task and roster files are written by the external planning system and
//! only read here.

use std::path::Path;

use standup_core::{
    DailyMeeting, Event, Impediment, ImpedimentId, ImpedimentState, MeetingId, Personnel,
    SprintId, SprintTask,
};
use tokio::fs;
use tracing::debug;

use super::{
    EventSink, ImpedimentStore, MeetingFilter, MeetingStore, Result, RosterSource, StorageError,
    TaskSource,
};

/// File-based JSON storage backend.
pub struct JsonStore {
    root: std::path::PathBuf,
}

impl JsonStore {
    /// Create storage, ensuring the per-entity subdirectories exist.
    pub async fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();

        fs::create_dir_all(root.join("meetings")).await?;
        fs::create_dir_all(root.join("impediments")).await?;
        fs::create_dir_all(root.join("events")).await?;
        fs::create_dir_all(root.join("tasks")).await?;
        fs::create_dir_all(root.join("roster")).await?;

        debug!(root = %root.display(), "opened JSON store");
        Ok(Self { root })
    }

    fn meeting_path(&self, id: MeetingId) -> std::path::PathBuf {
        self.root.join("meetings").join(format!("{}.json", id))
    }
    fn impediment_path(&self, id: ImpedimentId) -> std::path::PathBuf {
        self.root.join("impediments").join(format!("{}.json", id))
    }
    fn event_path(&self, id: standup_core::EventId) -> std::path::PathBuf {
        self.root.join("events").join(format!("{}.json", id))
    }
    fn tasks_path(&self, sprint_id: &SprintId) -> std::path::PathBuf {
        self.root.join("tasks").join(format!("{}.json", sprint_id))
    }
    fn roster_path(&self, sprint_id: &SprintId) -> std::path::PathBuf {
        self.root.join("roster").join(format!("{}.json", sprint_id))
    }

    async fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        fs::write(path, json.as_bytes()).await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl MeetingStore for JsonStore {
    async fn create_meeting(&mut self, meeting: &DailyMeeting) -> Result<DailyMeeting> {
        let path = self.meeting_path(meeting.id);
        if fs::try_exists(&path).await? {
            return Err(StorageError::Conflict(format!(
                "meeting {} already exists",
                meeting.id
            )));
        }
        Self::write_json(&path, meeting).await?;
        Ok(meeting.clone())
    }

    async fn get_meeting(&self, id: MeetingId) -> Result<DailyMeeting> {
        read_json(&self.meeting_path(id))
            .await?
            .ok_or_else(|| StorageError::NotFound(format!("meeting {}", id)))
    }

    async fn update_meeting(&mut self, meeting: &DailyMeeting) -> Result<DailyMeeting> {
        let path = self.meeting_path(meeting.id);
        let stored: DailyMeeting = read_json(&path)
            .await?
            .ok_or_else(|| StorageError::NotFound(format!("meeting {}", meeting.id)))?;
        if stored.version != meeting.version {
            return Err(StorageError::Conflict(format!(
                "meeting {} was modified concurrently (stored v{}, incoming v{})",
                meeting.id, stored.version, meeting.version
            )));
        }
        let mut updated = meeting.clone();
        updated.version += 1;
        Self::write_json(&path, &updated).await?;
        Ok(updated)
    }

    async fn list_meetings(
        &self,
        sprint_id: &SprintId,
        filter: &MeetingFilter,
    ) -> Result<Vec<DailyMeeting>> {
        let all: Vec<DailyMeeting> = list_dir(&self.root.join("meetings")).await?;
        let mut meetings: Vec<DailyMeeting> = all
            .into_iter()
            .filter(|m| &m.sprint_id == sprint_id && filter.matches(m))
            .collect();
        meetings.sort_by(|a, b| a.date.cmp(&b.date));
        Ok(meetings)
    }

    async fn delete_meeting(&mut self, id: MeetingId) -> Result<()> {
        let path = self.meeting_path(id);
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(format!("meeting {}", id)))
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait::async_trait]
impl ImpedimentStore for JsonStore {
    async fn create_impediment(&mut self, impediment: &Impediment) -> Result<Impediment> {
        let path = self.impediment_path(impediment.id);
        if fs::try_exists(&path).await? {
            return Err(StorageError::Conflict(format!(
                "impediment {} already exists",
                impediment.id
            )));
        }
        Self::write_json(&path, impediment).await?;
        Ok(impediment.clone())
    }

    async fn get_impediment(&self, id: ImpedimentId) -> Result<Impediment> {
        read_json(&self.impediment_path(id))
            .await?
            .ok_or_else(|| StorageError::NotFound(format!("impediment {}", id)))
    }

    async fn update_impediment(&mut self, impediment: &Impediment) -> Result<Impediment> {
        let path = self.impediment_path(impediment.id);
        let stored: Impediment = read_json(&path)
            .await?
            .ok_or_else(|| StorageError::NotFound(format!("impediment {}", impediment.id)))?;
        if stored.version != impediment.version {
            return Err(StorageError::Conflict(format!(
                "impediment {} was modified concurrently (stored v{}, incoming v{})",
                impediment.id, stored.version, impediment.version
            )));
        }
        let mut updated = impediment.clone();
        updated.version += 1;
        Self::write_json(&path, &updated).await?;
        Ok(updated)
    }

    async fn list_impediments(&self) -> Result<Vec<Impediment>> {
        let mut impediments: Vec<Impediment> = list_dir(&self.root.join("impediments")).await?;
        impediments.sort_by(|a, b| a.reported_on.cmp(&b.reported_on));
        Ok(impediments)
    }

    async fn list_impediments_by_state(&self, state: ImpedimentState) -> Result<Vec<Impediment>> {
        let all = self.list_impediments().await?;
        Ok(all.into_iter().filter(|i| i.state == state).collect())
    }

    async fn delete_impediment(&mut self, id: ImpedimentId) -> Result<()> {
        let path = self.impediment_path(id);
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(format!("impediment {}", id)))
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait::async_trait]
impl TaskSource for JsonStore {
    async fn list_tasks_for_sprint(&self, sprint_id: &SprintId) -> Result<Vec<SprintTask>> {
        Ok(read_json(&self.tasks_path(sprint_id)).await?.unwrap_or_default())
    }
}

#[async_trait::async_trait]
impl RosterSource for JsonStore {
    async fn list_team_members(&self, sprint_id: &SprintId) -> Result<Vec<Personnel>> {
        Ok(read_json(&self.roster_path(sprint_id)).await?.unwrap_or_default())
    }
}

#[async_trait::async_trait]
impl EventSink for JsonStore {
    async fn append_event(&mut self, event: &Event) -> Result<()> {
        Self::write_json(&self.event_path(event.id), event).await
    }

    async fn list_events(&self) -> Result<Vec<Event>> {
        let mut events: Vec<Event> = list_dir(&self.root.join("events")).await?;
        events.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
        Ok(events)
    }
}

async fn read_json<T: serde::de::DeserializeOwned>(path: &std::path::Path) -> Result<Option<T>> {
    match fs::read_to_string(path).await {
        Ok(json) => {
            let value = serde_json::from_str(&json)?;
            Ok(Some(value))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

async fn list_dir<T: serde::de::DeserializeOwned>(dir: &std::path::Path) -> Result<Vec<T>> {
    let mut items = Vec::new();
    let mut rd = fs::read_dir(dir).await?;
    while let Some(entry) = rd.next_entry().await? {
        if entry.path().extension().and_then(|s| s.to_str()) != Some("json") {
            continue;
        }
        if let Ok(Some(item)) = read_json(&entry.path()).await {
            items.push(item);
        }
    }
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use standup_core::{ActorId, PersonId, Personnel, Priority};

    async fn store() -> (tempfile::TempDir, JsonStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path()).await.unwrap();
        (dir, store)
    }

    fn meeting() -> DailyMeeting {
        let roster = vec![Personnel::new("1", "Ana", "Developer")];
        DailyMeeting::new(
            SprintId::new("S1"),
            "2024-01-02".parse().unwrap(),
            &roster,
            Some(15),
        )
    }

    #[tokio::test]
    async fn meeting_roundtrips_through_disk() {
        let (_dir, mut store) = store().await;
        let m = meeting();
        store.create_meeting(&m).await.unwrap();

        let loaded = store.get_meeting(m.id).await.unwrap();
        assert_eq!(loaded.sprint_id, m.sprint_id);
        assert_eq!(loaded.responses.len(), 1);
        assert_eq!(loaded.version, 1);
    }

    #[tokio::test]
    async fn unknown_ids_surface_not_found() {
        let (_dir, store) = store().await;
        assert!(matches!(
            store.get_meeting(MeetingId::new()).await,
            Err(StorageError::NotFound(_))
        ));
        assert!(matches!(
            store.get_impediment(ImpedimentId::new()).await,
            Err(StorageError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn stale_update_is_a_conflict() {
        let (_dir, mut store) = store().await;
        let m = meeting();
        store.create_meeting(&m).await.unwrap();

        let mut fresh = store.get_meeting(m.id).await.unwrap();
        fresh.notes = "updated".to_string();
        store.update_meeting(&fresh).await.unwrap();

        // `m` still carries the original version.
        let stale = store.update_meeting(&m).await;
        assert!(matches!(stale, Err(StorageError::Conflict(_))));
    }

    #[tokio::test]
    async fn impediment_roundtrip_and_listing() {
        let (_dir, mut store) = store().await;
        let mut imp = Impediment::new(
            "Blocked on an API key",
            Priority::Medium,
            PersonId::new("7"),
            None,
            None,
        )
        .unwrap();
        store.create_impediment(&imp).await.unwrap();

        imp.resolve("key issued").unwrap();
        let updated = store.update_impediment(&imp).await.unwrap();
        assert_eq!(updated.version, 2);

        let resolved = store
            .list_impediments_by_state(ImpedimentState::Resolved)
            .await
            .unwrap();
        assert_eq!(resolved.len(), 1);
        assert!(store
            .list_impediments_by_state(ImpedimentState::Open)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn task_and_roster_files_are_read_back() {
        let (dir, store) = store().await;
        let sprint = SprintId::new("S1");

        let tasks = vec![SprintTask {
            id: "1".to_string(),
            code: "T1".to_string(),
            title: "Import job".to_string(),
            assignee: PersonId::new("7"),
            start_date: Some("2024-01-01".parse().unwrap()),
            end_date: Some("2024-01-02".parse().unwrap()),
        }];
        let roster = vec![Personnel::new("7", "Ana", "Developer")];
        std::fs::write(
            dir.path().join("tasks").join("S1.json"),
            serde_json::to_string_pretty(&tasks).unwrap(),
        )
        .unwrap();
        std::fs::write(
            dir.path().join("roster").join("S1.json"),
            serde_json::to_string_pretty(&roster).unwrap(),
        )
        .unwrap();

        assert_eq!(store.list_tasks_for_sprint(&sprint).await.unwrap().len(), 1);
        assert_eq!(store.list_team_members(&sprint).await.unwrap().len(), 1);
        assert!(store
            .list_tasks_for_sprint(&SprintId::new("S9"))
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn events_are_listed_in_timestamp_order() {
        let (_dir, mut store) = store().await;
        let first = Event::new(ActorId::system(), "meeting_started", "daily started");
        let second = Event::new(ActorId::system(), "meeting_finished", "daily finished");
        store.append_event(&second).await.unwrap();
        store.append_event(&first).await.unwrap();

        let events = store.list_events().await.unwrap();
        assert_eq!(events.len(), 2);
        assert!(events[0].timestamp <= events[1].timestamp);
    }
}
