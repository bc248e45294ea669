//! Impediment lifecycle service.
//!
//! Impediments are tracked independently of the meeting that originated
//! them. Each transition returns the updated entity and appends an event,
//! so aggregations stay consistent without polling.

use std::sync::Arc;

use chrono::NaiveDate;
use standup_core::{
    ActorId, CoreError, Event, Impediment, ImpedimentId, ImpedimentState, PersonId, Priority,
};
use standup_storage::{EventSink, ImpedimentStore, StorageError};
use tokio::sync::Mutex;
use tracing::info;

/// Errors from impediment tracking.
#[derive(Debug, thiserror::Error)]
pub enum ImpedimentError {
    /// Validation or lifecycle rule violation
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Persistence failure
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Tracks impediments over a store.
pub struct ImpedimentService<S> {
    store: Arc<Mutex<S>>,
    actor: ActorId,
}

impl<S> ImpedimentService<S>
where
    S: ImpedimentStore + EventSink,
{
    /// Create a new impediment service acting as the system.
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

    /// Report a new impediment.
    pub async fn report(
        &self,
        description: impl Into<String>,
        priority: Priority,
        reporter: PersonId,
        resolver: Option<PersonId>,
        due_date: Option<NaiveDate>,
    ) -> Result<Impediment, ImpedimentError> {
        let impediment = Impediment::new(description, priority, reporter, resolver, due_date)?;

        let mut store = self.store.lock().await;
        let created = store.create_impediment(&impediment).await?;

        let event = Event::new(
            self.actor.clone(),
            "impediment_reported",
            format!("{} priority: {}", created.priority.as_str(), created.description),
        )
        .for_impediment(created.id);
        store.append_event(&event).await?;

        info!(impediment = %created.id, priority = created.priority.as_str(), "impediment reported");
        Ok(created)
    }

    /// Move an impediment from Open to InProgress.
    pub async fn advance(&self, id: ImpedimentId) -> Result<Impediment, ImpedimentError> {
        let mut store = self.store.lock().await;
        let mut impediment = store.get_impediment(id).await?;
        impediment.advance()?;
        let updated = store.update_impediment(&impediment).await?;

        let event = Event::new(self.actor.clone(), "impediment_advanced", "work started")
            .for_impediment(id);
        store.append_event(&event).await?;

        info!(impediment = %id, "impediment advanced");
        Ok(updated)
    }

    /// Resolve an impediment, recording how it was resolved.
    pub async fn resolve(
        &self,
        id: ImpedimentId,
        resolution: impl Into<String>,
    ) -> Result<Impediment, ImpedimentError> {
        let mut store = self.store.lock().await;
        let mut impediment = store.get_impediment(id).await?;
        impediment.resolve(resolution)?;
        let updated = store.update_impediment(&impediment).await?;

        let event = Event::new(
            self.actor.clone(),
            "impediment_resolved",
            updated.resolution.clone().unwrap_or_default(),
        )
        .for_impediment(id);
        store.append_event(&event).await?;

        info!(impediment = %id, "impediment resolved");
        Ok(updated)
    }

    /// Assign a new resolver.
    pub async fn reassign(
        &self,
        id: ImpedimentId,
        resolver: PersonId,
    ) -> Result<Impediment, ImpedimentError> {
        let mut store = self.store.lock().await;
        let mut impediment = store.get_impediment(id).await?;
        impediment.reassign(resolver.clone())?;
        let updated = store.update_impediment(&impediment).await?;

        let event = Event::new(
            self.actor.clone(),
            "impediment_reassigned",
            format!("assigned to {}", resolver),
        )
        .for_impediment(id);
        store.append_event(&event).await?;
        Ok(updated)
    }

    /// Load an impediment.
    pub async fn get(&self, id: ImpedimentId) -> Result<Impediment, ImpedimentError> {
        Ok(self.store.lock().await.get_impediment(id).await?)
    }

    /// List all impediments.
    pub async fn list(&self) -> Result<Vec<Impediment>, ImpedimentError> {
        Ok(self.store.lock().await.list_impediments().await?)
    }

    /// List impediments in a given state.
    pub async fn list_by_state(
        &self,
        state: ImpedimentState,
    ) -> Result<Vec<Impediment>, ImpedimentError> {
        Ok(self.store.lock().await.list_impediments_by_state(state).await?)
    }

    /// List all recorded lifecycle events.
    pub async fn events(&self) -> Result<Vec<Event>, ImpedimentError> {
        Ok(self.store.lock().await.list_events().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use standup_storage::MemoryStore;

    fn service() -> ImpedimentService<MemoryStore> {
        ImpedimentService::new(MemoryStore::new())
    }

    #[tokio::test]
    async fn report_advance_resolve_lifecycle() {
        let service = service();
        let imp = service
            .report(
                "Staging database is down",
                Priority::High,
                PersonId::new("7"),
                None,
                None,
            )
            .await
            .unwrap();
        assert_eq!(imp.state, ImpedimentState::Open);

        let imp = service.advance(imp.id).await.unwrap();
        assert_eq!(imp.state, ImpedimentState::InProgress);

        let imp = service.resolve(imp.id, "fixed by X").await.unwrap();
        assert_eq!(imp.state, ImpedimentState::Resolved);
        assert_eq!(imp.resolution.as_deref(), Some("fixed by X"));
    }

    #[tokio::test]
    async fn resolving_twice_surfaces_invalid_state() {
        let service = service();
        let imp = service
            .report("Blocked on review", Priority::Medium, PersonId::new("7"), None, None)
            .await
            .unwrap();
        service.resolve(imp.id, "approved").await.unwrap();

        let err = service.resolve(imp.id, "again").await.unwrap_err();
        assert!(matches!(
            err,
            ImpedimentError::Core(CoreError::InvalidState(_))
        ));
    }

    #[tokio::test]
    async fn empty_description_or_resolution_is_validation() {
        let service = service();
        let err = service
            .report("  ", Priority::Low, PersonId::new("7"), None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, ImpedimentError::Core(CoreError::Validation(_))));

        let imp = service
            .report("Real blocker", Priority::Low, PersonId::new("7"), None, None)
            .await
            .unwrap();
        let err = service.resolve(imp.id, "").await.unwrap_err();
        assert!(matches!(err, ImpedimentError::Core(CoreError::Validation(_))));
    }

    #[tokio::test]
    async fn every_transition_appends_one_event() {
        let service = service();
        let imp = service
            .report("CI runner offline", Priority::High, PersonId::new("7"), None, None)
            .await
            .unwrap();
        service.reassign(imp.id, PersonId::new("3")).await.unwrap();
        service.advance(imp.id).await.unwrap();
        service.resolve(imp.id, "runner replaced").await.unwrap();

        let events = service.events().await.unwrap();
        let actions: Vec<&str> = events.iter().map(|e| e.action.as_str()).collect();
        assert_eq!(
            actions,
            vec![
                "impediment_reported",
                "impediment_reassigned",
                "impediment_advanced",
                "impediment_resolved",
            ]
        );
        assert!(events.iter().all(|e| e.impediment == Some(imp.id)));
    }

    #[tokio::test]
    async fn failed_transitions_do_not_emit_events() {
        let service = service();
        let imp = service
            .report("Blocked on access", Priority::Low, PersonId::new("7"), None, None)
            .await
            .unwrap();
        service.advance(imp.id).await.unwrap();
        let _ = service.advance(imp.id).await.unwrap_err();

        let events = service.events().await.unwrap();
        assert_eq!(events.len(), 2);
    }
}
