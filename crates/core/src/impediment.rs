//! Impediment model - an independent blocker lifecycle.

use crate::error::{CoreError, Result};
use crate::id::{ImpedimentId, PersonId};
use crate::Time;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Priority of a reported impediment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    /// Blocks a participant outright
    High,
    /// Slows a participant down
    Medium,
    /// Minor annoyance
    Low,
}

impl Priority {
    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }
}

/// Lifecycle state of an impediment.
///
/// `Open → InProgress → Resolved`, with `Open → Resolved` allowed directly.
/// Resolved is terminal; there is no re-open transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImpedimentState {
    /// Reported, nobody working on it yet
    Open,
    /// A resolver is actively working on it
    InProgress,
    /// Resolved; terminal
    Resolved,
}

impl ImpedimentState {
    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            ImpedimentState::Open => "Open",
            ImpedimentState::InProgress => "InProgress",
            ImpedimentState::Resolved => "Resolved",
        }
    }

    /// Whether this state permits no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ImpedimentState::Resolved)
    }
}

/// A blocker reported by a participant, tracked independently of any
/// single meeting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Impediment {
    /// Unique identifier
    pub id: ImpedimentId,

    /// What is blocking progress
    pub description: String,

    /// Priority
    pub priority: Priority,

    /// Current lifecycle state
    pub state: ImpedimentState,

    /// Who reported it
    pub reporter: PersonId,

    /// Who is expected to resolve it, if assigned
    pub resolver: Option<PersonId>,

    /// Day it was reported
    pub reported_on: NaiveDate,

    /// Day it should be resolved by, if one was set
    pub due_date: Option<NaiveDate>,

    /// How it was resolved; non-empty exactly when `state` is Resolved
    pub resolution: Option<String>,

    /// Version counter for optimistic concurrency at the store
    pub version: u64,

    /// Creation timestamp
    pub created_at: Time,

    /// Last update timestamp
    pub updated_at: Time,
}

impl Impediment {
    /// Report a new impediment. The report date is today.
    pub fn new(
        description: impl Into<String>,
        priority: Priority,
        reporter: PersonId,
        resolver: Option<PersonId>,
        due_date: Option<NaiveDate>,
    ) -> Result<Self> {
        let description = description.into();
        if description.trim().is_empty() {
            return Err(CoreError::Validation(
                "impediment description must not be empty".to_string(),
            ));
        }
        let now = chrono::Utc::now();
        Ok(Self {
            id: ImpedimentId::new(),
            description,
            priority,
            state: ImpedimentState::Open,
            reporter,
            resolver,
            reported_on: now.date_naive(),
            due_date,
            resolution: None,
            version: 1,
            created_at: now,
            updated_at: now,
        })
    }

    /// Move the impediment from Open to InProgress.
    pub fn advance(&mut self) -> Result<()> {
        if self.state != ImpedimentState::Open {
            return Err(CoreError::InvalidState(format!(
                "impediment {} cannot advance from {}",
                self.id,
                self.state.as_str()
            )));
        }
        self.state = ImpedimentState::InProgress;
        self.touch();
        Ok(())
    }

    /// Resolve the impediment, recording how it was resolved.
    ///
    /// Valid from Open or InProgress. The empty-text check comes first:
    /// an empty resolution is a validation error in every state.
    pub fn resolve(&mut self, resolution: impl Into<String>) -> Result<()> {
        let resolution = resolution.into();
        if resolution.trim().is_empty() {
            return Err(CoreError::Validation(
                "resolution text must not be empty".to_string(),
            ));
        }
        if self.state.is_terminal() {
            return Err(CoreError::InvalidState(format!(
                "impediment {} is already resolved",
                self.id
            )));
        }
        self.state = ImpedimentState::Resolved;
        self.resolution = Some(resolution);
        self.touch();
        Ok(())
    }

    /// Assign a new resolver. Permitted in any non-terminal state.
    pub fn reassign(&mut self, resolver: PersonId) -> Result<()> {
        if self.state.is_terminal() {
            return Err(CoreError::InvalidState(format!(
                "impediment {} is resolved and cannot be reassigned",
                self.id
            )));
        }
        self.resolver = Some(resolver);
        self.touch();
        Ok(())
    }

    fn touch(&mut self) {
        self.updated_at = chrono::Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn impediment() -> Impediment {
        Impediment::new(
            "Staging database is down",
            Priority::High,
            PersonId::new("7"),
            None,
            None,
        )
        .unwrap()
    }

    #[test]
    fn new_rejects_empty_description() {
        let err = Impediment::new("  ", Priority::Low, PersonId::new("7"), None, None).unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[test]
    fn full_lifecycle() {
        let mut imp = impediment();
        assert_eq!(imp.state, ImpedimentState::Open);

        imp.advance().unwrap();
        assert_eq!(imp.state, ImpedimentState::InProgress);

        imp.resolve("DBA restarted the replica").unwrap();
        assert_eq!(imp.state, ImpedimentState::Resolved);
        assert_eq!(imp.resolution.as_deref(), Some("DBA restarted the replica"));
    }

    #[test]
    fn open_can_resolve_directly() {
        let mut imp = impediment();
        imp.resolve("Self-resolved overnight").unwrap();
        assert_eq!(imp.state, ImpedimentState::Resolved);
    }

    #[test]
    fn advance_only_from_open() {
        let mut imp = impediment();
        imp.advance().unwrap();
        assert!(matches!(imp.advance(), Err(CoreError::InvalidState(_))));

        let mut resolved = impediment();
        resolved.resolve("done").unwrap();
        assert!(matches!(resolved.advance(), Err(CoreError::InvalidState(_))));
    }

    #[test]
    fn resolve_rejects_empty_text_in_every_state() {
        let mut open = impediment();
        assert!(matches!(open.resolve(""), Err(CoreError::Validation(_))));

        let mut in_progress = impediment();
        in_progress.advance().unwrap();
        assert!(matches!(in_progress.resolve(" "), Err(CoreError::Validation(_))));

        let mut resolved = impediment();
        resolved.resolve("fixed by X").unwrap();
        // Still a validation error, even though the state is terminal.
        assert!(matches!(resolved.resolve(""), Err(CoreError::Validation(_))));
    }

    #[test]
    fn resolving_twice_is_invalid_state() {
        let mut imp = impediment();
        imp.advance().unwrap();
        imp.resolve("fixed by X").unwrap();

        let err = imp.resolve("again").unwrap_err();
        assert!(matches!(err, CoreError::InvalidState(_)));
        assert_eq!(imp.resolution.as_deref(), Some("fixed by X"));
    }

    #[test]
    fn reassign_in_non_terminal_states_only() {
        let mut imp = impediment();
        imp.reassign(PersonId::new("3")).unwrap();
        assert_eq!(imp.resolver, Some(PersonId::new("3")));

        imp.advance().unwrap();
        imp.reassign(PersonId::new("4")).unwrap();

        imp.resolve("unblocked").unwrap();
        assert!(matches!(
            imp.reassign(PersonId::new("5")),
            Err(CoreError::InvalidState(_))
        ));
    }
}
