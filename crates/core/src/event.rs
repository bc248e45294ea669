//! Event model - observable record of a lifecycle transition.

use crate::id::{EventId, ImpedimentId, MeetingId};
use crate::Time;
use serde::{Deserialize, Serialize};

/// An event is appended for every lifecycle transition, so aggregations can
/// stay consistent without polling entity state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// Unique identifier
    pub id: EventId,

    /// When it happened
    pub timestamp: Time,

    /// Who performed the action
    pub actor: ActorId,

    /// What action was taken
    pub action: String,

    /// Human-readable detail
    pub detail: String,

    /// Meeting this event concerns, if any
    pub meeting: Option<MeetingId>,

    /// Impediment this event concerns, if any
    pub impediment: Option<ImpedimentId>,
}

impl Event {
    /// Create a new event.
    pub fn new(actor: ActorId, action: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            id: EventId::new(),
            timestamp: chrono::Utc::now(),
            actor,
            action: action.into(),
            detail: detail.into(),
            meeting: None,
            impediment: None,
        }
    }

    /// Tag the event with the meeting it concerns.
    pub fn for_meeting(mut self, id: MeetingId) -> Self {
        self.meeting = Some(id);
        self
    }

    /// Tag the event with the impediment it concerns.
    pub fn for_impediment(mut self, id: ImpedimentId) -> Self {
        self.impediment = Some(id);
        self
    }
}

/// Identifier for whoever performed an action (facilitator, participant,
/// or the system itself).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActorId(pub String);

impl ActorId {
    /// Create a new actor ID.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// System actor ID
    pub fn system() -> Self {
        Self("system".to_string())
    }
}
