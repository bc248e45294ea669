//! Standup core data models.
//!
//! This crate defines the entities and lifecycle rules for daily-meeting
//! orchestration and impediment tracking: meetings whose state is derived
//! from their timestamps, participant responses edited in place, and
//! impediments with an independent Open → InProgress → Resolved machine.

#![warn(missing_docs)]

// Core identities
mod id;

// Externally-owned reference data
mod personnel;
mod sprint_task;

// Meeting and responses
mod meeting;

// Impediment lifecycle
mod impediment;

// Transition observability
mod event;

// Errors
mod error;

// Re-exports
pub use id::*;

pub use personnel::Personnel;
pub use sprint_task::SprintTask;

pub use meeting::{DailyMeeting, MeetingState, ParticipantResponse, ResponseField};
pub use impediment::{Impediment, ImpedimentState, Priority};
pub use event::{ActorId, Event};
pub use error::{CoreError, Result};

/// Timestamp type
pub type Time = chrono::DateTime<chrono::Utc>;
