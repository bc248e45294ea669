//! Personnel reference data, owned by the external HR system.

use crate::id::PersonId;
use serde::{Deserialize, Serialize};

/// A team member, referenced by meetings and impediments.
///
/// Read-only from this crate's perspective; the external system is the
/// source of truth for names and roles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Personnel {
    /// External identifier
    pub id: PersonId,

    /// Display name
    pub name: String,

    /// Role within the team
    pub role: String,
}

impl Personnel {
    /// Create a personnel record.
    pub fn new(id: impl Into<String>, name: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            id: PersonId::new(id),
            name: name.into(),
            role: role.into(),
        }
    }
}
