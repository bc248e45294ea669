//! Daily meeting model - lifecycle derived from its timestamps.

use crate::error::{CoreError, Result};
use crate::id::{ImpedimentId, MeetingId, PersonId, ResponseId, SprintId};
use crate::impediment::Impediment;
use crate::personnel::Personnel;
use crate::Time;
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// Lifecycle state of a daily meeting.
///
/// Never stored: always derived from the presence of the start and end
/// timestamps via [`DailyMeeting::state`], so the stored fields and the
/// state can never disagree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MeetingState {
    /// Created, not yet started
    Pending,
    /// Started, not yet finished
    InProgress,
    /// Started and finished
    Completed,
}

impl MeetingState {
    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            MeetingState::Pending => "Pending",
            MeetingState::InProgress => "InProgress",
            MeetingState::Completed => "Completed",
        }
    }
}

/// The free-text fields of a participant response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResponseField {
    /// "What I did yesterday"
    Yesterday,
    /// "What I will do today"
    Today,
    /// Reason given for an absence
    AbsenceReason,
}

/// One participant's entry in a daily meeting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticipantResponse {
    /// Unique identifier
    pub id: ResponseId,

    /// Team member this response belongs to
    pub person_id: PersonId,

    /// Display name, denormalized from the roster at creation time
    pub display_name: String,

    /// Whether the member attended
    pub attended: bool,

    /// Reason for an absence; empty whenever `attended` is true
    pub absence_reason: String,

    /// "What I did yesterday"
    pub yesterday: String,

    /// "What I will do today"
    pub today: String,

    /// Blocker reported during this meeting, if any
    pub impediment: Option<Impediment>,
}

impl ParticipantResponse {
    /// Create an empty response for a roster member, attending by default.
    pub fn new(member: &Personnel) -> Self {
        Self {
            id: ResponseId::new(),
            person_id: member.id.clone(),
            display_name: member.name.clone(),
            attended: true,
            absence_reason: String::new(),
            yesterday: String::new(),
            today: String::new(),
            impediment: None,
        }
    }
}

/// A daily standup meeting within a sprint.
///
/// The meeting is the draft object: callers mutate it only through the
/// methods below and persist it whole. It is owned by its sprint for its
/// lifetime; this crate never deletes one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyMeeting {
    /// Unique identifier
    pub id: MeetingId,

    /// Owning sprint
    pub sprint_id: SprintId,

    /// Calendar date of the meeting
    pub date: NaiveDate,

    /// When the meeting actually started
    pub start_time: Option<NaiveTime>,

    /// When the meeting actually ended
    pub end_time: Option<NaiveTime>,

    /// Planned time box in minutes, if one was set
    pub planned_minutes: Option<u32>,

    /// Actual duration in minutes, computed when the meeting finishes
    pub duration_minutes: Option<i64>,

    /// Facilitator notes
    pub notes: String,

    /// Responses in roster order
    pub responses: Vec<ParticipantResponse>,

    /// Impediments raised in this meeting
    pub impediments: Vec<ImpedimentId>,

    /// Version counter for optimistic concurrency at the store
    pub version: u64,

    /// Creation timestamp
    pub created_at: Time,

    /// Last update timestamp
    pub updated_at: Time,
}

impl DailyMeeting {
    /// Create a meeting for a sprint date with one response per roster member.
    pub fn new(
        sprint_id: SprintId,
        date: NaiveDate,
        roster: &[Personnel],
        planned_minutes: Option<u32>,
    ) -> Self {
        let now = chrono::Utc::now();
        Self {
            id: MeetingId::new(),
            sprint_id,
            date,
            start_time: None,
            end_time: None,
            planned_minutes,
            duration_minutes: None,
            notes: String::new(),
            responses: roster.iter().map(ParticipantResponse::new).collect(),
            impediments: Vec::new(),
            version: 1,
            created_at: now,
            updated_at: now,
        }
    }

    /// Derive the lifecycle state from timestamp presence.
    pub fn state(&self) -> MeetingState {
        match (self.start_time, self.end_time) {
            (None, _) => MeetingState::Pending,
            (Some(_), None) => MeetingState::InProgress,
            (Some(_), Some(_)) => MeetingState::Completed,
        }
    }

    /// Mark the meeting as started.
    pub fn start(&mut self, at: NaiveTime) -> Result<()> {
        if self.start_time.is_some() {
            return Err(CoreError::InvalidState(format!(
                "meeting {} already started",
                self.id
            )));
        }
        self.start_time = Some(at);
        self.touch();
        Ok(())
    }

    /// Mark the meeting as finished and record its actual duration.
    ///
    /// The computed duration is kept separately from any planned time box.
    pub fn finish(&mut self, at: NaiveTime) -> Result<()> {
        let Some(started) = self.start_time else {
            return Err(CoreError::InvalidState(format!(
                "meeting {} has not started",
                self.id
            )));
        };
        if self.end_time.is_some() {
            return Err(CoreError::InvalidState(format!(
                "meeting {} already finished",
                self.id
            )));
        }
        if at < started {
            return Err(CoreError::Validation(format!(
                "end time {} precedes start time {}",
                at, started
            )));
        }
        self.end_time = Some(at);
        self.duration_minutes = Some((at - started).num_minutes());
        self.touch();
        Ok(())
    }

    /// Look up a participant's response.
    pub fn response(&self, person: &PersonId) -> Option<&ParticipantResponse> {
        self.responses.iter().find(|r| &r.person_id == person)
    }

    fn response_mut(&mut self, person: &PersonId) -> Result<&mut ParticipantResponse> {
        self.responses
            .iter_mut()
            .find(|r| &r.person_id == person)
            .ok_or_else(|| CoreError::Validation(format!("person {} is not on the roster", person)))
    }

    /// Record attendance for a participant.
    ///
    /// Marking someone absent keeps any standup text they already entered,
    /// so toggling attendance back on loses nothing. Marking them present
    /// clears the absence reason.
    pub fn set_attendance(
        &mut self,
        person: &PersonId,
        attended: bool,
        absence_reason: Option<String>,
    ) -> Result<()> {
        let response = self.response_mut(person)?;
        response.attended = attended;
        response.absence_reason = if attended {
            String::new()
        } else {
            absence_reason.unwrap_or_default()
        };
        self.touch();
        Ok(())
    }

    /// Update one of the free-text fields of a participant's response.
    pub fn update_field(
        &mut self,
        person: &PersonId,
        field: ResponseField,
        value: impl Into<String>,
    ) -> Result<()> {
        let response = self.response_mut(person)?;
        match field {
            ResponseField::Yesterday => response.yesterday = value.into(),
            ResponseField::Today => response.today = value.into(),
            ResponseField::AbsenceReason => response.absence_reason = value.into(),
        }
        self.touch();
        Ok(())
    }

    /// Attach or clear a participant's embedded impediment.
    ///
    /// Clearing only affects this meeting; an impediment already promoted to
    /// the global collection stays tracked there.
    pub fn set_impediment(
        &mut self,
        person: &PersonId,
        impediment: Option<Impediment>,
    ) -> Result<()> {
        self.response_mut(person)?.impediment = impediment;
        self.touch();
        Ok(())
    }

    /// Append an ad-hoc participant to the roster.
    pub fn add_participant(&mut self, member: &Personnel) -> Result<()> {
        if self.response(&member.id).is_some() {
            return Err(CoreError::Validation(format!(
                "person {} is already on the roster",
                member.id
            )));
        }
        self.responses.push(ParticipantResponse::new(member));
        self.touch();
        Ok(())
    }

    /// Remove a participant and their response.
    pub fn remove_participant(&mut self, person: &PersonId) -> Result<()> {
        let before = self.responses.len();
        self.responses.retain(|r| &r.person_id != person);
        if self.responses.len() == before {
            return Err(CoreError::Validation(format!(
                "person {} is not on the roster",
                person
            )));
        }
        self.touch();
        Ok(())
    }

    /// Record that an impediment was raised in this meeting.
    pub fn attach_impediment(&mut self, id: ImpedimentId) {
        if !self.impediments.contains(&id) {
            self.impediments.push(id);
            self.touch();
        }
    }

    /// Number of participants marked as attending.
    pub fn attending_count(&self) -> usize {
        self.responses.iter().filter(|r| r.attended).count()
    }

    /// Number of attending participants with an embedded impediment.
    pub fn with_impediment_count(&self) -> usize {
        self.responses
            .iter()
            .filter(|r| r.attended && r.impediment.is_some())
            .count()
    }

    fn touch(&mut self) {
        self.updated_at = chrono::Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::impediment::Priority;

    fn roster() -> Vec<Personnel> {
        vec![
            Personnel::new("1", "Ana", "Developer"),
            Personnel::new("2", "Luis", "Developer"),
        ]
    }

    fn meeting() -> DailyMeeting {
        DailyMeeting::new(
            SprintId::new("S1"),
            "2024-01-02".parse().unwrap(),
            &roster(),
            Some(15),
        )
    }

    fn time(s: &str) -> NaiveTime {
        NaiveTime::parse_from_str(s, "%H:%M").unwrap()
    }

    #[test]
    fn state_derivation() {
        let mut m = meeting();
        assert_eq!(m.state(), MeetingState::Pending);

        m.start(time("09:00")).unwrap();
        assert_eq!(m.state(), MeetingState::InProgress);

        m.finish(time("09:15")).unwrap();
        assert_eq!(m.state(), MeetingState::Completed);
    }

    #[test]
    fn finish_before_start_is_rejected() {
        let mut m = meeting();
        let err = m.finish(time("09:15")).unwrap_err();
        assert!(matches!(err, CoreError::InvalidState(_)));
        assert_eq!(m.state(), MeetingState::Pending);
    }

    #[test]
    fn start_twice_is_rejected() {
        let mut m = meeting();
        m.start(time("09:00")).unwrap();
        let err = m.start(time("09:05")).unwrap_err();
        assert!(matches!(err, CoreError::InvalidState(_)));
    }

    #[test]
    fn finish_computes_duration_and_keeps_planned_box() {
        let mut m = meeting();
        m.start(time("09:00")).unwrap();
        m.finish(time("09:15")).unwrap();
        assert_eq!(m.duration_minutes, Some(15));
        assert_eq!(m.planned_minutes, Some(15));
    }

    #[test]
    fn finish_earlier_than_start_is_validation_error() {
        let mut m = meeting();
        m.start(time("09:30")).unwrap();
        let err = m.finish(time("09:00")).unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
        assert_eq!(m.state(), MeetingState::InProgress);
    }

    #[test]
    fn attendance_toggle_retains_standup_text() {
        let mut m = meeting();
        let ana = PersonId::new("1");
        m.update_field(&ana, ResponseField::Yesterday, "Reviewed the import job")
            .unwrap();

        m.set_attendance(&ana, false, Some("sick".to_string())).unwrap();
        m.set_attendance(&ana, true, None).unwrap();

        let response = m.response(&ana).unwrap();
        assert_eq!(response.yesterday, "Reviewed the import job");
        assert!(response.attended);
        assert!(response.absence_reason.is_empty());
    }

    #[test]
    fn absence_reason_set_only_while_absent() {
        let mut m = meeting();
        let ana = PersonId::new("1");
        m.set_attendance(&ana, false, Some("travelling".to_string()))
            .unwrap();
        assert_eq!(m.response(&ana).unwrap().absence_reason, "travelling");

        m.set_attendance(&ana, true, Some("ignored".to_string())).unwrap();
        assert!(m.response(&ana).unwrap().absence_reason.is_empty());
    }

    #[test]
    fn counts_only_consider_attending_participants() {
        let mut m = meeting();
        let ana = PersonId::new("1");
        let luis = PersonId::new("2");

        let blocker =
            Impediment::new("CI agent offline", Priority::High, ana.clone(), None, None).unwrap();
        m.set_impediment(&ana, Some(blocker.clone())).unwrap();
        m.set_impediment(&luis, Some(blocker)).unwrap();
        m.set_attendance(&luis, false, None).unwrap();

        assert_eq!(m.attending_count(), 1);
        assert_eq!(m.with_impediment_count(), 1);
    }

    #[test]
    fn clearing_impediment_only_affects_this_meeting() {
        let mut m = meeting();
        let ana = PersonId::new("1");
        let blocker =
            Impediment::new("Waiting on access", Priority::Low, ana.clone(), None, None).unwrap();
        m.attach_impediment(blocker.id);
        m.set_impediment(&ana, Some(blocker.clone())).unwrap();

        m.set_impediment(&ana, None).unwrap();
        assert!(m.response(&ana).unwrap().impediment.is_none());
        assert_eq!(m.impediments, vec![blocker.id]);
    }

    #[test]
    fn roster_edits() {
        let mut m = meeting();
        let carmen = Personnel::new("3", "Carmen", "Analyst");
        m.add_participant(&carmen).unwrap();
        assert!(m.add_participant(&carmen).is_err());
        assert_eq!(m.responses.len(), 3);

        m.remove_participant(&carmen.id).unwrap();
        assert_eq!(m.responses.len(), 2);
        assert!(m.remove_participant(&carmen.id).is_err());
    }

    #[test]
    fn unknown_person_is_rejected() {
        let mut m = meeting();
        let nobody = PersonId::new("99");
        assert!(m.set_attendance(&nobody, true, None).is_err());
        assert!(m
            .update_field(&nobody, ResponseField::Today, "anything")
            .is_err());
    }
}
