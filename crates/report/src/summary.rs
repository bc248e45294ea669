//! Sprint summary aggregation.

use serde::Serialize;
use standup_core::{DailyMeeting, Impediment, ImpedimentState, MeetingId, MeetingState};

/// Rollup of a sprint's daily meetings and the impediment backlog.
///
/// Derived on demand, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SprintDailySummary {
    /// Number of meetings held or scheduled
    pub total_meetings: usize,

    /// Meetings that reached Completed
    pub completed_meetings: usize,

    /// Average attendance percentage, rounded to the nearest integer
    pub average_attendance_pct: u32,

    /// Impediments not yet resolved
    pub open_impediments: usize,

    /// Most recent meeting, by date then creation time
    pub latest_meeting: Option<MeetingId>,
}

/// Compute the rollup for a collection of meetings and impediments.
///
/// Tolerates empty input: all counters zero, no division by zero. A meeting
/// with an empty roster contributes 0% attendance.
pub fn summarize(meetings: &[DailyMeeting], impediments: &[Impediment]) -> SprintDailySummary {
    let total_meetings = meetings.len();
    let completed_meetings = meetings
        .iter()
        .filter(|m| m.state() == MeetingState::Completed)
        .count();

    let average_attendance_pct = if total_meetings == 0 {
        0
    } else {
        let sum: f64 = meetings
            .iter()
            .map(|m| {
                if m.responses.is_empty() {
                    0.0
                } else {
                    m.attending_count() as f64 / m.responses.len() as f64 * 100.0
                }
            })
            .sum();
        (sum / total_meetings as f64).round() as u32
    };

    let open_impediments = impediments
        .iter()
        .filter(|i| i.state != ImpedimentState::Resolved)
        .count();

    let latest_meeting = meetings
        .iter()
        .max_by(|a, b| a.date.cmp(&b.date).then(a.created_at.cmp(&b.created_at)))
        .map(|m| m.id);

    SprintDailySummary {
        total_meetings,
        completed_meetings,
        average_attendance_pct,
        open_impediments,
        latest_meeting,
    }
}
