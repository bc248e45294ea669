//! Task-overlap prefill.
//!
//! Seeds a participant's "yesterday"/"today" answers from the sprint tasks
//! assigned to them whose date range covers the relevant day. Seeding never
//! overwrites text a user already entered.

use chrono::NaiveDate;
use standup_core::{DailyMeeting, PersonId, SprintTask};

/// Prefill text for one participant on one reporting date.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPrefill {
    /// Suggested "what I did yesterday" text
    pub yesterday: String,

    /// Suggested "what I will do today" text
    pub today: String,
}

/// Compute prefill text for a participant.
///
/// "Yesterday" is the day before the reporting date; when no predecessor
/// exists the yesterday block stays empty. An empty match set yields an
/// empty string, never an error.
pub fn prefill(tasks: &[SprintTask], assignee: &PersonId, reporting_date: NaiveDate) -> TaskPrefill {
    let yesterday = reporting_date
        .pred_opt()
        .map(|day| day_summary(tasks, assignee, day))
        .unwrap_or_default();
    let today = day_summary(tasks, assignee, reporting_date);
    TaskPrefill { yesterday, today }
}

/// One "`CODE — TITLE`" line per task assigned to `assignee` whose range
/// covers `day`, newline-joined, in the given task order.
pub fn day_summary(tasks: &[SprintTask], assignee: &PersonId, day: NaiveDate) -> String {
    tasks
        .iter()
        .filter(|t| &t.assignee == assignee && t.covers(day))
        .map(|t| format!("{} — {}", t.code, t.title))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Seed every response of a meeting from its sprint's tasks.
///
/// A field is written only when it is currently empty; user edits are never
/// overwritten.
pub fn apply(meeting: &mut DailyMeeting, tasks: &[SprintTask]) {
    let date = meeting.date;
    for response in &mut meeting.responses {
        let suggested = prefill(tasks, &response.person_id, date);
        if response.yesterday.is_empty() {
            response.yesterday = suggested.yesterday;
        }
        if response.today.is_empty() {
            response.today = suggested.today;
        }
    }
}
