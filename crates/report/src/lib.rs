//! Sprint reporting - attendance and impediment rollups over a sprint's
//! daily meetings.

pub mod reporter;
pub mod summary;

pub use reporter::{BasicSprintReporter, ReportError, SprintReporter};
pub use summary::{summarize, SprintDailySummary};
