//! Meeting orchestration - roster seeding, task-overlap prefill, and the
//! lifecycle service over a meeting store.

pub mod prefill;
pub mod service;

pub use prefill::{day_summary, prefill, TaskPrefill};
pub use service::{MeetingError, MeetingService};
