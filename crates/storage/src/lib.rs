//! Storage abstraction and implementations for standup data.
//!
//! This crate defines the collaborator traits the core consumes (meeting and
//! impediment stores, task and roster sources, the event sink) together with
//! a JSON-file reference backend and an in-memory backend.

#![warn(missing_docs)]

pub mod trait_;
pub mod json_storage;
pub mod memory;

pub use trait_::{
    EventSink, ImpedimentStore, MeetingFilter, MeetingStore, Result, RosterSource, StorageError,
    TaskSource,
};
pub use json_storage::JsonStore;
pub use memory::MemoryStore;
