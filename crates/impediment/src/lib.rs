//! Impediment tracking - the blocker lifecycle service over a store.

pub mod service;

pub use service::{ImpedimentError, ImpedimentService};
