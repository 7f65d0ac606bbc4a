//! Attendance validation core: geofence math, fail-closed rule
//! predicates, the weighted confidence scorer, and the daily
//! check-in/check-out state machine. Everything here is pure and
//! synchronous; persistence and other I/O stay with the callers.

pub mod geo;
pub mod lifecycle;
pub mod rules;
pub mod score;
