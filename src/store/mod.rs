//! Persistence collaborators. The engine never touches these; every
//! query uses the runtime-checked sqlx forms and surfaces failures to
//! the caller unretried.

pub mod attendance;
pub mod device;
pub mod office;
pub mod review;
