//! Timetable conflict detection and session generation.
//!
//! Both routines reach the store only through [`SchedulingRepository`], so they
//! can be exercised against the in-memory repository in unit tests and against
//! SeaORM in production.

pub mod conflict;
pub mod generator;
pub mod repository;
pub mod time;

#[cfg(test)]
pub(crate) mod memory;

pub use conflict::{ConflictChecker, SlotQuery, overlaps};
pub use generator::{GenerationError, GenerationReport, GenerationRequest, SessionGenerator};
pub use repository::{NewSession, SchedulingRepository, SeaOrmSchedulingRepository};
pub use time::{SlotError, TimeFormatError, TimeSlot, normalize_time, parse_time};
