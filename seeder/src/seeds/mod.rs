pub mod absence_reason;
pub mod course;
pub mod group;
pub mod student;
pub mod user;
