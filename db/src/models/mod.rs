pub mod absence_reason;
pub mod attendance_record;
pub mod audit_log;
pub mod auth_token;
pub mod course;
pub mod enrollment;
pub mod group;
pub mod session;
pub mod status;
pub mod student;
pub mod teacher;
pub mod timetable_entry;
pub mod user;

pub use absence_reason::Entity as AbsenceReason;
pub use attendance_record::Entity as AttendanceRecord;
pub use audit_log::Entity as AuditLog;
pub use auth_token::Entity as AuthToken;
pub use course::Entity as Course;
pub use enrollment::Entity as Enrollment;
pub use group::Entity as Group;
pub use session::Entity as Session;
pub use student::Entity as Student;
pub use teacher::Entity as Teacher;
pub use timetable_entry::Entity as TimetableEntry;
pub use user::Entity as User;
