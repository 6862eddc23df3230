pub mod m202510010001_create_users;
pub mod m202510010002_create_auth_tokens;
pub mod m202510010003_create_courses;
pub mod m202510010004_create_teachers;
pub mod m202510010005_create_students;
pub mod m202510010006_create_groups;
pub mod m202510010007_create_enrollments;
pub mod m202510010008_create_timetable_entries;
pub mod m202510010009_create_sessions;
pub mod m202510010010_create_absence_reasons;
pub mod m202510010011_create_attendance_records;
pub mod m202510010012_create_audit_logs;
