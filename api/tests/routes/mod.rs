mod attendance;
mod auth;
mod courses;
mod dashboard;
mod enrollments;
mod groups;
mod health_test;
mod sessions;
mod teachers;
mod timetables;
mod users;
