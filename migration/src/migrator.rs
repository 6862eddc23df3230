use sea_orm_migration::prelude::*;

use crate::migrations;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(migrations::m202510010001_create_users::Migration),
            Box::new(migrations::m202510010002_create_auth_tokens::Migration),
            Box::new(migrations::m202510010003_create_courses::Migration),
            Box::new(migrations::m202510010004_create_teachers::Migration),
            Box::new(migrations::m202510010005_create_students::Migration),
            Box::new(migrations::m202510010006_create_groups::Migration),
            Box::new(migrations::m202510010007_create_enrollments::Migration),
            Box::new(migrations::m202510010008_create_timetable_entries::Migration),
            Box::new(migrations::m202510010009_create_sessions::Migration),
            Box::new(migrations::m202510010010_create_absence_reasons::Migration),
            Box::new(migrations::m202510010011_create_attendance_records::Migration),
            Box::new(migrations::m202510010012_create_audit_logs::Migration),
        ]
    }
}
