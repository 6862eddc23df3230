#[cfg(test)]
mod tests {
    use crate::helpers::{
        create_group, create_session, create_student, create_user, enroll, make_test_app, send,
        token_for,
    };
    use axum::http::StatusCode;
    use db::models::user::Role;
    use serial_test::serial;

    #[tokio::test]
    #[serial]
    async fn course_sessions_are_newest_first() {
        let (app, state) = make_test_app().await;
        let admin = create_user(state.db(), "root", Role::Admin).await;
        let token = token_for(state.db(), &admin).await;
        let group = create_group(state.db(), None).await;
        create_session(&app, &token, group.id, "2025-01-06").await;
        create_session(&app, &token, group.id, "2025-01-13").await;

        let uri = format!("/api/courses/{}/sessions", group.course_id);
        let (status, json) = send(&app, "GET", &uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        let sessions = json["data"].as_array().unwrap();
        assert_eq!(sessions.len(), 2);
        assert_eq!(sessions[0]["scheduled_date"], "2025-01-13");
        assert_eq!(sessions[0]["group_name"], "Group A");
        assert_eq!(sessions[0]["course_name"], "Mathematics");

        let (_, json) = send(&app, "GET", &format!("{uri}?to=2025-01-10"), Some(&token), None).await;
        assert_eq!(json["data"].as_array().unwrap().len(), 1);

        let (status, _) = send(&app, "GET", "/api/courses/999/sessions", Some(&token), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    #[serial]
    async fn course_students_list_active_enrollments_by_name() {
        let (app, state) = make_test_app().await;
        let admin = create_user(state.db(), "root", Role::Admin).await;
        let token = token_for(state.db(), &admin).await;
        let group = create_group(state.db(), None).await;
        let second = create_student(&app, &token, "S002").await;
        let first = create_student(&app, &token, "S001").await;
        create_student(&app, &token, "S003").await;
        enroll(&app, &token, group.id, second).await;
        enroll(&app, &token, group.id, first).await;

        let uri = format!("/api/courses/{}/students", group.course_id);
        let (status, json) = send(&app, "GET", &uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        let students = json["data"].as_array().unwrap();
        assert_eq!(students.len(), 2);
        assert_eq!(students[0]["full_name"], "Student S001");
        assert_eq!(students[0]["student_code"], "S001");
        assert_eq!(students[0]["group_name"], "Group A");
        assert_eq!(students[0]["enrollment_status"], "active");
        assert_eq!(students[1]["id"], second);
    }
}
