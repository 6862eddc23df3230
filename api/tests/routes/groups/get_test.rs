#[cfg(test)]
mod tests {
    use crate::helpers::{
        create_group, create_session, create_student, create_user, enroll, make_test_app, mark,
        send, token_for,
    };
    use axum::http::StatusCode;
    use db::models::user::Role;
    use serial_test::serial;

    #[tokio::test]
    #[serial]
    async fn group_attendance_lists_newest_sessions_first() {
        let (app, state) = make_test_app().await;
        let admin = create_user(state.db(), "root", Role::Admin).await;
        let token = token_for(state.db(), &admin).await;
        let group = create_group(state.db(), None).await;
        let student_id = create_student(&app, &token, "S001").await;
        enroll(&app, &token, group.id, student_id).await;

        let monday = create_session(&app, &token, group.id, "2025-01-06").await;
        let wednesday = create_session(&app, &token, group.id, "2025-01-08").await;
        mark(&app, &token, "present", monday, student_id).await;
        mark(&app, &token, "late", wednesday, student_id).await;

        let uri = format!("/api/groups/{}/attendance", group.id);
        let (status, json) = send(&app, "GET", &uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::OK, "{json}");
        let rows = json["data"].as_array().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["scheduled_date"], "2025-01-08");
        assert_eq!(rows[0]["status"], "late");
        assert_eq!(rows[0]["student_code"], "S001");
        assert_eq!(rows[0]["student_name"], "Student S001");
        assert_eq!(rows[1]["session_id"], monday);

        let (_, json) = send(&app, "GET", &format!("{uri}?from=2025-01-07"), Some(&token), None).await;
        assert_eq!(json["data"].as_array().unwrap().len(), 1);

        let (status, _) = send(&app, "GET", "/api/groups/999/attendance", Some(&token), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
