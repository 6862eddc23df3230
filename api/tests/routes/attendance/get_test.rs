#[cfg(test)]
mod tests {
    use crate::helpers::{
        create_group, create_session, create_student, create_user, enroll, make_test_app, mark,
        send, token_for,
    };
    use axum::http::StatusCode;
    use db::models::user::Role;
    use serde_json::json;
    use serial_test::serial;

    #[tokio::test]
    #[serial]
    async fn group_report_carries_reasons_and_a_summary() {
        let (app, state) = make_test_app().await;
        let admin = create_user(state.db(), "root", Role::Admin).await;
        let token = token_for(state.db(), &admin).await;
        let group = create_group(state.db(), None).await;
        let first = create_student(&app, &token, "S001").await;
        let second = create_student(&app, &token, "S002").await;
        enroll(&app, &token, group.id, first).await;
        enroll(&app, &token, group.id, second).await;
        let session_id = create_session(&app, &token, group.id, "2025-01-06").await;

        let (status, json) = send(
            &app,
            "POST",
            "/api/absence-reasons",
            Some(&token),
            Some(json!({ "code": "med", "description": "Medical" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "{json}");
        let reason_id = json["data"]["id"].clone();

        mark(&app, &token, "present", session_id, first).await;
        let (status, json) = send(
            &app,
            "POST",
            "/api/attendance/mark-absent",
            Some(&token),
            Some(json!({ "session_id": session_id, "student_id": second })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "{json}");
        let justify = format!("/api/attendance/{}/justify", json["data"]["id"]);
        let (status, json) = send(
            &app,
            "POST",
            &justify,
            Some(&token),
            Some(json!({ "absence_reason_id": reason_id })),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{json}");

        let uri = format!("/api/attendance/report/group/{}", group.id);
        let (status, json) = send(&app, "GET", &uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::OK, "{json}");
        let data = &json["data"];
        assert_eq!(data["group_id"], group.id);
        assert_eq!(data["summary"]["total"], 2);
        assert_eq!(data["summary"]["present"], 1);
        assert_eq!(data["summary"]["excused"], 1);
        assert_eq!(data["summary"]["attendance_rate"], 50.0);

        let records = data["records"].as_array().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["student_name"], "Student S001");
        assert!(records[0]["absence_reason"].is_null());
        assert_eq!(records[1]["status"], "excused");
        assert_eq!(records[1]["absence_reason"], "Medical");

        let (status, _) = send(
            &app,
            "GET",
            &format!("{uri}?from=2025-02-01&to=2025-01-01"),
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    #[serial]
    async fn group_stats_count_active_students_and_marks() {
        let (app, state) = make_test_app().await;
        let admin = create_user(state.db(), "root", Role::Admin).await;
        let token = token_for(state.db(), &admin).await;
        let group = create_group(state.db(), None).await;
        let student_id = create_student(&app, &token, "S001").await;
        enroll(&app, &token, group.id, student_id).await;
        let session_id = create_session(&app, &token, group.id, "2025-01-06").await;
        mark(&app, &token, "late", session_id, student_id).await;

        let uri = format!("/api/attendance/stats/group/{}", group.id);
        let (status, json) = send(&app, "GET", &uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::OK, "{json}");
        assert_eq!(json["data"]["active_students"], 1);
        assert_eq!(json["data"]["total"], 1);
        assert_eq!(json["data"]["late"], 1);
        assert_eq!(json["data"]["attendance_rate"], 100.0);

        let (status, _) = send(&app, "GET", "/api/attendance/stats/group/999", Some(&token), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
