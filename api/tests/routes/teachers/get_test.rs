#[cfg(test)]
mod tests {
    use crate::helpers::{
        create_group, create_session, create_student, create_teacher, create_user, enroll,
        make_test_app, send, token_for,
    };
    use axum::http::StatusCode;
    use db::models::user::Role;
    use serde_json::json;
    use serial_test::serial;

    #[tokio::test]
    #[serial]
    async fn teacher_views_cover_assigned_groups() {
        let (app, state) = make_test_app().await;
        let admin = create_user(state.db(), "root", Role::Admin).await;
        let token = token_for(state.db(), &admin).await;
        let teacher_id = create_teacher(&app, &token, "T-01").await;
        let group = create_group(state.db(), Some(30)).await;

        let (status, _) = send(
            &app,
            "PUT",
            &format!("/api/groups/{}/teacher", group.id),
            Some(&token),
            Some(json!({ "teacher_id": teacher_id })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let slot = json!({
            "group_id": group.id,
            "weekday": 1,
            "start_time": "08:00",
            "end_time": "09:00"
        });
        let (status, _) = send(&app, "POST", "/api/timetables", Some(&token), Some(slot)).await;
        assert_eq!(status, StatusCode::CREATED);
        create_session(&app, &token, group.id, "2025-01-06").await;
        let student_id = create_student(&app, &token, "S001").await;
        enroll(&app, &token, group.id, student_id).await;

        let (status, json) = send(&app, "GET", "/api/teachers/code/T-01", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["id"], teacher_id);
        assert_eq!(json["data"]["user"]["full_name"], "Teacher T-01");

        let base = format!("/api/teachers/{teacher_id}");
        let (status, json) = send(&app, "GET", &format!("{base}/timetable"), Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        let slots = json["data"].as_array().unwrap();
        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0]["weekday_name"], "Monday");
        assert_eq!(slots[0]["group_name"], "Group A");
        assert_eq!(slots[0]["course_name"], "Mathematics");

        let (status, json) = send(
            &app,
            "GET",
            &format!("{base}/sessions?from=2025-01-01&to=2025-01-31"),
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"].as_array().unwrap().len(), 1);
        assert_eq!(json["data"][0]["group_name"], "Group A");

        let (_, json) = send(
            &app,
            "GET",
            &format!("{base}/sessions?from=2025-02-01"),
            Some(&token),
            None,
        )
        .await;
        assert!(json["data"].as_array().unwrap().is_empty());

        let (status, json) = send(&app, "GET", &format!("{base}/stats"), Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["groups"], 1);
        assert_eq!(json["data"]["active_students"], 1);
        assert_eq!(json["data"]["sessions"], 1);
    }

    #[tokio::test]
    #[serial]
    async fn unknown_teacher_and_reversed_range_are_rejected() {
        let (app, state) = make_test_app().await;
        let admin = create_user(state.db(), "root", Role::Admin).await;
        let token = token_for(state.db(), &admin).await;
        let teacher_id = create_teacher(&app, &token, "T-02").await;

        let (status, _) = send(&app, "GET", "/api/teachers/code/NOPE", Some(&token), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&app, "GET", "/api/teachers/999/stats", Some(&token), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(
            &app,
            "GET",
            &format!("/api/teachers/{teacher_id}/sessions?from=2025-02-01&to=2025-01-01"),
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
