#[cfg(test)]
mod tests {
    use crate::helpers::{create_group, create_student, create_user, make_test_app, send, token_for};
    use axum::{Router, http::StatusCode};
    use db::models::user::Role;
    use serde_json::json;
    use serial_test::serial;

    async fn planned_session(app: &Router, token: &str, group_id: i64) -> i64 {
        let body = json!({
            "group_id": group_id,
            "scheduled_date": "2025-01-06",
            "start_time": "08:00",
            "end_time": "09:00"
        });
        let (status, json) = send(app, "POST", "/api/sessions", Some(token), Some(body)).await;
        assert_eq!(status, StatusCode::CREATED);
        json["data"]["id"].as_i64().unwrap()
    }

    #[tokio::test]
    #[serial]
    async fn marking_twice_updates_the_same_record() {
        let (app, state) = make_test_app().await;
        let admin = create_user(state.db(), "root", Role::Admin).await;
        let token = token_for(state.db(), &admin).await;
        let group = create_group(state.db(), None).await;
        let student_id = create_student(&app, &token, "S001").await;
        let session_id = planned_session(&app, &token, group.id).await;
        let body = json!({ "session_id": session_id, "student_id": student_id });

        let (status, first) = send(
            &app,
            "POST",
            "/api/attendance/mark-present",
            Some(&token),
            Some(body.clone()),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(first["data"]["status"], "present");

        let (status, second) =
            send(&app, "POST", "/api/attendance/mark-late", Some(&token), Some(body)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(second["data"]["status"], "late");
        assert_eq!(second["data"]["id"], first["data"]["id"]);
    }

    #[tokio::test]
    #[serial]
    async fn only_absences_can_be_justified() {
        let (app, state) = make_test_app().await;
        let admin = create_user(state.db(), "root", Role::Admin).await;
        let token = token_for(state.db(), &admin).await;
        let group = create_group(state.db(), None).await;
        let student_id = create_student(&app, &token, "S001").await;
        let session_id = planned_session(&app, &token, group.id).await;

        let (status, reason) = send(
            &app,
            "POST",
            "/api/absence-reasons",
            Some(&token),
            Some(json!({ "code": "med", "description": "Medical" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(reason["data"]["code"], "MED");
        let reason_id = reason["data"]["id"].as_i64().unwrap();

        let body = json!({ "session_id": session_id, "student_id": student_id });
        let (_, present) = send(
            &app,
            "POST",
            "/api/attendance/mark-present",
            Some(&token),
            Some(body.clone()),
        )
        .await;
        let record_id = present["data"]["id"].as_i64().unwrap();
        let justify_uri = format!("/api/attendance/{record_id}/justify");

        let (status, json) = send(
            &app,
            "POST",
            &justify_uri,
            Some(&token),
            Some(json!({ "absence_reason_id": reason_id })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["message"], "Only absences can be justified");

        send(&app, "POST", "/api/attendance/mark-absent", Some(&token), Some(body)).await;
        let (status, json) = send(
            &app,
            "POST",
            &justify_uri,
            Some(&token),
            Some(json!({ "absence_reason_id": reason_id, "note": "Certificate" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["status"], "excused");
        assert_eq!(json["data"]["absence_reason_id"], reason_id);
    }

    #[tokio::test]
    #[serial]
    async fn student_stats_count_present_and_late_as_attended() {
        let (app, state) = make_test_app().await;
        let admin = create_user(state.db(), "root", Role::Admin).await;
        let token = token_for(state.db(), &admin).await;
        let group = create_group(state.db(), None).await;
        let student_id = create_student(&app, &token, "S001").await;

        let dates = ["2025-01-06", "2025-01-07", "2025-01-08", "2025-01-09"];
        let marks = ["mark-present", "mark-late", "mark-absent", "mark-present"];
        for (date, mark) in dates.iter().zip(marks) {
            let (_, session) = send(
                &app,
                "POST",
                "/api/sessions",
                Some(&token),
                Some(json!({
                    "group_id": group.id,
                    "scheduled_date": date,
                    "start_time": "08:00",
                    "end_time": "09:00"
                })),
            )
            .await;
            let body = json!({ "session_id": session["data"]["id"], "student_id": student_id });
            let (status, _) =
                send(&app, "POST", &format!("/api/attendance/{mark}"), Some(&token), Some(body)).await;
            assert_eq!(status, StatusCode::CREATED);
        }

        let uri = format!("/api/attendance/student/{student_id}/stats");
        let (status, json) = send(&app, "GET", &uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["total"], 4);
        assert_eq!(json["data"]["present"], 2);
        assert_eq!(json["data"]["late"], 1);
        assert_eq!(json["data"]["absent"], 1);
        assert_eq!(json["data"]["attendance_rate"], 75.0);
    }
}
