#[cfg(test)]
mod tests {
    use crate::helpers::{
        create_group, create_session, create_student, create_user, enroll, make_test_app, mark,
        send, token_for,
    };
    use axum::http::StatusCode;
    use db::models::user::Role;
    use serial_test::serial;

    /// Two sessions (Mon 6th and Wed 8th of January 2025) with two students.
    /// S001 is absent twice, S002 is present then late.
    async fn seed_week(app: &axum::Router, state: &util::state::AppState, token: &str) -> i64 {
        let group = create_group(state.db(), None).await;
        let first = create_student(app, token, "S001").await;
        let second = create_student(app, token, "S002").await;
        enroll(app, token, group.id, first).await;
        enroll(app, token, group.id, second).await;

        let monday = create_session(app, token, group.id, "2025-01-06").await;
        let wednesday = create_session(app, token, group.id, "2025-01-08").await;
        mark(app, token, "absent", monday, first).await;
        mark(app, token, "absent", wednesday, first).await;
        mark(app, token, "present", monday, second).await;
        mark(app, token, "late", wednesday, second).await;
        first
    }

    #[tokio::test]
    #[serial]
    async fn week_is_monday_based_and_zero_filled() {
        let (app, state) = make_test_app().await;
        let admin = create_user(state.db(), "root", Role::Admin).await;
        let token = token_for(state.db(), &admin).await;
        seed_week(&app, &state, &token).await;

        let (status, json) =
            send(&app, "GET", "/api/dashboard/week?date=2025-01-08", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK, "{json}");
        assert_eq!(json["data"]["from"], "2025-01-06");
        assert_eq!(json["data"]["to"], "2025-01-12");
        let days = json["data"]["days"].as_array().unwrap();
        assert_eq!(days.len(), 7);
        assert_eq!(days[0]["weekday_name"], "Monday");
        assert_eq!(days[0]["total"], 2);
        assert_eq!(days[1]["total"], 0);
        assert_eq!(days[2]["late"], 1);

        let (status, _) =
            send(&app, "GET", "/api/dashboard/week?date=yesterday", Some(&token), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    #[serial]
    async fn month_summarises_recorded_days() {
        let (app, state) = make_test_app().await;
        let admin = create_user(state.db(), "root", Role::Admin).await;
        let token = token_for(state.db(), &admin).await;
        seed_week(&app, &state, &token).await;

        let (status, json) = send(
            &app,
            "GET",
            "/api/dashboard/month?month=1&year=2025",
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{json}");
        assert_eq!(json["data"]["from"], "2025-01-01");
        assert_eq!(json["data"]["to"], "2025-01-31");
        assert_eq!(json["data"]["summary"]["total"], 4);
        assert_eq!(json["data"]["summary"]["absent"], 2);
        assert_eq!(json["data"]["days"].as_array().unwrap().len(), 2);

        let (status, json) = send(
            &app,
            "GET",
            "/api/dashboard/month?month=13&year=2025",
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["message"], "month must be between 1 and 12");
    }

    #[tokio::test]
    #[serial]
    async fn rankings_order_groups_and_absentees() {
        let (app, state) = make_test_app().await;
        let admin = create_user(state.db(), "root", Role::Admin).await;
        let token = token_for(state.db(), &admin).await;
        let absentee = seed_week(&app, &state, &token).await;

        let (status, json) =
            send(&app, "GET", "/api/dashboard/active-groups", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK, "{json}");
        let groups = json["data"].as_array().unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0]["group_name"], "Group A");
        assert_eq!(groups[0]["course_name"], "Mathematics");
        assert_eq!(groups[0]["sessions"], 2);

        let (status, json) =
            send(&app, "GET", "/api/dashboard/most-absent?limit=1", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK, "{json}");
        let students = json["data"].as_array().unwrap();
        assert_eq!(students.len(), 1);
        assert_eq!(students[0]["student_id"], absentee);
        assert_eq!(students[0]["student_code"], "S001");
        assert_eq!(students[0]["absences"], 2);
        assert_eq!(students[0]["absence_rate"], 100.0);

        let (_, json) = send(
            &app,
            "GET",
            "/api/dashboard/most-absent?from=2025-01-07",
            Some(&token),
            None,
        )
        .await;
        assert_eq!(json["data"][0]["absences"], 1);
    }
}
