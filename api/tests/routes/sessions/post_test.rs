#[cfg(test)]
mod tests {
    use crate::helpers::{create_group, create_user, make_test_app, send, token_for};
    use axum::{Router, http::StatusCode};
    use db::models::user::Role;
    use serde_json::json;
    use serial_test::serial;

    async fn add_entry(app: &Router, token: &str, group_id: i64, weekday: i32) {
        let body = json!({
            "group_id": group_id,
            "weekday": weekday,
            "start_time": "08:00",
            "end_time": "09:00"
        });
        let (status, _) = send(app, "POST", "/api/timetables", Some(token), Some(body)).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    #[tokio::test]
    #[serial]
    async fn generate_creates_one_session_per_matching_day() {
        let (app, state) = make_test_app().await;
        let admin = create_user(state.db(), "root", Role::Admin).await;
        let token = token_for(state.db(), &admin).await;
        let group = create_group(state.db(), None).await;
        add_entry(&app, &token, group.id, 3).await;
        add_entry(&app, &token, group.id, 5).await;

        let body = json!({
            "group_id": group.id,
            "start_date": "2025-01-01",
            "end_date": "2025-01-10"
        });
        let (status, json) =
            send(&app, "POST", "/api/sessions/generate", Some(&token), Some(body.clone())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["created"], 4);
        assert_eq!(json["data"]["failed"], 0);
        assert_eq!(json["message"], "Generated 4 sessions successfully");

        let uri = format!("/api/sessions?group_id={}&per_page=50", group.id);
        let (_, list) = send(&app, "GET", &uri, Some(&token), None).await;
        let items = list["data"]["items"].as_array().unwrap();
        let dates: Vec<&str> = items
            .iter()
            .map(|s| s["scheduled_date"].as_str().unwrap())
            .collect();
        assert_eq!(dates, ["2025-01-01", "2025-01-03", "2025-01-08", "2025-01-10"]);
        assert!(items.iter().all(|s| s["status"] == "planned"));

        let (status, json) =
            send(&app, "POST", "/api/sessions/generate", Some(&token), Some(body)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["created"], 0);
        assert_eq!(json["data"]["skipped"], 4);
    }

    #[tokio::test]
    #[serial]
    async fn generate_rejects_bad_ranges_and_unknown_groups() {
        let (app, state) = make_test_app().await;
        let admin = create_user(state.db(), "root", Role::Admin).await;
        let token = token_for(state.db(), &admin).await;
        let group = create_group(state.db(), None).await;

        let reversed = json!({ "group_id": group.id, "start_date": "2025-02-01", "end_date": "2025-01-01" });
        let (status, _) =
            send(&app, "POST", "/api/sessions/generate", Some(&token), Some(reversed)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let malformed = json!({ "group_id": group.id, "start_date": "01/01/2025", "end_date": "2025-01-10" });
        let (status, _) =
            send(&app, "POST", "/api/sessions/generate", Some(&token), Some(malformed)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let missing = json!({ "group_id": 9999, "start_date": "2025-01-01", "end_date": "2025-01-10" });
        let (status, _) =
            send(&app, "POST", "/api/sessions/generate", Some(&token), Some(missing)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    #[serial]
    async fn group_without_timetable_generates_nothing() {
        let (app, state) = make_test_app().await;
        let admin = create_user(state.db(), "root", Role::Admin).await;
        let token = token_for(state.db(), &admin).await;
        let group = create_group(state.db(), None).await;

        let body = json!({ "group_id": group.id, "start_date": "2025-01-01", "end_date": "2025-01-31" });
        let (status, json) =
            send(&app, "POST", "/api/sessions/generate", Some(&token), Some(body)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["created"], 0);
        assert_eq!(json["message"], "Group has no timetable entries configured");
    }

    #[tokio::test]
    #[serial]
    async fn duplicate_manual_session_conflicts_and_cancel_is_final() {
        let (app, state) = make_test_app().await;
        let admin = create_user(state.db(), "root", Role::Admin).await;
        let token = token_for(state.db(), &admin).await;
        let group = create_group(state.db(), None).await;

        let body = json!({
            "group_id": group.id,
            "scheduled_date": "2025-03-03",
            "start_time": "10:00",
            "end_time": "11:00"
        });
        let (status, created) =
            send(&app, "POST", "/api/sessions", Some(&token), Some(body.clone())).await;
        assert_eq!(status, StatusCode::CREATED);
        let (status, _) = send(&app, "POST", "/api/sessions", Some(&token), Some(body)).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let id = created["data"]["id"].as_i64().unwrap();
        let (status, json) =
            send(&app, "POST", &format!("/api/sessions/{id}/cancel"), Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["status"], "cancelled");

        let (status, _) =
            send(&app, "POST", &format!("/api/sessions/{id}/start"), Some(&token), None).await;
        assert_eq!(status, StatusCode::CONFLICT);
    }
}
