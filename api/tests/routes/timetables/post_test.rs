#[cfg(test)]
mod tests {
    use crate::helpers::{create_group, create_user, make_test_app, send, token_for};
    use axum::http::StatusCode;
    use db::models::user::Role;
    use serde_json::json;
    use serial_test::serial;

    #[tokio::test]
    #[serial]
    async fn overlapping_entry_is_rejected() {
        let (app, state) = make_test_app().await;
        let admin = create_user(state.db(), "root", Role::Admin).await;
        let token = token_for(state.db(), &admin).await;
        let group = create_group(state.db(), None).await;

        let first = json!({
            "group_id": group.id,
            "weekday": 1,
            "start_time": "08:00",
            "end_time": "10:00",
            "location": "Room 1"
        });
        let (status, json) = send(&app, "POST", "/api/timetables", Some(&token), Some(first)).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["data"]["weekday_name"], "Monday");

        let overlapping = json!({
            "group_id": group.id,
            "weekday": 1,
            "start_time": "09:00",
            "end_time": "11:00"
        });
        let (status, json) =
            send(&app, "POST", "/api/timetables", Some(&token), Some(overlapping)).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(
            json["message"],
            "The group already has a timetable entry at that day and time"
        );
    }

    #[tokio::test]
    #[serial]
    async fn touching_entries_and_other_days_are_accepted() {
        let (app, state) = make_test_app().await;
        let admin = create_user(state.db(), "root", Role::Admin).await;
        let token = token_for(state.db(), &admin).await;
        let group = create_group(state.db(), None).await;

        for (weekday, start, end) in [(1, "08:00", "10:00"), (1, "10:00", "12:00"), (2, "08:00", "10:00")] {
            let body = json!({
                "group_id": group.id,
                "weekday": weekday,
                "start_time": start,
                "end_time": end
            });
            let (status, _) = send(&app, "POST", "/api/timetables", Some(&token), Some(body)).await;
            assert_eq!(status, StatusCode::CREATED, "{weekday} {start}-{end}");
        }
    }

    #[tokio::test]
    #[serial]
    async fn malformed_slots_are_bad_requests() {
        let (app, state) = make_test_app().await;
        let admin = create_user(state.db(), "root", Role::Admin).await;
        let token = token_for(state.db(), &admin).await;
        let group = create_group(state.db(), None).await;

        let cases = [
            json!({ "group_id": group.id, "weekday": 8, "start_time": "08:00", "end_time": "09:00" }),
            json!({ "group_id": group.id, "weekday": 1, "start_time": "8am", "end_time": "09:00" }),
            json!({ "group_id": group.id, "weekday": 1, "start_time": "10:00", "end_time": "09:00" }),
        ];
        for body in cases {
            let (status, _) = send(&app, "POST", "/api/timetables", Some(&token), Some(body)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
        }
    }

    #[tokio::test]
    #[serial]
    async fn validate_conflict_reports_the_clashing_entry() {
        let (app, state) = make_test_app().await;
        let admin = create_user(state.db(), "root", Role::Admin).await;
        let token = token_for(state.db(), &admin).await;
        let group = create_group(state.db(), None).await;

        let body = json!({
            "group_id": group.id,
            "weekday": 3,
            "start_time": "08:00",
            "end_time": "09:00"
        });
        let (_, created) = send(&app, "POST", "/api/timetables", Some(&token), Some(body)).await;
        let entry_id = created["data"]["id"].as_i64().unwrap();

        let dry_run = json!({
            "group_id": group.id,
            "weekday": 3,
            "start_time": "08:30",
            "end_time": "09:30"
        });
        let (status, json) = send(
            &app,
            "POST",
            "/api/timetables/validate-conflict",
            Some(&token),
            Some(dry_run),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["has_conflict"], true);
        assert_eq!(json["data"]["conflicting_entry"]["id"], entry_id);

        let excluded = json!({
            "group_id": group.id,
            "weekday": 3,
            "start_time": "08:30",
            "end_time": "09:30",
            "exclude_id": entry_id
        });
        let (_, json) = send(
            &app,
            "POST",
            "/api/timetables/validate-conflict",
            Some(&token),
            Some(excluded),
        )
        .await;
        assert_eq!(json["data"]["has_conflict"], false);
        assert!(json["data"]["conflicting_entry"].is_null());
    }
}
