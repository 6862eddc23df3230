#[cfg(test)]
mod tests {
    use crate::helpers::{create_group, create_user, make_test_app, send, token_for};
    use axum::http::StatusCode;
    use db::models::user::Role;
    use serde_json::{Value, json};
    use serial_test::serial;

    async fn create_entry(
        app: &axum::Router,
        token: &str,
        group_id: i64,
        weekday: i32,
        start: &str,
        end: &str,
    ) -> Value {
        let body = json!({
            "group_id": group_id,
            "weekday": weekday,
            "start_time": start,
            "end_time": end
        });
        let (status, json) = send(app, "POST", "/api/timetables", Some(token), Some(body)).await;
        assert_eq!(status, StatusCode::CREATED, "{json}");
        json["data"].clone()
    }

    #[tokio::test]
    #[serial]
    async fn resaving_the_same_slot_does_not_conflict_with_itself() {
        let (app, state) = make_test_app().await;
        let admin = create_user(state.db(), "root", Role::Admin).await;
        let token = token_for(state.db(), &admin).await;
        let group = create_group(state.db(), None).await;
        let entry = create_entry(&app, &token, group.id, 3, "08:00", "10:00").await;
        let uri = format!("/api/timetables/{}", entry["id"]);

        let same = json!({ "weekday": 3, "start_time": "08:00", "end_time": "10:00" });
        let (status, json) = send(&app, "PUT", &uri, Some(&token), Some(same)).await;
        assert_eq!(status, StatusCode::OK, "{json}");

        let (status, json) = send(
            &app,
            "PUT",
            &uri,
            Some(&token),
            Some(json!({ "location": "Lab 2" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["location"], "Lab 2");
        assert_eq!(json["data"]["start_time"], "08:00:00");
        assert_eq!(json["data"]["weekday_name"], "Wednesday");
    }

    #[tokio::test]
    #[serial]
    async fn partial_update_is_checked_against_sibling_entries() {
        let (app, state) = make_test_app().await;
        let admin = create_user(state.db(), "root", Role::Admin).await;
        let token = token_for(state.db(), &admin).await;
        let group = create_group(state.db(), None).await;
        create_entry(&app, &token, group.id, 1, "08:00", "10:00").await;
        let second = create_entry(&app, &token, group.id, 1, "10:00", "12:00").await;
        let uri = format!("/api/timetables/{}", second["id"]);

        // Only the start moves; the stored end time is merged in.
        let (status, json) = send(
            &app,
            "PUT",
            &uri,
            Some(&token),
            Some(json!({ "start_time": "09:30" })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(
            json["message"],
            "The group already has a timetable entry at that day and time"
        );

        let (status, json) = send(
            &app,
            "PUT",
            &uri,
            Some(&token),
            Some(json!({ "weekday": 2, "start_time": "09:30" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{json}");
        assert_eq!(json["data"]["weekday"], 2);
        assert_eq!(json["data"]["end_time"], "12:00:00");
    }

    #[tokio::test]
    #[serial]
    async fn empty_body_and_inverted_merge_are_bad_requests() {
        let (app, state) = make_test_app().await;
        let admin = create_user(state.db(), "root", Role::Admin).await;
        let token = token_for(state.db(), &admin).await;
        let group = create_group(state.db(), None).await;
        let entry = create_entry(&app, &token, group.id, 5, "14:00", "15:00").await;
        let uri = format!("/api/timetables/{}", entry["id"]);

        let (status, json) = send(&app, "PUT", &uri, Some(&token), Some(json!({}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["message"], "No data to update");

        // A new start after the stored end inverts the merged slot.
        let (status, _) = send(
            &app,
            "PUT",
            &uri,
            Some(&token),
            Some(json!({ "start_time": "16:00" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    #[serial]
    async fn unknown_entry_is_not_found() {
        let (app, state) = make_test_app().await;
        let admin = create_user(state.db(), "root", Role::Admin).await;
        let token = token_for(state.db(), &admin).await;

        let (status, _) = send(
            &app,
            "PUT",
            "/api/timetables/999",
            Some(&token),
            Some(json!({ "location": "Nowhere" })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
