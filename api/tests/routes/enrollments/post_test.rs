#[cfg(test)]
mod tests {
    use crate::helpers::{create_group, create_student, create_user, make_test_app, send, token_for};
    use axum::http::StatusCode;
    use db::models::user::Role;
    use serde_json::json;
    use serial_test::serial;

    #[tokio::test]
    #[serial]
    async fn full_group_rejects_new_students() {
        let (app, state) = make_test_app().await;
        let admin = create_user(state.db(), "root", Role::Admin).await;
        let token = token_for(state.db(), &admin).await;
        let group = create_group(state.db(), Some(1)).await;
        let first = create_student(&app, &token, "S001").await;
        let second = create_student(&app, &token, "S002").await;

        let (status, _) = send(
            &app,
            "POST",
            "/api/enrollments",
            Some(&token),
            Some(json!({ "student_id": first, "group_id": group.id })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, _) = send(
            &app,
            "POST",
            "/api/enrollments",
            Some(&token),
            Some(json!({ "student_id": first, "group_id": group.id })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, _) = send(
            &app,
            "POST",
            "/api/enrollments",
            Some(&token),
            Some(json!({ "student_id": second, "group_id": group.id })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    #[serial]
    async fn bulk_enroll_reports_each_student() {
        let (app, state) = make_test_app().await;
        let admin = create_user(state.db(), "root", Role::Admin).await;
        let token = token_for(state.db(), &admin).await;
        let group = create_group(state.db(), Some(2)).await;
        let a = create_student(&app, &token, "S001").await;
        let b = create_student(&app, &token, "S002").await;
        let c = create_student(&app, &token, "S003").await;

        let (status, json) = send(
            &app,
            "POST",
            "/api/enrollments/bulk",
            Some(&token),
            Some(json!({ "group_id": group.id, "student_ids": [a, b, c, 9999] })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["created"], 2);
        assert_eq!(json["data"]["failed"], 2);
        assert_eq!(json["data"]["details"].as_array().unwrap().len(), 4);
    }
}
