#[cfg(test)]
mod tests {
    use crate::helpers::{TEST_PASSWORD, create_user, make_test_app, send, token_for};
    use axum::http::StatusCode;
    use db::models::user::Role;
    use serde_json::json;
    use serial_test::serial;

    #[tokio::test]
    #[serial]
    async fn suspended_user_can_no_longer_log_in() {
        let (app, state) = make_test_app().await;
        let admin = create_user(state.db(), "root", Role::Admin).await;
        let token = token_for(state.db(), &admin).await;
        let tina = create_user(state.db(), "tina", Role::Teacher).await;

        let uri = format!("/api/users/{}/status", tina.id);
        let (status, json) = send(
            &app,
            "PATCH",
            &uri,
            Some(&token),
            Some(json!({ "status": "suspended" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["status"], "suspended");

        let login = json!({ "email": "tina@test.com", "password": TEST_PASSWORD });
        let (status, _) = send(&app, "POST", "/api/auth/login", None, Some(login)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = send(
            &app,
            "PATCH",
            "/api/users/999/status",
            Some(&token),
            Some(json!({ "status": "active" })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    #[serial]
    async fn password_change_requires_the_current_password() {
        let (app, state) = make_test_app().await;
        let admin = create_user(state.db(), "root", Role::Admin).await;
        let token = token_for(state.db(), &admin).await;
        let uma = create_user(state.db(), "uma", Role::Teacher).await;
        let uri = format!("/api/users/{}/password", uma.id);

        let (status, json) = send(
            &app,
            "PATCH",
            &uri,
            Some(&token),
            Some(json!({ "current_password": "not-it", "new_password": "newpass1" })),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(json["message"], "Current password is incorrect");

        let (status, _) = send(
            &app,
            "PATCH",
            &uri,
            Some(&token),
            Some(json!({ "current_password": TEST_PASSWORD, "new_password": "abc" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(
            &app,
            "PATCH",
            &uri,
            Some(&token),
            Some(json!({ "current_password": TEST_PASSWORD, "new_password": "newpass1" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = send(
            &app,
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "email": "uma@test.com", "password": "newpass1" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }
}
