#[cfg(test)]
mod tests {
    use crate::helpers::{TEST_PASSWORD, create_user, make_test_app, send};
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use db::models::user::Role;
    use serde_json::json;
    use serial_test::serial;
    use tower::ServiceExt;

    #[tokio::test]
    #[serial]
    async fn login_returns_a_token_pair() {
        let (app, state) = make_test_app().await;
        create_user(state.db(), "ana", Role::Teacher).await;

        let (status, json) = send(
            &app,
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "email": "ana@test.com", "password": TEST_PASSWORD })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["token_type"], "Bearer");
        assert!(json["data"]["access_token"].is_string());
        assert!(json["data"]["refresh_token"].is_string());
        assert_eq!(json["data"]["user"]["role"], "teacher");
        assert!(json["data"]["user"].get("password_hash").is_none());
    }

    #[tokio::test]
    #[serial]
    async fn sixth_failed_login_is_throttled() {
        let (app, state) = make_test_app().await;
        create_user(state.db(), "bob", Role::Teacher).await;
        let bad = json!({ "email": "bob@test.com", "password": "wrong-pw" });

        for _ in 0..5 {
            let (status, _) = send(&app, "POST", "/api/auth/login", None, Some(bad.clone())).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED);
        }

        let good = json!({ "email": "bob@test.com", "password": TEST_PASSWORD });
        let (status, json) = send(&app, "POST", "/api/auth/login", None, Some(good)).await;
        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(json["success"], false);
    }

    #[tokio::test]
    #[serial]
    async fn rotating_forwarded_for_does_not_reset_the_throttle() {
        let (app, state) = make_test_app().await;
        create_user(state.db(), "boris", Role::Teacher).await;
        let bad = json!({ "email": "boris@test.com", "password": "wrong-pw" });

        let mut statuses = Vec::new();
        for i in 0..8 {
            let req = Request::builder()
                .method("POST")
                .uri("/api/auth/login")
                .header(header::CONTENT_TYPE, "application/json")
                .header("x-forwarded-for", format!("10.9.9.{i}"))
                .body(Body::from(bad.to_string()))
                .unwrap();
            statuses.push(app.clone().oneshot(req).await.unwrap().status());
        }

        assert!(statuses[..5].iter().all(|s| *s == StatusCode::UNAUTHORIZED));
        assert!(statuses[5..].iter().all(|s| *s == StatusCode::TOO_MANY_REQUESTS));

        let good = json!({ "email": "boris@test.com", "password": TEST_PASSWORD });
        let (status, _) = send(&app, "POST", "/api/auth/login", None, Some(good)).await;
        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(state.login_throttle().tracked(), 1);
    }

    #[tokio::test]
    #[serial]
    async fn logout_revokes_the_access_token() {
        let (app, state) = make_test_app().await;
        create_user(state.db(), "carla", Role::Admin).await;

        let (_, login) = send(
            &app,
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "email": "carla@test.com", "password": TEST_PASSWORD })),
        )
        .await;
        let token = login["data"]["access_token"].as_str().unwrap().to_owned();

        let (status, _) = send(&app, "GET", "/api/auth/me", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = send(&app, "POST", "/api/auth/logout", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = send(&app, "GET", "/api/auth/me", Some(&token), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    #[serial]
    async fn refresh_issues_a_new_pair() {
        let (app, state) = make_test_app().await;
        create_user(state.db(), "dario", Role::Teacher).await;

        let (_, login) = send(
            &app,
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "email": "dario@test.com", "password": TEST_PASSWORD })),
        )
        .await;
        let refresh = login["data"]["refresh_token"].clone();

        let (status, json) = send(
            &app,
            "POST",
            "/api/auth/refresh",
            None,
            Some(json!({ "refresh_token": refresh })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_ne!(json["data"]["access_token"], login["data"]["access_token"]);
    }
}
