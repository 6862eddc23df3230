#[cfg(test)]
mod tests {
    use crate::helpers::{create_user, make_test_app, send, token_for};
    use axum::http::StatusCode;
    use db::models::user::Role;
    use serial_test::serial;

    #[tokio::test]
    #[serial]
    async fn me_requires_a_token() {
        let (app, _) = make_test_app().await;
        let (status, _) = send(&app, "GET", "/api/auth/me", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    #[serial]
    async fn me_returns_the_caller() {
        let (app, state) = make_test_app().await;
        let account = create_user(state.db(), "eva", Role::Teacher).await;
        let token = token_for(state.db(), &account).await;

        let (status, json) = send(&app, "GET", "/api/auth/me", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["id"], account.id);
        assert_eq!(json["data"]["username"], "eva");
        assert!(json["data"].get("password_hash").is_none());
        assert!(json["data"]["student"].is_null());
    }
}
