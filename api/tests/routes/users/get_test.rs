#[cfg(test)]
mod tests {
    use crate::helpers::{create_user, make_test_app, send, token_for};
    use axum::http::StatusCode;
    use db::models::user::Role;
    use serial_test::serial;

    #[tokio::test]
    #[serial]
    async fn admin_lists_users() {
        let (app, state) = make_test_app().await;
        let admin = create_user(state.db(), "root", Role::Admin).await;
        create_user(state.db(), "teach", Role::Teacher).await;
        let token = token_for(state.db(), &admin).await;

        let (status, json) = send(&app, "GET", "/api/users?per_page=10", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["total"], 2);
        assert_eq!(json["data"]["items"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    #[serial]
    async fn teachers_cannot_list_users() {
        let (app, state) = make_test_app().await;
        let teacher = create_user(state.db(), "teach", Role::Teacher).await;
        let token = token_for(state.db(), &teacher).await;

        let (status, json) = send(&app, "GET", "/api/users", Some(&token), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(json["success"], false);
    }

    #[tokio::test]
    #[serial]
    async fn unknown_user_is_404() {
        let (app, state) = make_test_app().await;
        let admin = create_user(state.db(), "root", Role::Admin).await;
        let token = token_for(state.db(), &admin).await;

        let (status, _) = send(&app, "GET", "/api/users/9999", Some(&token), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
