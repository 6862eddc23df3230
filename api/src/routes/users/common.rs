use db::models::status::LifecycleStatus;
use db::models::user::Role;
use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 3, max = 50, message = "Username must be between 3 and 50 characters"))]
    pub username: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 6, max = 64, message = "Password must be between 6 and 64 characters"))]
    pub password: String,

    #[validate(length(min = 1, max = 120, message = "Full name is required"))]
    pub full_name: String,

    pub role: Role,

    pub status: Option<LifecycleStatus>,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 3, max = 50, message = "Username must be between 3 and 50 characters"))]
    pub username: Option<String>,

    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    #[validate(length(min = 6, max = 64, message = "Password must be between 6 and 64 characters"))]
    pub password: Option<String>,

    #[validate(length(min = 1, max = 120, message = "Full name cannot be empty"))]
    pub full_name: Option<String>,

    pub role: Option<Role>,

    pub status: Option<LifecycleStatus>,
}

impl UpdateUserRequest {
    pub fn is_empty(&self) -> bool {
        self.username.is_none()
            && self.email.is_none()
            && self.password.is_none()
            && self.full_name.is_none()
            && self.role.is_none()
            && self.status.is_none()
    }
}

/// Filters read alongside `ListParams` from the same query string.
#[derive(Debug, Deserialize)]
pub struct UserFilters {
    pub role: Option<Role>,
    pub status: Option<LifecycleStatus>,
}

#[derive(Debug, Deserialize)]
pub struct ChangeStatusRequest {
    pub status: LifecycleStatus,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "current_password is required"))]
    pub current_password: String,

    #[validate(length(min = 6, max = 12, message = "New password must be between 6 and 12 characters"))]
    pub new_password: String,
}
