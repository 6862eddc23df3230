use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct CreateAbsenceReasonRequest {
    #[validate(length(min = 1, max = 20, message = "Code must be between 1 and 20 characters"))]
    pub code: String,

    #[validate(length(min = 1, max = 255, message = "Description must be between 1 and 255 characters"))]
    pub description: String,
}

#[derive(Debug, Default, Deserialize, Serialize, Validate)]
pub struct UpdateAbsenceReasonRequest {
    #[validate(length(min = 1, max = 20, message = "Code must be between 1 and 20 characters"))]
    pub code: Option<String>,

    #[validate(length(min = 1, max = 255, message = "Description must be between 1 and 255 characters"))]
    pub description: Option<String>,
}

impl UpdateAbsenceReasonRequest {
    pub fn is_empty(&self) -> bool {
        self.code.is_none() && self.description.is_none()
    }
}

pub const DUPLICATE_MESSAGE: &str = "An absence reason with this code already exists";
