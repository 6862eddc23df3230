pub mod app;
pub mod request;

pub use app::{
    TEST_PASSWORD, create_group, create_session, create_student, create_teacher, create_user,
    enroll, make_test_app, mark, token_for,
};
pub use request::send;
