pub mod auth;

pub mod users;

pub mod courses;

pub mod enrollments;

pub mod system;

pub mod professor;

pub mod student;

pub mod blockchain;

use actix_web::HttpResponse;

use crate::models::{ApiResponse, ErrorCode};

pub use auth::configure_auth_routes;
pub use blockchain::configure_blockchain_routes;
pub use courses::configure_course_routes;
pub use enrollments::configure_enrollment_routes;
pub use professor::configure_professor_routes;
pub use student::configure_student_routes;
pub use system::configure_system_routes;
pub use users::configure_user_routes;

/// 注册全部 API 路由
pub fn configure_api_routes(cfg: &mut actix_web::web::ServiceConfig) {
    configure_auth_routes(cfg);
    configure_user_routes(cfg);
    configure_course_routes(cfg);
    configure_enrollment_routes(cfg);
    configure_system_routes(cfg);
    configure_professor_routes(cfg);
    configure_student_routes(cfg);
    configure_blockchain_routes(cfg);
}

// RequireJWT 之后理论上一定有用户
pub(crate) fn unauthorized() -> HttpResponse {
    HttpResponse::Unauthorized().json(ApiResponse::error_empty(
        ErrorCode::Unauthorized,
        "Authentication required",
    ))
}
