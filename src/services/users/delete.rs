use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::UserService;
use crate::models::{ApiResponse, ErrorCode, users::entities::UserRole};

pub async fn delete_user(
    service: &UserService,
    user_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let user = match storage.get_user_by_id(user_id).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::UserNotFound,
                "User not found",
            )));
        }
        Err(e) => {
            return Ok(HttpResponse::InternalServerError().json(ApiResponse::from_error(
                ErrorCode::UserDeleteFailed,
                "User deletion failed",
                &e,
            )));
        }
    };

    if user.role == UserRole::Admin {
        match storage.count_users_by_role(UserRole::Admin).await {
            Ok(count) if count <= 1 => {
                return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
                    ErrorCode::CanNotDeleteLastAdmin,
                    "Cannot delete the last admin",
                )));
            }
            Ok(_) => {}
            Err(e) => {
                return Ok(HttpResponse::InternalServerError().json(ApiResponse::from_error(
                    ErrorCode::UserDeleteFailed,
                    "User deletion failed",
                    &e,
                )));
            }
        }
    }

    match storage.delete_user(user_id).await {
        Ok(true) => {
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("User deleted successfully")))
        }
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::UserNotFound,
            "User not found",
        ))),
        Err(e) => Ok(HttpResponse::InternalServerError().json(ApiResponse::from_error(
            ErrorCode::UserDeleteFailed,
            "User deletion failed",
            &e,
        ))),
    }
}
