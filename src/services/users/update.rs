use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::UserService;
use crate::models::{
    ApiResponse, ErrorCode,
    users::{
        requests::{UpdateUserRequest, UserChanges},
        responses::UserResponse,
    },
};
use crate::utils::password::hash_password_blocking;
use crate::utils::validate::{normalize_email, normalize_name, validate_password};

fn bad_request(code: ErrorCode, msg: &str) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::error_empty(code, msg))
}

pub async fn update_user(
    service: &UserService,
    user_id: i64,
    update_data: UpdateUserRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let existing = match storage.get_user_by_id(user_id).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::UserNotFound,
                "User not found",
            )));
        }
        Err(e) => {
            return Ok(HttpResponse::InternalServerError().json(ApiResponse::from_error(
                ErrorCode::UserUpdateFailed,
                "Failed to update user",
                &e,
            )));
        }
    };

    let mut changes = UserChanges {
        role: update_data.role,
        status: update_data.status,
        ..Default::default()
    };

    if let Some(firstname) = update_data.firstname.as_deref() {
        match normalize_name(firstname) {
            Ok(name) => changes.firstname = Some(name),
            Err(msg) => return Ok(bad_request(ErrorCode::UserNameInvalid, msg)),
        }
    }
    if let Some(lastname) = update_data.lastname.as_deref() {
        match normalize_name(lastname) {
            Ok(name) => changes.lastname = Some(name),
            Err(msg) => return Ok(bad_request(ErrorCode::UserNameInvalid, msg)),
        }
    }

    if let Some(email) = update_data.email.as_deref() {
        let email = match normalize_email(email) {
            Ok(email) => email,
            Err(msg) => return Ok(bad_request(ErrorCode::UserEmailInvalid, msg)),
        };
        // 邮箱未变时不做唯一性检查
        if email != existing.email {
            match storage.get_user_by_email(&email).await {
                Ok(Some(other)) if other.id != user_id => {
                    return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                        ErrorCode::UserAlreadyExists,
                        "Email already exists",
                    )));
                }
                Ok(_) => {}
                Err(e) => {
                    return Ok(HttpResponse::InternalServerError().json(
                        ApiResponse::from_error(
                            ErrorCode::UserUpdateFailed,
                            "Failed to update user",
                            &e,
                        ),
                    ));
                }
            }
            changes.email = Some(email);
        }
    }

    if let Some(role) = &changes.role
        && !role.has_chain_identity()
    {
        return Ok(bad_request(
            ErrorCode::UserRoleInvalid,
            "Role must be student or professor",
        ));
    }

    if let Some(password) = update_data.password {
        if let Err(msg) = validate_password(&password) {
            return Ok(bad_request(ErrorCode::UserPasswordInvalid, msg));
        }
        match hash_password_blocking(password).await {
            Ok(hash) => changes.password_hash = Some(hash),
            Err(e) => {
                return Ok(HttpResponse::InternalServerError().json(ApiResponse::from_error(
                    ErrorCode::InternalServerError,
                    "Password hashing failed",
                    &e,
                )));
            }
        }
    }

    match storage.update_user(user_id, changes).await {
        Ok(Some(user)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            UserResponse { user },
            "User updated successfully",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::UserNotFound,
            "User not found",
        ))),
        Err(e) if e.is_unique_violation() => Ok(HttpResponse::Conflict().json(
            ApiResponse::error_empty(ErrorCode::UserAlreadyExists, "Email already exists"),
        )),
        Err(e) => Ok(HttpResponse::InternalServerError().json(ApiResponse::from_error(
            ErrorCode::UserUpdateFailed,
            "Failed to update user",
            &e,
        ))),
    }
}
