use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info};

use super::UserService;
use crate::models::{
    ApiResponse, ErrorCode,
    users::{
        entities::UserStatus,
        requests::{CreateUserRequest, NewUser},
        responses::UserResponse,
    },
};
use crate::utils::password::hash_password_blocking;
use crate::utils::validate::{normalize_email, normalize_name, validate_password};

pub async fn create_user(
    service: &UserService,
    user_data: CreateUserRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    // 管理员只能通过启动时的种子账户产生
    if !user_data.role.has_chain_identity() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::UserRoleInvalid,
            "Role must be student or professor",
        )));
    }

    let (firstname, lastname) = match (
        normalize_name(&user_data.firstname),
        normalize_name(&user_data.lastname),
    ) {
        (Ok(first), Ok(last)) => (first, last),
        (Err(msg), _) | (_, Err(msg)) => {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::UserNameInvalid, msg)));
        }
    };

    let email = match normalize_email(&user_data.email) {
        Ok(email) => email,
        Err(msg) => {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::UserEmailInvalid, msg)));
        }
    };

    if let Err(msg) = validate_password(&user_data.password) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::UserPasswordInvalid, msg)));
    }

    let storage = service.get_storage(request);

    match storage.get_user_by_email(&email).await {
        Ok(Some(_)) => {
            return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::UserAlreadyExists,
                "Email already exists",
            )));
        }
        Ok(None) => {}
        Err(e) => {
            return Ok(HttpResponse::InternalServerError().json(ApiResponse::from_error(
                ErrorCode::UserCreationFailed,
                "User creation failed",
                &e,
            )));
        }
    }

    let password_hash = match hash_password_blocking(user_data.password).await {
        Ok(hash) => hash,
        Err(e) => {
            return Ok(HttpResponse::InternalServerError().json(ApiResponse::from_error(
                ErrorCode::InternalServerError,
                "Password hashing failed",
                &e,
            )));
        }
    };

    let new_user = NewUser {
        firstname,
        lastname,
        email,
        password_hash,
        role: user_data.role,
        status: user_data.status.unwrap_or(UserStatus::Active),
    };

    let user = match storage.create_user(new_user).await {
        Ok(user) => user,
        // 并发创建同一邮箱时由唯一索引兜底
        Err(e) if e.is_unique_violation() => {
            return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::UserAlreadyExists,
                "Email already exists",
            )));
        }
        Err(e) => {
            error!("创建用户失败: {}", e);
            return Ok(HttpResponse::InternalServerError().json(ApiResponse::from_error(
                ErrorCode::UserCreationFailed,
                "User creation failed",
                &e,
            )));
        }
    };
    info!("已创建用户 {} ({})", user.id, user.role);

    let relay = service.get_relay(request);
    let pending = user.clone();
    actix_web::rt::spawn(async move {
        relay.provision_profile(&pending).await;
    });

    Ok(HttpResponse::Created().json(ApiResponse::success(
        UserResponse { user },
        "User created successfully",
    )))
}
