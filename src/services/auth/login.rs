use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info};

use crate::models::{
    ApiResponse, ErrorCode,
    auth::{
        requests::LoginRequest,
        responses::{LoginResponse, LoginUser},
    },
};
use crate::utils::jwt::JwtUtils;
use crate::utils::password::verify_password;

use super::AuthService;

fn invalid_credentials() -> HttpResponse {
    HttpResponse::Unauthorized().json(ApiResponse::error_empty(
        ErrorCode::AuthFailed,
        "Invalid credentials",
    ))
}

pub async fn handle_login(
    service: &AuthService,
    login_request: LoginRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if !login_request.is_complete() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "Email, password and role are required",
        )));
    }

    let storage = service.get_storage(request);
    let config = service.get_config();

    let user = match storage.get_user_by_email(login_request.email.trim()).await {
        Ok(Some(user)) => user,
        Ok(None) => return Ok(invalid_credentials()),
        Err(e) => {
            error!("登录时查询用户失败: {}", e);
            return Ok(HttpResponse::InternalServerError().json(ApiResponse::from_error(
                ErrorCode::InternalServerError,
                "Login failed",
                &e,
            )));
        }
    };

    if !verify_password(&login_request.password, &user.password_hash) {
        return Ok(invalid_credentials());
    }

    // 身份按原样比较，不做别名映射
    let requested_role = login_request.role.trim();
    if user.role.to_string() != requested_role {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::RoleMismatch,
            format!("User is not registered as {requested_role}"),
        )));
    }

    if !user.is_active() {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::AccountInactive,
            "Account is not active",
        )));
    }

    let refresh_days = if login_request.remember_me {
        config.jwt.refresh_token_remember_me_expiry
    } else {
        config.jwt.refresh_token_expiry
    };

    let token_pair = match user.generate_token_pair(Some(chrono::Duration::days(refresh_days))) {
        Ok(pair) => pair,
        Err(e) => {
            error!("生成 token 失败: {}", e);
            return Ok(HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                "Login failed, unable to generate token",
            )));
        }
    };

    if let Err(e) = storage.update_last_login(user.id).await {
        error!("更新用户 {} 最后登录时间失败: {}", user.id, e);
    }
    info!("用户 {} ({}) 登录成功", user.id, user.role);

    let response = LoginResponse {
        access_token: token_pair.access_token,
        expires_in: JwtUtils::access_token_ttl_secs(),
        user: LoginUser::from(&user),
        created_at: chrono::Utc::now(),
    };

    Ok(HttpResponse::Ok()
        .cookie(JwtUtils::create_refresh_token_cookie(
            &token_pair.refresh_token,
            refresh_days,
        ))
        .json(ApiResponse::success(response, "Login successful")))
}
