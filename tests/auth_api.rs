mod common;

use actix_web::http::StatusCode;
use actix_web::test;
use serde_json::{Value, json};

use common::TestContext;
use rust_educhain::models::ErrorCode;
use rust_educhain::models::users::entities::{UserRole, UserStatus};
use rust_educhain::utils::jwt::REFRESH_TOKEN_COOKIE;

const PASSWORD: &str = "correct-horse";

// 登录接口按 IP 限流，每个请求使用独立的来源地址
fn login_request(ip: &str, body: Value) -> test::TestRequest {
    test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .insert_header(("X-Forwarded-For", ip))
        .set_json(body)
}

#[actix_web::test]
async fn test_login_contract() {
    let ctx = TestContext::new().await;
    let app = init_app!(ctx);
    ctx.create_login_user(
        "prof@school.test",
        PASSWORD,
        UserRole::Professor,
        UserStatus::Active,
    )
    .await;
    ctx.create_login_user(
        "gone@school.test",
        PASSWORD,
        UserRole::Student,
        UserStatus::Inactive,
    )
    .await;

    // 缺少字段
    let resp = test::call_service(
        &app,
        login_request(
            "10.1.0.1",
            json!({"email": "prof@school.test", "password": PASSWORD}),
        )
        .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // 未知邮箱与错误密码返回同样的 401
    let resp = test::call_service(
        &app,
        login_request(
            "10.1.0.2",
            json!({"email": "nobody@school.test", "password": PASSWORD, "role": "professor"}),
        )
        .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], ErrorCode::AuthFailed as i32);

    let resp = test::call_service(
        &app,
        login_request(
            "10.1.0.3",
            json!({"email": "prof@school.test", "password": "wrong-password", "role": "professor"}),
        )
        .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], ErrorCode::AuthFailed as i32);

    // 身份不符
    let resp = test::call_service(
        &app,
        login_request(
            "10.1.0.4",
            json!({"email": "prof@school.test", "password": PASSWORD, "role": "student"}),
        )
        .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], ErrorCode::RoleMismatch as i32);
    assert_eq!(body["message"], "User is not registered as student");

    // 非活跃账户
    let resp = test::call_service(
        &app,
        login_request(
            "10.1.0.5",
            json!({"email": "gone@school.test", "password": PASSWORD, "role": "student"}),
        )
        .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], ErrorCode::AccountInactive as i32);
}

#[actix_web::test]
async fn test_login_success_sets_refresh_cookie() {
    let ctx = TestContext::new().await;
    let app = init_app!(ctx);
    let professor = ctx
        .create_login_user(
            "teach@school.test",
            PASSWORD,
            UserRole::Professor,
            UserStatus::Active,
        )
        .await;

    let resp = test::call_service(
        &app,
        login_request(
            "10.1.1.1",
            json!({"email": " Teach@School.test ", "password": PASSWORD, "role": "professor"}),
        )
        .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let cookie = resp
        .response()
        .cookies()
        .find(|c| c.name() == REFRESH_TOKEN_COOKIE)
        .expect("refresh cookie");
    assert!(!cookie.value().is_empty());
    assert_eq!(cookie.http_only(), Some(true));

    let body: Value = test::read_body_json(resp).await;
    let data = &body["data"];
    assert!(!data["access_token"].as_str().unwrap().is_empty());
    assert_eq!(data["user"]["id"], professor.id);
    assert_eq!(data["user"]["role"], "professor");

    let stored = ctx
        .storage
        .get_user_by_id(professor.id)
        .await
        .unwrap()
        .unwrap();
    assert!(stored.last_login.is_some());
}
