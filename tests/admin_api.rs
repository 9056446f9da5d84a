mod common;

use std::time::Duration;

use actix_web::http::StatusCode;
use actix_web::test;
use serde_json::{Value, json};

use common::{TestContext, bearer};
use rust_educhain::models::ErrorCode;
use rust_educhain::models::users::entities::UserRole;

#[actix_web::test]
async fn test_admin_routes_require_admin_role() {
    let ctx = TestContext::new().await;
    let app = init_app!(ctx);
    let student = ctx.create_user("Sam", "Student", UserRole::Student).await;

    let req = test::TestRequest::get()
        .uri("/api/v1/admin/courses")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::get()
        .uri("/api/v1/admin/courses")
        .insert_header(bearer(&student))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn test_course_crud_contract() {
    let ctx = TestContext::new().await;
    let app = init_app!(ctx);
    let admin = ctx.create_user("Ada", "Admin", UserRole::Admin).await;
    let professor = ctx.create_user("Paul", "Prof", UserRole::Professor).await;
    let student = ctx.create_user("Sam", "Student", UserRole::Student).await;

    // 课程代码统一为大写
    let req = test::TestRequest::post()
        .uri("/api/v1/admin/courses")
        .insert_header(bearer(&admin))
        .set_json(json!({
            "course_code": " cs101 ",
            "course_name": "Intro",
            "description": "Basics",
            "professor_id": professor.id
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    let course = &body["data"]["course"];
    assert_eq!(course["course_code"], "CS101");
    assert_eq!(course["professor"]["id"], professor.id);
    let course_id = course["id"].as_i64().unwrap();

    let req = test::TestRequest::post()
        .uri("/api/v1/admin/courses")
        .insert_header(bearer(&admin))
        .set_json(json!({"course_code": "CS101", "course_name": "Again"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    // 学生不能做授课教师
    let req = test::TestRequest::post()
        .uri("/api/v1/admin/courses")
        .insert_header(bearer(&admin))
        .set_json(json!({
            "course_code": "CS102",
            "course_name": "Other",
            "professor_id": student.id
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // professor_id = 0 取消分配
    let req = test::TestRequest::patch()
        .uri(&format!("/api/v1/admin/courses/{course_id}"))
        .insert_header(bearer(&admin))
        .set_json(json!({"professor_id": 0, "course_name": "Intro to CS"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["data"]["course"]["professor"].is_null());
    assert_eq!(body["data"]["course"]["course_name"], "Intro to CS");

    let req = test::TestRequest::get()
        .uri("/api/v1/admin/courses?assigned=false")
        .insert_header(bearer(&admin))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["items"].as_array().unwrap().len(), 1);

    // 有选课时拒绝删除
    ctx.storage
        .create_enrollment(student.id, course_id)
        .await
        .unwrap();
    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/admin/courses/{course_id}"))
        .insert_header(bearer(&admin))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/admin/courses/{course_id}"))
        .insert_header(bearer(&admin))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["course"]["enrollment_count"], 1);
}

#[actix_web::test]
async fn test_enrollment_rules() {
    let ctx = TestContext::new().await;
    let app = init_app!(ctx);
    let admin = ctx.create_user("Ada", "Admin", UserRole::Admin).await;
    let professor = ctx.create_user("Paul", "Prof", UserRole::Professor).await;
    let alice = ctx.create_user("Alice", "A", UserRole::Student).await;
    let bob = ctx.create_user("Bob", "B", UserRole::Student).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/admin/courses")
        .insert_header(bearer(&admin))
        .set_json(json!({"course_code": "MATH1", "course_name": "Math"}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let course_id = body["data"]["course"]["id"].as_i64().unwrap();

    let req = test::TestRequest::post()
        .uri("/api/v1/admin/enrollments")
        .insert_header(bearer(&admin))
        .set_json(json!({"student_id": alice.id, "course_id": course_id}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    let enrollment_id = body["data"]["id"].as_i64().unwrap();

    let req = test::TestRequest::post()
        .uri("/api/v1/admin/enrollments")
        .insert_header(bearer(&admin))
        .set_json(json!({"student_id": alice.id, "course_id": course_id}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    // 教师不能被当作学生选课
    let req = test::TestRequest::post()
        .uri("/api/v1/admin/enrollments")
        .insert_header(bearer(&admin))
        .set_json(json!({"student_id": professor.id, "course_id": course_id}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::post()
        .uri("/api/v1/admin/enrollments/bulk")
        .insert_header(bearer(&admin))
        .set_json(json!({"course_id": course_id}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::post()
        .uri("/api/v1/admin/enrollments/bulk")
        .insert_header(bearer(&admin))
        .set_json(json!({"course_id": course_id, "student_ids": [alice.id, professor.id]}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::post()
        .uri("/api/v1/admin/enrollments/bulk")
        .insert_header(bearer(&admin))
        .set_json(json!({"course_id": course_id, "student_ids": [alice.id, bob.id]}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["created_count"], 1);
    assert_eq!(body["data"]["skipped_count"], 1);
    assert_eq!(body["data"]["skipped"][0]["student_id"], alice.id);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/admin/enrollments?course_id={course_id}"))
        .insert_header(bearer(&admin))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["stats"]["total_enrollments"], 2);
    assert_eq!(body["data"]["stats"]["unique_students"], 2);
    assert_eq!(body["data"]["stats"]["unique_courses"], 1);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/admin/enrollments/{enrollment_id}"))
        .insert_header(bearer(&admin))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["student"]["id"], alice.id);
    assert!(!ctx.storage.is_enrolled(alice.id, course_id).await.unwrap());
}

#[actix_web::test]
async fn test_last_admin_cannot_be_deleted() {
    let ctx = TestContext::new().await;
    let app = init_app!(ctx);
    let admin = ctx.create_user("Ada", "Admin", UserRole::Admin).await;

    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/admin/users/{}", admin.id))
        .insert_header(bearer(&admin))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn test_overview_counts() {
    let ctx = TestContext::new().await;
    let app = init_app!(ctx);
    let admin = ctx.create_user("Ada", "Admin", UserRole::Admin).await;
    ctx.create_user("Paul", "Prof", UserRole::Professor).await;
    ctx.create_user("Sam", "Student", UserRole::Student).await;

    let req = test::TestRequest::get()
        .uri("/api/v1/admin/overview")
        .insert_header(bearer(&admin))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    let users = &body["data"]["users"];
    assert_eq!(users["total"], 3);
    assert_eq!(users["students"], 1);
    assert_eq!(users["professors"], 1);
    assert_eq!(users["admins"], 1);
    assert_eq!(body["data"]["courses"]["total"], 0);
}

#[actix_web::test]
async fn test_user_create_and_update_validation() {
    let ctx = TestContext::new().await;
    let app = init_app!(ctx);
    let admin = ctx.create_user("Ada", "Admin", UserRole::Admin).await;
    let existing = ctx.create_user("Sam", "Student", UserRole::Student).await;

    let create = |body: Value| {
        test::TestRequest::post()
            .uri("/api/v1/admin/users")
            .insert_header(bearer(&admin))
            .set_json(body)
            .to_request()
    };

    // 邮箱唯一性不区分大小写
    let resp = test::call_service(
        &app,
        create(json!({
            "firstname": "Other",
            "lastname": "Person",
            "email": "SAM.Student@School.TEST",
            "password": "long-enough",
            "role": "student"
        })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], ErrorCode::UserAlreadyExists as i32);

    let resp = test::call_service(
        &app,
        create(json!({
            "firstname": "Short",
            "lastname": "Pass",
            "email": "short.pass@school.test",
            "password": "1234567",
            "role": "student"
        })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], ErrorCode::UserPasswordInvalid as i32);

    // 管理员账户不能通过接口创建
    let resp = test::call_service(
        &app,
        create(json!({
            "firstname": "New",
            "lastname": "Admin",
            "email": "new.admin@school.test",
            "password": "long-enough",
            "role": "admin"
        })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], ErrorCode::UserRoleInvalid as i32);

    let other = ctx.create_user("Pia", "Prof", UserRole::Professor).await;
    let update = |body: Value| {
        test::TestRequest::patch()
            .uri(&format!("/api/v1/admin/users/{}", other.id))
            .insert_header(bearer(&admin))
            .set_json(body)
            .to_request()
    };

    let resp = test::call_service(&app, update(json!({"email": existing.email.to_uppercase()}))).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let resp = test::call_service(&app, update(json!({"password": "short"}))).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = test::call_service(&app, update(json!({"role": "admin"}))).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], ErrorCode::UserRoleInvalid as i32);

    // 邮箱未变（仅大小写不同）时允许更新
    let resp = test::call_service(&app, update(json!({"email": "PIA.PROF@school.test"}))).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_created_user_is_provisioned_in_background() {
    let ctx = TestContext::new().await;
    let app = init_app!(ctx);
    let admin = ctx.create_user("Ada", "Admin", UserRole::Admin).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/admin/users")
        .insert_header(bearer(&admin))
        .set_json(json!({
            "firstname": "Nia",
            "lastname": "New",
            "email": "nia.new@school.test",
            "password": "long-enough",
            "role": "student"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    let user_id = body["data"]["user"]["id"].as_i64().unwrap();

    // 开通在响应返回后异步进行
    let mut provisioned = None;
    for _ in 0..40 {
        let user = ctx.storage.get_user_by_id(user_id).await.unwrap().unwrap();
        if user.has_chain_profile() {
            provisioned = Some(user);
            break;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    let user = provisioned.expect("wallet provisioned in background");
    let address = user.wallet_address.unwrap();
    assert!(ctx.gateway.calls().contains(&format!("fund:{address}:1000")));
}

#[actix_web::test]
async fn test_provision_missing_profiles_skips_admins() {
    let ctx = TestContext::new().await;
    let admin = ctx.create_user("Ada", "Admin", UserRole::Admin).await;
    ctx.create_user("Sam", "Student", UserRole::Student).await;
    ctx.create_user("Paul", "Prof", UserRole::Professor).await;
    ctx.create_chain_user("Cara", "Chain", UserRole::Student).await;

    assert!(ctx.relay.provision_profile(&admin).await.is_none());

    let report = ctx.relay.provision_missing_profiles().await.unwrap();
    assert_eq!(report.total, 2);
    assert_eq!(report.succeeded, 2);
    assert_eq!(report.failed, 0);
    assert!(report.failed_user_ids.is_empty());

    let admin = ctx.storage.get_user_by_id(admin.id).await.unwrap().unwrap();
    assert!(admin.wallet_address.is_none());

    // 全部开通后再次执行无事可做
    let report = ctx.relay.provision_missing_profiles().await.unwrap();
    assert_eq!(report.total, 0);
}

#[actix_web::test]
async fn test_user_list_marks_chain_profiles() {
    let ctx = TestContext::new().await;
    let app = init_app!(ctx);
    let admin = ctx.create_user("Ada", "Admin", UserRole::Admin).await;
    ctx.create_user("Zed", "Zimmer", UserRole::Student).await;
    ctx.create_chain_user("Bea", "Baker", UserRole::Professor).await;

    let req = test::TestRequest::get()
        .uri("/api/v1/admin/users")
        .insert_header(bearer(&admin))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    let items = body["data"]["items"].as_array().unwrap();

    // 管理员不出现在列表中，按姓排序
    assert_eq!(items.len(), 2);
    assert_eq!(body["data"]["pagination"]["total"], 2);
    assert_eq!(items[0]["lastname"], "Baker");
    assert_eq!(items[0]["chain_ready"], true);
    assert!(items[0]["wallet_address"].is_string());
    assert_eq!(items[1]["lastname"], "Zimmer");
    assert_eq!(items[1]["chain_ready"], false);
    for item in items {
        assert!(item.get("password_hash").is_none());
        assert!(item.get("encrypted_private_key").is_none());
    }
}
