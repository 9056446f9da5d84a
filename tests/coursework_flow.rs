mod common;

use actix_web::http::StatusCode;
use actix_web::test;
use chrono::{Duration, Utc};
use serde_json::{Value, json};

use common::{FakeGateway, TestContext, bearer};
use rust_educhain::models::assignments::requests::NewAssignment;
use rust_educhain::models::courses::requests::NewCourse;
use rust_educhain::models::users::entities::{User, UserRole};

async fn course_for(ctx: &TestContext, code: &str, professor: &User) -> i64 {
    ctx.storage
        .create_course(NewCourse {
            course_code: code.to_string(),
            course_name: format!("{code} course"),
            description: String::new(),
            professor_id: Some(professor.id),
        })
        .await
        .expect("create course")
        .id
}

fn assignment_body(course_id: i64) -> Value {
    json!({
        "title": "Essay",
        "description": "Write an essay",
        "course_id": course_id,
        "due_date": (Utc::now() + Duration::days(7)).to_rfc3339(),
        "public_key": "-----BEGIN PUBLIC KEY-----\nMIIB\n-----END PUBLIC KEY-----"
    })
}

#[actix_web::test]
async fn test_assignment_submission_grade_flow() {
    let ctx = TestContext::new().await;
    let app = init_app!(ctx);
    let professor = ctx.create_chain_user("Paul", "Prof", UserRole::Professor).await;
    let student = ctx.create_chain_user("Stu", "Dent", UserRole::Student).await;
    let outsider = ctx.create_user("Out", "Sider", UserRole::Student).await;
    let course_id = course_for(&ctx, "HIST1", &professor).await;
    ctx.storage
        .create_enrollment(student.id, course_id)
        .await
        .unwrap();

    let req = test::TestRequest::post()
        .uri("/api/v1/professor/assignments")
        .insert_header(bearer(&professor))
        .set_json(assignment_body(course_id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["blockchain_status"], "confirmed");
    assert_eq!(body["data"]["chain_assignment_id"], 1);
    let assignment_id = body["data"]["assignment"]["id"].as_i64().unwrap();

    let submission = json!({
        "assignment_id": assignment_id,
        "encrypted_content": "U2FsdGVkX1+cipher",
        "student_id_hash": "abc123"
    });

    let req = test::TestRequest::post()
        .uri("/api/v1/student/submissions")
        .insert_header(bearer(&student))
        .set_json(&submission)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["on_chain"], true);
    assert_eq!(body["data"]["submission"]["status"], "submitted");
    assert_eq!(body["data"]["submission"]["chain_submission_id"], 1);
    let submission_id = body["data"]["submission"]["id"].as_i64().unwrap();

    // 每个学生每份作业只能提交一次
    let req = test::TestRequest::post()
        .uri("/api/v1/student/submissions")
        .insert_header(bearer(&student))
        .set_json(&submission)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::post()
        .uri("/api/v1/student/submissions")
        .insert_header(bearer(&outsider))
        .set_json(&submission)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::get()
        .uri("/api/v1/professor/submissions/pending")
        .insert_header(bearer(&professor))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["items"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"]["items"][0]["student_name"], "Stu Dent");

    let req = test::TestRequest::post()
        .uri("/api/v1/professor/submissions/grade")
        .insert_header(bearer(&professor))
        .set_json(json!({"submission_id": submission_id, "grade": 25}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::post()
        .uri("/api/v1/professor/submissions/grade")
        .insert_header(bearer(&professor))
        .set_json(json!({"submission_id": submission_id, "grade": 18.5, "feedback": "  Good work "}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    let graded = &body["data"]["submission"];
    assert_eq!(body["data"]["on_chain"], true);
    assert_eq!(graded["status"], "graded");
    assert_eq!(graded["grade"], 18.5);
    assert_eq!(graded["feedback"], "Good work");
    assert!(graded["chain_result_hash"].as_str().unwrap().starts_with("0xc0"));

    let req = test::TestRequest::post()
        .uri("/api/v1/professor/submissions/grade")
        .insert_header(bearer(&professor))
        .set_json(json!({"submission_id": submission_id, "grade": 10}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::get()
        .uri("/api/v1/student/grades")
        .insert_header(bearer(&student))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["items"].as_array().unwrap().len(), 1);

    let calls = ctx.gateway.calls();
    assert!(calls.contains(&"create_assignment:Essay".to_string()));
    assert!(calls.contains(&"submit_assignment:1:Stu Dent".to_string()));
    assert!(calls.contains(&"publish_result:1:18".to_string()));

    // 交易前的余额补充统一使用 min_balance_eth 阈值
    let student_wallet = student.wallet_address.as_deref().unwrap();
    let professor_wallet = professor.wallet_address.as_deref().unwrap();
    assert!(calls.contains(&format!("refund:{student_wallet}:10:100")));
    assert_eq!(
        calls
            .iter()
            .filter(|c| *c == &format!("refund:{professor_wallet}:10:100"))
            .count(),
        2
    );
    assert!(!calls.iter().any(|c| c.starts_with("refund:") && !c.ends_with(":10:100")));
}

#[actix_web::test]
async fn test_chain_failures_do_not_block_coursework() {
    let ctx = TestContext::with_gateway(FakeGateway::failing()).await;
    let app = init_app!(ctx);
    let professor = ctx.create_chain_user("Paul", "Prof", UserRole::Professor).await;
    let student = ctx.create_chain_user("Stu", "Dent", UserRole::Student).await;
    let course_id = course_for(&ctx, "BIO1", &professor).await;
    ctx.storage
        .create_enrollment(student.id, course_id)
        .await
        .unwrap();

    let req = test::TestRequest::post()
        .uri("/api/v1/professor/assignments")
        .insert_header(bearer(&professor))
        .set_json(assignment_body(course_id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["blockchain_status"], "pending");
    assert!(body["data"]["chain_assignment_id"].is_null());
    let assignment_id = body["data"]["assignment"]["id"].as_i64().unwrap();

    let req = test::TestRequest::post()
        .uri("/api/v1/student/submissions")
        .insert_header(bearer(&student))
        .set_json(json!({
            "assignment_id": assignment_id,
            "encrypted_content": "cipher",
            "student_id_hash": "hash"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["on_chain"], false);
    let submission_id = body["data"]["submission"]["id"].as_i64().unwrap();

    let req = test::TestRequest::post()
        .uri("/api/v1/professor/submissions/grade")
        .insert_header(bearer(&professor))
        .set_json(json!({"submission_id": submission_id, "grade": 12}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["on_chain"], false);
    assert!(body["data"]["submission"]["chain_result_hash"].is_null());

    let stored = ctx
        .storage
        .get_submission_by_id(submission_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.grade, Some(12.0));
    assert!(ctx.gateway.calls().is_empty());
}

#[actix_web::test]
async fn test_assignment_and_submission_preconditions() {
    let ctx = TestContext::new().await;
    let app = init_app!(ctx);
    let professor = ctx.create_user("Paul", "Prof", UserRole::Professor).await;
    let other = ctx.create_user("Olga", "Other", UserRole::Professor).await;
    let student = ctx.create_user("Stu", "Dent", UserRole::Student).await;
    let course_id = course_for(&ctx, "CHEM1", &professor).await;
    ctx.storage
        .create_enrollment(student.id, course_id)
        .await
        .unwrap();

    let mut body = assignment_body(course_id);
    body["due_date"] = json!("next friday");
    let req = test::TestRequest::post()
        .uri("/api/v1/professor/assignments")
        .insert_header(bearer(&professor))
        .set_json(&body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::post()
        .uri("/api/v1/professor/assignments")
        .insert_header(bearer(&other))
        .set_json(assignment_body(course_id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    // 无链上身份的教师照常布置作业
    let req = test::TestRequest::post()
        .uri("/api/v1/professor/assignments")
        .insert_header(bearer(&professor))
        .set_json(assignment_body(course_id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["blockchain_status"], "pending");

    let overdue = ctx
        .storage
        .create_assignment(NewAssignment {
            title: "Late".to_string(),
            description: String::new(),
            course_id,
            professor_id: professor.id,
            public_key: "pk".to_string(),
            due_date: Utc::now() - Duration::hours(1),
        })
        .await
        .unwrap();

    let req = test::TestRequest::post()
        .uri("/api/v1/student/submissions")
        .insert_header(bearer(&student))
        .set_json(json!({
            "assignment_id": overdue.id,
            "encrypted_content": "cipher",
            "student_id_hash": "hash"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 7002);

    let req = test::TestRequest::post()
        .uri("/api/v1/student/submissions")
        .insert_header(bearer(&student))
        .set_json(json!({"assignment_id": overdue.id}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::get()
        .uri("/api/v1/student/assignments")
        .insert_header(bearer(&student))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let items = body["data"]["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert!(items.iter().any(|item| item["is_overdue"] == true));
}

#[actix_web::test]
async fn test_announcement_visibility() {
    let ctx = TestContext::new().await;
    let app = init_app!(ctx);
    let professor = ctx.create_user("Paul", "Prof", UserRole::Professor).await;
    let colleague = ctx.create_user("Cole", "League", UserRole::Professor).await;
    let student = ctx.create_user("Stu", "Dent", UserRole::Student).await;
    let own_course = course_for(&ctx, "ART1", &professor).await;
    let other_course = course_for(&ctx, "ART2", &colleague).await;
    ctx.storage
        .create_enrollment(student.id, own_course)
        .await
        .unwrap();
    ctx.storage
        .create_enrollment(student.id, other_course)
        .await
        .unwrap();

    let announce = |author: &User, title: &str, course_id: Option<i64>| {
        test::TestRequest::post()
            .uri("/api/v1/professor/announcements")
            .insert_header(bearer(author))
            .set_json(json!({"title": title, "content": "Details", "course_id": course_id}))
            .to_request()
    };

    // 只能向自己负责的课程发公告
    let resp = test::call_service(&app, announce(&professor, "Hijack", Some(other_course))).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = test::call_service(&app, announce(&professor, "Welcome", None)).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let resp = test::call_service(&app, announce(&professor, "Studio moved", Some(own_course))).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    // 学生未选这门课
    let unrelated = course_for(&ctx, "ART3", &colleague).await;
    let resp = test::call_service(&app, announce(&colleague, "Private", Some(unrelated))).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let req = test::TestRequest::get()
        .uri("/api/v1/student/announcements")
        .insert_header(bearer(&student))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let mut titles: Vec<&str> = body["data"]["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["title"].as_str().unwrap())
        .collect();
    titles.sort_unstable();
    assert_eq!(titles, vec!["Studio moved", "Welcome"]);

    let req = test::TestRequest::get()
        .uri("/api/v1/professor/announcements")
        .insert_header(bearer(&colleague))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let items = body["data"]["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["course_name"], "ART3 course");
}
