mod common;

use actix_web::http::StatusCode;
use actix_web::test;
use chrono::{Duration, Utc};
use serde_json::Value;

use common::{TestContext, bearer};
use rust_educhain::models::assignments::entities::Assignment;
use rust_educhain::models::assignments::requests::NewAssignment;
use rust_educhain::models::courses::requests::NewCourse;
use rust_educhain::models::users::entities::{User, UserRole};

async fn mirrored_assignment(ctx: &TestContext, professor: &User) -> Assignment {
    let course = ctx
        .storage
        .create_course(NewCourse {
            course_code: "NET1".to_string(),
            course_name: "Networks".to_string(),
            description: String::new(),
            professor_id: Some(professor.id),
        })
        .await
        .unwrap();
    let assignment = ctx
        .storage
        .create_assignment(NewAssignment {
            title: "Routing".to_string(),
            description: "Distance vectors".to_string(),
            course_id: course.id,
            professor_id: professor.id,
            public_key: "pk".to_string(),
            due_date: Utc::now() + Duration::days(3),
        })
        .await
        .unwrap();
    let receipt = ctx.relay.mirror_assignment(&assignment).await;
    assert!(receipt.is_some());
    ctx.storage
        .get_assignment_by_id(assignment.id)
        .await
        .unwrap()
        .unwrap()
}

#[actix_web::test]
async fn test_info_lists_mirrored_activity_and_caches_network() {
    let ctx = TestContext::new().await;
    let app = init_app!(ctx);
    let professor = ctx.create_chain_user("Paul", "Prof", UserRole::Professor).await;
    let assignment = mirrored_assignment(&ctx, &professor).await;

    let req = test::TestRequest::get()
        .uri("/api/v1/blockchain/info")
        .insert_header(bearer(&professor))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    let data = &body["data"];
    assert_eq!(data["network"]["chain_id"], 1337);
    assert!(data["network_error"].is_null());
    assert_eq!(
        data["user_address"].as_str(),
        professor.wallet_address.as_deref()
    );
    let transactions = data["transactions"].as_array().unwrap();
    assert_eq!(transactions.len(), 1);
    assert_eq!(transactions[0]["type"], "Assignment Created");
    assert_eq!(
        transactions[0]["tx_hash"].as_str(),
        assignment.chain_tx_hash.as_deref()
    );
    assert_eq!(transactions[0]["details"], "Routing - Networks");

    let req = test::TestRequest::get()
        .uri("/api/v1/blockchain/info")
        .insert_header(bearer(&professor))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let network_calls = ctx
        .gateway
        .calls()
        .iter()
        .filter(|call| call.as_str() == "network_info")
        .count();
    assert_eq!(network_calls, 1);
}

#[actix_web::test]
async fn test_balance_requires_wallet() {
    let ctx = TestContext::new().await;
    let app = init_app!(ctx);
    let without_wallet = ctx.create_user("No", "Wallet", UserRole::Student).await;
    let student = ctx.create_chain_user("Stu", "Dent", UserRole::Student).await;

    let req = test::TestRequest::get()
        .uri("/api/v1/blockchain/balance")
        .insert_header(bearer(&without_wallet))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::get()
        .uri("/api/v1/blockchain/balance")
        .insert_header(bearer(&student))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["balance_eth"], "1");
    assert_eq!(
        body["data"]["address"].as_str(),
        student.wallet_address.as_deref()
    );
}

#[actix_web::test]
async fn test_transaction_lookup() {
    let ctx = TestContext::new().await;
    let app = init_app!(ctx);
    let professor = ctx.create_chain_user("Paul", "Prof", UserRole::Professor).await;
    let assignment = mirrored_assignment(&ctx, &professor).await;
    let tx_hash = assignment.chain_tx_hash.unwrap();

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/blockchain/transactions/{tx_hash}"))
        .insert_header(bearer(&professor))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["status"], true);

    let unknown = format!("0x{}", "b".repeat(64));
    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/blockchain/transactions/{unknown}"))
        .insert_header(bearer(&professor))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::get()
        .uri("/api/v1/blockchain/transactions/not-a-hash")
        .insert_header(bearer(&professor))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_read_through_views() {
    let ctx = TestContext::new().await;
    let app = init_app!(ctx);
    let professor = ctx.create_chain_user("Paul", "Prof", UserRole::Professor).await;
    mirrored_assignment(&ctx, &professor).await;

    let req = test::TestRequest::get()
        .uri("/api/v1/blockchain/assignments")
        .insert_header(bearer(&professor))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["total"], 1);
    assert_eq!(body["data"]["items"][0]["id"], 1);

    let req = test::TestRequest::get()
        .uri("/api/v1/blockchain/assignments/1")
        .insert_header(bearer(&professor))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    // 节点报错统一为 503
    let req = test::TestRequest::get()
        .uri("/api/v1/blockchain/assignments/99")
        .insert_header(bearer(&professor))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);

    let req = test::TestRequest::get()
        .uri("/api/v1/blockchain/submissions/1/result")
        .insert_header(bearer(&professor))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["submission_id"], 1);
    assert!(body["data"]["result"].is_null());

    let req = test::TestRequest::get()
        .uri("/api/v1/blockchain/students/0xnot-an-address/submissions")
        .insert_header(bearer(&professor))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::get()
        .uri("/api/v1/blockchain/assignments")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}
