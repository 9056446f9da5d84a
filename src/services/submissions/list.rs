use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SubmissionService;
use crate::errors::Result;
use crate::models::{
    ApiResponse, ErrorCode,
    submissions::{entities::SubmissionDetail, responses::SubmissionListResponse},
};

fn respond(result: Result<Vec<SubmissionDetail>>) -> HttpResponse {
    match result {
        Ok(items) => HttpResponse::Ok().json(ApiResponse::success(
            SubmissionListResponse { items },
            "Submissions retrieved successfully",
        )),
        Err(e) => HttpResponse::InternalServerError().json(ApiResponse::from_error(
            ErrorCode::InternalServerError,
            "Failed to retrieve submissions",
            &e,
        )),
    }
}

pub async fn list_student_submissions(
    service: &SubmissionService,
    student_id: i64,
    graded_only: bool,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    Ok(respond(
        storage
            .list_student_submissions(student_id, graded_only)
            .await,
    ))
}

pub async fn list_professor_submissions(
    service: &SubmissionService,
    professor_id: i64,
    pending_only: bool,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    Ok(respond(
        storage
            .list_professor_submissions(professor_id, pending_only)
            .await,
    ))
}
