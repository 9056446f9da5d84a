use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AssignmentService;
use crate::models::{
    ApiResponse, ErrorCode,
    assignments::responses::{ProfessorAssignmentListResponse, StudentAssignmentListResponse},
};

pub async fn list_professor_assignments(
    service: &AssignmentService,
    professor_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.list_professor_assignments(professor_id).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            ProfessorAssignmentListResponse { items },
            "Assignments retrieved successfully",
        ))),
        Err(e) => Ok(HttpResponse::InternalServerError().json(ApiResponse::from_error(
            ErrorCode::InternalServerError,
            "Failed to retrieve assignments",
            &e,
        ))),
    }
}

// 已选课程的作业，附带是否已提交与是否逾期
pub async fn list_student_assignments(
    service: &AssignmentService,
    student_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.list_student_assignments(student_id).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            StudentAssignmentListResponse { items },
            "Assignments retrieved successfully",
        ))),
        Err(e) => Ok(HttpResponse::InternalServerError().json(ApiResponse::from_error(
            ErrorCode::InternalServerError,
            "Failed to retrieve assignments",
            &e,
        ))),
    }
}
