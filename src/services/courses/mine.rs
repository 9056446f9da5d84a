use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::CourseService;
use crate::errors::Result;
use crate::models::{
    ApiResponse, ErrorCode,
    courses::{entities::CourseSummary, responses::CourseItemsResponse},
};

fn respond(result: Result<Vec<CourseSummary>>) -> HttpResponse {
    match result {
        Ok(items) => HttpResponse::Ok().json(ApiResponse::success(
            CourseItemsResponse { items },
            "Courses retrieved successfully",
        )),
        Err(e) => HttpResponse::InternalServerError().json(ApiResponse::from_error(
            ErrorCode::InternalServerError,
            "Failed to retrieve courses",
            &e,
        )),
    }
}

pub async fn list_professor_courses(
    service: &CourseService,
    professor_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    Ok(respond(storage.list_professor_courses(professor_id).await))
}

pub async fn list_student_courses(
    service: &CourseService,
    student_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    Ok(respond(storage.list_student_courses(student_id).await))
}
