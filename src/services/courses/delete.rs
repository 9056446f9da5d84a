use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::CourseService;
use crate::models::{ApiResponse, ErrorCode};

pub async fn delete_course(
    service: &CourseService,
    course_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let summary = match storage.get_course_summary(course_id).await {
        Ok(Some(summary)) => summary,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::CourseNotFound,
                "Course not found",
            )));
        }
        Err(e) => {
            return Ok(HttpResponse::InternalServerError().json(ApiResponse::from_error(
                ErrorCode::CourseDeleteFailed,
                "Course deletion failed",
                &e,
            )));
        }
    };

    if summary.has_dependents() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::CourseHasDependents,
            format!(
                "Cannot delete course with {} enrollments and {} assignments",
                summary.enrollment_count, summary.assignment_count
            ),
        )));
    }

    match storage.delete_course(course_id).await {
        Ok(true) => Ok(HttpResponse::Ok()
            .json(ApiResponse::success_empty("Course deleted successfully"))),
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::CourseNotFound,
            "Course not found",
        ))),
        Err(e) => Ok(HttpResponse::InternalServerError().json(ApiResponse::from_error(
            ErrorCode::CourseDeleteFailed,
            "Course deletion failed",
            &e,
        ))),
    }
}
