use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{EnrollmentService, require_course};
use crate::models::{
    ApiResponse, ErrorCode, enrollments::requests::CreateEnrollmentRequest,
    users::entities::UserRole,
};

pub async fn create_enrollment(
    service: &EnrollmentService,
    enrollment: CreateEnrollmentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.get_user_by_id(enrollment.student_id).await {
        Ok(Some(user)) if user.role == UserRole::Student => {}
        Ok(_) => {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::EnrollmentStudentInvalid,
                "Student not found",
            )));
        }
        Err(e) => {
            return Ok(HttpResponse::InternalServerError().json(ApiResponse::from_error(
                ErrorCode::EnrollmentFailed,
                "Enrollment failed",
                &e,
            )));
        }
    }

    if let Err(resp) = require_course(&storage, enrollment.course_id).await {
        return Ok(resp);
    }

    match storage
        .is_enrolled(enrollment.student_id, enrollment.course_id)
        .await
    {
        Ok(true) => {
            return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::AlreadyEnrolled,
                "Student already enrolled in this course",
            )));
        }
        Ok(false) => {}
        Err(e) => {
            return Ok(HttpResponse::InternalServerError().json(ApiResponse::from_error(
                ErrorCode::EnrollmentFailed,
                "Enrollment failed",
                &e,
            )));
        }
    }

    let created = match storage
        .create_enrollment(enrollment.student_id, enrollment.course_id)
        .await
    {
        Ok(created) => created,
        // 并发下由唯一约束兜底
        Err(e) if e.is_unique_violation() => {
            return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::AlreadyEnrolled,
                "Student already enrolled in this course",
            )));
        }
        Err(e) => {
            return Ok(HttpResponse::InternalServerError().json(ApiResponse::from_error(
                ErrorCode::EnrollmentFailed,
                "Enrollment failed",
                &e,
            )));
        }
    };
    info!(
        "学生 {} 已选课程 {}",
        created.student_id, created.course_id
    );

    match storage.get_enrollment_detail(created.id).await {
        Ok(Some(detail)) => Ok(HttpResponse::Created().json(ApiResponse::success(
            detail,
            "Student enrolled successfully",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::EnrollmentNotFound,
            "Enrollment not found",
        ))),
        Err(e) => Ok(HttpResponse::InternalServerError().json(ApiResponse::from_error(
            ErrorCode::InternalServerError,
            "Failed to load enrollment",
            &e,
        ))),
    }
}
