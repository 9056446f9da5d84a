use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{CourseService, check_professor};
use crate::models::{
    ApiResponse, ErrorCode,
    courses::{
        requests::{CreateCourseRequest, NewCourse},
        responses::CourseResponse,
    },
};
use crate::utils::validate::normalize_course_code;

pub async fn create_course(
    service: &CourseService,
    course_data: CreateCourseRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let course_code = match normalize_course_code(&course_data.course_code) {
        Ok(code) => code,
        Err(msg) => {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::CourseCodeInvalid, msg)));
        }
    };

    let course_name = course_data.course_name.trim().to_string();
    if course_name.is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "Course name is required",
        )));
    }

    let storage = service.get_storage(request);

    match storage.get_course_by_code(&course_code).await {
        Ok(Some(_)) => {
            return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::CourseCodeAlreadyExists,
                "Course code already exists",
            )));
        }
        Ok(None) => {}
        Err(e) => {
            return Ok(HttpResponse::InternalServerError().json(ApiResponse::from_error(
                ErrorCode::CourseCreationFailed,
                "Course creation failed",
                &e,
            )));
        }
    }

    if let Some(professor_id) = course_data.professor_id
        && let Err(resp) = check_professor(&storage, professor_id).await
    {
        return Ok(resp);
    }

    let new_course = NewCourse {
        course_code,
        course_name,
        description: course_data.description.trim().to_string(),
        professor_id: course_data.professor_id,
    };

    let course = match storage.create_course(new_course).await {
        Ok(course) => course,
        Err(e) if e.is_unique_violation() => {
            return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::CourseCodeAlreadyExists,
                "Course code already exists",
            )));
        }
        Err(e) => {
            return Ok(HttpResponse::InternalServerError().json(ApiResponse::from_error(
                ErrorCode::CourseCreationFailed,
                "Course creation failed",
                &e,
            )));
        }
    };
    info!("已创建课程 {} ({})", course.id, course.course_code);

    match storage.get_course_summary(course.id).await {
        Ok(Some(course)) => Ok(HttpResponse::Created().json(ApiResponse::success(
            CourseResponse { course },
            "Course created successfully",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::CourseNotFound,
            "Course not found",
        ))),
        Err(e) => Ok(HttpResponse::InternalServerError().json(ApiResponse::from_error(
            ErrorCode::InternalServerError,
            "Failed to load created course",
            &e,
        ))),
    }
}
