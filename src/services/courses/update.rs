use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{CourseService, check_professor};
use crate::models::{
    ApiResponse, ErrorCode,
    courses::{
        requests::{CourseChanges, UpdateCourseRequest},
        responses::CourseResponse,
    },
};
use crate::utils::validate::normalize_course_code;

pub async fn update_course(
    service: &CourseService,
    course_id: i64,
    update_data: UpdateCourseRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let existing = match storage.get_course_by_id(course_id).await {
        Ok(Some(course)) => course,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::CourseNotFound,
                "Course not found",
            )));
        }
        Err(e) => {
            return Ok(HttpResponse::InternalServerError().json(ApiResponse::from_error(
                ErrorCode::CourseUpdateFailed,
                "Course update failed",
                &e,
            )));
        }
    };

    let mut changes = CourseChanges {
        professor_id: update_data.professor_change(),
        description: update_data.description.as_deref().map(|d| d.trim().to_string()),
        ..Default::default()
    };

    if let Some(code) = update_data.course_code.as_deref() {
        let code = match normalize_course_code(code) {
            Ok(code) => code,
            Err(msg) => {
                return Ok(HttpResponse::BadRequest()
                    .json(ApiResponse::error_empty(ErrorCode::CourseCodeInvalid, msg)));
            }
        };
        if code != existing.course_code {
            match storage.get_course_by_code(&code).await {
                Ok(Some(_)) => {
                    return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                        ErrorCode::CourseCodeAlreadyExists,
                        "Course code already exists",
                    )));
                }
                Ok(None) => changes.course_code = Some(code),
                Err(e) => {
                    return Ok(HttpResponse::InternalServerError().json(
                        ApiResponse::from_error(
                            ErrorCode::CourseUpdateFailed,
                            "Course update failed",
                            &e,
                        ),
                    ));
                }
            }
        }
    }

    if let Some(name) = update_data.course_name.as_deref() {
        let name = name.trim();
        if name.is_empty() {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::BadRequest,
                "Course name must not be empty",
            )));
        }
        changes.course_name = Some(name.to_string());
    }

    if let Some(Some(professor_id)) = changes.professor_id
        && let Err(resp) = check_professor(&storage, professor_id).await
    {
        return Ok(resp);
    }

    match storage.update_course(course_id, changes).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::CourseNotFound,
                "Course not found",
            )));
        }
        Err(e) if e.is_unique_violation() => {
            return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::CourseCodeAlreadyExists,
                "Course code already exists",
            )));
        }
        Err(e) => {
            return Ok(HttpResponse::InternalServerError().json(ApiResponse::from_error(
                ErrorCode::CourseUpdateFailed,
                "Course update failed",
                &e,
            )));
        }
    }

    match storage.get_course_summary(course_id).await {
        Ok(Some(course)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            CourseResponse { course },
            "Course updated successfully",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::CourseNotFound,
            "Course not found",
        ))),
        Err(e) => Ok(HttpResponse::InternalServerError().json(ApiResponse::from_error(
            ErrorCode::InternalServerError,
            "Failed to load updated course",
            &e,
        ))),
    }
}
