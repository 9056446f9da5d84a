use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AnnouncementService;
use crate::errors::Result;
use crate::models::{
    ApiResponse, ErrorCode,
    announcements::{entities::AnnouncementDetail, responses::AnnouncementListResponse},
};

fn respond(result: Result<Vec<AnnouncementDetail>>) -> HttpResponse {
    match result {
        Ok(items) => HttpResponse::Ok().json(ApiResponse::success(
            AnnouncementListResponse { items },
            "Announcements retrieved successfully",
        )),
        Err(e) => HttpResponse::InternalServerError().json(ApiResponse::from_error(
            ErrorCode::InternalServerError,
            "Failed to retrieve announcements",
            &e,
        )),
    }
}

pub async fn list_professor_announcements(
    service: &AnnouncementService,
    professor_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    Ok(respond(storage.list_announcements_by_author(professor_id).await))
}

// 全局公告加上已选课程的公告
pub async fn list_student_announcements(
    service: &AnnouncementService,
    student_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    Ok(respond(storage.list_student_announcements(student_id).await))
}
