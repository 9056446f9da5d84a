use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::AnnouncementService;
use crate::models::{
    ApiResponse, ErrorCode,
    announcements::requests::{CreateAnnouncementRequest, NewAnnouncement},
};

pub async fn create_announcement(
    service: &AnnouncementService,
    professor_id: i64,
    announcement: CreateAnnouncementRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let title = announcement.title.trim().to_string();
    let content = announcement.content.trim().to_string();
    if title.is_empty() || content.is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "Title and content are required",
        )));
    }

    let storage = service.get_storage(request);

    // 课程公告只能发到自己负责的课程
    if let Some(course_id) = announcement.course_id {
        match storage.get_course_by_id(course_id).await {
            Ok(Some(course)) if course.professor_id == Some(professor_id) => {}
            Ok(_) => {
                return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                    ErrorCode::CoursePermissionDenied,
                    "Course not found or access denied",
                )));
            }
            Err(e) => {
                return Ok(HttpResponse::InternalServerError().json(ApiResponse::from_error(
                    ErrorCode::AnnouncementCreationFailed,
                    "Announcement creation failed",
                    &e,
                )));
            }
        }
    }

    let new_announcement = NewAnnouncement {
        title,
        content,
        created_by: professor_id,
        course_id: announcement.course_id,
    };

    match storage.create_announcement(new_announcement).await {
        Ok(created) => {
            info!("教师 {} 发布公告 {}", professor_id, created.id);
            Ok(HttpResponse::Created().json(ApiResponse::success(
                created,
                "Announcement created successfully",
            )))
        }
        Err(e) => Ok(HttpResponse::InternalServerError().json(ApiResponse::from_error(
            ErrorCode::AnnouncementCreationFailed,
            "Announcement creation failed",
            &e,
        ))),
    }
}
