use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use super::unauthorized;
use crate::middlewares::{self, RequireJWT};
use crate::models::announcements::requests::CreateAnnouncementRequest;
use crate::models::assignments::requests::CreateAssignmentRequest;
use crate::models::submissions::requests::GradeSubmissionRequest;
use crate::models::users::entities::UserRole;
use crate::services::{AnnouncementService, AssignmentService, CourseService, SubmissionService};

static COURSE_SERVICE: Lazy<CourseService> = Lazy::new(CourseService::new_lazy);
static ASSIGNMENT_SERVICE: Lazy<AssignmentService> = Lazy::new(AssignmentService::new_lazy);
static SUBMISSION_SERVICE: Lazy<SubmissionService> = Lazy::new(SubmissionService::new_lazy);
static ANNOUNCEMENT_SERVICE: Lazy<AnnouncementService> =
    Lazy::new(AnnouncementService::new_lazy);

pub async fn list_courses(req: HttpRequest) -> ActixResult<HttpResponse> {
    let Some(professor_id) = RequireJWT::extract_user_id(&req) else {
        return Ok(unauthorized());
    };
    COURSE_SERVICE.list_professor_courses(professor_id, &req).await
}

pub async fn create_assignment(
    req: HttpRequest,
    assignment: web::Json<CreateAssignmentRequest>,
) -> ActixResult<HttpResponse> {
    let Some(professor_id) = RequireJWT::extract_user_id(&req) else {
        return Ok(unauthorized());
    };
    ASSIGNMENT_SERVICE
        .create_assignment(professor_id, assignment.into_inner(), &req)
        .await
}

pub async fn list_assignments(req: HttpRequest) -> ActixResult<HttpResponse> {
    let Some(professor_id) = RequireJWT::extract_user_id(&req) else {
        return Ok(unauthorized());
    };
    ASSIGNMENT_SERVICE
        .list_professor_assignments(professor_id, &req)
        .await
}

pub async fn list_submissions(req: HttpRequest) -> ActixResult<HttpResponse> {
    let Some(professor_id) = RequireJWT::extract_user_id(&req) else {
        return Ok(unauthorized());
    };
    SUBMISSION_SERVICE
        .list_professor_submissions(professor_id, false, &req)
        .await
}

pub async fn list_pending_submissions(req: HttpRequest) -> ActixResult<HttpResponse> {
    let Some(professor_id) = RequireJWT::extract_user_id(&req) else {
        return Ok(unauthorized());
    };
    SUBMISSION_SERVICE
        .list_professor_submissions(professor_id, true, &req)
        .await
}

pub async fn grade_submission(
    req: HttpRequest,
    grade: web::Json<GradeSubmissionRequest>,
) -> ActixResult<HttpResponse> {
    let Some(professor_id) = RequireJWT::extract_user_id(&req) else {
        return Ok(unauthorized());
    };
    SUBMISSION_SERVICE
        .grade_submission(professor_id, grade.into_inner(), &req)
        .await
}

pub async fn create_announcement(
    req: HttpRequest,
    announcement: web::Json<CreateAnnouncementRequest>,
) -> ActixResult<HttpResponse> {
    let Some(professor_id) = RequireJWT::extract_user_id(&req) else {
        return Ok(unauthorized());
    };
    ANNOUNCEMENT_SERVICE
        .create_announcement(professor_id, announcement.into_inner(), &req)
        .await
}

pub async fn list_announcements(req: HttpRequest) -> ActixResult<HttpResponse> {
    let Some(professor_id) = RequireJWT::extract_user_id(&req) else {
        return Ok(unauthorized());
    };
    ANNOUNCEMENT_SERVICE
        .list_professor_announcements(professor_id, &req)
        .await
}

// 配置路由
pub fn configure_professor_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/professor")
            .wrap(middlewares::RequireJWT)
            .service(
                web::scope("")
                    .wrap(middlewares::RequireRole::new_any(UserRole::professor_roles()))
                    .route("/courses", web::get().to(list_courses))
                    .route("/assignments", web::get().to(list_assignments))
                    .route("/assignments", web::post().to(create_assignment))
                    .route("/submissions", web::get().to(list_submissions))
                    .route("/submissions/pending", web::get().to(list_pending_submissions))
                    .route("/submissions/grade", web::post().to(grade_submission))
                    .route("/announcements", web::get().to(list_announcements))
                    .route("/announcements", web::post().to(create_announcement)),
            ),
    );
}
