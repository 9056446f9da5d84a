use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use super::unauthorized;
use crate::middlewares::{self, RequireJWT};
use crate::models::submissions::requests::CreateSubmissionRequest;
use crate::models::users::entities::UserRole;
use crate::services::{AnnouncementService, AssignmentService, CourseService, SubmissionService};

static COURSE_SERVICE: Lazy<CourseService> = Lazy::new(CourseService::new_lazy);
static ASSIGNMENT_SERVICE: Lazy<AssignmentService> = Lazy::new(AssignmentService::new_lazy);
static SUBMISSION_SERVICE: Lazy<SubmissionService> = Lazy::new(SubmissionService::new_lazy);
static ANNOUNCEMENT_SERVICE: Lazy<AnnouncementService> =
    Lazy::new(AnnouncementService::new_lazy);

pub async fn list_courses(req: HttpRequest) -> ActixResult<HttpResponse> {
    let Some(student_id) = RequireJWT::extract_user_id(&req) else {
        return Ok(unauthorized());
    };
    COURSE_SERVICE.list_student_courses(student_id, &req).await
}

pub async fn list_assignments(req: HttpRequest) -> ActixResult<HttpResponse> {
    let Some(student_id) = RequireJWT::extract_user_id(&req) else {
        return Ok(unauthorized());
    };
    ASSIGNMENT_SERVICE
        .list_student_assignments(student_id, &req)
        .await
}

pub async fn create_submission(
    req: HttpRequest,
    submission: web::Json<CreateSubmissionRequest>,
) -> ActixResult<HttpResponse> {
    let Some(student_id) = RequireJWT::extract_user_id(&req) else {
        return Ok(unauthorized());
    };
    SUBMISSION_SERVICE
        .create_submission(student_id, submission.into_inner(), &req)
        .await
}

pub async fn list_submissions(req: HttpRequest) -> ActixResult<HttpResponse> {
    let Some(student_id) = RequireJWT::extract_user_id(&req) else {
        return Ok(unauthorized());
    };
    SUBMISSION_SERVICE
        .list_student_submissions(student_id, false, &req)
        .await
}

pub async fn list_grades(req: HttpRequest) -> ActixResult<HttpResponse> {
    let Some(student_id) = RequireJWT::extract_user_id(&req) else {
        return Ok(unauthorized());
    };
    SUBMISSION_SERVICE
        .list_student_submissions(student_id, true, &req)
        .await
}

pub async fn list_announcements(req: HttpRequest) -> ActixResult<HttpResponse> {
    let Some(student_id) = RequireJWT::extract_user_id(&req) else {
        return Ok(unauthorized());
    };
    ANNOUNCEMENT_SERVICE
        .list_student_announcements(student_id, &req)
        .await
}

// 配置路由
pub fn configure_student_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/student")
            .wrap(middlewares::RequireJWT)
            .service(
                web::scope("")
                    .wrap(middlewares::RequireRole::new_any(UserRole::student_roles()))
                    .route("/courses", web::get().to(list_courses))
                    .route("/assignments", web::get().to(list_assignments))
                    .service(
                        web::resource("/submissions")
                            .wrap(middlewares::RateLimit::submission())
                            .route(web::get().to(list_submissions))
                            .route(web::post().to(create_submission)),
                    )
                    .route("/grades", web::get().to(list_grades))
                    .route("/announcements", web::get().to(list_announcements)),
            ),
    );
}
