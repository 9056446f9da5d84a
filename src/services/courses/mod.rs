pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod mine;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::{
    ApiResponse, ErrorCode,
    courses::requests::{CourseListParams, CreateCourseRequest, UpdateCourseRequest},
    users::entities::UserRole,
};
use crate::storage::Storage;

pub struct CourseService {
    storage: Option<Arc<dyn Storage>>,
}

impl CourseService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    pub async fn list_courses(
        &self,
        query: CourseListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_courses(self, query, request).await
    }

    pub async fn get_course(
        &self,
        course_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        get::get_course(self, course_id, request).await
    }

    pub async fn create_course(
        &self,
        course_data: CreateCourseRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_course(self, course_data, request).await
    }

    pub async fn update_course(
        &self,
        course_id: i64,
        update_data: UpdateCourseRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_course(self, course_id, update_data, request).await
    }

    // 仍有选课或作业的课程不可删除
    pub async fn delete_course(
        &self,
        course_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        delete::delete_course(self, course_id, request).await
    }

    pub async fn list_professor_courses(
        &self,
        professor_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        mine::list_professor_courses(self, professor_id, request).await
    }

    pub async fn list_student_courses(
        &self,
        student_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        mine::list_student_courses(self, student_id, request).await
    }
}

/// 指定的教师必须存在且角色为 professor
pub(crate) async fn check_professor(
    storage: &Arc<dyn Storage>,
    professor_id: i64,
) -> Result<(), HttpResponse> {
    match storage.get_user_by_id(professor_id).await {
        Ok(Some(user)) if user.role == UserRole::Professor => Ok(()),
        Ok(_) => Err(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ProfessorInvalid,
            "Professor not found",
        ))),
        Err(e) => Err(HttpResponse::InternalServerError().json(ApiResponse::from_error(
            ErrorCode::InternalServerError,
            "Failed to verify professor",
            &e,
        ))),
    }
}
