pub mod create;
pub mod grade;
pub mod list;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::blockchain::ChainRelay;
use crate::models::submissions::requests::{CreateSubmissionRequest, GradeSubmissionRequest};
use crate::storage::Storage;

pub struct SubmissionService {
    storage: Option<Arc<dyn Storage>>,
}

impl SubmissionService {
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

    pub(crate) fn get_relay(&self, request: &HttpRequest) -> Arc<ChainRelay> {
        request
            .app_data::<actix_web::web::Data<Arc<ChainRelay>>>()
            .expect("ChainRelay not found in app data")
            .get_ref()
            .clone()
    }

    pub async fn create_submission(
        &self,
        student_id: i64,
        submission: CreateSubmissionRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_submission(self, student_id, submission, request).await
    }

    // 学生自己的提交，graded_only 时只看已评分的
    pub async fn list_student_submissions(
        &self,
        student_id: i64,
        graded_only: bool,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_student_submissions(self, student_id, graded_only, request).await
    }

    pub async fn list_professor_submissions(
        &self,
        professor_id: i64,
        pending_only: bool,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_professor_submissions(self, professor_id, pending_only, request).await
    }

    pub async fn grade_submission(
        &self,
        professor_id: i64,
        grade: GradeSubmissionRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        grade::grade_submission(self, professor_id, grade, request).await
    }
}
