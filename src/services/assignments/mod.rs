pub mod create;
pub mod list;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::blockchain::ChainRelay;
use crate::models::assignments::requests::CreateAssignmentRequest;
use crate::storage::Storage;

pub struct AssignmentService {
    storage: Option<Arc<dyn Storage>>,
}

impl AssignmentService {
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

    // 教师发布作业，写库后同步镜像上链
    pub async fn create_assignment(
        &self,
        professor_id: i64,
        assignment: CreateAssignmentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_assignment(self, professor_id, assignment, request).await
    }

    pub async fn list_professor_assignments(
        &self,
        professor_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_professor_assignments(self, professor_id, request).await
    }

    pub async fn list_student_assignments(
        &self,
        student_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_student_assignments(self, student_id, request).await
    }
}
