use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::{DateTime, Utc};
use tracing::info;

use super::AssignmentService;
use crate::models::{
    ApiResponse, ErrorCode,
    assignments::{
        requests::{CreateAssignmentRequest, NewAssignment},
        responses::{BlockchainStatus, CreateAssignmentResponse},
    },
};

fn parse_due_date(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

pub async fn create_assignment(
    service: &AssignmentService,
    professor_id: i64,
    assignment: CreateAssignmentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let title = assignment.title.trim().to_string();
    let public_key = assignment.public_key.trim().to_string();
    if title.is_empty() || public_key.is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "Title and public key are required",
        )));
    }

    let Some(due_date) = parse_due_date(&assignment.due_date) else {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::AssignmentDueDateInvalid,
            "Due date must be an RFC 3339 timestamp",
        )));
    };

    let storage = service.get_storage(request);

    match storage.get_course_by_id(assignment.course_id).await {
        Ok(Some(course)) if course.professor_id == Some(professor_id) => {}
        Ok(Some(_)) => {
            return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
                ErrorCode::CoursePermissionDenied,
                "Course not found or access denied",
            )));
        }
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::CourseNotFound,
                "Course not found",
            )));
        }
        Err(e) => {
            return Ok(HttpResponse::InternalServerError().json(ApiResponse::from_error(
                ErrorCode::AssignmentCreationFailed,
                "Assignment creation failed",
                &e,
            )));
        }
    }

    let new_assignment = NewAssignment {
        title,
        description: assignment.description.trim().to_string(),
        course_id: assignment.course_id,
        professor_id,
        public_key,
        due_date,
    };

    let mut created = match storage.create_assignment(new_assignment).await {
        Ok(created) => created,
        Err(e) => {
            return Ok(HttpResponse::InternalServerError().json(ApiResponse::from_error(
                ErrorCode::AssignmentCreationFailed,
                "Assignment creation failed",
                &e,
            )));
        }
    };
    info!("教师 {} 发布作业 {}", professor_id, created.id);

    let receipt = service.get_relay(request).mirror_assignment(&created).await;
    if let Some(receipt) = &receipt {
        created.chain_tx_hash = Some(receipt.tx.tx_hash.clone());
        created.chain_assignment_id = Some(receipt.chain_assignment_id as i64);
    }

    let response = CreateAssignmentResponse {
        blockchain_status: BlockchainStatus::from_mirrored(receipt.is_some()),
        chain_assignment_id: created.chain_assignment_id,
        assignment: created,
    };
    Ok(HttpResponse::Created().json(ApiResponse::success(
        response,
        "Assignment created successfully",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_due_date_accepts_offsets() {
        let parsed = parse_due_date("2030-05-01T12:00:00+02:00").unwrap();
        assert_eq!(parsed.to_rfc3339(), "2030-05-01T10:00:00+00:00");
        assert!(parse_due_date(" 2030-05-01T10:00:00Z ").is_some());
        assert!(parse_due_date("2030-05-01").is_none());
    }
}
