use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::SubmissionService;
use crate::models::{
    ApiResponse, ErrorCode,
    submissions::{
        requests::{CreateSubmissionRequest, NewSubmission},
        responses::SubmissionResponse,
    },
};

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

pub async fn create_submission(
    service: &SubmissionService,
    student_id: i64,
    submission: CreateSubmissionRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let (Some(assignment_id), Some(encrypted_content), Some(student_id_hash)) = (
        submission.assignment_id,
        non_empty(submission.encrypted_content),
        non_empty(submission.student_id_hash),
    ) else {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "assignment_id, encrypted_content and student_id_hash are required",
        )));
    };

    let storage = service.get_storage(request);

    let assignment = match storage.get_assignment_by_id(assignment_id).await {
        Ok(Some(assignment)) => assignment,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::AssignmentNotFound,
                "Assignment not found",
            )));
        }
        Err(e) => {
            return Ok(HttpResponse::InternalServerError().json(ApiResponse::from_error(
                ErrorCode::SubmissionFailed,
                "Submission failed",
                &e,
            )));
        }
    };

    match storage.is_enrolled(student_id, assignment.course_id).await {
        Ok(true) => {}
        Ok(false) => {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::NotEnrolled,
                "You are not enrolled in this course",
            )));
        }
        Err(e) => {
            return Ok(HttpResponse::InternalServerError().json(ApiResponse::from_error(
                ErrorCode::SubmissionFailed,
                "Submission failed",
                &e,
            )));
        }
    }

    if assignment.is_overdue(chrono::Utc::now()) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::SubmissionDeadlinePassed,
            "Assignment deadline has passed",
        )));
    }

    let already_submitted = HttpResponse::BadRequest().json(ApiResponse::error_empty(
        ErrorCode::SubmissionAlreadyExists,
        "You have already submitted this assignment",
    ));

    match storage.find_submission(assignment_id, student_id).await {
        Ok(Some(_)) => return Ok(already_submitted),
        Ok(None) => {}
        Err(e) => {
            return Ok(HttpResponse::InternalServerError().json(ApiResponse::from_error(
                ErrorCode::SubmissionFailed,
                "Submission failed",
                &e,
            )));
        }
    }

    let new_submission = NewSubmission {
        assignment_id,
        student_id,
        encrypted_content,
        student_id_hash,
    };
    let mut created = match storage.create_submission(new_submission).await {
        Ok(created) => created,
        Err(e) if e.is_unique_violation() => return Ok(already_submitted),
        Err(e) => {
            return Ok(HttpResponse::InternalServerError().json(ApiResponse::from_error(
                ErrorCode::SubmissionFailed,
                "Submission failed",
                &e,
            )));
        }
    };
    info!("学生 {} 提交了作业 {}", student_id, assignment_id);

    let receipt = service
        .get_relay(request)
        .mirror_submission(&created, &assignment)
        .await;
    if let Some(receipt) = &receipt {
        created.chain_tx_hash = Some(receipt.tx.tx_hash.clone());
        created.chain_submission_id = Some(receipt.chain_submission_id as i64);
    }

    Ok(HttpResponse::Created().json(ApiResponse::success(
        SubmissionResponse {
            submission: created,
            on_chain: receipt.is_some(),
        },
        "Assignment submitted successfully",
    )))
}
