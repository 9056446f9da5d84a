use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::SubmissionService;
use crate::models::{
    ApiResponse, ErrorCode,
    submissions::{requests::GradeSubmissionRequest, responses::SubmissionResponse},
};

/// 教师评分
///
/// 只能给自己作业下的提交评分，且每份提交只能评一次。评分落库后以教师身份发布到链上。
pub async fn grade_submission(
    service: &SubmissionService,
    professor_id: i64,
    grade: GradeSubmissionRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let detail = match storage.get_submission_detail(grade.submission_id).await {
        Ok(Some(detail)) if detail.professor_id == professor_id => detail,
        // 不属于自己的提交同样按不存在处理
        Ok(_) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::SubmissionNotFound,
                "Submission not found or access denied",
            )));
        }
        Err(e) => {
            return Ok(HttpResponse::InternalServerError().json(ApiResponse::from_error(
                ErrorCode::GradeFailed,
                "Grading failed",
                &e,
            )));
        }
    };

    let already_graded = HttpResponse::BadRequest().json(ApiResponse::error_empty(
        ErrorCode::SubmissionAlreadyGraded,
        "Submission has already been graded",
    ));

    if detail.submission.is_graded() {
        return Ok(already_graded);
    }

    if !detail.submission.grade_in_range(grade.grade) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::GradeOutOfRange,
            format!("Grade must be between 0 and {}", detail.submission.max_grade),
        )));
    }

    let feedback = grade
        .feedback
        .map(|f| f.trim().to_string())
        .filter(|f| !f.is_empty());

    let mut graded = match storage
        .grade_submission(grade.submission_id, grade.grade, feedback)
        .await
    {
        Ok(Some(graded)) => graded,
        Ok(None) => return Ok(already_graded),
        Err(e) => {
            return Ok(HttpResponse::InternalServerError().json(ApiResponse::from_error(
                ErrorCode::GradeFailed,
                "Grading failed",
                &e,
            )));
        }
    };
    info!(
        "教师 {} 为提交 {} 评分 {}",
        professor_id, graded.id, grade.grade
    );

    let receipt = service
        .get_relay(request)
        .mirror_grade(professor_id, &graded)
        .await;
    if let Some(receipt) = &receipt {
        graded.chain_result_hash = Some(receipt.tx.tx_hash.clone());
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        SubmissionResponse {
            submission: graded,
            on_chain: receipt.is_some(),
        },
        "Submission graded successfully",
    )))
}
