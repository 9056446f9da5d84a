use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{BlockchainService, chain_unavailable};
use crate::models::{
    ApiResponse,
    blockchain::responses::{
        ChainAssignmentListResponse, ChainSubmissionResponse, SubmissionIdListResponse,
        SubmissionResultResponse,
    },
};

pub async fn list_assignments(
    service: &BlockchainService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    match service.get_gateway(request).list_assignments().await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            ChainAssignmentListResponse {
                total: items.len() as u64,
                items,
            },
            "On-chain assignments retrieved successfully",
        ))),
        Err(e) => Ok(chain_unavailable("Failed to read on-chain assignments", &e)),
    }
}

pub async fn get_assignment(
    service: &BlockchainService,
    id: u64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    match service.get_gateway(request).get_assignment(id).await {
        Ok(assignment) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            assignment,
            "On-chain assignment retrieved successfully",
        ))),
        Err(e) => Ok(chain_unavailable("Failed to read on-chain assignment", &e)),
    }
}

pub async fn get_assignment_submissions(
    service: &BlockchainService,
    assignment_id: u64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    match service
        .get_gateway(request)
        .get_assignment_submissions(assignment_id)
        .await
    {
        Ok(submission_ids) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            SubmissionIdListResponse { submission_ids },
            "On-chain submissions retrieved successfully",
        ))),
        Err(e) => Ok(chain_unavailable("Failed to read on-chain submissions", &e)),
    }
}

pub async fn get_submission(
    service: &BlockchainService,
    id: u64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    match service.get_gateway(request).get_submission(id).await {
        Ok(submission) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            ChainSubmissionResponse { submission },
            "On-chain submission retrieved successfully",
        ))),
        Err(e) => Ok(chain_unavailable("Failed to read on-chain submission", &e)),
    }
}

// 尚未发布成绩时 result 为 null
pub async fn get_submission_result(
    service: &BlockchainService,
    submission_id: u64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    match service
        .get_gateway(request)
        .get_submission_result(submission_id)
        .await
    {
        Ok(result) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            SubmissionResultResponse {
                submission_id,
                result,
            },
            "On-chain result retrieved successfully",
        ))),
        Err(e) => Ok(chain_unavailable("Failed to read on-chain result", &e)),
    }
}

pub async fn get_result(
    service: &BlockchainService,
    id: u64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    match service.get_gateway(request).get_result(id).await {
        Ok(result) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            result,
            "On-chain result retrieved successfully",
        ))),
        Err(e) => Ok(chain_unavailable("Failed to read on-chain result", &e)),
    }
}

pub async fn get_student_submissions(
    service: &BlockchainService,
    address: String,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    match service
        .get_gateway(request)
        .get_student_submissions(&address)
        .await
    {
        Ok(submission_ids) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            SubmissionIdListResponse { submission_ids },
            "On-chain submissions retrieved successfully",
        ))),
        Err(e) => Ok(chain_unavailable("Failed to read on-chain submissions", &e)),
    }
}
