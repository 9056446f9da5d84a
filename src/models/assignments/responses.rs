use super::entities::{Assignment, ProfessorAssignmentItem, StudentAssignmentItem};
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub enum BlockchainStatus {
    Confirmed,
    Pending,
}

impl BlockchainStatus {
    pub fn from_mirrored(mirrored: bool) -> Self {
        if mirrored {
            Self::Confirmed
        } else {
            Self::Pending
        }
    }
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct CreateAssignmentResponse {
    pub assignment: Assignment,
    pub blockchain_status: BlockchainStatus,
    pub chain_assignment_id: Option<i64>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct ProfessorAssignmentListResponse {
    pub items: Vec<ProfessorAssignmentItem>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct StudentAssignmentListResponse {
    pub items: Vec<StudentAssignmentItem>,
}
