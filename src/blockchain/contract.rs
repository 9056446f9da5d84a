//! AssignmentSystem 合约绑定与部署清单

use std::path::Path;

use alloy::primitives::Address;
use alloy::sol;
use serde::Deserialize;

use crate::errors::{EduChainError, Result};

sol! {
    #[sol(rpc)]
    interface IAssignmentSystem {
        function createAssignment(
            string title,
            string description,
            uint256 deadline,
            string publicKey,
            bytes32 assignmentHash
        ) external returns (uint256);

        function submitAssignment(
            uint256 assignmentId,
            string encryptedAnswer,
            string studentInfo,
            bytes32 submissionHash
        ) external returns (uint256);

        function publishResult(
            uint256 submissionId,
            uint256 grade,
            string comment,
            bytes32 resultHash
        ) external returns (uint256);

        function getAssignment(uint256 assignmentId) external view returns (
            uint256 id,
            address teacher,
            string title,
            string description,
            uint256 deadline,
            string publicKey,
            bytes32 assignmentHash,
            bool isActive
        );

        function getSubmission(uint256 submissionId) external view returns (
            uint256 id,
            uint256 assignmentId,
            address student,
            string encryptedAnswer,
            string studentInfo,
            bytes32 submissionHash,
            uint256 timestamp,
            bool isGraded
        );

        function getResult(uint256 resultId) external view returns (
            uint256 id,
            uint256 submissionId,
            uint256 grade,
            string comment,
            bytes32 resultHash,
            uint256 timestamp
        );

        function getAssignmentSubmissions(uint256 assignmentId) external view returns (uint256[]);
        function getStudentSubmissions(address student) external view returns (uint256[]);
        function submissionResults(uint256 submissionId) external view returns (uint256);

        function assignmentCounter() external view returns (uint256);
        function submissionCounter() external view returns (uint256);
        function resultCounter() external view returns (uint256);
    }
}

/// 合约部署后生成的清单文件
///
/// 只读取地址，ABI 保留原样供前端或排障使用。
#[derive(Debug, Clone, Deserialize)]
pub struct ContractManifest {
    pub contract_address: String,
    #[serde(default)]
    pub abi: serde_json::Value,
}

impl ContractManifest {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            EduChainError::file_operation(format!(
                "读取合约清单 {} 失败: {e}",
                path.display()
            ))
        })?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let manifest: ContractManifest = serde_json::from_str(raw)
            .map_err(|e| EduChainError::serialization(format!("合约清单格式错误: {e}")))?;
        manifest.address()?;
        Ok(manifest)
    }

    pub fn address(&self) -> Result<Address> {
        self.contract_address
            .parse::<Address>()
            .map_err(|e| EduChainError::blockchain(format!("合约地址无效: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_parses_address() {
        let manifest = ContractManifest::from_json(
            r#"{"contract_address":"0x5FbDB2315678afecb367f032d93F642f64180aa3","abi":[]}"#,
        )
        .unwrap();
        assert_eq!(
            manifest.address().unwrap().to_checksum(None),
            "0x5FbDB2315678afecb367f032d93F642f64180aa3"
        );
    }

    #[test]
    fn test_manifest_rejects_bad_address() {
        let err = ContractManifest::from_json(r#"{"contract_address":"0x1234"}"#).unwrap_err();
        assert_eq!(err.code(), "E014");
        assert!(ContractManifest::from_json("not json").is_err());
    }
}
