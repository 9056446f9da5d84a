//! 链上记录的内容哈希
//!
//! 统一为 UTF-8 文本的 SHA-256，以 `bytes32` 上链，库中保存 0x 前缀十六进制。

use alloy::hex;
use alloy::primitives::B256;
use sha2::{Digest, Sha256};

pub fn sha256_text(text: &str) -> B256 {
    B256::from_slice(&Sha256::digest(text.as_bytes()))
}

/// 作业：标题 + 描述
pub fn assignment_hash(title: &str, description: &str) -> B256 {
    sha256_text(&format!("{title}{description}"))
}

/// 提交：加密后的答案
pub fn submission_hash(encrypted_content: &str) -> B256 {
    sha256_text(encrypted_content)
}

/// 成绩：成绩 + 评语
pub fn result_hash(grade: f64, feedback: &str) -> B256 {
    sha256_text(&format!("{grade}{feedback}"))
}

/// 0x 前缀的小写十六进制
pub fn to_hex(hash: &B256) -> String {
    hex::encode_prefixed(hash.as_slice())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_digest() {
        // sha256("abc")
        assert_eq!(
            to_hex(&sha256_text("abc")),
            "0xba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_assignment_hash_concatenates() {
        assert_eq!(assignment_hash("a", "bc"), sha256_text("abc"));
        assert_ne!(assignment_hash("ab", "c"), assignment_hash("a", "bd"));
    }

    #[test]
    fn test_result_hash_text_form() {
        // 整数成绩按 f64 的 Display 输出，不带小数点
        assert_eq!(result_hash(15.0, "good"), sha256_text("15good"));
        assert_eq!(result_hash(12.5, ""), sha256_text("12.5"));
    }

    #[test]
    fn test_result_hash_without_feedback() {
        // 无评语时只哈希成绩本身
        assert_eq!(result_hash(18.0, ""), sha256_text("18"));
        assert_ne!(result_hash(18.0, ""), sha256_text("18.0"));
        assert_ne!(result_hash(18.0, ""), sha256_text("18None"));
    }

    #[test]
    fn test_hex_is_prefixed_and_sized() {
        let hex = to_hex(&submission_hash("cipher"));
        assert!(hex.starts_with("0x"));
        assert_eq!(hex.len(), 66);
    }
}
