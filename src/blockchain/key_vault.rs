//! 钱包私钥加密存储
//!
//! 密钥由 `key_vault.secret` 经 SHA-256 派生，AES-256-GCM 加密。
//! 入库格式为 base64(nonce(12 字节) ‖ ciphertext)。

use aes_gcm::{
    Aes256Gcm, Nonce,
    aead::{Aead, KeyInit},
};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use rand::RngCore;
use sha2::{Digest, Sha256};

use crate::errors::{EduChainError, Result};

const NONCE_LEN: usize = 12;

#[derive(Clone)]
pub struct KeyVault {
    cipher: Aes256Gcm,
}

impl std::fmt::Debug for KeyVault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("KeyVault(..)")
    }
}

impl KeyVault {
    pub fn new(secret: &str) -> Result<Self> {
        if secret.is_empty() {
            return Err(EduChainError::key_vault("key_vault.secret 未配置"));
        }

        let key = Sha256::digest(secret.as_bytes());
        let cipher = Aes256Gcm::new_from_slice(&key)
            .map_err(|e| EduChainError::key_vault(format!("密钥长度错误: {e}")))?;
        Ok(Self { cipher })
    }

    pub fn encrypt(&self, plaintext: &str) -> Result<String> {
        if plaintext.is_empty() {
            return Err(EduChainError::key_vault("待加密内容为空"));
        }

        let mut nonce_bytes = [0u8; NONCE_LEN];
        rand::rng().fill_bytes(&mut nonce_bytes);

        let ciphertext = self
            .cipher
            .encrypt(Nonce::from_slice(&nonce_bytes), plaintext.as_bytes())
            .map_err(|e| EduChainError::key_vault(format!("加密失败: {e}")))?;

        let mut packed = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        packed.extend_from_slice(&nonce_bytes);
        packed.extend_from_slice(&ciphertext);
        Ok(STANDARD.encode(packed))
    }

    pub fn decrypt(&self, encoded: &str) -> Result<String> {
        if encoded.is_empty() {
            return Err(EduChainError::key_vault("密文为空"));
        }

        let packed = STANDARD
            .decode(encoded)
            .map_err(|e| EduChainError::key_vault(format!("密文不是合法的 base64: {e}")))?;
        if packed.len() <= NONCE_LEN {
            return Err(EduChainError::key_vault("密文长度不足"));
        }

        let (nonce_bytes, ciphertext) = packed.split_at(NONCE_LEN);
        let plaintext = self
            .cipher
            .decrypt(Nonce::from_slice(nonce_bytes), ciphertext)
            .map_err(|_| EduChainError::key_vault("解密失败：密钥错误或数据被篡改"))?;

        String::from_utf8(plaintext)
            .map_err(|e| EduChainError::key_vault(format!("明文不是合法的 UTF-8: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "0x4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318";

    #[test]
    fn test_round_trip() {
        let vault = KeyVault::new("unit-test-secret").unwrap();
        let sealed = vault.encrypt(KEY).unwrap();
        assert_ne!(sealed, KEY);
        assert_eq!(vault.decrypt(&sealed).unwrap(), KEY);
    }

    #[test]
    fn test_nonce_is_fresh() {
        let vault = KeyVault::new("unit-test-secret").unwrap();
        assert_ne!(vault.encrypt(KEY).unwrap(), vault.encrypt(KEY).unwrap());
    }

    #[test]
    fn test_tampered_ciphertext_rejected() {
        let vault = KeyVault::new("unit-test-secret").unwrap();
        let mut packed = STANDARD.decode(vault.encrypt(KEY).unwrap()).unwrap();
        let last = packed.len() - 1;
        packed[last] ^= 0x01;
        let err = vault.decrypt(&STANDARD.encode(packed)).unwrap_err();
        assert_eq!(err.code(), "E015");
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let sealed = KeyVault::new("secret-a").unwrap().encrypt(KEY).unwrap();
        assert!(KeyVault::new("secret-b").unwrap().decrypt(&sealed).is_err());
    }

    #[test]
    fn test_missing_input_rejected() {
        assert!(KeyVault::new("").is_err());
        let vault = KeyVault::new("s").unwrap();
        assert!(vault.encrypt("").is_err());
        assert!(vault.decrypt("").is_err());
        assert!(vault.decrypt("not base64!!").is_err());
        assert!(vault.decrypt(&STANDARD.encode([0u8; 8])).is_err());
    }
}
