use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("Invalid email regex")
});

static COURSE_CODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z0-9][A-Z0-9_-]{1,19}$").expect("Invalid course code regex"));

/// 最短密码长度
pub const MIN_PASSWORD_LEN: usize = 8;

/// 规范化邮箱：去空白、转小写，并校验格式
pub fn normalize_email(email: &str) -> Result<String, &'static str> {
    let email = email.trim().to_lowercase();
    if !EMAIL_RE.is_match(&email) {
        return Err("Email format is invalid");
    }
    Ok(email)
}

/// 姓名去空白后不能为空，最长 100 字符
pub fn normalize_name(name: &str) -> Result<String, &'static str> {
    let name = name.trim();
    if name.is_empty() {
        return Err("Name must not be empty");
    }
    if name.chars().count() > 100 {
        return Err("Name must be at most 100 characters");
    }
    Ok(name.to_string())
}

pub fn validate_password(password: &str) -> Result<(), &'static str> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err("Password must be at least 8 characters long");
    }
    Ok(())
}

/// 规范化课程代码：去空白、转大写
///
/// 2 到 20 位，由字母、数字、下划线或连字符组成，以字母或数字开头。
pub fn normalize_course_code(code: &str) -> Result<String, &'static str> {
    let code = code.trim().to_uppercase();
    if !COURSE_CODE_RE.is_match(&code) {
        return Err(
            "Course code must be 2-20 letters, digits, underscores or hyphens",
        );
    }
    Ok(code)
}

/// 以太坊地址：0x + 40 位十六进制
pub fn validate_eth_address(address: &str) -> Result<(), &'static str> {
    let hex_part = address
        .strip_prefix("0x")
        .or_else(|| address.strip_prefix("0X"))
        .ok_or("Address must start with 0x")?;
    if hex_part.len() != 40 || !hex_part.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err("Address must be 40 hexadecimal characters");
    }
    Ok(())
}

/// 交易哈希：0x + 64 位十六进制
pub fn validate_tx_hash(hash: &str) -> Result<(), &'static str> {
    let hex_part = hash.strip_prefix("0x").ok_or("Hash must start with 0x")?;
    if hex_part.len() != 64 || !hex_part.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err("Hash must be 64 hexadecimal characters");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_normalized() {
        assert_eq!(
            normalize_email("  Ada.Lovelace@Example.COM ").unwrap(),
            "ada.lovelace@example.com"
        );
        assert!(normalize_email("not-an-email").is_err());
        assert!(normalize_email("a@b").is_err());
    }

    #[test]
    fn test_password_length() {
        assert!(validate_password("1234567").is_err());
        assert!(validate_password("12345678").is_ok());
    }

    #[test]
    fn test_course_code_normalized() {
        assert_eq!(normalize_course_code(" cs-101 ").unwrap(), "CS-101");
        assert_eq!(normalize_course_code("math_2").unwrap(), "MATH_2");
        assert!(normalize_course_code("x").is_err());
        assert!(normalize_course_code("-CS").is_err());
        assert!(normalize_course_code("CS 101").is_err());
    }

    #[test]
    fn test_name_trimmed() {
        assert_eq!(normalize_name("  Ada ").unwrap(), "Ada");
        assert!(normalize_name("   ").is_err());
    }

    #[test]
    fn test_chain_identifiers() {
        assert!(validate_eth_address("0x7E5F4552091A69125d5DfCb7b8C2659029395Bdf").is_ok());
        assert!(validate_eth_address("7E5F4552091A69125d5DfCb7b8C2659029395Bdf").is_err());
        assert!(validate_eth_address("0x1234").is_err());
        assert!(validate_tx_hash(&format!("0x{}", "ab".repeat(32))).is_ok());
        assert!(validate_tx_hash("0xzz").is_err());
    }
}
