//! 查询参数反序列化辅助
//!
//! 带 `#[serde(flatten)]` 的查询结构体会先被缓存为字符串，
//! 数值与布尔字段需要手动解析。

use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrI64 {
    Int(i64),
    Str(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrBool {
    Bool(bool),
    Str(String),
}

/// `?course_id=3` / `?course_id=` 均可接受，空串视为未提供
pub fn deserialize_optional_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<StringOrI64>::deserialize(deserializer)? {
        None => Ok(None),
        Some(StringOrI64::Int(v)) => Ok(Some(v)),
        Some(StringOrI64::Str(s)) if s.trim().is_empty() => Ok(None),
        Some(StringOrI64::Str(s)) => s
            .trim()
            .parse::<i64>()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("无效的整数参数: '{s}'"))),
    }
}

pub fn deserialize_optional_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<StringOrBool>::deserialize(deserializer)? {
        None => Ok(None),
        Some(StringOrBool::Bool(v)) => Ok(Some(v)),
        Some(StringOrBool::Str(s)) => match s.trim().to_ascii_lowercase().as_str() {
            "" => Ok(None),
            "true" | "1" | "yes" => Ok(Some(true)),
            "false" | "0" | "no" => Ok(Some(false)),
            _ => Err(serde::de::Error::custom(format!("无效的布尔参数: '{s}'"))),
        },
    }
}

/// 区分「字段缺失」与「显式 null」
///
/// 缺失 -> `None`，`null` -> `Some(None)`，值 -> `Some(Some(v))`。
/// 需配合 `#[serde(default)]` 使用。
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Filters {
        #[serde(default, deserialize_with = "deserialize_optional_i64")]
        course_id: Option<i64>,
        #[serde(default, deserialize_with = "deserialize_optional_bool")]
        assigned: Option<bool>,
    }

    #[derive(Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "double_option")]
        professor_id: Option<Option<i64>>,
    }

    #[test]
    fn test_optional_i64_from_string() {
        let f: Filters = serde_json::from_str(r#"{"course_id":"42"}"#).unwrap();
        assert_eq!(f.course_id, Some(42));
        let f: Filters = serde_json::from_str(r#"{"course_id":""}"#).unwrap();
        assert_eq!(f.course_id, None);
        assert!(serde_json::from_str::<Filters>(r#"{"course_id":"abc"}"#).is_err());
    }

    #[test]
    fn test_optional_bool_variants() {
        let f: Filters = serde_json::from_str(r#"{"assigned":"false"}"#).unwrap();
        assert_eq!(f.assigned, Some(false));
        let f: Filters = serde_json::from_str(r#"{"assigned":true}"#).unwrap();
        assert_eq!(f.assigned, Some(true));
        let f: Filters = serde_json::from_str("{}").unwrap();
        assert_eq!(f.assigned, None);
    }

    #[test]
    fn test_double_option_distinguishes_null() {
        let p: Patch = serde_json::from_str("{}").unwrap();
        assert_eq!(p.professor_id, None);
        let p: Patch = serde_json::from_str(r#"{"professor_id":null}"#).unwrap();
        assert_eq!(p.professor_id, Some(None));
        let p: Patch = serde_json::from_str(r#"{"professor_id":7}"#).unwrap();
        assert_eq!(p.professor_id, Some(Some(7)));
    }
}
