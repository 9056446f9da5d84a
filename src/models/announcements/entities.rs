use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 公告实体，course_id 为空表示全局公告
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/announcement.ts")]
pub struct Announcement {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub created_by: i64,
    pub course_id: Option<i64>,
    pub chain_tx_hash: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/announcement.ts")]
pub struct AnnouncementDetail {
    #[serde(flatten)]
    #[ts(flatten)]
    pub announcement: Announcement,
    pub author_name: String,
    pub course_name: Option<String>,
}
