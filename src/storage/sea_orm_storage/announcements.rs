//! 公告存储操作

use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::entity::announcements::{
    ActiveModel, Column, Entity as Announcements, Model as AnnouncementModel,
};
use crate::errors::{EduChainError, Result};
use crate::models::announcements::{
    entities::{Announcement, AnnouncementDetail},
    requests::NewAnnouncement,
};
use sea_orm::{ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    pub(crate) async fn announcement_details(
        &self,
        models: Vec<AnnouncementModel>,
    ) -> Result<Vec<AnnouncementDetail>> {
        if models.is_empty() {
            return Ok(Vec::new());
        }

        let mut author_ids: Vec<i64> = models.iter().map(|m| m.created_by).collect();
        author_ids.sort_unstable();
        author_ids.dedup();
        let authors: HashMap<i64, String> = self
            .get_users_by_ids_impl(&author_ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u.full_name()))
            .collect();
        let courses = self
            .courses_by_id(models.iter().filter_map(|m| m.course_id).collect())
            .await?;

        Ok(models
            .into_iter()
            .map(|m| {
                let author_name = authors.get(&m.created_by).cloned().unwrap_or_default();
                let course_name = m
                    .course_id
                    .and_then(|cid| courses.get(&cid))
                    .map(|c| c.course_name.clone());
                AnnouncementDetail {
                    announcement: m.into_announcement(),
                    author_name,
                    course_name,
                }
            })
            .collect())
    }

    /// 发布公告
    pub async fn create_announcement_impl(
        &self,
        announcement: NewAnnouncement,
    ) -> Result<Announcement> {
        let model = ActiveModel {
            title: Set(announcement.title),
            content: Set(announcement.content),
            created_by: Set(announcement.created_by),
            course_id: Set(announcement.course_id),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| EduChainError::database_operation(format!("发布公告失败: {e}")))?;

        Ok(result.into_announcement())
    }

    /// 作者发布的公告
    pub async fn list_announcements_by_author_impl(
        &self,
        author_id: i64,
    ) -> Result<Vec<AnnouncementDetail>> {
        let models = Announcements::find()
            .filter(Column::CreatedBy.eq(author_id))
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| EduChainError::database_operation(format!("查询公告失败: {e}")))?;

        self.announcement_details(models).await
    }

    /// 全局公告 + 已选课程的公告
    pub async fn list_student_announcements_impl(
        &self,
        student_id: i64,
    ) -> Result<Vec<AnnouncementDetail>> {
        let course_ids = self.enrolled_course_ids(student_id).await?;

        let mut visible = Condition::any().add(Column::CourseId.is_null());
        if !course_ids.is_empty() {
            visible = visible.add(Column::CourseId.is_in(course_ids));
        }

        let models = Announcements::find()
            .filter(visible)
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| EduChainError::database_operation(format!("查询公告失败: {e}")))?;

        self.announcement_details(models).await
    }
}
