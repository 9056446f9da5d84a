//! 课程存储操作

use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::entity::assignments::{Column as AssignmentColumn, Entity as Assignments};
use crate::entity::course_enrollments::{Column as EnrollmentColumn, Entity as CourseEnrollments};
use crate::entity::courses::{ActiveModel, Column, Entity as Courses, Model as CourseModel};
use crate::errors::{EduChainError, Result};
use crate::models::{
    PaginationInfo,
    common::pagination::normalize_page,
    courses::{
        entities::{Course, CourseSummary},
        requests::{CourseChanges, CourseListQuery, NewCourse},
        responses::CourseListResponse,
    },
    users::entities::UserBrief,
};
use crate::utils::like_contains;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

impl SeaOrmStorage {
    /// 按课程分组统计选课人数
    pub(crate) async fn enrollment_counts(&self, course_ids: &[i64]) -> Result<HashMap<i64, i64>> {
        let rows: Vec<(i64, i64)> = CourseEnrollments::find()
            .select_only()
            .column(EnrollmentColumn::CourseId)
            .column_as(EnrollmentColumn::Id.count(), "count")
            .filter(EnrollmentColumn::CourseId.is_in(course_ids.to_vec()))
            .group_by(EnrollmentColumn::CourseId)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| EduChainError::database_operation(format!("统计选课人数失败: {e}")))?;

        Ok(rows.into_iter().collect())
    }

    /// 按课程分组统计作业数
    async fn assignment_counts(&self, course_ids: &[i64]) -> Result<HashMap<i64, i64>> {
        let rows: Vec<(i64, i64)> = Assignments::find()
            .select_only()
            .column(AssignmentColumn::CourseId)
            .column_as(AssignmentColumn::Id.count(), "count")
            .filter(AssignmentColumn::CourseId.is_in(course_ids.to_vec()))
            .group_by(AssignmentColumn::CourseId)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| EduChainError::database_operation(format!("统计作业数失败: {e}")))?;

        Ok(rows.into_iter().collect())
    }

    /// 课程行批量组装为概要（教师信息 + 统计数）
    pub(crate) async fn course_summaries(
        &self,
        models: Vec<CourseModel>,
    ) -> Result<Vec<CourseSummary>> {
        if models.is_empty() {
            return Ok(Vec::new());
        }

        let course_ids: Vec<i64> = models.iter().map(|m| m.id).collect();
        let mut professor_ids: Vec<i64> = models.iter().filter_map(|m| m.professor_id).collect();
        professor_ids.sort_unstable();
        professor_ids.dedup();

        let professors: HashMap<i64, UserBrief> = self
            .get_users_by_ids_impl(&professor_ids)
            .await?
            .iter()
            .map(|u| (u.id, UserBrief::from(u)))
            .collect();
        let enrollments = self.enrollment_counts(&course_ids).await?;
        let assignments = self.assignment_counts(&course_ids).await?;

        Ok(models
            .into_iter()
            .map(|m| {
                let id = m.id;
                let professor = m.professor_id.and_then(|pid| professors.get(&pid).cloned());
                CourseSummary::from_course(
                    m.into_course(),
                    professor,
                    enrollments.get(&id).copied().unwrap_or(0),
                    assignments.get(&id).copied().unwrap_or(0),
                )
            })
            .collect())
    }

    /// 创建课程
    pub async fn create_course_impl(&self, course: NewCourse) -> Result<Course> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            course_code: Set(course.course_code),
            course_name: Set(course.course_name),
            description: Set(course.description),
            professor_id: Set(course.professor_id),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| EduChainError::database_operation(format!("创建课程失败: {e}")))?;

        Ok(result.into_course())
    }

    /// 通过 ID 获取课程
    pub async fn get_course_by_id_impl(&self, id: i64) -> Result<Option<Course>> {
        let result = Courses::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| EduChainError::database_operation(format!("查询课程失败: {e}")))?;

        Ok(result.map(|m| m.into_course()))
    }

    /// 通过课程代码获取课程
    pub async fn get_course_by_code_impl(&self, code: &str) -> Result<Option<Course>> {
        let result = Courses::find()
            .filter(Column::CourseCode.eq(code.trim().to_uppercase()))
            .one(&self.db)
            .await
            .map_err(|e| EduChainError::database_operation(format!("查询课程失败: {e}")))?;

        Ok(result.map(|m| m.into_course()))
    }

    /// 获取课程概要
    pub async fn get_course_summary_impl(&self, id: i64) -> Result<Option<CourseSummary>> {
        let Some(model) = Courses::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| EduChainError::database_operation(format!("查询课程失败: {e}")))?
        else {
            return Ok(None);
        };

        Ok(self.course_summaries(vec![model]).await?.into_iter().next())
    }

    /// 分页列出课程，最新创建的在前
    pub async fn list_courses_with_pagination_impl(
        &self,
        query: CourseListQuery,
    ) -> Result<CourseListResponse> {
        let (page, size) = normalize_page(query.page, query.size);

        let mut select = Courses::find();

        // 搜索条件
        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let search = search.trim();
            select = select.filter(
                Condition::any()
                    .add(Column::CourseCode.like(like_contains(&search.to_uppercase())))
                    .add(Column::CourseName.like(like_contains(search)))
                    .add(Column::Description.like(like_contains(search))),
            );
        }

        // 教师筛选
        if let Some(professor_id) = query.professor_id {
            select = select.filter(Column::ProfessorId.eq(professor_id));
        }

        // 是否已分配教师
        match query.assigned {
            Some(true) => select = select.filter(Column::ProfessorId.is_not_null()),
            Some(false) => select = select.filter(Column::ProfessorId.is_null()),
            None => {}
        }

        select = select
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| EduChainError::database_operation(format!("查询课程总数失败: {e}")))?;

        let models = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| EduChainError::database_operation(format!("查询课程列表失败: {e}")))?;

        Ok(CourseListResponse {
            items: self.course_summaries(models).await?,
            pagination: PaginationInfo::new(page, size, total),
        })
    }

    /// 教师负责的课程
    pub async fn list_professor_courses_impl(
        &self,
        professor_id: i64,
    ) -> Result<Vec<CourseSummary>> {
        let models = Courses::find()
            .filter(Column::ProfessorId.eq(professor_id))
            .order_by_asc(Column::CourseCode)
            .all(&self.db)
            .await
            .map_err(|e| EduChainError::database_operation(format!("查询课程列表失败: {e}")))?;

        self.course_summaries(models).await
    }

    /// 学生已选的课程
    pub async fn list_student_courses_impl(&self, student_id: i64) -> Result<Vec<CourseSummary>> {
        let course_ids = self.enrolled_course_ids(student_id).await?;
        if course_ids.is_empty() {
            return Ok(Vec::new());
        }

        let models = Courses::find()
            .filter(Column::Id.is_in(course_ids))
            .order_by_asc(Column::CourseCode)
            .all(&self.db)
            .await
            .map_err(|e| EduChainError::database_operation(format!("查询课程列表失败: {e}")))?;

        self.course_summaries(models).await
    }

    /// 更新课程信息
    pub async fn update_course_impl(
        &self,
        id: i64,
        changes: CourseChanges,
    ) -> Result<Option<Course>> {
        if self.get_course_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let now = chrono::Utc::now().timestamp();

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(now),
            ..Default::default()
        };

        if let Some(code) = changes.course_code {
            model.course_code = Set(code);
        }

        if let Some(name) = changes.course_name {
            model.course_name = Set(name);
        }

        if let Some(description) = changes.description {
            model.description = Set(description);
        }

        if let Some(professor_id) = changes.professor_id {
            model.professor_id = Set(professor_id);
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| EduChainError::database_operation(format!("更新课程失败: {e}")))?;

        self.get_course_by_id_impl(id).await
    }

    /// 删除课程
    pub async fn delete_course_impl(&self, id: i64) -> Result<bool> {
        let result = Courses::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| EduChainError::database_operation(format!("删除课程失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}
