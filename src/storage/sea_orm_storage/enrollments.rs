//! 选课存储操作

use std::collections::{HashMap, HashSet};

use super::SeaOrmStorage;
use crate::entity::course_enrollments::{
    ActiveModel, Column, Entity as CourseEnrollments, Model as EnrollmentModel,
};
use crate::entity::courses::{Column as CourseColumn, Entity as Courses};
use crate::entity::users::{Column as UserColumn, Entity as Users};
use crate::errors::{EduChainError, Result};
use crate::models::{
    PaginationInfo,
    common::pagination::normalize_page,
    enrollments::{
        entities::{Enrollment, EnrollmentCourse, EnrollmentDetail},
        requests::EnrollmentListQuery,
        responses::{
            BulkEnrollmentResponse, EnrollmentListResponse, EnrollmentStats, SkippedEnrollment,
        },
    },
    users::entities::UserBrief,
};
use crate::utils::like_contains;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};

impl SeaOrmStorage {
    /// 学生已选课程的 ID
    pub(crate) async fn enrolled_course_ids(&self, student_id: i64) -> Result<Vec<i64>> {
        CourseEnrollments::find()
            .select_only()
            .column(Column::CourseId)
            .filter(Column::StudentId.eq(student_id))
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| EduChainError::database_operation(format!("查询选课记录失败: {e}")))
    }

    /// 选课行批量组装为详情
    async fn enrollment_details(&self, models: Vec<EnrollmentModel>) -> Result<Vec<EnrollmentDetail>> {
        if models.is_empty() {
            return Ok(Vec::new());
        }

        let student_ids: Vec<i64> = models.iter().map(|m| m.student_id).collect();
        let course_ids: Vec<i64> = models.iter().map(|m| m.course_id).collect();

        let courses: HashMap<i64, _> = Courses::find()
            .filter(CourseColumn::Id.is_in(course_ids))
            .all(&self.db)
            .await
            .map_err(|e| EduChainError::database_operation(format!("查询课程失败: {e}")))?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();

        let mut user_ids = student_ids;
        user_ids.extend(courses.values().filter_map(|c| c.professor_id));
        user_ids.sort_unstable();
        user_ids.dedup();
        let users: HashMap<i64, _> = self
            .get_users_by_ids_impl(&user_ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();

        Ok(models
            .into_iter()
            .filter_map(|m| {
                let student = users.get(&m.student_id)?;
                let course = courses.get(&m.course_id)?;
                Some(EnrollmentDetail {
                    id: m.id,
                    student: UserBrief::from(student),
                    course: EnrollmentCourse {
                        id: course.id,
                        course_code: course.course_code.clone(),
                        course_name: course.course_name.clone(),
                        professor_name: course
                            .professor_id
                            .and_then(|pid| users.get(&pid))
                            .map(|p| p.full_name()),
                    },
                    enrolled_at: m.into_enrollment().enrolled_at,
                })
            })
            .collect())
    }

    /// 选课
    pub async fn create_enrollment_impl(&self, student_id: i64, course_id: i64) -> Result<Enrollment> {
        let model = ActiveModel {
            student_id: Set(student_id),
            course_id: Set(course_id),
            enrolled_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| EduChainError::database_operation(format!("创建选课记录失败: {e}")))?;

        Ok(result.into_enrollment())
    }

    /// 获取选课详情
    pub async fn get_enrollment_detail_impl(&self, id: i64) -> Result<Option<EnrollmentDetail>> {
        let Some(model) = CourseEnrollments::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| EduChainError::database_operation(format!("查询选课记录失败: {e}")))?
        else {
            return Ok(None);
        };

        Ok(self.enrollment_details(vec![model]).await?.into_iter().next())
    }

    /// 是否已选课
    pub async fn is_enrolled_impl(&self, student_id: i64, course_id: i64) -> Result<bool> {
        let count = CourseEnrollments::find()
            .filter(Column::StudentId.eq(student_id))
            .filter(Column::CourseId.eq(course_id))
            .count(&self.db)
            .await
            .map_err(|e| EduChainError::database_operation(format!("查询选课记录失败: {e}")))?;

        Ok(count > 0)
    }

    /// 列表筛选条件，搜索词同时匹配学生与课程
    async fn enrollment_condition(&self, query: &EnrollmentListQuery) -> Result<Condition> {
        let mut condition = Condition::all();

        if let Some(student_id) = query.student_id {
            condition = condition.add(Column::StudentId.eq(student_id));
        }

        if let Some(course_id) = query.course_id {
            condition = condition.add(Column::CourseId.eq(course_id));
        }

        if let Some(professor_id) = query.professor_id {
            let course_ids: Vec<i64> = Courses::find()
                .select_only()
                .column(CourseColumn::Id)
                .filter(CourseColumn::ProfessorId.eq(professor_id))
                .into_tuple()
                .all(&self.db)
                .await
                .map_err(|e| EduChainError::database_operation(format!("查询课程失败: {e}")))?;
            condition = condition.add(Column::CourseId.is_in(course_ids));
        }

        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let search = search.trim();

            let student_ids: Vec<i64> = Users::find()
                .select_only()
                .column(UserColumn::Id)
                .filter(
                    Condition::any()
                        .add(UserColumn::Firstname.like(like_contains(search)))
                        .add(UserColumn::Lastname.like(like_contains(search)))
                        .add(UserColumn::Email.like(like_contains(&search.to_lowercase()))),
                )
                .into_tuple()
                .all(&self.db)
                .await
                .map_err(|e| EduChainError::database_operation(format!("查询用户失败: {e}")))?;

            let course_ids: Vec<i64> = Courses::find()
                .select_only()
                .column(CourseColumn::Id)
                .filter(
                    Condition::any()
                        .add(CourseColumn::CourseName.like(like_contains(search)))
                        .add(CourseColumn::CourseCode.like(like_contains(&search.to_uppercase()))),
                )
                .into_tuple()
                .all(&self.db)
                .await
                .map_err(|e| EduChainError::database_operation(format!("查询课程失败: {e}")))?;

            condition = condition.add(
                Condition::any()
                    .add(Column::StudentId.is_in(student_ids))
                    .add(Column::CourseId.is_in(course_ids)),
            );
        }

        Ok(condition)
    }

    /// 分页列出选课记录，附带统计
    pub async fn list_enrollments_with_pagination_impl(
        &self,
        query: EnrollmentListQuery,
    ) -> Result<EnrollmentListResponse> {
        let (page, size) = normalize_page(query.page, query.size);
        let condition = self.enrollment_condition(&query).await?;

        // 统计
        let pairs: Vec<(i64, i64)> = CourseEnrollments::find()
            .select_only()
            .column(Column::StudentId)
            .column(Column::CourseId)
            .filter(condition.clone())
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| EduChainError::database_operation(format!("统计选课记录失败: {e}")))?;
        let stats = EnrollmentStats {
            total_enrollments: pairs.len() as i64,
            unique_students: pairs.iter().map(|(s, _)| *s).collect::<HashSet<_>>().len() as i64,
            unique_courses: pairs.iter().map(|(_, c)| *c).collect::<HashSet<_>>().len() as i64,
        };

        let paginator = CourseEnrollments::find()
            .filter(condition)
            .order_by_desc(Column::EnrolledAt)
            .order_by_desc(Column::Id)
            .paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| EduChainError::database_operation(format!("查询选课总数失败: {e}")))?;

        let models = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| EduChainError::database_operation(format!("查询选课列表失败: {e}")))?;

        Ok(EnrollmentListResponse {
            items: self.enrollment_details(models).await?,
            pagination: PaginationInfo::new(page, size, total),
            stats,
        })
    }

    /// 删除选课记录
    pub async fn delete_enrollment_impl(&self, id: i64) -> Result<bool> {
        let result = CourseEnrollments::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| EduChainError::database_operation(format!("删除选课记录失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 批量选课（单事务）
    pub async fn bulk_enroll_impl(
        &self,
        course_id: i64,
        student_ids: &[i64],
    ) -> Result<BulkEnrollmentResponse> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| EduChainError::database_operation(format!("开启事务失败: {e}")))?;

        let existing: HashSet<i64> = CourseEnrollments::find()
            .select_only()
            .column(Column::StudentId)
            .filter(Column::CourseId.eq(course_id))
            .into_tuple::<i64>()
            .all(&txn)
            .await
            .map_err(|e| EduChainError::database_operation(format!("查询选课记录失败: {e}")))?
            .into_iter()
            .collect();

        let now = chrono::Utc::now().timestamp();
        let mut seen = HashSet::new();
        let mut created = Vec::new();
        let mut skipped = Vec::new();

        for &student_id in student_ids {
            if existing.contains(&student_id) || !seen.insert(student_id) {
                skipped.push(SkippedEnrollment {
                    student_id,
                    reason: "Student already enrolled in this course".to_string(),
                });
                continue;
            }

            let model = ActiveModel {
                student_id: Set(student_id),
                course_id: Set(course_id),
                enrolled_at: Set(now),
                ..Default::default()
            };
            let inserted = model
                .insert(&txn)
                .await
                .map_err(|e| EduChainError::database_operation(format!("批量选课失败: {e}")))?;
            created.push(inserted.into_enrollment());
        }

        txn.commit()
            .await
            .map_err(|e| EduChainError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(BulkEnrollmentResponse {
            course_id,
            created_count: created.len() as i64,
            skipped_count: skipped.len() as i64,
            created,
            skipped,
        })
    }
}
