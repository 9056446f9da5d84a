//! 作业存储操作

use std::collections::{HashMap, HashSet};

use super::SeaOrmStorage;
use crate::entity::assignments::{ActiveModel, Column, Entity as Assignments};
use crate::entity::courses::{Column as CourseColumn, Entity as Courses, Model as CourseModel};
use crate::entity::submissions::{Column as SubmissionColumn, Entity as Submissions};
use crate::errors::{EduChainError, Result};
use crate::models::assignments::{
    entities::{
        Assignment, PRIVATE_KEY_PLACEHOLDER, ProfessorAssignmentItem, StudentAssignmentItem,
    },
    requests::NewAssignment,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};

impl SeaOrmStorage {
    pub(crate) async fn courses_by_id(&self, ids: Vec<i64>) -> Result<HashMap<i64, CourseModel>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        Ok(Courses::find()
            .filter(CourseColumn::Id.is_in(ids))
            .all(&self.db)
            .await
            .map_err(|e| EduChainError::database_operation(format!("查询课程失败: {e}")))?
            .into_iter()
            .map(|c| (c.id, c))
            .collect())
    }

    /// 创建作业，私钥哈希固定为占位值
    pub async fn create_assignment_impl(&self, assignment: NewAssignment) -> Result<Assignment> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            title: Set(assignment.title),
            description: Set(assignment.description),
            course_id: Set(assignment.course_id),
            professor_id: Set(assignment.professor_id),
            public_key: Set(assignment.public_key),
            private_key_hash: Set(PRIVATE_KEY_PLACEHOLDER.to_string()),
            due_date: Set(assignment.due_date.timestamp()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| EduChainError::database_operation(format!("创建作业失败: {e}")))?;

        Ok(result.into_assignment())
    }

    /// 通过 ID 获取作业
    pub async fn get_assignment_by_id_impl(&self, id: i64) -> Result<Option<Assignment>> {
        let result = Assignments::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| EduChainError::database_operation(format!("查询作业失败: {e}")))?;

        Ok(result.map(|m| m.into_assignment()))
    }

    /// 教师的作业列表
    pub async fn list_professor_assignments_impl(
        &self,
        professor_id: i64,
    ) -> Result<Vec<ProfessorAssignmentItem>> {
        let models = Assignments::find()
            .filter(Column::ProfessorId.eq(professor_id))
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| EduChainError::database_operation(format!("查询作业列表失败: {e}")))?;

        if models.is_empty() {
            return Ok(Vec::new());
        }

        let assignment_ids: Vec<i64> = models.iter().map(|m| m.id).collect();
        let course_ids: Vec<i64> = models.iter().map(|m| m.course_id).collect();

        let submission_counts: HashMap<i64, i64> = Submissions::find()
            .select_only()
            .column(SubmissionColumn::AssignmentId)
            .column_as(SubmissionColumn::Id.count(), "count")
            .filter(SubmissionColumn::AssignmentId.is_in(assignment_ids))
            .group_by(SubmissionColumn::AssignmentId)
            .into_tuple::<(i64, i64)>()
            .all(&self.db)
            .await
            .map_err(|e| EduChainError::database_operation(format!("统计提交数失败: {e}")))?
            .into_iter()
            .collect();

        let student_counts = self.enrollment_counts(&course_ids).await?;

        let courses = self.courses_by_id(course_ids).await?;

        Ok(models
            .into_iter()
            .map(|m| {
                let course = courses.get(&m.course_id);
                let id = m.id;
                let course_id = m.course_id;
                ProfessorAssignmentItem {
                    course_name: course.map(|c| c.course_name.clone()).unwrap_or_default(),
                    course_code: course.map(|c| c.course_code.clone()).unwrap_or_default(),
                    submissions_count: submission_counts.get(&id).copied().unwrap_or(0),
                    total_students: student_counts.get(&course_id).copied().unwrap_or(0),
                    assignment: m.into_assignment(),
                }
            })
            .collect())
    }

    /// 学生已选课程中的作业，最新的在前
    pub async fn list_student_assignments_impl(
        &self,
        student_id: i64,
    ) -> Result<Vec<StudentAssignmentItem>> {
        let course_ids = self.enrolled_course_ids(student_id).await?;
        if course_ids.is_empty() {
            return Ok(Vec::new());
        }

        let models = Assignments::find()
            .filter(Column::CourseId.is_in(course_ids.clone()))
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| EduChainError::database_operation(format!("查询作业列表失败: {e}")))?;

        let assignment_ids: Vec<i64> = models.iter().map(|m| m.id).collect();
        let submitted: HashSet<i64> = Submissions::find()
            .select_only()
            .column(SubmissionColumn::AssignmentId)
            .filter(SubmissionColumn::StudentId.eq(student_id))
            .filter(SubmissionColumn::AssignmentId.is_in(assignment_ids))
            .into_tuple::<i64>()
            .all(&self.db)
            .await
            .map_err(|e| EduChainError::database_operation(format!("查询提交记录失败: {e}")))?
            .into_iter()
            .collect();

        let courses = self.courses_by_id(course_ids).await?;
        let mut professor_ids: Vec<i64> = models.iter().map(|m| m.professor_id).collect();
        professor_ids.sort_unstable();
        professor_ids.dedup();
        let professors: HashMap<i64, String> = self
            .get_users_by_ids_impl(&professor_ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u.full_name()))
            .collect();

        let now = chrono::Utc::now();
        Ok(models
            .into_iter()
            .map(|m| {
                let course = courses.get(&m.course_id);
                let assignment = m.into_assignment();
                StudentAssignmentItem {
                    course_name: course.map(|c| c.course_name.clone()).unwrap_or_default(),
                    course_code: course.map(|c| c.course_code.clone()).unwrap_or_default(),
                    professor_name: professors.get(&assignment.professor_id).cloned(),
                    has_submitted: submitted.contains(&assignment.id),
                    is_overdue: assignment.is_overdue(now),
                    assignment,
                }
            })
            .collect())
    }

    /// 回写链上交易哈希与链上作业 ID
    pub async fn set_assignment_chain_record_impl(
        &self,
        id: i64,
        tx_hash: &str,
        chain_assignment_id: i64,
    ) -> Result<bool> {
        let result = Assignments::update_many()
            .col_expr(
                Column::ChainTxHash,
                sea_orm::sea_query::Expr::value(tx_hash.to_string()),
            )
            .col_expr(
                Column::ChainAssignmentId,
                sea_orm::sea_query::Expr::value(chain_assignment_id),
            )
            .col_expr(
                Column::UpdatedAt,
                sea_orm::sea_query::Expr::value(chrono::Utc::now().timestamp()),
            )
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| EduChainError::database_operation(format!("回写作业链上记录失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}
