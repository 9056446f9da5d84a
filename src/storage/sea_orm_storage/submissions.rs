//! 提交与评分存储操作

use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::entity::assignments::{Column as AssignmentColumn, Entity as Assignments};
use crate::entity::submissions::{
    ActiveModel, Column, Entity as Submissions, Model as SubmissionModel,
};
use crate::errors::{EduChainError, Result};
use crate::models::submissions::{
    entities::{DEFAULT_MAX_GRADE, Submission, SubmissionDetail, SubmissionStatus},
    requests::NewSubmission,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
    sea_query::Expr,
};

impl SeaOrmStorage {
    /// 教师名下全部作业的 ID
    pub(crate) async fn professor_assignment_ids(&self, professor_id: i64) -> Result<Vec<i64>> {
        Assignments::find()
            .select_only()
            .column(AssignmentColumn::Id)
            .filter(AssignmentColumn::ProfessorId.eq(professor_id))
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| EduChainError::database_operation(format!("查询作业失败: {e}")))
    }

    /// 提交行批量组装为详情（作业、课程、学生）
    pub(crate) async fn submission_details(
        &self,
        models: Vec<SubmissionModel>,
    ) -> Result<Vec<SubmissionDetail>> {
        if models.is_empty() {
            return Ok(Vec::new());
        }

        let assignment_ids: Vec<i64> = models.iter().map(|m| m.assignment_id).collect();
        let mut student_ids: Vec<i64> = models.iter().map(|m| m.student_id).collect();
        student_ids.sort_unstable();
        student_ids.dedup();

        let assignments: HashMap<i64, _> = Assignments::find()
            .filter(AssignmentColumn::Id.is_in(assignment_ids))
            .all(&self.db)
            .await
            .map_err(|e| EduChainError::database_operation(format!("查询作业失败: {e}")))?
            .into_iter()
            .map(|a| (a.id, a))
            .collect();
        let courses = self
            .courses_by_id(assignments.values().map(|a| a.course_id).collect())
            .await?;
        let students: HashMap<i64, _> = self
            .get_users_by_ids_impl(&student_ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();

        Ok(models
            .into_iter()
            .filter_map(|m| {
                let assignment = assignments.get(&m.assignment_id)?;
                let course = courses.get(&assignment.course_id)?;
                let student = students.get(&m.student_id)?;
                Some(SubmissionDetail {
                    assignment_title: assignment.title.clone(),
                    professor_id: assignment.professor_id,
                    course_name: course.course_name.clone(),
                    course_code: course.course_code.clone(),
                    student_name: student.full_name(),
                    student_email: student.email.clone(),
                    submission: m.into_submission(),
                })
            })
            .collect())
    }

    /// 创建提交
    pub async fn create_submission_impl(&self, submission: NewSubmission) -> Result<Submission> {
        let model = ActiveModel {
            assignment_id: Set(submission.assignment_id),
            student_id: Set(submission.student_id),
            encrypted_content: Set(submission.encrypted_content),
            student_id_hash: Set(submission.student_id_hash),
            status: Set(SubmissionStatus::Submitted.to_string()),
            max_grade: Set(DEFAULT_MAX_GRADE),
            submitted_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| EduChainError::database_operation(format!("创建提交失败: {e}")))?;

        Ok(result.into_submission())
    }

    /// 通过 ID 获取提交
    pub async fn get_submission_by_id_impl(&self, id: i64) -> Result<Option<Submission>> {
        let result = Submissions::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| EduChainError::database_operation(format!("查询提交失败: {e}")))?;

        Ok(result.map(|m| m.into_submission()))
    }

    /// 获取提交详情
    pub async fn get_submission_detail_impl(&self, id: i64) -> Result<Option<SubmissionDetail>> {
        let Some(model) = Submissions::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| EduChainError::database_operation(format!("查询提交失败: {e}")))?
        else {
            return Ok(None);
        };

        Ok(self.submission_details(vec![model]).await?.into_iter().next())
    }

    /// 查找学生对某作业的提交
    pub async fn find_submission_impl(
        &self,
        assignment_id: i64,
        student_id: i64,
    ) -> Result<Option<Submission>> {
        let result = Submissions::find()
            .filter(Column::AssignmentId.eq(assignment_id))
            .filter(Column::StudentId.eq(student_id))
            .one(&self.db)
            .await
            .map_err(|e| EduChainError::database_operation(format!("查询提交失败: {e}")))?;

        Ok(result.map(|m| m.into_submission()))
    }

    /// 学生的提交列表；graded_only 时按评分时间倒序
    pub async fn list_student_submissions_impl(
        &self,
        student_id: i64,
        graded_only: bool,
    ) -> Result<Vec<SubmissionDetail>> {
        let mut select = Submissions::find().filter(Column::StudentId.eq(student_id));

        select = if graded_only {
            select
                .filter(Column::Status.eq(SubmissionStatus::Graded.to_string()))
                .order_by_desc(Column::GradedAt)
        } else {
            select.order_by_desc(Column::SubmittedAt)
        };

        let models = select
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| EduChainError::database_operation(format!("查询提交列表失败: {e}")))?;

        self.submission_details(models).await
    }

    /// 教师名下作业的提交；pending_only 时只含未评分
    pub async fn list_professor_submissions_impl(
        &self,
        professor_id: i64,
        pending_only: bool,
    ) -> Result<Vec<SubmissionDetail>> {
        let assignment_ids = self.professor_assignment_ids(professor_id).await?;
        if assignment_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut select = Submissions::find().filter(Column::AssignmentId.is_in(assignment_ids));
        if pending_only {
            select = select.filter(Column::Status.eq(SubmissionStatus::Submitted.to_string()));
        }

        let models = select
            .order_by_desc(Column::SubmittedAt)
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| EduChainError::database_operation(format!("查询提交列表失败: {e}")))?;

        self.submission_details(models).await
    }

    /// 评分：仅当状态仍为 submitted 时更新
    pub async fn grade_submission_impl(
        &self,
        id: i64,
        grade: f64,
        feedback: Option<String>,
    ) -> Result<Option<Submission>> {
        let result = Submissions::update_many()
            .col_expr(
                Column::Status,
                Expr::value(SubmissionStatus::Graded.to_string()),
            )
            .col_expr(Column::Grade, Expr::value(grade))
            .col_expr(Column::Feedback, Expr::value(feedback))
            .col_expr(Column::GradedAt, Expr::value(chrono::Utc::now().timestamp()))
            .filter(Column::Id.eq(id))
            .filter(Column::Status.eq(SubmissionStatus::Submitted.to_string()))
            .exec(&self.db)
            .await
            .map_err(|e| EduChainError::database_operation(format!("评分失败: {e}")))?;

        if result.rows_affected == 0 {
            return Ok(None);
        }

        self.get_submission_by_id_impl(id).await
    }

    /// 回写链上交易哈希与链上提交 ID
    pub async fn set_submission_chain_record_impl(
        &self,
        id: i64,
        tx_hash: &str,
        chain_submission_id: i64,
    ) -> Result<bool> {
        let result = Submissions::update_many()
            .col_expr(Column::ChainTxHash, Expr::value(tx_hash.to_string()))
            .col_expr(Column::ChainSubmissionId, Expr::value(chain_submission_id))
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| EduChainError::database_operation(format!("回写提交链上记录失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 回写成绩发布交易哈希
    pub async fn set_submission_result_hash_impl(
        &self,
        id: i64,
        result_tx_hash: &str,
    ) -> Result<bool> {
        let result = Submissions::update_many()
            .col_expr(Column::ChainResultHash, Expr::value(result_tx_hash.to_string()))
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| EduChainError::database_operation(format!("回写成绩链上记录失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}
