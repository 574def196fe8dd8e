//! Tasks, submissions and grading

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::{ActingUser, Task, TaskSubmission};
use crate::error::DomainError;
use crate::repositories::{MemberRepository, TaskRepository};

#[derive(Debug, Clone, Deserialize)]
pub struct NewTask {
    pub or_period: String,
    pub title: String,
    pub description: Option<String>,
    pub due_at: DateTime<Utc>,
    pub max_score: i32,
}

pub struct TaskService {
    tasks: Arc<dyn TaskRepository>,
    members: Arc<dyn MemberRepository>,
}

impl TaskService {
    pub fn new(tasks: Arc<dyn TaskRepository>, members: Arc<dyn MemberRepository>) -> Self {
        Self { tasks, members }
    }

    pub async fn create_task(&self, input: NewTask, actor: &ActingUser) -> Result<Task, DomainError> {
        actor.require_staff("Creating tasks")?;

        let task = Task::new(
            input.or_period,
            input.title,
            input.description,
            input.due_at,
            input.max_score,
            actor.user_id,
        )?;
        let created = self.tasks.create_task(&task).await?;

        info!("Created task {} for {} (due {})", created.id, created.or_period, created.due_at);
        Ok(created)
    }

    pub async fn get_task(&self, id: &Uuid) -> Result<Task, DomainError> {
        self.tasks.find_task(id).await?.ok_or(DomainError::TaskNotFound(*id))
    }

    pub async fn list_tasks(&self, or_period: &str) -> Result<Vec<Task>, DomainError> {
        self.tasks.list_tasks(or_period).await
    }

    /// Submit work for a task. An ungraded earlier submission is replaced;
    /// a graded one is final.
    pub async fn submit(
        &self,
        task_id: &Uuid,
        member_id: &Uuid,
        content: String,
        actor: &ActingUser,
    ) -> Result<TaskSubmission, DomainError> {
        actor.require_self_or_staff(member_id, "Submitting tasks")?;

        let task = self.get_task(task_id).await?;
        if !task.is_active {
            return Err(DomainError::TaskNotFound(*task_id));
        }

        let member = self
            .members
            .find_by_id(member_id)
            .await?
            .ok_or(DomainError::MemberNotFound(*member_id))?;
        if !member.is_eligible_in(&task.or_period) {
            return Err(DomainError::MemberNotEligible(*member_id));
        }

        let submission = match self.tasks.find_member_submission(task_id, member_id).await? {
            Some(mut existing) => {
                existing.resubmit(&task, content)?;
                existing
            }
            None => TaskSubmission::new(&task, *member_id, content)?,
        };
        if submission.is_late {
            warn!("Late submission for task {} by member {}", task_id, member_id);
        }

        let saved = self.tasks.save_submission(&submission).await?;
        info!("Saved submission {} for task {}", saved.id, task_id);
        Ok(saved)
    }

    pub async fn grade(
        &self,
        submission_id: &Uuid,
        score: i32,
        feedback: Option<String>,
        actor: &ActingUser,
    ) -> Result<TaskSubmission, DomainError> {
        actor.require_staff("Grading submissions")?;

        let mut submission = self
            .tasks
            .find_submission(submission_id)
            .await?
            .ok_or(DomainError::SubmissionNotFound(*submission_id))?;
        let task = self.get_task(&submission.task_id).await?;

        submission.grade(&task, score, feedback, actor.user_id)?;
        let saved = self.tasks.save_submission(&submission).await?;

        info!("Graded submission {} with {}/{}", submission_id, score, task.max_score);
        Ok(saved)
    }

    pub async fn list_submissions(
        &self,
        task_id: &Uuid,
        actor: &ActingUser,
    ) -> Result<Vec<TaskSubmission>, DomainError> {
        actor.require_staff("Listing submissions")?;

        let task = self.get_task(task_id).await?;
        self.tasks.list_submissions(&task.id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    use crate::domain::{Member, MemberRole};
    use crate::repositories::{MockMemberRepository, MockTaskRepository};

    fn task(due_in_hours: i64) -> Task {
        Task::new(
            "OR 21".into(),
            "Line follower report".into(),
            None,
            Utc::now() + Duration::hours(due_in_hours),
            100,
            Uuid::new_v4(),
        )
        .unwrap()
    }

    fn caang() -> Member {
        Member::new(
            "Rina Marlina".into(),
            "1301210042".into(),
            "rina@robotik.ac.id".into(),
            MemberRole::Caang,
            "OR 21".into(),
            None,
        )
        .unwrap()
    }

    fn members_returning(member: Member) -> MockMemberRepository {
        let mut members = MockMemberRepository::new();
        members.expect_find_by_id().returning(move |_| Ok(Some(member.clone())));
        members
    }

    #[tokio::test]
    async fn test_caang_submits_own_task_late() {
        let task = task(-2);
        let task_id = task.id;
        let member = caang();
        let actor = ActingUser::new(member.id, MemberRole::Caang);

        let mut tasks = MockTaskRepository::new();
        tasks.expect_find_task().returning(move |_| Ok(Some(task.clone())));
        tasks.expect_find_member_submission().returning(|_, _| Ok(None));
        tasks
            .expect_save_submission()
            .times(1)
            .returning(|s| Ok(s.clone()));

        let service = TaskService::new(Arc::new(tasks), Arc::new(members_returning(member.clone())));
        let submission = service
            .submit(&task_id, &member.id, "https://drive.example/report.pdf".into(), &actor)
            .await
            .unwrap();
        assert!(submission.is_late);
        assert_eq!(submission.member_id, member.id);
    }

    #[tokio::test]
    async fn test_caang_cannot_submit_for_others() {
        let actor = ActingUser::new(Uuid::new_v4(), MemberRole::Caang);
        let service = TaskService::new(Arc::new(MockTaskRepository::new()), Arc::new(MockMemberRepository::new()));
        let result = service.submit(&Uuid::new_v4(), &Uuid::new_v4(), "answer".into(), &actor).await;
        assert!(matches!(result, Err(DomainError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_graded_submission_is_final() {
        let task = task(24);
        let task_id = task.id;
        let member = caang();
        let mut graded = TaskSubmission::new(&task, member.id, "v1".into()).unwrap();
        graded.grade(&task, 80, None, Uuid::new_v4()).unwrap();

        let mut tasks = MockTaskRepository::new();
        tasks.expect_find_task().returning(move |_| Ok(Some(task.clone())));
        tasks
            .expect_find_member_submission()
            .returning(move |_, _| Ok(Some(graded.clone())));
        tasks.expect_save_submission().never();

        let service = TaskService::new(Arc::new(tasks), Arc::new(members_returning(member.clone())));
        let actor = ActingUser::new(member.id, MemberRole::Caang);
        let result = service.submit(&task_id, &member.id, "v2".into(), &actor).await;
        assert!(matches!(result, Err(DomainError::SubmissionAlreadyGraded(_))));
    }

    #[tokio::test]
    async fn test_grade_out_of_range() {
        let task = task(24);
        let submission = TaskSubmission::new(&task, Uuid::new_v4(), "answer".into()).unwrap();
        let submission_id = submission.id;

        let mut tasks = MockTaskRepository::new();
        tasks.expect_find_submission().returning(move |_| Ok(Some(submission.clone())));
        tasks.expect_find_task().returning(move |_| Ok(Some(task.clone())));
        tasks.expect_save_submission().never();

        let service = TaskService::new(Arc::new(tasks), Arc::new(MockMemberRepository::new()));
        let mentor = ActingUser::new(Uuid::new_v4(), MemberRole::Mentor);
        let result = service.grade(&submission_id, 101, None, &mentor).await;
        assert_eq!(
            result.unwrap_err(),
            DomainError::ScoreOutOfRange {
                score: 101,
                max_score: 100,
            }
        );
    }

    #[tokio::test]
    async fn test_grade_records_grader() {
        let task = task(24);
        let submission = TaskSubmission::new(&task, Uuid::new_v4(), "answer".into()).unwrap();
        let submission_id = submission.id;

        let mut tasks = MockTaskRepository::new();
        tasks.expect_find_submission().returning(move |_| Ok(Some(submission.clone())));
        tasks.expect_find_task().returning(move |_| Ok(Some(task.clone())));
        tasks
            .expect_save_submission()
            .times(1)
            .returning(|s| Ok(s.clone()));

        let service = TaskService::new(Arc::new(tasks), Arc::new(MockMemberRepository::new()));
        let mentor = ActingUser::new(Uuid::new_v4(), MemberRole::Mentor);
        let graded = service
            .grade(&submission_id, 90, Some("Clean wiring".into()), &mentor)
            .await
            .unwrap();
        assert_eq!(graded.score, Some(90));
        assert_eq!(graded.graded_by, Some(mentor.user_id));
    }
}
