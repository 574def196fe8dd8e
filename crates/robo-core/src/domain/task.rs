// ============================================================================
// Robo Core - Task Entities
// File: crates/robo-core/src/domain/task.rs
// Description: Assignments given to caang and their graded submissions
// ============================================================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use robo_shared::AuditFields;

use crate::error::DomainError;

/// Task entity
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Task {
    pub id: Uuid,

    #[validate(length(min = 1, max = 50, message = "OR period is required"))]
    pub or_period: String,

    #[validate(length(min = 2, max = 150, message = "Title must be between 2 and 150 characters"))]
    pub title: String,

    #[validate(length(max = 5000, message = "Description too long"))]
    pub description: Option<String>,

    pub due_at: DateTime<Utc>,

    #[validate(range(min = 1, max = 1000, message = "Max score must be between 1 and 1000"))]
    pub max_score: i32,

    pub is_active: bool,

    #[serde(flatten)]
    pub audit: AuditFields,
}

impl Task {
    pub fn new(
        or_period: String,
        title: String,
        description: Option<String>,
        due_at: DateTime<Utc>,
        max_score: i32,
        created_by: Uuid,
    ) -> Result<Self, validator::ValidationErrors> {
        let task = Self {
            id: Uuid::new_v4(),
            or_period: or_period.trim().to_string(),
            title: title.trim().to_string(),
            description: description.map(|d| d.trim().to_string()),
            due_at,
            max_score,
            is_active: true,
            audit: AuditFields::created_by(created_by),
        };

        task.validate()?;
        Ok(task)
    }
}

/// Task submission entity
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TaskSubmission {
    pub id: Uuid,
    pub task_id: Uuid,
    pub member_id: Uuid,

    /// Link to the work or a short text answer.
    #[validate(length(min = 1, max = 2000, message = "Submission content must be between 1 and 2000 characters"))]
    pub content: String,

    pub submitted_at: DateTime<Utc>,
    pub is_late: bool,

    pub score: Option<i32>,
    pub feedback: Option<String>,
    pub graded_at: Option<DateTime<Utc>>,
    pub graded_by: Option<Uuid>,
}

impl TaskSubmission {
    pub fn new(task: &Task, member_id: Uuid, content: String) -> Result<Self, validator::ValidationErrors> {
        let submitted_at = Utc::now();
        let submission = Self {
            id: Uuid::new_v4(),
            task_id: task.id,
            member_id,
            content: content.trim().to_string(),
            submitted_at,
            is_late: submitted_at > task.due_at,
            score: None,
            feedback: None,
            graded_at: None,
            graded_by: None,
        };

        submission.validate()?;
        Ok(submission)
    }

    pub fn is_graded(&self) -> bool {
        self.graded_at.is_some()
    }

    /// Replace the content of an ungraded submission.
    pub fn resubmit(&mut self, task: &Task, content: String) -> Result<(), DomainError> {
        if self.is_graded() {
            return Err(DomainError::SubmissionAlreadyGraded(self.id));
        }
        self.content = content.trim().to_string();
        self.submitted_at = Utc::now();
        self.is_late = self.submitted_at > task.due_at;
        self.validate()?;
        Ok(())
    }

    pub fn grade(
        &mut self,
        task: &Task,
        score: i32,
        feedback: Option<String>,
        graded_by: Uuid,
    ) -> Result<(), DomainError> {
        if !(0..=task.max_score).contains(&score) {
            return Err(DomainError::ScoreOutOfRange {
                score,
                max_score: task.max_score,
            });
        }
        self.score = Some(score);
        self.feedback = feedback.map(|f| f.trim().to_string()).filter(|f| !f.is_empty());
        self.graded_at = Some(Utc::now());
        self.graded_by = Some(graded_by);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn task(due_in_hours: i64) -> Task {
        Task::new(
            "OR 21".to_string(),
            "Build a line follower".to_string(),
            None,
            Utc::now() + Duration::hours(due_in_hours),
            100,
            Uuid::new_v4(),
        )
        .unwrap()
    }

    #[test]
    fn test_invalid_max_score() {
        let result = Task::new("OR 21".into(), "Essay".into(), None, Utc::now(), 0, Uuid::new_v4());
        assert!(result.is_err());
    }

    #[test]
    fn test_late_submission_flagged() {
        let overdue = task(-1);
        let submission = TaskSubmission::new(&overdue, Uuid::new_v4(), "https://git.example/robot".into()).unwrap();
        assert!(submission.is_late);

        let open = task(24);
        let submission = TaskSubmission::new(&open, Uuid::new_v4(), "https://git.example/robot".into()).unwrap();
        assert!(!submission.is_late);
    }

    #[test]
    fn test_grade_range() {
        let task = task(24);
        let mut submission = TaskSubmission::new(&task, Uuid::new_v4(), "answer".into()).unwrap();

        assert_eq!(
            submission.grade(&task, 101, None, Uuid::new_v4()),
            Err(DomainError::ScoreOutOfRange { score: 101, max_score: 100 })
        );
        assert!(submission.grade(&task, -1, None, Uuid::new_v4()).is_err());

        submission.grade(&task, 85, Some("Nice wiring".into()), Uuid::new_v4()).unwrap();
        assert_eq!(submission.score, Some(85));
        assert!(submission.is_graded());
    }

    #[test]
    fn test_resubmit_after_grading_rejected() {
        let task = task(24);
        let mut submission = TaskSubmission::new(&task, Uuid::new_v4(), "v1".into()).unwrap();
        submission.resubmit(&task, "v2".into()).unwrap();
        assert_eq!(submission.content, "v2");

        submission.grade(&task, 70, None, Uuid::new_v4()).unwrap();
        assert!(matches!(
            submission.resubmit(&task, "v3".into()),
            Err(DomainError::SubmissionAlreadyGraded(_))
        ));
    }
}
