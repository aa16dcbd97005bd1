/// Owner-scoped task operations
///
/// Every method takes the caller's user id first. A task id that belongs to
/// another user behaves exactly like one that does not exist
/// ([`ServiceError::NotFound`]), so callers cannot probe for other users' tasks.

use super::{ServiceError, ServiceResult};
use crate::{
    models::{
        category::{Category, CategoryCounts},
        task::{NewTask, Task, TaskChanges, TaskOrder},
    },
    repository::TaskRepository,
};
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

/// Creation input as received; required fields may be missing
#[derive(Debug, Clone, Default)]
pub struct TaskDraft {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub importance: Option<i32>,
    pub urgency: Option<i32>,
}

impl TaskDraft {
    /// Checks required fields and fills in defaults
    pub fn into_new_task(self) -> ServiceResult<NewTask> {
        let title = self
            .title
            .filter(|title| !title.trim().is_empty())
            .ok_or_else(|| ServiceError::Validation("title is required".to_string()))?;
        let importance = self
            .importance
            .ok_or_else(|| ServiceError::Validation("importance is required".to_string()))?;
        let urgency = self
            .urgency
            .ok_or_else(|| ServiceError::Validation("urgency is required".to_string()))?;

        Ok(NewTask {
            title,
            description: self.description.unwrap_or_default(),
            category: self
                .category
                .unwrap_or_else(|| Category::default().as_str().to_string()),
            importance,
            urgency,
        })
    }
}

/// Completion statistics for one user
///
/// Wire names carry a `_tasks` suffix.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskStats {
    #[serde(rename = "total_tasks")]
    pub total: u64,

    #[serde(rename = "completed_tasks")]
    pub completed: u64,

    #[serde(rename = "pending_tasks")]
    pub pending: u64,

    /// Percentage rounded to one decimal; 0 when there are no tasks
    pub completion_rate: f64,
}

impl TaskStats {
    pub fn from_tasks(tasks: &[Task]) -> Self {
        let total = tasks.len() as u64;
        let completed = tasks.iter().filter(|task| task.completed).count() as u64;

        Self {
            total,
            completed,
            pending: total - completed,
            completion_rate: completion_rate(completed, total),
        }
    }
}

fn completion_rate(completed: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (completed as f64 * 1000.0 / total as f64).round() / 10.0
}

/// Newest-first listing split into all tasks and completed ones
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TasksView {
    pub created_tasks: Vec<Task>,
    pub completed_tasks: Vec<Task>,
}

/// Task operations over a [`TaskRepository`]
#[derive(Clone)]
pub struct TaskService {
    tasks: Arc<dyn TaskRepository>,
}

impl TaskService {
    pub fn new(tasks: Arc<dyn TaskRepository>) -> Self {
        Self { tasks }
    }

    /// All tasks owned by `owner`
    pub async fn list(&self, owner: i64) -> ServiceResult<Vec<Task>> {
        Ok(self.tasks.list_by_owner(owner, TaskOrder::Unspecified).await?)
    }

    /// Creates a task for `owner`
    ///
    /// # Errors
    ///
    /// [`ServiceError::Validation`] if title, importance, or urgency is missing.
    pub async fn create(&self, owner: i64, draft: TaskDraft) -> ServiceResult<Task> {
        let new_task = draft.into_new_task()?;
        let task = self.tasks.insert(owner, new_task, Utc::now()).await?;

        info!(user_id = owner, task_id = task.id, "Task created");
        Ok(task)
    }

    /// Applies the present fields of `changes`; always refreshes `updated_at`
    pub async fn update(&self, owner: i64, task_id: i64, changes: TaskChanges) -> ServiceResult<Task> {
        if matches!(&changes.title, Some(title) if title.trim().is_empty()) {
            return Err(ServiceError::Validation("title cannot be empty".to_string()));
        }

        let task = self
            .tasks
            .update(owner, task_id, &changes, Utc::now())
            .await?
            .ok_or(ServiceError::NotFound)?;

        info!(user_id = owner, task_id, "Task updated");
        Ok(task)
    }

    /// Marks a task completed and stamps `completed_at` with the current time
    ///
    /// Completing an already-completed task refreshes `completed_at`.
    pub async fn complete(&self, owner: i64, task_id: i64) -> ServiceResult<()> {
        if !self.tasks.mark_completed(owner, task_id, Utc::now()).await? {
            return Err(ServiceError::NotFound);
        }

        info!(user_id = owner, task_id, "Task completed");
        Ok(())
    }

    /// Permanently removes a task
    pub async fn delete(&self, owner: i64, task_id: i64) -> ServiceResult<()> {
        if !self.tasks.delete(owner, task_id).await? {
            return Err(ServiceError::NotFound);
        }

        info!(user_id = owner, task_id, "Task deleted");
        Ok(())
    }

    pub async fn stats(&self, owner: i64) -> ServiceResult<TaskStats> {
        let tasks = self.list(owner).await?;
        Ok(TaskStats::from_tasks(&tasks))
    }

    /// Newest-first view, plus the completed subset in the same order
    pub async fn tasks_view(&self, owner: i64) -> ServiceResult<TasksView> {
        let created_tasks = self
            .tasks
            .list_by_owner(owner, TaskOrder::NewestFirst)
            .await?;
        let completed_tasks = created_tasks
            .iter()
            .filter(|task| task.completed)
            .cloned()
            .collect();

        Ok(TasksView {
            created_tasks,
            completed_tasks,
        })
    }

    /// Counts per known category; unknown categories are left out
    pub async fn category_stats(&self, owner: i64) -> ServiceResult<CategoryCounts> {
        let tasks = self.list(owner).await?;
        Ok(CategoryCounts::tally(tasks.iter().map(|task| task.category.as_str())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    fn task(id: i64, completed: bool, created_at: DateTime<Utc>) -> Task {
        Task {
            id,
            user_id: 1,
            title: format!("task {}", id),
            description: String::new(),
            category: "other".to_string(),
            importance: 1,
            urgency: 1,
            completed,
            created_at,
            updated_at: created_at,
            completed_at: completed.then_some(created_at),
        }
    }

    #[test]
    fn test_stats_with_no_tasks() {
        let stats = TaskStats::from_tasks(&[]);
        assert_eq!(stats.total, 0);
        assert_eq!(stats.pending, 0);
        assert_eq!(stats.completion_rate, 0.0);
    }

    #[test]
    fn test_stats_one_of_three() {
        let now = Utc::now();
        let stats = TaskStats::from_tasks(&[task(1, true, now), task(2, false, now), task(3, false, now)]);

        assert_eq!(
            stats,
            TaskStats {
                total: 3,
                completed: 1,
                pending: 2,
                completion_rate: 33.3,
            }
        );
    }

    #[test]
    fn test_completion_rate_rounding() {
        assert_eq!(completion_rate(2, 3), 66.7);
        assert_eq!(completion_rate(1, 8), 12.5);
        assert_eq!(completion_rate(4, 4), 100.0);
    }

    #[test]
    fn test_stats_wire_names() {
        let json = serde_json::to_value(TaskStats::from_tasks(&[])).unwrap();

        assert_eq!(json["total_tasks"], 0);
        assert_eq!(json["completed_tasks"], 0);
        assert_eq!(json["pending_tasks"], 0);
        assert_eq!(json["completion_rate"], 0.0);
    }

    #[test]
    fn test_draft_requires_title_importance_urgency() {
        let full = TaskDraft {
            title: Some("Plan sprint".to_string()),
            importance: Some(3),
            urgency: Some(1),
            ..Default::default()
        };
        let new_task = full.clone().into_new_task().unwrap();
        assert_eq!(new_task.category, "other");
        assert_eq!(new_task.description, "");

        for draft in [
            TaskDraft { title: None, ..full.clone() },
            TaskDraft { title: Some("  ".to_string()), ..full.clone() },
            TaskDraft { importance: None, ..full.clone() },
            TaskDraft { urgency: None, ..full.clone() },
        ] {
            assert!(matches!(draft.into_new_task(), Err(ServiceError::Validation(_))));
        }
    }

    #[test]
    fn test_draft_keeps_unknown_category() {
        let draft = TaskDraft {
            title: Some("Odd one".to_string()),
            category: Some("bogus".to_string()),
            importance: Some(1),
            urgency: Some(1),
            ..Default::default()
        };

        assert_eq!(draft.into_new_task().unwrap().category, "bogus");
    }
}
