/// Task model
///
/// A task sits somewhere on the importance/urgency matrix and belongs to
/// exactly one user. Every read or write goes through the owner's id.
///
/// # Lifecycle
///
/// ```text
/// create → (update)* → complete → (update | complete)* → delete
/// ```
///
/// `completed_at` is set by the completion operation and never cleared.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tasks (
///     id BIGSERIAL PRIMARY KEY,
///     user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     title VARCHAR(120) NOT NULL,
///     description TEXT NOT NULL DEFAULT '',
///     category VARCHAR(20) NOT NULL DEFAULT 'other',
///     importance INTEGER NOT NULL,
///     urgency INTEGER NOT NULL,
///     completed BOOLEAN NOT NULL DEFAULT FALSE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     completed_at TIMESTAMPTZ
/// );
/// ```

use super::category::Category;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Task as stored and as returned to the owner
///
/// `user_id` is never serialized; the JSON shape is
/// `{id, title, description, category, importance, urgency, completed,
/// created_at, updated_at, completed_at}`.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct Task {
    /// Unique task ID
    pub id: i64,

    /// Owning user
    #[serde(skip_serializing)]
    pub user_id: i64,

    pub title: String,

    pub description: String,

    /// Stored as given; see [`Category`] for the known values
    pub category: String,

    /// Matrix axis 1
    pub importance: i32,

    /// Matrix axis 2
    pub urgency: i32,

    pub completed: bool,

    pub created_at: DateTime<Utc>,

    /// Refreshed on every write
    pub updated_at: DateTime<Utc>,

    /// Last time the task was marked complete
    pub completed_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Known category of this task, if any
    pub fn known_category(&self) -> Option<Category> {
        Category::parse(&self.category)
    }
}

/// Input for creating a task
#[derive(Debug, Clone, PartialEq)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub category: String,
    pub importance: i32,
    pub urgency: i32,
}

impl NewTask {
    /// Task with default description and category
    pub fn new(title: impl Into<String>, importance: i32, urgency: i32) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            category: Category::default().as_str().to_string(),
            importance,
            urgency,
        }
    }
}

/// Partial update of a task
///
/// Only `Some` fields are written; `None` leaves the stored value unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub importance: Option<i32>,
    pub urgency: Option<i32>,
}

impl TaskChanges {
    /// Applies present fields to `task` and stamps `updated_at`
    pub fn apply(&self, task: &mut Task, now: DateTime<Utc>) {
        if let Some(title) = &self.title {
            task.title = title.clone();
        }
        if let Some(description) = &self.description {
            task.description = description.clone();
        }
        if let Some(category) = &self.category {
            task.category = category.clone();
        }
        if let Some(importance) = self.importance {
            task.importance = importance;
        }
        if let Some(urgency) = self.urgency {
            task.urgency = urgency;
        }
        task.updated_at = now;
    }

    /// True when no field is present
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Ordering for owner task listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskOrder {
    /// Insertion order
    #[default]
    Unspecified,

    /// Newest first
    NewestFirst,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sample_task() -> Task {
        let created = Utc::now() - Duration::hours(1);
        Task {
            id: 1,
            user_id: 42,
            title: "Write report".to_string(),
            description: String::new(),
            category: "work".to_string(),
            importance: 3,
            urgency: 2,
            completed: false,
            created_at: created,
            updated_at: created,
            completed_at: None,
        }
    }

    #[test]
    fn test_new_task_defaults() {
        let task = NewTask::new("Call mom", 2, 4);
        assert_eq!(task.description, "");
        assert_eq!(task.category, "other");
    }

    #[test]
    fn test_apply_only_touches_present_fields() {
        let mut task = sample_task();
        let now = Utc::now();

        TaskChanges {
            urgency: Some(5),
            ..Default::default()
        }
        .apply(&mut task, now);

        assert_eq!(task.urgency, 5);
        assert_eq!(task.title, "Write report");
        assert_eq!(task.importance, 3);
        assert_eq!(task.category, "work");
        assert_eq!(task.updated_at, now);
    }

    #[test]
    fn test_empty_changes_still_refresh_updated_at() {
        let mut task = sample_task();
        let before = task.updated_at;
        let changes = TaskChanges::default();
        assert!(changes.is_empty());

        changes.apply(&mut task, Utc::now());
        assert!(task.updated_at > before);
    }

    #[test]
    fn test_json_shape_hides_owner() {
        let json = serde_json::to_value(sample_task()).unwrap();

        assert!(json.get("user_id").is_none());
        assert_eq!(json["title"], "Write report");
        assert_eq!(json["completed"], false);
        assert!(json["completed_at"].is_null());
        assert!(json["created_at"].is_string());
    }

    #[test]
    fn test_known_category() {
        let mut task = sample_task();
        assert_eq!(task.known_category(), Some(Category::Work));

        task.category = "bogus".to_string();
        assert_eq!(task.known_category(), None);
    }
}
