use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Board column a task lives in. The wire names match the ToggleNest API.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TaskStatus {
    #[serde(rename = "todo")]
    ToDo,
    #[serde(rename = "in-progress")]
    InProgress,
    #[serde(rename = "done")]
    Done,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::ToDo => "To Do",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Done => "Done",
        }
    }

    /// Identifier used on the wire and as the column id in drag events.
    pub fn wire_name(&self) -> &'static str {
        match self {
            TaskStatus::ToDo => "todo",
            TaskStatus::InProgress => "in-progress",
            TaskStatus::Done => "done",
        }
    }

    pub fn from_wire(value: &str) -> Option<TaskStatus> {
        TaskStatus::all().into_iter().find(|s| s.wire_name() == value)
    }

    pub fn accent_color(&self) -> &'static str {
        match self {
            TaskStatus::ToDo => "#3b82f6",
            TaskStatus::InProgress => "#f59e0b",
            TaskStatus::Done => "#10b981",
        }
    }

    /// Column to the left, if any.
    pub fn previous(&self) -> Option<TaskStatus> {
        match self {
            TaskStatus::ToDo => None,
            TaskStatus::InProgress => Some(TaskStatus::ToDo),
            TaskStatus::Done => Some(TaskStatus::InProgress),
        }
    }

    /// Column to the right, if any.
    pub fn next(&self) -> Option<TaskStatus> {
        match self {
            TaskStatus::ToDo => Some(TaskStatus::InProgress),
            TaskStatus::InProgress => Some(TaskStatus::Done),
            TaskStatus::Done => None,
        }
    }

    /// Column order on the board.
    pub fn all() -> Vec<TaskStatus> {
        vec![TaskStatus::ToDo, TaskStatus::InProgress, TaskStatus::Done]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserSummary {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProjectSummary {
    #[serde(default)]
    pub title: String,
}

/// `assignedTo` is either populated by the API or left as a bare user id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum UserRef {
    Populated(UserSummary),
    Id(String),
}

impl UserRef {
    pub fn name(&self) -> Option<&str> {
        match self {
            UserRef::Populated(user) if !user.name.is_empty() => Some(&user.name),
            _ => None,
        }
    }

    pub fn initial(&self) -> Option<char> {
        self.name()
            .and_then(|name| name.chars().next())
            .and_then(|c| c.to_uppercase().next())
    }
}

/// `projectId` is either populated by the API or left as a bare project id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ProjectRef {
    Populated(ProjectSummary),
    Id(String),
}

impl ProjectRef {
    pub fn title(&self) -> Option<&str> {
        match self {
            ProjectRef::Populated(project) if !project.title.is_empty() => Some(&project.title),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub status: TaskStatus,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub assigned_to: Option<UserRef>,
    #[serde(default, rename = "projectId")]
    pub project: Option<ProjectRef>,
}

impl Task {
    /// Copy of this task moved to `status`. The original is left untouched.
    pub fn with_status(&self, status: TaskStatus) -> Task {
        Task {
            status,
            ..self.clone()
        }
    }

    pub fn priority_color(&self) -> &'static str {
        match self.priority.as_deref().map(str::to_lowercase).as_deref() {
            Some("high") => "#ef4444",
            Some("medium") => "#f59e0b",
            Some("low") => "#10b981",
            _ => "#6b7280",
        }
    }

    #[cfg(test)]
    pub fn sample(id: &str, status: TaskStatus) -> Task {
        Task {
            id: id.to_string(),
            title: format!("Task {}", id),
            description: None,
            status,
            priority: Some("medium".to_string()),
            due_date: None,
            assigned_to: None,
            project: None,
        }
    }
}
