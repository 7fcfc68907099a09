// Task ("todo") assignments

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::schema::tasks;

/// Workflow state stored in `tasks.status`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Todo,
    InProgress,
    Done,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Done => "done",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "todo" => Ok(TaskStatus::Todo),
            "in_progress" => Ok(TaskStatus::InProgress),
            "done" => Ok(TaskStatus::Done),
            other => Err(format!("Unknown task status: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Serialize)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Task {
    pub id: Uuid,
    pub assignee_id: Uuid,
    pub service_id: Option<Uuid>,
    /// Cleared when the creating account is deleted
    pub created_by: Option<Uuid>,
    pub title: String,
    pub description: String,
    pub status: String,
    pub due_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tasks)]
pub struct NewTask {
    pub assignee_id: Uuid,
    pub service_id: Option<Uuid>,
    pub created_by: Option<Uuid>,
    pub title: String,
    pub description: String,
    pub status: String,
    pub due_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTaskRequest {
    pub assignee_id: Uuid,
    pub service_id: Option<Uuid>,

    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,

    #[validate(length(max = 5000, message = "Description must be less than 5000 characters"))]
    #[serde(default)]
    pub description: String,

    pub due_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateTaskStatusRequest {
    pub status: TaskStatus,
}

#[derive(thiserror::Error, Debug)]
pub enum TaskError {
    #[error("Database error: {0}")]
    Database(#[from] diesel::result::Error),

    #[error("Task not found")]
    NotFound,

    #[error("Assignee must be an employee account")]
    AssigneeNotEmployee,

    #[error("Not allowed to modify this task")]
    NotAssignee,
}

impl Task {
    pub async fn create(
        conn: &mut AsyncPgConnection,
        created_by: Uuid,
        req: CreateTaskRequest,
    ) -> Result<Self, TaskError> {
        use crate::schema::users;

        // Only employees receive assignments
        let assignee_is_employee: bool = users::table
            .filter(users::id.eq(req.assignee_id))
            .select(users::is_employee)
            .first(conn)
            .await
            .optional()?
            .ok_or(TaskError::AssigneeNotEmployee)?;

        if !assignee_is_employee {
            return Err(TaskError::AssigneeNotEmployee);
        }

        let new_task = NewTask {
            assignee_id: req.assignee_id,
            service_id: req.service_id,
            created_by: Some(created_by),
            title: req.title.trim().to_string(),
            description: req.description.trim().to_string(),
            status: TaskStatus::Todo.to_string(),
            due_at: req.due_at,
        };

        Ok(diesel::insert_into(tasks::table)
            .values(&new_task)
            .returning(Task::as_returning())
            .get_result(conn)
            .await?)
    }

    /// All tasks, or only those assigned to `assignee`
    pub async fn list(
        conn: &mut AsyncPgConnection,
        assignee: Option<Uuid>,
    ) -> Result<Vec<Self>, TaskError> {
        use crate::schema::tasks::dsl;

        let mut query = dsl::tasks.select(Task::as_select()).into_boxed();
        if let Some(user_id) = assignee {
            query = query.filter(dsl::assignee_id.eq(user_id));
        }

        Ok(query
            .order((dsl::created_at.desc(), dsl::id.asc()))
            .load(conn)
            .await?)
    }

    /// Change status; `acting_user` must be the assignee unless `is_admin`
    pub async fn update_status(
        conn: &mut AsyncPgConnection,
        task_id: Uuid,
        acting_user: Uuid,
        is_admin: bool,
        new_status: TaskStatus,
    ) -> Result<Self, TaskError> {
        use crate::schema::tasks::dsl::*;

        let current_assignee: Uuid = tasks
            .filter(id.eq(task_id))
            .select(assignee_id)
            .first(conn)
            .await
            .optional()?
            .ok_or(TaskError::NotFound)?;

        if !is_admin && current_assignee != acting_user {
            return Err(TaskError::NotAssignee);
        }

        diesel::update(tasks.filter(id.eq(task_id)))
            .set((status.eq(new_status.as_str()), updated_at.eq(Utc::now())))
            .returning(Task::as_returning())
            .get_result(conn)
            .await
            .map_err(|e| match e {
                diesel::result::Error::NotFound => TaskError::NotFound,
                other => TaskError::Database(other),
            })
    }

    pub async fn delete(conn: &mut AsyncPgConnection, task_id: Uuid) -> Result<(), TaskError> {
        use crate::schema::tasks::dsl::*;

        let affected = diesel::delete(tasks.filter(id.eq(task_id)))
            .execute(conn)
            .await?;

        if affected == 0 {
            return Err(TaskError::NotFound);
        }
        Ok(())
    }
}

impl From<TaskError> for crate::utils::ApiError {
    fn from(error: TaskError) -> Self {
        use crate::utils::ApiError;

        match error {
            TaskError::NotFound => ApiError::NotFound("Task"),
            TaskError::AssigneeNotEmployee => ApiError::ValidationError(error.to_string()),
            TaskError::NotAssignee => ApiError::Forbidden,
            TaskError::Database(e) => e.into(),
        }
    }
}
