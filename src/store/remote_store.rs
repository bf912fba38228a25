use async_trait::async_trait;
use sea_orm::{
    ActiveEnum, ConnectionTrait, DatabaseConnection, EntityTrait, QueryOrder, Set, Statement,
    Value,
};

use crate::entity::{project, task, ProjectEntity, TaskEntity};
use crate::error::{AppError, AppResult};
use crate::models::{NewProject, NewTask, Project, ProjectPatch, Task, TaskPatch};
use crate::store::Store;

// Timestamps match the local store format: 2026-01-31T09:15:00.000Z
const CREATE_TASKS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS tasks (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    description TEXT,
    status TEXT DEFAULT 'todo',
    priority TEXT DEFAULT 'medium',
    dueDate TEXT,
    projectId INTEGER,
    createdAt TEXT DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
)"#;

const UPDATE_TASK: &str = r#"
UPDATE tasks SET
    title = COALESCE(?, title),
    description = COALESCE(?, description),
    status = COALESCE(?, status),
    priority = COALESCE(?, priority),
    dueDate = COALESCE(?, dueDate),
    projectId = COALESCE(?, projectId)
WHERE id = ?"#;

const CREATE_PROJECTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS projects (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    description TEXT,
    status TEXT DEFAULT 'Upcoming',
    createdAt TEXT DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
)"#;

const UPDATE_PROJECT: &str = r#"
UPDATE projects SET
    name = COALESCE(?, name),
    description = COALESCE(?, description),
    status = COALESCE(?, status)
WHERE id = ?"#;

/// Create the table if needed; runs before every operation
async fn ensure_schema(db: &DatabaseConnection, ddl: &str) -> AppResult<()> {
    db.execute_unprepared(ddl).await?;
    Ok(())
}

/// Run a COALESCE update and report whether any row matched
async fn coalesce_update(db: &DatabaseConnection, sql: &str, values: Vec<Value>) -> AppResult<bool> {
    let stmt = Statement::from_sql_and_values(db.get_database_backend(), sql, values);
    let result = db.execute(stmt).await?;
    Ok(result.rows_affected() > 0)
}

/// Row re-read after an insert; missing only if a concurrent delete won the race
fn inserted_row<M>(row: Option<M>, kind: &str) -> AppResult<M> {
    row.ok_or_else(|| AppError::Internal(format!("created {} row vanished", kind)))
}

// ============ Tasks ============

/// Task store backed by the `tasks` SQL table
#[derive(Clone)]
pub struct RemoteTaskStore {
    db: DatabaseConnection,
}

impl RemoteTaskStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl Store<Task> for RemoteTaskStore {
    async fn list(&self) -> AppResult<Vec<Task>> {
        ensure_schema(&self.db, CREATE_TASKS_TABLE).await?;

        let models = TaskEntity::find()
            .order_by_desc(task::Column::CreatedAt)
            .order_by_desc(task::Column::Id)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(|m| m.into()).collect())
    }

    async fn create(&self, input: NewTask) -> AppResult<Task> {
        ensure_schema(&self.db, CREATE_TASKS_TABLE).await?;

        // id and createdAt come from column defaults
        let model = task::ActiveModel {
            title: Set(input.title),
            description: Set(Some(input.description)),
            status: Set(Some(input.status)),
            priority: Set(Some(input.priority)),
            due_date: Set(input.due_date),
            project_id: Set(input.project_id),
            ..Default::default()
        };
        let inserted = TaskEntity::insert(model).exec(&self.db).await?;

        // Not atomic with the insert: a concurrent delete can win the race
        let row = TaskEntity::find_by_id(inserted.last_insert_id)
            .one(&self.db)
            .await?;
        let model = inserted_row(row, "task")?;

        Ok(model.into())
    }

    async fn update(&self, id: i64, patch: TaskPatch) -> AppResult<Option<Task>> {
        ensure_schema(&self.db, CREATE_TASKS_TABLE).await?;

        let values = vec![
            Value::from(patch.title),
            Value::from(patch.description),
            Value::from(patch.status.map(|s| s.to_value())),
            Value::from(patch.priority.map(|p| p.to_value())),
            Value::from(patch.due_date),
            Value::from(patch.project_id),
            Value::from(id),
        ];
        if !coalesce_update(&self.db, UPDATE_TASK, values).await? {
            return Ok(None);
        }

        let model = TaskEntity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(|m| m.into()))
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        ensure_schema(&self.db, CREATE_TASKS_TABLE).await?;

        let result = TaskEntity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }
}

impl From<task::Model> for Task {
    fn from(m: task::Model) -> Self {
        Self {
            id: m.id,
            title: m.title,
            description: m.description.unwrap_or_default(),
            status: m.status.unwrap_or_default(),
            priority: m.priority.unwrap_or_default(),
            due_date: m.due_date,
            project_id: m.project_id,
            created_at: m.created_at.unwrap_or_default(),
        }
    }
}

// ============ Projects ============

/// Project store backed by the `projects` SQL table
#[derive(Clone)]
pub struct RemoteProjectStore {
    db: DatabaseConnection,
}

impl RemoteProjectStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl Store<Project> for RemoteProjectStore {
    async fn list(&self) -> AppResult<Vec<Project>> {
        ensure_schema(&self.db, CREATE_PROJECTS_TABLE).await?;

        let models = ProjectEntity::find()
            .order_by_desc(project::Column::CreatedAt)
            .order_by_desc(project::Column::Id)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(|m| m.into()).collect())
    }

    async fn create(&self, input: NewProject) -> AppResult<Project> {
        ensure_schema(&self.db, CREATE_PROJECTS_TABLE).await?;

        let model = project::ActiveModel {
            name: Set(input.name),
            description: Set(Some(input.description)),
            status: Set(Some(input.status)),
            ..Default::default()
        };
        let inserted = ProjectEntity::insert(model).exec(&self.db).await?;

        let row = ProjectEntity::find_by_id(inserted.last_insert_id)
            .one(&self.db)
            .await?;
        let model = inserted_row(row, "project")?;

        Ok(model.into())
    }

    async fn update(&self, id: i64, patch: ProjectPatch) -> AppResult<Option<Project>> {
        ensure_schema(&self.db, CREATE_PROJECTS_TABLE).await?;

        let values = vec![
            Value::from(patch.name),
            Value::from(patch.description),
            Value::from(patch.status.map(|s| s.to_value())),
            Value::from(id),
        ];
        if !coalesce_update(&self.db, UPDATE_PROJECT, values).await? {
            return Ok(None);
        }

        let model = ProjectEntity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(|m| m.into()))
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        ensure_schema(&self.db, CREATE_PROJECTS_TABLE).await?;

        let result = ProjectEntity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }
}

impl From<project::Model> for Project {
    fn from(m: project::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            description: m.description.unwrap_or_default(),
            status: m.status.unwrap_or_default(),
            created_at: m.created_at.unwrap_or_default(),
        }
    }
}
