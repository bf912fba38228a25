use sea_orm::entity::prelude::*;

use crate::models::{TaskPriority, TaskStatus};

/// Row of the `tasks` table. Columns are camelCase and every non-key column
/// except `title` is nullable, so defaults are applied when converting.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "tasks")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    #[sea_orm(column_name = "dueDate")]
    pub due_date: Option<String>,
    #[sea_orm(column_name = "projectId")]
    pub project_id: Option<i64>,
    #[sea_orm(column_name = "createdAt")]
    pub created_at: Option<String>,
}

// projectId is a weak reference, so no relation is declared
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
