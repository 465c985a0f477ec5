use diesel::prelude::*;
use diesel::sql_types::{Bool, Nullable, Varchar};

use crate::error::RepositoryError;
use crate::models::task::{NewTask, Task, TaskChanges};
use crate::repository::database::Database;
use crate::repository::schema::tasks;

diesel::define_sql_function!(fn coalesce(x: Nullable<Bool>, y: Bool) -> Bool);

// Binds a title that may be NULL into the NOT NULL column, leaving the
// rejection to the constraint.
diesel::define_sql_function! {
    #[sql_name = "COALESCE"]
    fn unchecked_title(x: Nullable<Varchar>) -> Varchar;
}

/// Data access for tasks. Every call is a single statement; a missing row
/// is `Ok(None)`, anything the store rejects is `Err`.
pub trait TaskRepository: Send + Sync {
    /// All tasks, newest first.
    fn list(&self) -> Result<Vec<Task>, RepositoryError>;

    fn get(&self, task_id: i32) -> Result<Option<Task>, RepositoryError>;

    fn create(&self, new_task: NewTask) -> Result<Task, RepositoryError>;

    fn update(&self, task_id: i32, changes: TaskChanges) -> Result<Option<Task>, RepositoryError>;

    /// Removes the task and returns the row as it was before deletion.
    fn delete(&self, task_id: i32) -> Result<Option<Task>, RepositoryError>;
}

#[derive(Debug, Clone)]
pub struct PgTaskRepository {
    db: Database,
}

impl PgTaskRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

impl TaskRepository for PgTaskRepository {
    fn list(&self) -> Result<Vec<Task>, RepositoryError> {
        let tasks = tasks::table
            .order(tasks::created_at.desc())
            .select(Task::as_select())
            .load(&mut self.db.connection()?)?;
        Ok(tasks)
    }

    fn get(&self, task_id: i32) -> Result<Option<Task>, RepositoryError> {
        let task = tasks::table
            .find(task_id)
            .select(Task::as_select())
            .first(&mut self.db.connection()?)
            .optional()?;
        Ok(task)
    }

    fn create(&self, new_task: NewTask) -> Result<Task, RepositoryError> {
        let task = diesel::insert_into(tasks::table)
            .values(&new_task)
            .returning(Task::as_returning())
            .get_result(&mut self.db.connection()?)?;
        Ok(task)
    }

    fn update(&self, task_id: i32, changes: TaskChanges) -> Result<Option<Task>, RepositoryError> {
        let task = diesel::update(tasks::table.find(task_id))
            .set((
                tasks::title.eq(unchecked_title(changes.title)),
                tasks::description.eq(changes.description),
                tasks::is_completed.eq(coalesce(changes.is_completed, tasks::is_completed)),
            ))
            .returning(Task::as_returning())
            .get_result(&mut self.db.connection()?)
            .optional()?;
        Ok(task)
    }

    fn delete(&self, task_id: i32) -> Result<Option<Task>, RepositoryError> {
        let task = diesel::delete(tasks::table.find(task_id))
            .returning(Task::as_returning())
            .get_result(&mut self.db.connection()?)
            .optional()?;
        Ok(task)
    }
}
