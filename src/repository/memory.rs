use chrono::Utc;
use std::sync::{Arc, Mutex};

use crate::error::RepositoryError;
use crate::models::task::{NewTask, Task, TaskChanges};
use crate::repository::tasks::TaskRepository;

/// Vec-backed repository for exercising handlers without PostgreSQL.
#[derive(Default)]
pub struct InMemoryTaskRepository {
    tasks: Arc<Mutex<Vec<Task>>>,
    next_id: Mutex<i32>,
    unavailable: bool,
}

impl InMemoryTaskRepository {
    /// A repository whose every call fails like a dropped connection.
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    fn check(&self) -> Result<(), RepositoryError> {
        if self.unavailable {
            return Err(RepositoryError::Query(diesel::result::Error::DatabaseError(
                diesel::result::DatabaseErrorKind::ClosedConnection,
                Box::new("connection refused".to_string()),
            )));
        }
        Ok(())
    }
}

impl TaskRepository for InMemoryTaskRepository {
    fn list(&self) -> Result<Vec<Task>, RepositoryError> {
        self.check()?;
        let mut tasks = self.tasks.lock().unwrap().clone();
        tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(tasks)
    }

    fn get(&self, task_id: i32) -> Result<Option<Task>, RepositoryError> {
        self.check()?;
        let tasks = self.tasks.lock().unwrap();
        Ok(tasks.iter().find(|task| task.id == task_id).cloned())
    }

    fn create(&self, new_task: NewTask) -> Result<Task, RepositoryError> {
        self.check()?;
        let mut next_id = self.next_id.lock().unwrap();
        *next_id += 1;
        let task = Task {
            id: *next_id,
            title: new_task.title,
            description: new_task.description,
            is_completed: false,
            created_at: Utc::now().naive_utc(),
        };
        self.tasks.lock().unwrap().push(task.clone());
        Ok(task)
    }

    fn update(&self, task_id: i32, changes: TaskChanges) -> Result<Option<Task>, RepositoryError> {
        self.check()?;
        let mut tasks = self.tasks.lock().unwrap();
        let Some(task) = tasks.iter_mut().find(|task| task.id == task_id) else {
            return Ok(None);
        };
        let Some(title) = changes.title else {
            return Err(RepositoryError::Query(diesel::result::Error::DatabaseError(
                diesel::result::DatabaseErrorKind::NotNullViolation,
                Box::new("null value in column \"title\" violates not-null constraint".to_string()),
            )));
        };
        task.title = title;
        task.description = changes.description;
        task.is_completed = changes.is_completed.unwrap_or(task.is_completed);
        Ok(Some(task.clone()))
    }

    fn delete(&self, task_id: i32) -> Result<Option<Task>, RepositoryError> {
        self.check()?;
        let mut tasks = self.tasks.lock().unwrap();
        let index = tasks.iter().position(|task| task.id == task_id);
        Ok(index.map(|index| tasks.remove(index)))
    }
}
