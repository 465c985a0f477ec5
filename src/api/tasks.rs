use actix_web::{delete, get, post, put, web, HttpResponse};

use crate::api::extract::JsonBody;
use crate::error::ApiError;
use crate::models::task::{CreateTaskRequest, DeletedTaskResponse, TaskChanges, UpdateTaskRequest};
use crate::repository::tasks::TaskRepository;
use crate::telemetry::TaskMetrics;

fn parse_id(raw: &str) -> Result<i32, ApiError> {
    raw.parse().map_err(|_| ApiError::InvalidId)
}

#[get("")]
pub async fn get_tasks(repo: web::Data<dyn TaskRepository>) -> Result<HttpResponse, ApiError> {
    let tasks = web::block(move || repo.list()).await??;
    Ok(HttpResponse::Ok().json(tasks))
}

#[get("/{id}")]
pub async fn get_task(
    repo: web::Data<dyn TaskRepository>,
    id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let task_id = parse_id(&id)?;
    let task = web::block(move || repo.get(task_id)).await??;
    match task {
        Some(task) => Ok(HttpResponse::Ok().json(task)),
        None => Err(ApiError::NotFound),
    }
}

#[post("")]
pub async fn create_task(
    repo: web::Data<dyn TaskRepository>,
    metrics: web::Data<TaskMetrics>,
    body: JsonBody<CreateTaskRequest>,
) -> Result<HttpResponse, ApiError> {
    let new_task = body.into_inner().validate()?;
    let task = web::block(move || repo.create(new_task)).await??;
    metrics.record("create");
    Ok(HttpResponse::Created().json(task))
}

#[put("/{id}")]
pub async fn update_task(
    repo: web::Data<dyn TaskRepository>,
    metrics: web::Data<TaskMetrics>,
    id: web::Path<String>,
    body: JsonBody<UpdateTaskRequest>,
) -> Result<HttpResponse, ApiError> {
    let task_id = parse_id(&id)?;
    let changes = TaskChanges::from(body.into_inner());
    let task = web::block(move || repo.update(task_id, changes)).await??;
    match task {
        Some(task) => {
            metrics.record("update");
            Ok(HttpResponse::Ok().json(task))
        }
        None => Err(ApiError::NotFound),
    }
}

#[delete("/{id}")]
pub async fn delete_task(
    repo: web::Data<dyn TaskRepository>,
    metrics: web::Data<TaskMetrics>,
    id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let task_id = parse_id(&id)?;
    let task = web::block(move || repo.delete(task_id)).await??;
    match task {
        Some(task) => {
            metrics.record("delete");
            Ok(HttpResponse::Ok().json(DeletedTaskResponse::new(task)))
        }
        None => Err(ApiError::NotFound),
    }
}
