use actix_web::middleware::from_fn;
use actix_web::web;

use crate::auth::require_api_key;

pub mod extract;
pub mod tasks;

/// Mounts the task routes under `/tasks`, all behind the API key check.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/tasks")
            .wrap(from_fn(require_api_key))
            .service(tasks::get_tasks)
            .service(tasks::create_task)
            .service(tasks::get_task)
            .service(tasks::update_task)
            .service(tasks::delete_task),
    );
}
