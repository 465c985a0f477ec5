use std::sync::Arc;

use actix_cors::Cors;
use actix_web::http::header;
use actix_web::middleware::{DefaultHeaders, Logger, NormalizePath};
use actix_web::{get, web, App, HttpResponse, HttpServer, Responder, Result};
use actix_web_opentelemetry::RequestTracing;
use anyhow::Context;
use serde::Serialize;

use crate::auth::{AuthConfig, API_KEY_HEADER};
use crate::config::Config;
use crate::repository::database::Database;
use crate::repository::tasks::{PgTaskRepository, TaskRepository};

mod api;
mod auth;
mod config;
mod error;
mod models;
mod repository;
mod telemetry;

#[derive(Serialize)]
pub struct Response {
    pub message: String,
}

#[get("/")]
async fn index() -> impl Responder {
    let response = Response {
        message: "Task API is running!".to_string(),
    };
    HttpResponse::Ok().json(response)
}

#[get("/health")]
async fn healthcheck() -> impl Responder {
    let response = Response {
        message: "Everything is working fine".to_string(),
    };
    HttpResponse::Ok().json(response)
}

async fn not_found() -> Result<HttpResponse> {
    let response = Response {
        message: "Resource not found".to_string(),
    };
    Ok(HttpResponse::NotFound().json(response))
}

fn cors() -> Cors {
    Cors::default()
        .allow_any_origin()
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE"])
        .allowed_headers(vec![
            header::CONTENT_TYPE,
            header::HeaderName::from_static(API_KEY_HEADER),
        ])
        .max_age(3600)
}

fn security_headers() -> DefaultHeaders {
    DefaultHeaders::new()
        .add((header::X_CONTENT_TYPE_OPTIONS, "nosniff"))
        .add((header::X_FRAME_OPTIONS, "SAMEORIGIN"))
        .add((header::REFERRER_POLICY, "no-referrer"))
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    let telemetry = telemetry::OpenTelemetryStack::new()?;

    let database = Database::connect(&config).context("Failed to create pool.")?;
    database
        .ensure_schema()
        .context("Failed to initialize the tasks table.")?;

    let repository: Arc<dyn TaskRepository> = Arc::new(PgTaskRepository::new(database));
    let repository_data = web::Data::from(repository);
    let auth_data = web::Data::new(AuthConfig::from(&config));
    let metrics_data = web::Data::new(telemetry::TaskMetrics::new());

    tracing::info!(host = %config.host, port = config.port, "starting task API");
    HttpServer::new(move || {
        App::new()
            .app_data(repository_data.clone())
            .app_data(auth_data.clone())
            .app_data(metrics_data.clone())
            .configure(api::config)
            .service(index)
            .service(healthcheck)
            .route("/metrics", web::get().to(telemetry.metrics_handler()))
            .default_service(web::route().to(not_found))
            .wrap(NormalizePath::trim())
            .wrap(security_headers())
            .wrap(cors())
            .wrap(Logger::default())
            .wrap(RequestTracing::new())
            .wrap(telemetry.metrics())
    })
        .bind((config.host.as_str(), config.port))?
        .run()
        .await?;
    Ok(())
}
