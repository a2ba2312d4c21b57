use actix_web::{
    Responder, get, put,
    web::{self},
};
use validator::Validate;

use crate::datastore::{Datastore, Page};
use ratchet_core::models::UpdateJobRequest;

const JOBS: &str = "jobs";

#[derive(serde::Deserialize)]
pub struct ListJobsQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
}

/// List jobs with pagination
#[utoipa::path(
    tag = JOBS,
    params(
        ("page" = Option<i64>, Query, description = "Page number (default: 1)"),
        ("size" = Option<i64>, Query, description = "Page size (default: 20)"),
    ),
    responses(
        (status = 200, description = "Paginated list of jobs", body = Vec<ratchet_core::models::Job>),
        (status = 400, description = "Invalid query parameters", body = ratchet_core::ErrorResponse),
    )
)]
#[get("/jobs")]
pub async fn list_jobs(
    query: web::Query<ListJobsQuery>,
    datastore: web::Data<dyn Datastore>,
) -> crate::Result<impl Responder> {
    let page = Page {
        number: query.page.unwrap_or(1),
        size: query.size.unwrap_or(20),
    };
    page.validate()?;

    let jobs = datastore.list_jobs(page).await?;

    Ok(web::Json(jobs))
}

/// Get a single job
#[utoipa::path(
    tag = JOBS,
    params(
        ("id" = i64, Path, description = "Job id"),
    ),
    responses(
        (status = 200, description = "Job", body = ratchet_core::models::Job),
        (status = 404, description = "Job not found", body = ratchet_core::ErrorResponse),
    )
)]
#[get("/jobs/{id}")]
pub async fn get_job(
    path: web::Path<i64>,
    datastore: web::Data<dyn Datastore>,
) -> crate::Result<impl Responder> {
    let id = path.into_inner();

    let job = datastore
        .get_job(id)
        .await?
        .ok_or(crate::Error::JobNotFound(id))?;

    Ok(web::Json(job))
}

/// Update a job; absent body fields are left unchanged
#[utoipa::path(
    tag = JOBS,
    params(
        ("id" = i64, Path, description = "Job id"),
    ),
    request_body = UpdateJobRequest,
    responses(
        (status = 200, description = "Updated job", body = ratchet_core::models::Job),
        (status = 404, description = "Job not found", body = ratchet_core::ErrorResponse),
    )
)]
#[put("/jobs/{id}")]
pub async fn update_job(
    path: web::Path<i64>,
    datastore: web::Data<dyn Datastore>,
    req: web::Json<UpdateJobRequest>,
) -> crate::Result<impl Responder> {
    let id = path.into_inner();

    let job = datastore
        .update_job(id, req.into_inner())
        .await?
        .ok_or(crate::Error::JobNotFound(id))?;

    Ok(web::Json(job))
}
