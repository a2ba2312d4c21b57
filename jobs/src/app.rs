use actix_web::web;
use std::sync::Arc;
use utoipa::OpenApi;

use crate::datastore::Datastore;
use crate::routes::jobs;

#[derive(OpenApi)]
#[openapi(
    tags(
        (name = "jobs", description = "Jobs API plugin")
    ),
    paths(jobs::list_jobs, jobs::get_job, jobs::update_job),
)]
pub struct ApiDoc;

/// Register the jobs routes against a server configuration.
///
/// Route descriptors are constructed fresh on each call; completion is the
/// synchronous return. The datastore handle is shared with every handler via
/// app data.
pub fn register(datastore: Arc<dyn Datastore>) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        cfg.app_data(web::Data::from(datastore))
            .service(jobs::list_jobs)
            .service(jobs::get_job)
            .service(jobs::update_job);
    }
}
