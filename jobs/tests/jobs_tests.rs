//! Route-level tests for the jobs plugin, backed by the in-memory datastore.

use std::sync::Arc;

use actix_web::{App, test};
use serde_json::json;
use utoipa::OpenApi;

use ratchet_core::models::{Job, JobState};
use ratchet_core::{ErrorResponse, PublicErrorType};
use ratchet_jobs::{Datastore, MemoryDatastore, app::ApiDoc, register};

fn job(id: i64) -> Job {
    Job {
        id,
        pipeline_id: 99,
        name: format!("job-{id}"),
        state: JobState::Enabled,
        archived: false,
    }
}

fn seeded_store() -> Arc<dyn Datastore> {
    Arc::new(MemoryDatastore::with_jobs((1..=4).map(job)))
}

#[actix_web::test]
async fn list_returns_seeded_jobs() {
    let app = test::init_service(App::new().configure(register(seeded_store()))).await;

    let req = test::TestRequest::get().uri("/jobs").to_request();
    let jobs: Vec<Job> = test::call_and_read_body_json(&app, req).await;

    assert_eq!(jobs.iter().map(|j| j.id).collect::<Vec<_>>(), vec![
        1, 2, 3, 4
    ]);
}

#[actix_web::test]
async fn list_paginates() {
    let app = test::init_service(App::new().configure(register(seeded_store()))).await;

    let req = test::TestRequest::get()
        .uri("/jobs?page=2&size=2")
        .to_request();
    let jobs: Vec<Job> = test::call_and_read_body_json(&app, req).await;

    assert_eq!(jobs.iter().map(|j| j.id).collect::<Vec<_>>(), vec![3, 4]);
}

#[actix_web::test]
async fn list_rejects_out_of_range_page_size() {
    let app = test::init_service(App::new().configure(register(seeded_store()))).await;

    let req = test::TestRequest::get()
        .uri("/jobs?page=1&size=0")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), actix_web::http::StatusCode::BAD_REQUEST);
    let body: ErrorResponse = test::read_body_json(resp).await;
    assert_eq!(body.error, PublicErrorType::Validation);
    assert!(
        body.validation
            .as_ref()
            .map(|v| v.contains_key("size"))
            .unwrap_or(false)
    );
}

#[actix_web::test]
async fn get_returns_job() {
    let app = test::init_service(App::new().configure(register(seeded_store()))).await;

    let req = test::TestRequest::get().uri("/jobs/2").to_request();
    let job: Job = test::call_and_read_body_json(&app, req).await;

    assert_eq!(job.id, 2);
    assert_eq!(job.name, "job-2");
}

#[actix_web::test]
async fn get_unknown_job_is_not_found() {
    let app = test::init_service(App::new().configure(register(seeded_store()))).await;

    let req = test::TestRequest::get().uri("/jobs/7").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), actix_web::http::StatusCode::NOT_FOUND);
    let body: ErrorResponse = test::read_body_json(resp).await;
    assert_eq!(body.error, PublicErrorType::NotFound);
    assert!(
        body.message
            .as_ref()
            .map(|m| m.contains("7"))
            .unwrap_or(false)
    );
}

#[actix_web::test]
async fn update_changes_state_and_persists() {
    let store = seeded_store();
    let app = test::init_service(App::new().configure(register(store.clone()))).await;

    let req = test::TestRequest::put()
        .uri("/jobs/1")
        .set_json(json!({"state": "DISABLED"}))
        .to_request();
    let updated: Job = test::call_and_read_body_json(&app, req).await;
    assert_eq!(updated.state, JobState::Disabled);

    let req = test::TestRequest::get().uri("/jobs/1").to_request();
    let fetched: Job = test::call_and_read_body_json(&app, req).await;
    assert_eq!(fetched.state, JobState::Disabled);
}

#[actix_web::test]
async fn update_with_empty_body_changes_nothing() {
    let app = test::init_service(App::new().configure(register(seeded_store()))).await;

    let req = test::TestRequest::put()
        .uri("/jobs/3")
        .set_json(json!({}))
        .to_request();
    let updated: Job = test::call_and_read_body_json(&app, req).await;

    assert_eq!(updated.state, JobState::Enabled);
    assert!(!updated.archived);
}

#[actix_web::test]
async fn update_unknown_job_is_not_found() {
    let app = test::init_service(App::new().configure(register(seeded_store()))).await;

    let req = test::TestRequest::put()
        .uri("/jobs/42")
        .set_json(json!({"archived": true}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), actix_web::http::StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn registration_adds_exactly_three_routes() {
    let doc = ApiDoc::openapi();

    let operations: usize = doc
        .paths
        .paths
        .values()
        .map(|item| {
            [
                item.get.as_ref(),
                item.put.as_ref(),
                item.post.as_ref(),
                item.delete.as_ref(),
            ]
            .iter()
            .flatten()
            .count()
        })
        .sum();

    assert_eq!(operations, 3);
    assert!(doc.paths.paths.contains_key("/jobs"));
    assert!(doc.paths.paths.contains_key("/jobs/{id}"));
}

#[actix_web::test]
async fn registration_is_repeatable_with_a_shared_datastore() {
    let store = seeded_store();

    let first = test::init_service(App::new().configure(register(store.clone()))).await;
    let second = test::init_service(App::new().configure(register(store))).await;

    let jobs: Vec<Job> =
        test::call_and_read_body_json(&first, test::TestRequest::get().uri("/jobs").to_request())
            .await;
    assert_eq!(jobs.len(), 4);

    let job: Job =
        test::call_and_read_body_json(&second, test::TestRequest::get().uri("/jobs/1").to_request())
            .await;
    assert_eq!(job.id, 1);
}
