//! End-to-end workflow tests against wiremock backends and a scripted generator.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use gmb_client::GmbClient;
use gmb_core::Session;
use gmb_genai::{GenerateError, TextGenerator, CONCERN_CLAUSE};
use gmb_workflow::{
    LocationError, LocationState, LocationStore, ReviewReplyWorkflow, ReviewsState,
    WorkflowError, FETCH_FAILED_FALLBACK, SUBMIT_CONFIRMATION,
};
use wiremock::matchers::{body_json, header, method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Replays queued responses and records every prompt it receives.
#[derive(Default)]
struct ScriptedGenerator {
    responses: Mutex<VecDeque<Result<String, GenerateError>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    fn with(responses: Vec<Result<String, GenerateError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GenerateError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(GenerateError::EmptyResponse))
    }
}

fn session() -> Session {
    let store: HashMap<String, String> = [
        ("token", "jwt-token"),
        ("gmb_access_token", "ya29.access"),
        ("gmb_account_id", "A1"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();
    Session::from_store(&store)
}

fn client(server: &MockServer) -> GmbClient {
    GmbClient::new(&server.uri(), "test-agent", None).expect("client construction should not fail")
}

async fn mount_reviews(server: &MockServer, reviews: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/gmb/get-allviewers/A1"))
        .and(header("authorization", "Bearer jwt-token"))
        .and(header("gmb_access_token", "ya29.access"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "reviews": reviews })),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn load_pending_reviews_keeps_only_unreplied() {
    let server = MockServer::start().await;
    mount_reviews(
        &server,
        serde_json::json!([
            { "id": 1, "reply": null },
            { "id": 2, "reply": "x" }
        ]),
    )
    .await;

    let mut wf = ReviewReplyWorkflow::default();
    let pending = wf
        .load_pending_reviews(&client(&server), &session())
        .await
        .expect("load should succeed");

    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].review_id, "1");
}

#[tokio::test]
async fn unexpected_ratings_load_as_zero_stars() {
    let server = MockServer::start().await;
    mount_reviews(
        &server,
        serde_json::json!([
            { "reviewId": "a", "starRating": "FIVE" },
            { "reviewId": "b", "starRating": null },
            { "reviewId": "c", "starRating": 4 }
        ]),
    )
    .await;

    let mut wf = ReviewReplyWorkflow::default();
    let pending = wf
        .load_pending_reviews(&client(&server), &session())
        .await
        .expect("odd ratings must not fail the listing");

    let stars: Vec<u8> = pending.iter().map(gmb_core::Review::rating).collect();
    assert_eq!(stars, [5, 0, 0]);
    assert!(matches!(wf.reviews(), ReviewsState::Loaded(r) if r.len() == 3));
}

#[tokio::test]
async fn load_pending_reviews_without_credentials_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut wf = ReviewReplyWorkflow::default();
    let err = wf
        .load_pending_reviews(&client(&server), &Session::default())
        .await
        .unwrap_err();

    assert!(matches!(err, WorkflowError::MissingCredentials(_)));
    assert!(matches!(wf.reviews(), ReviewsState::Failed(_)));
}

#[tokio::test]
async fn load_pending_reviews_records_server_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/gmb/get-allviewers/A1"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(serde_json::json!({ "message": "Invalid token" })),
        )
        .mount(&server)
        .await;

    let mut wf = ReviewReplyWorkflow::default();
    let err = wf
        .load_pending_reviews(&client(&server), &session())
        .await
        .unwrap_err();

    assert!(matches!(err, WorkflowError::Remote(_)));
    assert_eq!(wf.reviews(), &ReviewsState::Failed("Invalid token".to_string()));
}

#[tokio::test]
async fn draft_regenerate_and_submit_round_trip() {
    let server = MockServer::start().await;
    mount_reviews(
        &server,
        serde_json::json!([{
            "reviewId": "r1",
            "reviewer": { "displayName": "Ana" },
            "starRating": "TWO",
            "comment": "Waited too long",
            "name": "accounts/A1/locations/L1/reviews/r1"
        }]),
    )
    .await;
    Mock::given(method("POST"))
        .and(path("/gmb/replay-review/A1/L1/r1"))
        .and(body_json(serde_json::json!({ "reply": "Sorry for the wait, Ana." })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let generator = ScriptedGenerator::with(vec![
        Ok("First draft".to_string()),
        Ok("Sorry for the wait, Ana.".to_string()),
    ]);
    let gmb = client(&server);
    let session = session();
    let mut wf = ReviewReplyWorkflow::default();

    wf.load_pending_reviews(&gmb, &session).await.unwrap();
    let review = wf.find_review("r1").cloned().expect("review should be pending");

    wf.select_and_draft(review, &generator).await;
    assert_eq!(wf.composer().unwrap().draft(), "First draft");

    wf.generate_draft(&generator).await;
    assert_eq!(wf.composer().unwrap().draft(), "Sorry for the wait, Ana.");

    let prompts = generator.prompts();
    assert_eq!(prompts.len(), 2);
    assert_eq!(prompts[0], prompts[1], "regeneration reuses the original review");
    assert!(prompts[0].contains(CONCERN_CLAUSE));

    wf.submit_reply(&gmb, &session).await.expect("submit should succeed");
    assert!(!wf.is_open());
    let now = std::time::Instant::now();
    assert_eq!(
        wf.notice(now).map(gmb_workflow::Notice::message),
        Some(SUBMIT_CONFIRMATION)
    );
}

#[tokio::test]
async fn malformed_resource_name_issues_no_post() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path_regex("^/gmb/replay-review/.*"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let review = serde_json::from_value(serde_json::json!({
        "reviewId": "r1",
        "starRating": "FIVE",
        "name": "accounts/A1/locations"
    }))
    .unwrap();
    let generator = ScriptedGenerator::with(vec![Ok("Thanks!".to_string())]);
    let mut wf = ReviewReplyWorkflow::default();
    wf.select_and_draft(review, &generator).await;

    let err = wf.submit_reply(&client(&server), &session()).await.unwrap_err();
    assert!(matches!(err, WorkflowError::MalformedResourceName(_)));
    assert!(wf.is_open(), "composer stays open after a rejected submit");
}

#[tokio::test]
async fn failed_submit_keeps_draft_for_retry() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/gmb/replay-review/A1/L1/r1"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let review = serde_json::from_value(serde_json::json!({
        "reviewId": "r1",
        "starRating": "FIVE",
        "comment": "Great",
        "name": "accounts/A1/locations/L1"
    }))
    .unwrap();
    let generator = ScriptedGenerator::with(vec![Ok("Thanks!".to_string())]);
    let mut wf = ReviewReplyWorkflow::default();
    wf.select_and_draft(review, &generator).await;

    let err = wf.submit_reply(&client(&server), &session()).await.unwrap_err();
    assert!(matches!(err, WorkflowError::Remote(_)));
    let composer = wf.composer().expect("composer stays open");
    assert_eq!(composer.draft(), "Thanks!");
    assert!(!composer.is_submitting());
}

#[tokio::test]
async fn short_review_without_comment_uses_thank_you_prompt() {
    let review = serde_json::from_value(serde_json::json!({
        "reviewId": "r2",
        "reviewer": { "displayName": "Bo" },
        "starRating": "FIVE"
    }))
    .unwrap();
    let generator = ScriptedGenerator::with(vec![Ok("Thank you, Bo!".to_string())]);
    let mut wf = ReviewReplyWorkflow::default();
    wf.select_and_draft(review, &generator).await;

    let prompts = generator.prompts();
    assert!(prompts[0].contains("simple thank you"));
    assert!(prompts[0].contains("Customer: Bo, Rating: 5."));
}

#[tokio::test]
async fn location_fetch_loads_payload() {
    let server = MockServer::start().await;
    let body = serde_json::json!({ "title": "Corner Cafe" });
    Mock::given(method("GET"))
        .and(path("/gmb/get-location"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let mut store = LocationStore::new();
    store
        .fetch(&client(&server), &session(), "P1")
        .await
        .expect("fetch should succeed");
    assert_eq!(store.data(), Some(&body));
}

#[tokio::test]
async fn location_fetch_500_takes_abandon_path() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/gmb/get-location"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let mut store = LocationStore::new();
    let err = store
        .fetch(&client(&server), &session(), "P1")
        .await
        .unwrap_err();

    assert!(matches!(err, LocationError::Abandoned { status: 500 }));
    assert_eq!(store.state(), &LocationState::Abandoned { status: 500 });
}

#[tokio::test]
async fn location_fetch_other_failure_renders_failed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/gmb/get-location"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let mut store = LocationStore::new();
    let err = store
        .fetch(&client(&server), &session(), "P1")
        .await
        .unwrap_err();

    assert!(matches!(err, LocationError::Remote { status: Some(404), .. }));
    assert_eq!(store.error(), Some(FETCH_FAILED_FALLBACK));
}

#[tokio::test]
async fn location_fetch_without_session_is_unauthenticated() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut store = LocationStore::new();
    let err = store
        .fetch(&client(&server), &Session::default(), "P1")
        .await
        .unwrap_err();

    assert!(matches!(err, LocationError::Unauthenticated(_)));
    assert!(matches!(store.state(), LocationState::Failed(_)));
}

#[tokio::test]
async fn refetch_from_terminal_state_reloads() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/gmb/get-location"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/gmb/get-location"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "ok": true })))
        .mount(&server)
        .await;

    let gmb = client(&server);
    let mut store = LocationStore::new();
    assert!(store.fetch(&gmb, &session(), "P1").await.is_err());
    store.fetch(&gmb, &session(), "P1").await.unwrap();
    assert_eq!(store.data(), Some(&serde_json::json!({ "ok": true })));
}
