//! Integration tests for the campus resources backend.

use std::sync::Arc;
use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use reqwest::Client;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use crate::db::{init_database, Repository};
use crate::store::SharedStore;
use crate::{create_router, AppState};

/// Test fixture for integration tests.
struct TestFixture {
    client: Client,
    base_url: String,
    _temp_dir: TempDir,
}

impl TestFixture {
    async fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let state = seeded_state(&temp_dir).await;
        let app = create_router(state);

        // Bind to random port
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind");
        let addr = listener.local_addr().expect("Failed to get addr");
        let base_url = format!("http://{}", addr);

        // Spawn server
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // Wait for server to start
        tokio::time::sleep(Duration::from_millis(100)).await;

        TestFixture {
            client: Client::new(),
            base_url,
            _temp_dir: temp_dir,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json(&self, path: &str) -> (u16, Value) {
        let resp = self.client.get(self.url(path)).send().await.unwrap();
        let status = resp.status().as_u16();
        (status, resp.json().await.unwrap())
    }

    async fn put_json(&self, path: &str, body: Value) -> (u16, Value) {
        let resp = self
            .client
            .put(self.url(path))
            .json(&body)
            .send()
            .await
            .unwrap();
        let status = resp.status().as_u16();
        (status, resp.json().await.unwrap())
    }

    async fn post_json(&self, path: &str, body: Value) -> (u16, Value) {
        let resp = self
            .client
            .post(self.url(path))
            .json(&body)
            .send()
            .await
            .unwrap();
        let status = resp.status().as_u16();
        (status, resp.json().await.unwrap())
    }
}

async fn seeded_state(temp_dir: &TempDir) -> AppState {
    let db_path = temp_dir.path().join("test.sqlite");
    let pool = init_database(&db_path).await.expect("Failed to init DB");
    let store = SharedStore::open(
        Some(Repository::new(pool)),
        true,
        Duration::from_secs(5),
        Duration::from_secs(10),
    )
    .await;

    AppState {
        store: Arc::new(store),
    }
}

fn ids(body: &Value) -> Vec<String> {
    body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["id"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_health_check() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .get(fixture.url("/health"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.text().await.unwrap(), "OK");
}

#[tokio::test]
async fn test_datastore_get() {
    let fixture = TestFixture::new().await;

    let (status, body) = fixture.get_json("/api/datastore").await;
    assert_eq!(status, 200);
    assert_eq!(body["success"], true);
    assert!(body["data"]["schemaVersion"].is_number());
    assert_eq!(body["data"]["trainingRequests"].as_array().unwrap().len(), 3);
    assert_eq!(body["data"]["facilities"].as_array().unwrap().len(), 3);
    assert_eq!(body["revisionId"], 0);

    let (status, body) = fixture.get_json("/api/datastore/revision").await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["revisionId"], 0);
}

#[tokio::test]
async fn test_request_lifecycle() {
    let fixture = TestFixture::new().await;

    // Submit
    let (status, body) = fixture
        .post_json(
            "/api/requests/rental",
            json!({
                "applicantName": "Debate Society",
                "applicantEmail": "debate@union.uni.edu",
                "requestedItem": "Seminar Room 5",
                "motivation": "Inter-university finals"
            }),
        )
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["status"], "Pending");
    let id = body["data"]["id"].as_str().unwrap().to_string();
    let revision_after_submit = body["revisionId"].as_i64().unwrap();
    assert_eq!(revision_after_submit, 1);

    // Approve
    let status_path = format!("/api/requests/rental/{}/status", id);
    let (status, body) = fixture
        .put_json(&status_path, json!({ "status": "Approved" }))
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["status"], "Approved");
    assert_eq!(body["data"]["requestedItem"], "Seminar Room 5");
    assert_eq!(body["revisionId"], 2);

    // A second decision is refused and the first one stands
    let (status, body) = fixture
        .put_json(&status_path, json!({ "status": "Rejected" }))
        .await;
    assert_eq!(status, 409);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "INVALID_TRANSITION");
    assert_eq!(body["error"]["details"]["currentStatus"], "Approved");
    assert_eq!(body["revisionId"], 2);

    let (status, body) = fixture
        .get_json(&format!("/api/requests/rental/{}", id))
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["status"], "Approved");

    // The request only exists in the rental collection
    let (status, _) = fixture
        .get_json(&format!("/api/requests/training/{}", id))
        .await;
    assert_eq!(status, 404);

    // Delete
    let resp = fixture
        .client
        .delete(fixture.url(&format!("/api/requests/rental/{}", id)))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let (status, body) = fixture
        .get_json(&format!("/api/requests/rental/{}", id))
        .await;
    assert_eq!(status, 404);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_request_validation_and_unknown_ids() {
    let fixture = TestFixture::new().await;

    let (status, body) = fixture
        .post_json(
            "/api/requests/training",
            json!({
                "applicantName": "Grace Njeri",
                "applicantEmail": "not-an-email",
                "requestedItem": "Introduction to Data Science"
            }),
        )
        .await;
    assert_eq!(status, 400);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(body["revisionId"], 0);

    let (status, body) = fixture
        .put_json(
            "/api/requests/training/does-not-exist/status",
            json!({ "status": "Approved" }),
        )
        .await;
    assert_eq!(status, 404);
    assert_eq!(body["error"]["code"], "NOT_FOUND");

    let (_, body) = fixture.get_json("/api/datastore/revision").await;
    assert_eq!(body["data"]["revisionId"], 0);
}

#[tokio::test]
async fn test_malformed_input_uses_error_envelope() {
    let fixture = TestFixture::new().await;

    // Unknown request kind in the path
    let (status, body) = fixture.get_json("/api/requests/catering").await;
    assert_eq!(status, 400);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
    assert_eq!(body["revisionId"], 0);

    // Well-formed JSON with a status that does not exist
    let (_, body) = fixture.get_json("/api/requests/rental?status=Pending").await;
    let id = body["data"][0]["id"].as_str().unwrap().to_string();
    let (status, body) = fixture
        .put_json(
            &format!("/api/requests/rental/{}/status", id),
            json!({ "status": "Archived" }),
        )
        .await;
    assert_eq!(status, 400);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    // Body that is not JSON at all
    let resp = fixture
        .client
        .post(fixture.url("/api/facilities"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "BAD_REQUEST");

    // Nothing above reached the store
    let (_, body) = fixture.get_json("/api/datastore/revision").await;
    assert_eq!(body["data"]["revisionId"], 0);
}

#[tokio::test]
async fn test_update_without_changes_is_not_a_mutation() {
    let fixture = TestFixture::new().await;

    // `status` is not part of a training patch and is ignored
    let (status, body) = fixture
        .put_json("/api/trainings/T001", json!({ "status": "Inactive" }))
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["status"], "Active");
    assert_eq!(body["data"]["version"], 1);
    assert_eq!(body["revisionId"], 0);

    let (status, body) = fixture
        .put_json(
            "/api/trainings/T001",
            json!({ "capacity": 40, "expectedVersion": 1 }),
        )
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["version"], 1);
    assert_eq!(body["revisionId"], 0);

    let (_, body) = fixture
        .put_json("/api/trainings/T001", json!({ "capacity": 45 }))
        .await;
    assert_eq!(body["data"]["version"], 2);
    assert_eq!(body["revisionId"], 1);
}

#[tokio::test]
async fn test_request_filters() {
    let fixture = TestFixture::new().await;

    let (status, body) = fixture.get_json("/api/requests/training?status=Pending").await;
    assert_eq!(status, 200);
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["applicantName"], "Achieng Odhiambo");

    let (_, body) = fixture.get_json("/api/requests/training?status=all").await;
    assert_eq!(body["data"].as_array().unwrap().len(), 3);

    // Case-insensitive across name, email and item
    let (_, body) = fixture.get_json("/api/requests/rental?q=LAB").await;
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["requestedItem"], "Computer Lab 2");

    let (_, body) = fixture
        .get_json("/api/requests/training?q=uni.edu&status=Approved")
        .await;
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["applicantName"], "Tomás Rivera");
}

#[tokio::test]
async fn test_training_filters_and_availability() {
    let fixture = TestFixture::new().await;

    let (status, body) = fixture.get_json("/api/trainings").await;
    assert_eq!(status, 200);
    assert_eq!(ids(&body), vec!["T001", "T002", "T003"]);
    assert_eq!(body["data"][0]["availability"], "Available");
    assert_eq!(body["data"][1]["availability"], "Limited");
    assert_eq!(body["data"][2]["availability"], "Full");

    let (_, body) = fixture.get_json("/api/trainings?availability=Limited").await;
    assert_eq!(ids(&body), vec!["T002"]);

    let (_, body) = fixture.get_json("/api/trainings?status=Inactive").await;
    assert_eq!(ids(&body), vec!["T003"]);

    let (_, body) = fixture
        .get_json("/api/trainings?q=data&category=Technology")
        .await;
    assert_eq!(ids(&body), vec!["T001"]);

    let (_, body) = fixture.get_json("/api/trainings?q=zzz").await;
    assert!(body["data"].as_array().unwrap().is_empty());

    let (status, body) = fixture.get_json("/api/trainings?colour=red").await;
    assert_eq!(status, 400);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_resource_toggle_is_idempotent() {
    let fixture = TestFixture::new().await;

    let (status, body) = fixture
        .put_json("/api/facilities/F001/status", json!({ "status": "Inactive" }))
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["status"], "Inactive");
    assert_eq!(body["data"]["version"], 2);
    assert_eq!(body["revisionId"], 1);

    // Same status again changes nothing
    let (status, body) = fixture
        .put_json("/api/facilities/F001/status", json!({ "status": "Inactive" }))
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["version"], 2);
    assert_eq!(body["revisionId"], 1);

    // And back
    let (_, body) = fixture
        .put_json("/api/facilities/F001/status", json!({ "status": "Active" }))
        .await;
    assert_eq!(body["data"]["status"], "Active");
    assert_eq!(body["revisionId"], 2);

    let (status, _) = fixture
        .put_json("/api/campuses/C999/status", json!({ "status": "Inactive" }))
        .await;
    assert_eq!(status, 404);
}

#[tokio::test]
async fn test_facility_crud_and_version_conflict() {
    let fixture = TestFixture::new().await;

    let (status, body) = fixture
        .post_json(
            "/api/facilities",
            json!({
                "name": "Innovation Hub",
                "facilityType": "Workshop",
                "location": "South Campus",
                "capacity": 60
            }),
        )
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["id"], "F004");
    assert_eq!(body["data"]["status"], "Active");
    assert_eq!(body["data"]["version"], 1);

    let (status, body) = fixture
        .put_json(
            "/api/facilities/F004",
            json!({ "capacity": 80, "expectedVersion": 1 }),
        )
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["capacity"], 80);
    assert_eq!(body["data"]["name"], "Innovation Hub");
    assert_eq!(body["data"]["version"], 2);

    let (status, body) = fixture
        .put_json(
            "/api/facilities/F004",
            json!({ "capacity": 90, "expectedVersion": 1 }),
        )
        .await;
    assert_eq!(status, 409);
    assert_eq!(body["error"]["code"], "VERSION_MISMATCH");
    assert_eq!(body["error"]["details"]["currentVersion"], 2);

    let (status, body) = fixture
        .post_json(
            "/api/facilities",
            json!({
                "name": "Hub",
                "facilityType": "Workshop",
                "location": "South Campus",
                "capacity": 0
            }),
        )
        .await;
    assert_eq!(status, 400);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    let resp = fixture
        .client
        .delete(fixture.url("/api/facilities/F004"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let (status, _) = fixture.get_json("/api/facilities/F004").await;
    assert_eq!(status, 404);

    // Deleted ids are not handed out again
    let (_, body) = fixture
        .post_json(
            "/api/facilities",
            json!({
                "name": "Innovation Hub",
                "facilityType": "Workshop",
                "location": "South Campus",
                "capacity": 60
            }),
        )
        .await;
    assert_eq!(body["data"]["id"], "F005");
}

#[tokio::test]
async fn test_csv_export() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .get(fixture.url("/api/facilities/export?status=Active&columns=id,name,location"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert!(resp.headers()["content-type"]
        .to_str()
        .unwrap()
        .starts_with("text/csv"));
    assert!(resp.headers()["content-disposition"]
        .to_str()
        .unwrap()
        .contains("facilities.csv"));
    assert_eq!(
        resp.text().await.unwrap(),
        "\"id\",\"name\",\"location\"\n\
         \"F001\",\"Main Auditorium\",\"Central Campus, Block A\"\n\
         \"F002\",\"Computer Lab 2\",\"Engineering Building, Level 2\"\n"
    );

    // An empty match still yields the header row
    let resp = fixture
        .client
        .get(fixture.url("/api/requests/rental/export?q=nobody&columns=id,status"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert!(resp.headers()["content-disposition"]
        .to_str()
        .unwrap()
        .contains("rental-requests.csv"));
    assert_eq!(resp.text().await.unwrap(), "\"id\",\"status\"\n");

    let resp = fixture
        .client
        .get(fixture.url("/api/users/export?columns=id,password"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn test_stats_follow_mutations() {
    let fixture = TestFixture::new().await;

    let (status, body) = fixture.get_json("/api/stats").await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["trainingRequests"]["pending"], 1);
    assert_eq!(body["data"]["facilities"]["active"], 2);
    assert_eq!(body["data"]["campusUsers"], 1890);
    assert_eq!(body["data"]["trainings"]["availability"]["Full"], 1);

    let (_, body) = fixture.get_json("/api/requests/training?status=Pending").await;
    let id = body["data"][0]["id"].as_str().unwrap().to_string();
    fixture
        .put_json(
            &format!("/api/requests/training/{}/status", id),
            json!({ "status": "Approved" }),
        )
        .await;

    let (_, body) = fixture.get_json("/api/stats").await;
    assert_eq!(body["data"]["trainingRequests"]["pending"], 0);
    assert_eq!(body["data"]["trainingRequests"]["approved"], 2);
    assert_eq!(body["revisionId"], 1);
}

#[tokio::test]
async fn test_router_without_listener() {
    let temp_dir = TempDir::new().unwrap();
    let app = create_router(seeded_state(&temp_dir).await);

    let resp = app
        .oneshot(
            Request::builder()
                .uri("/api/users?role=CampusAdmin")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(ids(&body), vec!["U002"]);
}
