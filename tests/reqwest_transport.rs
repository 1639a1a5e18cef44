//! Round-trip tests through the production reqwest transport.
//!
//! A local wiremock server stands in for the API gateway, so these cover
//! the real HTTP path: header serialization, body transfer, and content
//! type interpretation.

use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use spendtrack_client::{ApiClient, ApiConfig, CredentialStore, MemoryStore, ReqwestTransport, TokenStore};

const USER_ID: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

fn client_for(server: &MockServer) -> (ApiClient, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let transport = Arc::new(ReqwestTransport::new().unwrap());
    let client = ApiClient::new(ApiConfig::new(server.uri()), transport, store.clone());
    (client, store)
}

fn seed_pair(store: &Arc<MemoryStore>, access: &str, refresh: &str) {
    TokenStore::new(store.clone() as Arc<dyn CredentialStore>)
        .store_pair(access, refresh)
        .unwrap();
}

#[tokio::test]
async fn login_round_trip_stores_tokens() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/login"))
        .and(header("x-requested-with", "XMLHttpRequest"))
        .and(body_json(json!({"username": "user", "password": "pw"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "accessToken": "A1",
            "token": "R1",
            "userId": USER_ID,
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (client, store) = client_for(&server);
    let outcome = client.login("user", "pw").await;

    assert_eq!(outcome.status, 200);
    assert_eq!(outcome.data.unwrap().user_id.as_deref(), Some(USER_ID));

    let tokens = TokenStore::new(store as Arc<dyn CredentialStore>);
    assert_eq!(tokens.access_token().as_deref(), Some("A1"));
    assert_eq!(tokens.refresh_token().as_deref(), Some("R1"));
}

#[tokio::test]
async fn session_check_reads_plain_text_identifier() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/auth/v1/ping"))
        .and(header("authorization", "Bearer A1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(USER_ID))
        .mount(&server)
        .await;

    let (client, store) = client_for(&server);
    seed_pair(&store, "A1", "R1");

    assert!(client.is_logged_in().await);
}

#[tokio::test]
async fn expired_session_is_refreshed_over_the_wire() {
    let server = MockServer::start().await;

    // First list attempt is rejected; the mock expires after one use so
    // the retry reaches the success mock below.
    Mock::given(method("GET"))
        .and(path("/expense/v1/getExpense"))
        .and(header("authorization", "Bearer stale"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "expired"})))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/auth/v1/refreshToken"))
        .and(body_json(json!({"token": "R1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "accessToken": "fresh",
            "token": "R2",
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/expense/v1/getExpense"))
        .and(header("authorization", "Bearer fresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"amount": "12.50", "merchant": "Cafe", "currency": "EUR"},
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let (client, store) = client_for(&server);
    seed_pair(&store, "stale", "R1");

    let outcome = client.get_expenses().await;

    assert_eq!(outcome.status, 200);
    let expenses = outcome.data.unwrap();
    assert_eq!(expenses.len(), 1);
    assert_eq!(expenses[0].amount, 12.5);
    assert_eq!(expenses[0].merchant, "Cafe");

    let tokens = TokenStore::new(store as Arc<dyn CredentialStore>);
    assert_eq!(tokens.access_token().as_deref(), Some("fresh"));
    assert_eq!(tokens.refresh_token().as_deref(), Some("R2"));
}

#[tokio::test]
async fn unreachable_server_yields_status_zero() {
    // A server that is immediately shut down leaves a refused port behind
    let server = MockServer::start().await;
    let uri = server.uri();
    drop(server);

    let store = Arc::new(MemoryStore::new());
    let transport = Arc::new(ReqwestTransport::new().unwrap());
    let client = ApiClient::new(ApiConfig::new(uri), transport, store);

    let outcome = client.get_expenses().await;
    assert_eq!(outcome.status, 0);
    assert!(outcome.error.is_some());
}
