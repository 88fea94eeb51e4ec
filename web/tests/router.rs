//! End-to-end tests: a small router wired the way a service would wire it.

#![allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect

use apicore::{ResponseError, ServiceError};
use apicore_web::{
    api_key_layer, request_context_layer, respond, ApiResponse, ApiResult, AppError,
    RequestContext, ServiceSettings, ValidatedJson, ValidatedQuery,
};
use axum::{
    extract::Path,
    http::{HeaderName, HeaderValue, StatusCode},
    response::Response,
    routing::{get, post},
    Router,
};
use axum_test::TestServer;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
struct Register {
    #[validate(length(min = 8))]
    user_name: String,
    #[validate(email)]
    email_address: String,
}

#[derive(Debug, Serialize)]
struct Account {
    user_name: String,
    request_id: String,
}

#[derive(Debug, Deserialize, Validate)]
struct Statement {
    #[validate(range(min = 1, max = 50))]
    limit: u32,
    from: NaiveDate,
}

async fn register(
    context: RequestContext,
    ValidatedJson(request): ValidatedJson<Register>,
) -> ApiResult<Account> {
    Ok(ApiResponse(Account {
        user_name: request.user_name,
        request_id: context.request_id().to_string(),
    }))
}

async fn find_account(Path(id): Path<u64>) -> ApiResult<Value> {
    if id == 1 {
        return Ok(ApiResponse(json!({ "id": 1 })));
    }
    Err(AppError::not_found("Account", id))
}

async fn statement(ValidatedQuery(query): ValidatedQuery<Statement>) -> ApiResult<Value> {
    Ok(ApiResponse(json!({ "limit": query.limit, "from": query.from })))
}

async fn close_account() -> Response {
    let result: Result<Value, ServiceError> =
        Err(ResponseError::not_found("account already closed").into());
    respond(result, StatusCode::BAD_REQUEST)
}

async fn health() -> ApiResult<&'static str> {
    Ok(ApiResponse("ok"))
}

fn server() -> TestServer {
    let settings = ServiceSettings::default();
    let app = Router::new()
        .route(&settings.prefixed("/accounts"), post(register))
        .route(&settings.prefixed("/accounts/:id"), get(find_account))
        .route(&settings.prefixed("/accounts/:id/close"), post(close_account))
        .route(&settings.prefixed("/statements"), get(statement))
        .route(&settings.prefixed("/health"), get(health))
        .layer(api_key_layer())
        .layer(request_context_layer());

    TestServer::new(app).expect("Should build test server")
}

fn api_key() -> (HeaderName, HeaderValue) {
    (
        HeaderName::from_static("api-key"),
        HeaderValue::from_static("test-key"),
    )
}

#[tokio::test]
async fn test_register_success() {
    let (name, value) = api_key();
    let response = server()
        .post("/api/accounts")
        .add_header(name, value)
        .add_header(
            HeaderName::from_static("x-request-id"),
            HeaderValue::from_static("req-42"),
        )
        .json(&json!({ "user_name": "longenough", "email_address": "a@example.com" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.header("x-request-id"), "req-42");
    assert_eq!(
        response.json::<Value>(),
        json!({ "data": { "user_name": "longenough", "request_id": "req-42" } })
    );
}

#[tokio::test]
async fn test_register_validation_errors() {
    let (name, value) = api_key();
    let response = server()
        .post("/api/accounts")
        .add_header(name, value)
        .json(&json!({ "user_name": "bob", "email_address": "nope" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body = response.json::<Value>();
    let error = &body["errors"][0];
    assert_eq!(error["message"], "Invalid parameters in request");
    assert_eq!(error["code"], "validation/property");

    let properties: Vec<&str> = error["properties"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["property"].as_str().unwrap())
        .collect();
    assert_eq!(properties, vec!["email_address", "user_name"]);
    assert_eq!(
        error["properties"][1]["constraints"][0],
        "validation [length min=8] failed with value: bob"
    );
    assert!(body.get("data").is_none());
}

#[tokio::test]
async fn test_register_malformed_body() {
    let (name, value) = api_key();
    let response = server()
        .post("/api/accounts")
        .add_header(name, value)
        .content_type("application/json")
        .bytes("{\"user_name\": ".into())
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>()["errors"][0]["code"],
        "validation/incorrect-format"
    );
}

#[tokio::test]
async fn test_register_wrong_types() {
    let (name, value) = api_key();
    let response = server()
        .post("/api/accounts")
        .add_header(name, value)
        .json(&json!({ "user_name": 7, "email_address": "a@example.com" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["errors"][0]["code"], "validation/decoding");
}

#[tokio::test]
async fn test_not_found() {
    let (name, value) = api_key();
    let response = server().get("/api/accounts/9").add_header(name, value).await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(
        response.json::<Value>(),
        json!({
            "errors": [{
                "message": "Account with id 9 not found",
                "code": "account/not-found",
                "properties": []
            }]
        })
    );
}

#[tokio::test]
async fn test_not_found_code_forces_404() {
    let (name, value) = api_key();
    let response = server()
        .post("/api/accounts/1/close")
        .add_header(name, value)
        .await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_query_validation() {
    let (name, value) = api_key();
    let response = server()
        .get("/api/statements?limit=10&from=2024-01-31")
        .add_header(name.clone(), value.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(
        response.json::<Value>(),
        json!({ "data": { "limit": 10, "from": "2024-01-31" } })
    );

    let response = server()
        .get("/api/statements?limit=10&from=31-01-2024")
        .add_header(name.clone(), value.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["errors"][0]["code"], "validation/decoding");

    let response = server()
        .get("/api/statements?limit=0&from=2024-01-31")
        .add_header(name, value)
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>()["errors"][0]["properties"][0]["property"],
        "limit"
    );
}

#[tokio::test]
async fn test_api_key_guard() {
    let response = server().get("/api/accounts/1").await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.json::<Value>(),
        json!({
            "errors": [{
                "message": "No api-key found",
                "code": "service/internal",
                "properties": []
            }]
        })
    );
    assert!(!response.header("x-request-id").is_empty());

    let response = server().get("/api/health").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>(), json!({ "data": "ok" }));
}
