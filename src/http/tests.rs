//! Tests for the Airtable HTTP client

use super::*;
use crate::config::AirtableConfig;
use crate::error::Error;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_partial_json, header, method, path, path_regex, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_config() -> AirtableConfig {
    AirtableConfig::new("patTEST123", "appTEST456", None).unwrap()
}

fn test_client(server: &MockServer) -> AirtableClient {
    let client_config = ClientConfig::builder()
        .api_url(server.uri())
        .no_rate_limit()
        .rate_limit_wait(Duration::from_millis(10))
        .build();
    AirtableClient::with_config(test_config(), client_config).unwrap()
}

#[test]
fn test_client_config_default() {
    let config = ClientConfig::default();
    assert_eq!(config.api_url, "https://api.airtable.com/v0");
    assert_eq!(config.timeout, Duration::from_secs(30));
    assert!(config.rate_limit.is_some());
}

#[test]
fn test_client_config_builder() {
    let config = ClientConfig::builder()
        .api_url("http://localhost:1234")
        .timeout(Duration::from_secs(5))
        .user_agent("test-agent/1.0")
        .no_rate_limit()
        .build();

    assert_eq!(config.api_url, "http://localhost:1234");
    assert_eq!(config.timeout, Duration::from_secs(5));
    assert_eq!(config.user_agent, "test-agent/1.0");
    assert!(config.rate_limit.is_none());
}

#[test]
fn test_client_rejects_invalid_api_url() {
    let client_config = ClientConfig::builder().api_url("not a url").build();
    let err = AirtableClient::with_config(test_config(), client_config).unwrap_err();
    assert!(matches!(err, Error::InvalidUrl(_)));
}

#[tokio::test]
async fn test_bearer_token_attached() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/appTEST456/Users"))
        .and(header("authorization", "Bearer patTEST123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "records": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let page = client
        .list_records("Users", &ListParams::new())
        .await
        .unwrap();
    assert!(page.records.is_empty());
}

#[tokio::test]
async fn test_list_records_query_params() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/appTEST456/Users"))
        .and(query_param("filterByFormula", "{name}='Alice'"))
        .and(query_param("maxRecords", "5"))
        .and(query_param("pageSize", "2"))
        .and(query_param("sort[0][field]", "name"))
        .and(query_param("sort[0][direction]", "desc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "records": [
                {"id": "rec1", "fields": {"name": "Alice"}},
                {"id": "rec2", "fields": {"name": "Albert"}}
            ],
            "offset": "next-page"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let params = ListParams::new()
        .filter("{name}='Alice'")
        .max_records(5)
        .page_size(2)
        .sort("name", SortDirection::Desc);
    let page = client.list_records("Users", &params).await.unwrap();

    assert_eq!(page.records.len(), 2);
    assert_eq!(page.offset.as_deref(), Some("next-page"));
}

#[tokio::test]
async fn test_table_names_with_spaces_are_encoded() {
    let server = MockServer::start().await;

    // the space lands percent-encoded on the wire
    Mock::given(method("GET"))
        .and(path_regex("^/appTEST456/My(%20| )Tasks$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "records": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    client
        .list_records("My Tasks", &ListParams::new())
        .await
        .unwrap();
}

#[tokio::test]
async fn test_api_error_carries_status_and_parsed_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/appTEST456/Users"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "error": {"type": "INVALID_REQUEST", "message": "Unknown field name: \"bogus\""}
        })))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let err = client
        .create_record("Users", &serde_json::Map::new())
        .await
        .unwrap_err();

    match err {
        Error::Api {
            status,
            message,
            body,
        } => {
            assert_eq!(status, 422);
            assert_eq!(message, "Unknown field name: \"bogus\"");
            assert!(body.contains("INVALID_REQUEST"));
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_api_error_with_string_error_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/appTEST456/Users"))
        .respond_with(
            ResponseTemplate::new(403).set_body_json(json!({ "error": "NOT_AUTHORIZED" })),
        )
        .mount(&server)
        .await;

    let client = test_client(&server);
    let err = client
        .list_records("Users", &ListParams::new())
        .await
        .unwrap_err();
    match err {
        Error::Api { status, message, .. } => {
            assert_eq!(status, 403);
            assert_eq!(message, "NOT_AUTHORIZED");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_get_record_maps_404() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/appTEST456/Users/recNOPE"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": {"type": "NOT_FOUND", "message": "Record not found"}
        })))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let err = client.get_record("Users", "recNOPE").await.unwrap_err();
    assert!(matches!(err, Error::RecordNotFound { .. }));
}

#[tokio::test]
async fn test_429_retries_exactly_once_then_succeeds() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/appTEST456/Users"))
        .respond_with(
            ResponseTemplate::new(429)
                .insert_header("retry-after", "0")
                .set_body_string("rate limited"),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/appTEST456/Users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "records": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let page = client
        .list_records("Users", &ListParams::new())
        .await
        .unwrap();
    assert!(page.records.is_empty());
}

#[tokio::test]
async fn test_429_twice_surfaces_rate_limited() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/appTEST456/Users"))
        .respond_with(
            ResponseTemplate::new(429)
                .insert_header("retry-after", "0")
                .set_body_string("rate limited"),
        )
        .expect(2)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let err = client
        .list_records("Users", &ListParams::new())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::RateLimited { .. }));
}

#[tokio::test]
async fn test_update_and_delete_record() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/appTEST456/Users/rec1"))
        .and(body_partial_json(json!({"fields": {"name": "New"}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "rec1",
            "fields": {"name": "New"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/appTEST456/Users/rec1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "rec1",
            "deleted": true
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);

    let mut fields = serde_json::Map::new();
    fields.insert("name".to_string(), json!("New"));
    let updated = client.update_record("Users", "rec1", &fields).await.unwrap();
    assert_eq!(updated.id, "rec1");

    client.delete_record("Users", "rec1").await.unwrap();
}

// ============================================================================
// Metadata endpoints
// ============================================================================

#[tokio::test]
async fn test_list_bases() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/meta/bases"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "bases": [
                {"id": "appONE", "name": "Product", "permissionLevel": "create"},
                {"id": "appTWO", "name": "CRM"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let bases = client.list_bases().await.unwrap();
    assert_eq!(bases.len(), 2);
    assert_eq!(bases[0].id, "appONE");
    assert_eq!(bases[0].permission_level.as_deref(), Some("create"));
    assert!(bases[1].permission_level.is_none());
}

#[tokio::test]
async fn test_get_base_schema() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/meta/bases/appTEST456/tables"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "tables": [{
                "id": "tbl1",
                "name": "Users",
                "primaryFieldId": "fld1",
                "fields": [
                    {"id": "fld1", "name": "name", "type": "singleLineText"},
                    {"id": "fld2", "name": "linked", "type": "multipleRecordLinks"}
                ]
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let tables = client.get_base_schema("appTEST456").await.unwrap();
    assert_eq!(tables.len(), 1);
    assert_eq!(tables[0].fields.len(), 2);
    // unmodeled column types survive as raw strings
    assert_eq!(tables[0].fields[1].field_type, "multipleRecordLinks");
}

#[tokio::test]
async fn test_create_base_with_workspace() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/meta/bases"))
        .and(body_partial_json(json!({
            "name": "New Base",
            "workspaceId": "wspABC"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "appNEW",
            "tables": [{"id": "tbl1", "name": "Main", "fields": []}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let spec = crate::base::TableSpec {
        name: "Main".to_string(),
        description: None,
        fields: vec![crate::base::FieldSpec {
            name: "name".to_string(),
            field_type: "singleLineText".to_string(),
            options: None,
        }],
    };
    let created = client
        .create_base("New Base", &[spec], Some("wspABC"))
        .await
        .unwrap();
    assert_eq!(created.id, "appNEW");
    assert_eq!(created.tables.len(), 1);
}
