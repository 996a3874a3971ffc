//! HTTP network manager: request building, sending and response validation.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use super::operation::NetworkOperation;
use super::request::{default_adapter, Endpoint, Payload, RequestAdapter};
use super::serializer::{
  default_request_serializer, default_response_serializer, RequestSerializer, ResponseSerializer,
};
use crate::error::{Result, StoreError};
use crate::record::StoreRecord;

/// Status codes a successful response may carry.
const ACCEPTED_STATUSES: [u16; 2] = [200, 201];

/// The only content type accepted on responses (compared exactly).
const JSON_CONTENT_TYPE: &str = "application/json";

/// Network capability of a record store.
#[async_trait]
pub trait NetworkManager<T: StoreRecord>: Send + Sync {
  /// Fetch the record with the same identity as `record`.
  async fn find(&self, record: &T) -> Result<T>;

  /// Fetch the whole collection `record` belongs to.
  async fn find_all(&self, record: &T) -> Result<Vec<T>>;

  async fn create(&self, record: &T) -> Result<T>;

  async fn create_all(&self, records: &[T]) -> Result<Vec<T>>;

  async fn update(&self, record: &T) -> Result<T>;

  async fn update_all(&self, records: &[T]) -> Result<Vec<T>>;

  async fn delete(&self, record: &T) -> Result<T>;

  async fn delete_all(&self, records: &[T]) -> Result<Vec<T>>;
}

/// Connection options, fixed for the lifetime of a manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
  /// Base address for every request (e.g., "https://api.example.com")
  pub host: String,
  /// Per-request timeout in seconds. `None` waits indefinitely.
  pub timeout_secs: Option<u64>,
}

impl Options {
  pub fn new(host: impl Into<String>) -> Self {
    Self {
      host: host.into(),
      timeout_secs: None,
    }
  }

  pub fn with_timeout_secs(mut self, secs: u64) -> Self {
    self.timeout_secs = Some(secs);
    self
  }
}

/// Network manager for one resource collection over HTTP.
///
/// Every operation runs the same pipeline: adapt, serialize, send, check the
/// status and content type, decode, then check the record/list shape against
/// the operation.
pub struct HttpNetworkManager<T: StoreRecord> {
  client: Client,
  endpoint: Endpoint,
  adapter: RequestAdapter<T>,
  request_serializer: RequestSerializer<T>,
  response_serializer: ResponseSerializer<T>,
}

impl<T: StoreRecord> HttpNetworkManager<T> {
  /// Create a manager for resource `name` with default adapter and serializers.
  pub fn new(name: impl Into<String>, options: &Options) -> Result<Self> {
    let mut builder = Client::builder();
    if let Some(secs) = options.timeout_secs {
      builder = builder.timeout(Duration::from_secs(secs));
    }
    let client = builder.build()?;

    Ok(Self::with_client(name, options, client))
  }

  /// Create a manager that sends through an existing HTTP client.
  pub fn with_client(name: impl Into<String>, options: &Options, client: Client) -> Self {
    Self {
      client,
      endpoint: Endpoint::new(name, options.host.clone()),
      adapter: Arc::new(default_adapter::<T>),
      request_serializer: Arc::new(default_request_serializer::<T>),
      response_serializer: Arc::new(default_response_serializer::<T>),
    }
  }

  pub fn with_adapter(mut self, adapter: RequestAdapter<T>) -> Self {
    self.adapter = adapter;
    self
  }

  pub fn with_request_serializer(mut self, serializer: RequestSerializer<T>) -> Self {
    self.request_serializer = serializer;
    self
  }

  pub fn with_response_serializer(mut self, serializer: ResponseSerializer<T>) -> Self {
    self.response_serializer = serializer;
    self
  }

  pub fn endpoint(&self) -> &Endpoint {
    &self.endpoint
  }

  async fn one(&self, payload: Payload<T>, operation: NetworkOperation) -> Result<T> {
    match self.execute(payload, operation).await? {
      Payload::One(record) => Ok(record),
      many => Err(shape_mismatch(operation, &many)),
    }
  }

  async fn many(&self, payload: Payload<T>, operation: NetworkOperation) -> Result<Vec<T>> {
    match self.execute(payload, operation).await? {
      Payload::Many(records) => Ok(records),
      one => Err(shape_mismatch(operation, &one)),
    }
  }

  async fn execute(&self, payload: Payload<T>, operation: NetworkOperation) -> Result<Payload<T>> {
    let props = (self.adapter)(&self.endpoint, &payload, operation)?;
    let body = (self.request_serializer)(&payload)?;

    debug!(%operation, method = %props.method, url = %props.url, "Sending request");

    let mut request = self.client.request(props.method.into(), props.url.clone());
    for (name, value) in &props.headers {
      request = request.header(name.as_str(), value.as_str());
    }
    // json() keeps a content type the adapter already set
    let response = request.json(&body).send().await?;

    let status = response.status();
    if !status.is_success() || !ACCEPTED_STATUSES.contains(&status.as_u16()) {
      warn!(%operation, url = %props.url, %status, "Rejected response status");
      return Err(StoreError::UnexpectedStatus(status));
    }

    let content_type = response
      .headers()
      .get(CONTENT_TYPE)
      .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned());
    if content_type.as_deref() != Some(JSON_CONTENT_TYPE) {
      warn!(%operation, url = %props.url, ?content_type, "Rejected response content type");
      return Err(StoreError::UnexpectedContentType(content_type));
    }

    let bytes = response.bytes().await?;
    let value: Value = serde_json::from_slice(&bytes)?;
    let result = (self.response_serializer)(value)?;

    debug!(%operation, %status, shape = result.shape(), "Accepted response");

    Ok(result)
  }
}

fn shape_mismatch<T>(operation: NetworkOperation, actual: &Payload<T>) -> StoreError {
  warn!(%operation, actual = actual.shape(), "Response shape does not match operation");
  StoreError::ShapeMismatch {
    operation,
    expected: if operation.expects_many() {
      "a record list"
    } else {
      "a single record"
    },
    actual: actual.shape(),
  }
}

#[async_trait]
impl<T: StoreRecord> NetworkManager<T> for HttpNetworkManager<T> {
  async fn find(&self, record: &T) -> Result<T> {
    self
      .one(Payload::One(record.clone()), NetworkOperation::Find)
      .await
  }

  async fn find_all(&self, record: &T) -> Result<Vec<T>> {
    self
      .many(Payload::One(record.clone()), NetworkOperation::FindAll)
      .await
  }

  async fn create(&self, record: &T) -> Result<T> {
    self
      .one(Payload::One(record.clone()), NetworkOperation::Create)
      .await
  }

  async fn create_all(&self, records: &[T]) -> Result<Vec<T>> {
    self
      .many(Payload::Many(records.to_vec()), NetworkOperation::CreateAll)
      .await
  }

  async fn update(&self, record: &T) -> Result<T> {
    self
      .one(Payload::One(record.clone()), NetworkOperation::Update)
      .await
  }

  async fn update_all(&self, records: &[T]) -> Result<Vec<T>> {
    self
      .many(Payload::Many(records.to_vec()), NetworkOperation::UpdateAll)
      .await
  }

  async fn delete(&self, record: &T) -> Result<T> {
    self
      .one(Payload::One(record.clone()), NetworkOperation::Delete)
      .await
  }

  async fn delete_all(&self, records: &[T]) -> Result<Vec<T>> {
    self
      .many(Payload::Many(records.to_vec()), NetworkOperation::DeleteAll)
      .await
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::network::request::header_adapter;
  use crate::record::JsonRecord;
  use mockito::Matcher;
  use serde_json::json;
  use std::collections::BTreeMap;

  fn record(value: Value) -> JsonRecord {
    serde_json::from_value(value).unwrap()
  }

  fn manager(server: &mockito::Server) -> HttpNetworkManager<JsonRecord> {
    HttpNetworkManager::new("user", &Options::new(server.url())).unwrap()
  }

  #[tokio::test]
  async fn test_find_returns_single_record() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
      .mock("GET", "/user/1")
      .with_status(200)
      .with_header("content-type", "application/json")
      .with_body(r#"{"id": 1, "name": "ada"}"#)
      .create_async()
      .await;

    let found = manager(&server)
      .find(&JsonRecord::with_id(1))
      .await
      .unwrap();

    assert_eq!(found, record(json!({"id": 1, "name": "ada"})));
    mock.assert_async().await;
  }

  #[tokio::test]
  async fn test_array_body_fails_find_but_satisfies_find_all() {
    let mut server = mockito::Server::new_async().await;
    server
      .mock("GET", "/user/1")
      .with_status(200)
      .with_header("content-type", "application/json")
      .with_body(r#"[{"id": 1}, {"id": 2}]"#)
      .create_async()
      .await;
    server
      .mock("GET", "/users")
      .with_status(200)
      .with_header("content-type", "application/json")
      .with_body(r#"[{"id": 1}, {"id": 2}]"#)
      .create_async()
      .await;

    let manager = manager(&server);

    let err = manager.find(&JsonRecord::with_id(1)).await.unwrap_err();
    assert!(matches!(
      err,
      StoreError::ShapeMismatch {
        operation: NetworkOperation::Find,
        ..
      }
    ));

    let all = manager.find_all(&JsonRecord::with_id(1)).await.unwrap();
    assert_eq!(all, vec![JsonRecord::with_id(1), JsonRecord::with_id(2)]);
  }

  #[tokio::test]
  async fn test_find_all_rejects_single_object() {
    let mut server = mockito::Server::new_async().await;
    server
      .mock("GET", "/users")
      .with_status(200)
      .with_header("content-type", "application/json")
      .with_body(r#"{"id": 1}"#)
      .create_async()
      .await;

    let err = manager(&server)
      .find_all(&JsonRecord::with_id(1))
      .await
      .unwrap_err();
    assert!(matches!(err, StoreError::ShapeMismatch { .. }));
  }

  #[tokio::test]
  async fn test_text_plain_fails_regardless_of_status() {
    let mut server = mockito::Server::new_async().await;
    server
      .mock("GET", "/user/1")
      .with_status(200)
      .with_header("content-type", "text/plain")
      .with_body(r#"{"id": 1}"#)
      .create_async()
      .await;
    server
      .mock("GET", "/users")
      .with_status(201)
      .with_header("content-type", "text/plain")
      .with_body(r#"[{"id": 1}]"#)
      .create_async()
      .await;

    let manager = manager(&server);

    let err = manager.find(&JsonRecord::with_id(1)).await.unwrap_err();
    assert!(
      matches!(err, StoreError::UnexpectedContentType(Some(ref ct)) if ct == "text/plain")
    );

    let err = manager.find_all(&JsonRecord::with_id(1)).await.unwrap_err();
    assert!(matches!(err, StoreError::UnexpectedContentType(_)));
  }

  #[tokio::test]
  async fn test_content_type_must_match_exactly() {
    let mut server = mockito::Server::new_async().await;
    server
      .mock("GET", "/user/1")
      .with_status(200)
      .with_header("content-type", "application/json; charset=utf-8")
      .with_body(r#"{"id": 1}"#)
      .create_async()
      .await;

    let err = manager(&server)
      .find(&JsonRecord::with_id(1))
      .await
      .unwrap_err();
    assert!(matches!(err, StoreError::UnexpectedContentType(_)));
  }

  #[tokio::test]
  async fn test_statuses_outside_accepted_set_fail() {
    let mut server = mockito::Server::new_async().await;
    server
      .mock("GET", "/user/1")
      .with_status(404)
      .with_header("content-type", "application/json")
      .with_body(r#"{"error": "missing"}"#)
      .create_async()
      .await;
    server
      .mock("GET", "/user/2")
      .with_status(202)
      .with_header("content-type", "application/json")
      .with_body(r#"{"id": 2}"#)
      .create_async()
      .await;

    let manager = manager(&server);

    let err = manager.find(&JsonRecord::with_id(1)).await.unwrap_err();
    assert!(matches!(err, StoreError::UnexpectedStatus(s) if s.as_u16() == 404));

    // 2xx but not 200/201
    let err = manager.find(&JsonRecord::with_id(2)).await.unwrap_err();
    assert!(matches!(err, StoreError::UnexpectedStatus(s) if s.as_u16() == 202));
  }

  #[tokio::test]
  async fn test_create_posts_record_to_collection() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
      .mock("POST", "/users")
      .match_body(Matcher::Json(json!({"id": 9, "name": "grace"})))
      .with_status(201)
      .with_header("content-type", "application/json")
      .with_body(r#"{"id": 9, "name": "grace"}"#)
      .create_async()
      .await;

    let new = record(json!({"id": 9, "name": "grace"}));
    let created = manager(&server).create(&new).await.unwrap();

    assert_eq!(created, new);
    mock.assert_async().await;
  }

  #[tokio::test]
  async fn test_update_patches_item_and_update_all_patches_collection() {
    let mut server = mockito::Server::new_async().await;
    let item = server
      .mock("PATCH", "/user/3")
      .match_body(Matcher::Json(json!({"id": 3, "name": "c"})))
      .with_status(200)
      .with_header("content-type", "application/json")
      .with_body(r#"{"id": 3, "name": "c"}"#)
      .create_async()
      .await;
    let collection = server
      .mock("PATCH", "/users")
      .match_body(Matcher::Json(json!([{"id": 3}, {"id": 4}])))
      .with_status(200)
      .with_header("content-type", "application/json")
      .with_body(r#"[{"id": 3}, {"id": 4}]"#)
      .create_async()
      .await;

    let manager = manager(&server);

    manager
      .update(&record(json!({"id": 3, "name": "c"})))
      .await
      .unwrap();
    let updated = manager
      .update_all(&[JsonRecord::with_id(3), JsonRecord::with_id(4)])
      .await
      .unwrap();

    assert_eq!(updated.len(), 2);
    item.assert_async().await;
    collection.assert_async().await;
  }

  #[tokio::test]
  async fn test_delete_targets_collection() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
      .mock("DELETE", "/users")
      .match_body(Matcher::Json(json!({"id": 5})))
      .with_status(200)
      .with_header("content-type", "application/json")
      .with_body(r#"{"id": 5}"#)
      .create_async()
      .await;

    let deleted = manager(&server)
      .delete(&JsonRecord::with_id(5))
      .await
      .unwrap();

    assert_eq!(deleted, JsonRecord::with_id(5));
    mock.assert_async().await;
  }

  #[tokio::test]
  async fn test_adapter_headers_are_sent() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
      .mock("GET", "/user/1")
      .match_header("authorization", "Bearer secret")
      .with_status(200)
      .with_header("content-type", "application/json")
      .with_body(r#"{"id": 1}"#)
      .create_async()
      .await;

    let mut headers = BTreeMap::new();
    headers.insert("Authorization".to_string(), "Bearer secret".to_string());
    let manager = manager(&server).with_adapter(header_adapter(headers));

    manager.find(&JsonRecord::with_id(1)).await.unwrap();
    mock.assert_async().await;
  }

  #[tokio::test]
  async fn test_custom_serializers_are_used() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
      .mock("POST", "/users")
      .match_body(Matcher::Json(json!({"data": {"id": 1}})))
      .with_status(201)
      .with_header("content-type", "application/json")
      .with_body(r#"{"data": {"id": 1}}"#)
      .create_async()
      .await;

    let manager = manager(&server)
      .with_request_serializer(Arc::new(|payload: &Payload<JsonRecord>| -> Result<Value> {
        Ok(json!({ "data": serde_json::to_value(payload)? }))
      }))
      .with_response_serializer(Arc::new(|mut body: Value| -> Result<Payload<JsonRecord>> {
        default_response_serializer(body["data"].take())
      }));

    let created = manager.create(&JsonRecord::with_id(1)).await.unwrap();
    assert_eq!(created, JsonRecord::with_id(1));
    mock.assert_async().await;
  }

  #[tokio::test]
  async fn test_unreachable_host_is_transport_error() {
    let manager: HttpNetworkManager<JsonRecord> =
      HttpNetworkManager::new("user", &Options::new("http://127.0.0.1:1").with_timeout_secs(5))
        .unwrap();

    let err = manager.find(&JsonRecord::with_id(1)).await.unwrap_err();
    assert!(matches!(err, StoreError::Transport(_)));
  }

  #[tokio::test]
  async fn test_timeout_aborts_silent_server() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    // Accept connections and hold them open without ever answering
    let server = tokio::spawn(async move {
      let mut held = Vec::new();
      while let Ok((socket, _)) = listener.accept().await {
        held.push(socket);
      }
    });

    let manager: HttpNetworkManager<JsonRecord> = HttpNetworkManager::new(
      "user",
      &Options::new(format!("http://{}", addr)).with_timeout_secs(1),
    )
    .unwrap();

    let started = std::time::Instant::now();
    let err = manager.find(&JsonRecord::with_id(1)).await.unwrap_err();

    assert!(matches!(err, StoreError::Transport(ref e) if e.is_timeout()));
    assert!(started.elapsed() < Duration::from_secs(10));
    server.abort();
  }
}
