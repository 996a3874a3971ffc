//! Request/response body hooks and their passthrough defaults.

use serde_json::Value;
use std::sync::Arc;

use super::request::Payload;
use crate::error::Result;
use crate::record::StoreRecord;

/// Turns outgoing records into the JSON body sent on the wire.
pub type RequestSerializer<T> = Arc<dyn Fn(&Payload<T>) -> Result<Value> + Send + Sync>;

/// Turns a decoded JSON response body into records.
pub type ResponseSerializer<T> = Arc<dyn Fn(Value) -> Result<Payload<T>> + Send + Sync>;

/// Sends the record (or records) as-is.
pub fn default_request_serializer<T: StoreRecord>(payload: &Payload<T>) -> Result<Value> {
  Ok(serde_json::to_value(payload)?)
}

/// Reads the body directly as a record, or a record list when it is an array.
pub fn default_response_serializer<T: StoreRecord>(body: Value) -> Result<Payload<T>> {
  match body {
    Value::Array(items) => {
      let records = items
        .into_iter()
        .map(serde_json::from_value)
        .collect::<Result<Vec<T>, _>>()?;
      Ok(Payload::Many(records))
    }
    other => Ok(Payload::One(serde_json::from_value(other)?)),
  }
}
