//! Request construction: endpoints, payloads and the default adapter.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Display;
use std::sync::Arc;
use url::Url;

use super::operation::{NetworkOperation, RequestMethod};
use crate::error::{Result, StoreError};
use crate::record::StoreRecord;

/// A single record or a sequence of records, on the way out or back in.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Payload<T> {
  One(T),
  Many(Vec<T>),
}

impl<T> Payload<T> {
  /// Shape name used in error messages.
  pub fn shape(&self) -> &'static str {
    match self {
      Payload::One(_) => "a single record",
      Payload::Many(_) => "a record list",
    }
  }
}

/// Everything needed to issue one outbound request. Built fresh per call.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestProperties {
  pub url: Url,
  pub method: RequestMethod,
  pub headers: BTreeMap<String, String>,
}

/// Resource collection a network manager talks to. Fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
  /// Singular resource name (e.g., "user")
  pub name: String,
  /// Base address (e.g., "https://api.example.com")
  pub host: String,
}

impl Endpoint {
  pub fn new(name: impl Into<String>, host: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      host: host.into(),
    }
  }

  /// `{host}/{name}/{id}`
  pub fn item_url(&self, id: &impl Display) -> Result<Url> {
    parse_url(format!("{}/{}/{}", self.host, self.name, id))
  }

  /// `{host}/{name}s`. Plural is always the name plus "s", irregular or not.
  pub fn collection_url(&self) -> Result<Url> {
    parse_url(format!("{}/{}s", self.host, self.name))
  }
}

fn parse_url(url: String) -> Result<Url> {
  Url::parse(&url).map_err(|source| StoreError::InvalidUrl { url, source })
}

/// Maps a payload and operation to the concrete request to send.
pub type RequestAdapter<T> =
  Arc<dyn Fn(&Endpoint, &Payload<T>, NetworkOperation) -> Result<RequestProperties> + Send + Sync>;

/// Default adapter: item URL for single-record find/update, collection URL
/// otherwise, method from the fixed table, no headers.
pub fn default_adapter<T: StoreRecord>(
  endpoint: &Endpoint,
  payload: &Payload<T>,
  operation: NetworkOperation,
) -> Result<RequestProperties> {
  let url = match payload {
    Payload::One(record) if operation.targets_item() => endpoint.item_url(record.id())?,
    _ => endpoint.collection_url()?,
  };

  Ok(RequestProperties {
    url,
    method: operation.method(),
    headers: BTreeMap::new(),
  })
}

/// Adapter that adds a fixed set of headers on top of [`default_adapter`].
pub fn header_adapter<T: StoreRecord>(headers: BTreeMap<String, String>) -> RequestAdapter<T> {
  Arc::new(move |endpoint: &Endpoint, payload: &Payload<T>, operation| {
    let mut properties = default_adapter(endpoint, payload, operation)?;
    properties
      .headers
      .extend(headers.iter().map(|(k, v)| (k.clone(), v.clone())));
    Ok(properties)
  })
}
