//! Logical operations and the HTTP methods they map to.

use std::fmt;

/// Logical CRUD intent of a request, independent of the HTTP verb.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NetworkOperation {
  Find,
  FindAll,
  Delete,
  DeleteAll,
  Update,
  UpdateAll,
  Create,
  CreateAll,
}

impl NetworkOperation {
  pub const ALL: [NetworkOperation; 8] = [
    NetworkOperation::Find,
    NetworkOperation::FindAll,
    NetworkOperation::Delete,
    NetworkOperation::DeleteAll,
    NetworkOperation::Update,
    NetworkOperation::UpdateAll,
    NetworkOperation::Create,
    NetworkOperation::CreateAll,
  ];

  /// Default HTTP method for this operation.
  pub fn method(self) -> RequestMethod {
    match self {
      Self::Find | Self::FindAll => RequestMethod::Get,
      Self::Update | Self::UpdateAll => RequestMethod::Patch,
      Self::Delete | Self::DeleteAll => RequestMethod::Delete,
      Self::Create | Self::CreateAll => RequestMethod::Post,
    }
  }

  /// Whether a single record is addressed at its own `/{name}/{id}` endpoint.
  /// Only find and update are; delete and create always hit the collection.
  pub fn targets_item(self) -> bool {
    matches!(self, Self::Find | Self::Update)
  }

  /// Whether the response must hold a sequence of records.
  pub fn expects_many(self) -> bool {
    matches!(
      self,
      Self::FindAll | Self::DeleteAll | Self::UpdateAll | Self::CreateAll
    )
  }

  pub fn as_str(self) -> &'static str {
    match self {
      Self::Find => "find",
      Self::FindAll => "findAll",
      Self::Delete => "delete",
      Self::DeleteAll => "deleteAll",
      Self::Update => "update",
      Self::UpdateAll => "updateAll",
      Self::Create => "create",
      Self::CreateAll => "createAll",
    }
  }
}

impl fmt::Display for NetworkOperation {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// HTTP methods a request may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestMethod {
  Get,
  Post,
  Put,
  Patch,
  Delete,
}

impl RequestMethod {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Get => "GET",
      Self::Post => "POST",
      Self::Put => "PUT",
      Self::Patch => "PATCH",
      Self::Delete => "DELETE",
    }
  }
}

impl fmt::Display for RequestMethod {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl From<RequestMethod> for reqwest::Method {
  fn from(method: RequestMethod) -> Self {
    match method {
      RequestMethod::Get => reqwest::Method::GET,
      RequestMethod::Post => reqwest::Method::POST,
      RequestMethod::Put => reqwest::Method::PUT,
      RequestMethod::Patch => reqwest::Method::PATCH,
      RequestMethod::Delete => reqwest::Method::DELETE,
    }
  }
}
