//! Network capability: turns CRUD operations on records into HTTP requests
//! against one resource collection and validates what comes back.

mod manager;
mod operation;
mod request;
mod serializer;

pub use manager::{HttpNetworkManager, NetworkManager, Options};
pub use operation::{NetworkOperation, RequestMethod};
pub use request::{
  default_adapter, header_adapter, Endpoint, Payload, RequestAdapter, RequestProperties,
};
pub use serializer::{
  default_request_serializer, default_response_serializer, RequestSerializer, ResponseSerializer,
};
