//! Data provider for epilogue-style REST APIs.
//!
//! # Overview
//! Translates a fixed set of data-layer operations (`GET_LIST`, `GET_ONE`,
//! `GET_MANY`, `GET_MANY_REFERENCE`, `CREATE`, `UPDATE`, `DELETE`) into
//! HTTP requests, and HTTP responses back into a normalized `RestResult`.
//! List totals are read from the `Content-Range` header.
//!
//! # Design
//! - `map_request` and `map_response` are pure; only the injected
//!   `Transport` does I/O.
//! - `DataProvider` is stateless apart from the api root and the shared
//!   transport, so concurrent dispatches never interfere.
//! - `GET_MANY` becomes one record fetch per id, joined in input order.
//!
//! ```no_run
//! # async fn run() -> epilogue_client::AdapterResult<()> {
//! use epilogue_client::{DataProvider, RecordId, RestRequest};
//!
//! let provider = DataProvider::with_default_transport("http://my.api.url");
//! let post = provider
//!     .dispatch("posts", RestRequest::GetOne { id: RecordId::Int(123) })
//!     .await?;
//! println!("{}", post.data);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod http;
pub mod provider;
pub mod query;
pub mod request;
pub mod response;
pub mod transport;
pub mod types;

pub use error::{AdapterError, AdapterResult, TransportError, CONTENT_RANGE};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use provider::DataProvider;
pub use request::map_request;
pub use response::map_response;
pub use transport::Transport;
#[cfg(feature = "reqwest")]
pub use transport::ReqwestTransport;
pub use types::{
    ListParams, OperationKind, Pagination, Record, RecordId, ReferenceParams, RestRequest,
    RestResult, Sort, SortOrder,
};
