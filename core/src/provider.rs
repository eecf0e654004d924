//! Stateless dispatcher from data-layer requests to HTTP round-trips.
//!
//! # Design
//! `DataProvider` holds only the api root and a shared `Transport`. Every
//! dispatch is independent: map the request, make one transport call, map
//! the response. `GET_MANY` is the exception and fans out into one
//! `GET /{resource}/{id}` per id, joined in input order and failing as a
//! whole on the first error.

use std::sync::Arc;

use futures::future::try_join_all;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::error::AdapterResult;
use crate::http::HttpRequest;
use crate::request::{map_request, record_url};
use crate::response::map_response;
use crate::transport::Transport;
use crate::types::{RecordId, RestRequest, RestResult};

/// Data provider for an epilogue-style REST API.
#[derive(Clone)]
pub struct DataProvider {
    api_root: String,
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for DataProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataProvider")
            .field("api_root", &self.api_root)
            .finish_non_exhaustive()
    }
}

impl DataProvider {
    pub fn new(api_root: &str, transport: Arc<dyn Transport>) -> Self {
        Self {
            api_root: api_root.trim_end_matches('/').to_string(),
            transport,
        }
    }

    /// Provider backed by a fresh `ReqwestTransport`.
    #[cfg(feature = "reqwest")]
    pub fn with_default_transport(api_root: &str) -> Self {
        Self::new(api_root, Arc::new(crate::transport::ReqwestTransport::new()))
    }

    pub fn api_root(&self) -> &str {
        &self.api_root
    }

    /// Run `request` against `resource`.
    #[instrument(skip(self, request), fields(kind = %request.kind()))]
    pub async fn dispatch(&self, resource: &str, request: RestRequest) -> AdapterResult<RestResult> {
        if let RestRequest::GetMany { ids } = &request {
            return self.fetch_many(resource, ids).await;
        }

        let http = map_request(&self.api_root, resource, &request)?;
        debug!(method = %http.method, url = %http.url, "sending request");
        let response = self.transport.send(http).await?;
        map_response(response, resource, &request)
    }

    /// Parse `kind` and `params` from a generic caller, then dispatch.
    pub async fn dispatch_raw(&self, kind: &str, resource: &str, params: Value) -> AdapterResult<RestResult> {
        let request = RestRequest::from_parts(kind, params)?;
        self.dispatch(resource, request).await
    }

    async fn fetch_many(&self, resource: &str, ids: &[RecordId]) -> AdapterResult<RestResult> {
        debug!(count = ids.len(), "fanning out record fetches");
        let calls = ids.iter().map(|id| {
            let http = HttpRequest::get(record_url(&self.api_root, resource, id));
            debug!(method = %http.method, url = %http.url, "sending request");
            self.transport.send(http)
        });
        let responses = try_join_all(calls).await?;
        let records = responses.into_iter().map(|response| response.json).collect();
        Ok(RestResult::single(Value::Array(records)))
    }
}
