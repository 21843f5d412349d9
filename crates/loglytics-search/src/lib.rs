pub mod aggs;
pub mod analytics_impl;
pub mod client;
pub mod cursor;
pub mod decode;
pub mod error;
pub mod mapping;
pub mod queries;

pub use client::{HttpSearchClient, SearchClient};
pub use error::SearchError;

/// Analytics backend over a document search engine.
///
/// Generic over the client so unit tests can substitute a canned transport;
/// production wiring uses [`HttpSearchClient`].
pub struct OpenSearchBackend<C: SearchClient = HttpSearchClient> {
    client: C,
}

impl<C: SearchClient> OpenSearchBackend<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    pub(crate) fn client(&self) -> &C {
        &self.client
    }
}
