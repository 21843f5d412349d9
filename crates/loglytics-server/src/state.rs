use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use loglytics_core::analytics::AnalyticsBackend;
use loglytics_core::config::Config;
use loglytics_core::segment::{Segment, SegmentStore};

/// Shared application state injected into every Axum handler via
/// [`axum::extract::State`].
///
/// Stateless by design: the only resources are the search backend's
/// connection pool and the segment store handle.
pub struct AppState {
    pub analytics: Arc<dyn AnalyticsBackend>,
    pub segments: Arc<dyn SegmentStore>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(
        analytics: Arc<dyn AnalyticsBackend>,
        segments: Arc<dyn SegmentStore>,
        config: Config,
    ) -> Self {
        Self {
            analytics,
            segments,
            config: Arc::new(config),
        }
    }
}

/// Segment store backed by process memory. Stands in for the relational
/// store in development and tests; production deployments plug their own
/// [`SegmentStore`] implementation into [`AppState`].
#[derive(Default)]
pub struct InMemorySegmentStore {
    segments: RwLock<HashMap<i64, Segment>>,
}

impl InMemorySegmentStore {
    pub async fn insert(&self, segment: Segment) {
        self.segments.write().await.insert(segment.id, segment);
    }
}

#[async_trait::async_trait]
impl SegmentStore for InMemorySegmentStore {
    async fn get(&self, id: i64) -> anyhow::Result<Option<Segment>> {
        Ok(self.segments.read().await.get(&id).cloned())
    }
}
