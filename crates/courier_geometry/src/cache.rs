use std::sync::Arc;

use fxhash::FxHashMap;
use parking_lot::Mutex;
use tokio::sync::OnceCell;

use crate::{
    geometry_provider::{GeometryError, GeometryProvider},
    lat_lng::LatLng,
    route_geometry::RouteGeometry,
};

/// Exact coordinates of every stop, in order.
type CacheKey = Vec<(u64, u64)>;

fn cache_key(stops: &[LatLng]) -> CacheKey {
    stops
        .iter()
        .map(|stop| (stop.lat.to_bits(), stop.lng.to_bits()))
        .collect()
}

/// Process-lifetime cache in front of a provider.
///
/// Concurrent lookups for the same stops share a single request. Failed
/// lookups are not cached, the next caller retries. There is no eviction.
pub struct CachedGeometryProvider<P> {
    inner: P,
    entries: Mutex<FxHashMap<CacheKey, Arc<OnceCell<RouteGeometry>>>>,
}

impl<P> CachedGeometryProvider<P> {
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            entries: Mutex::new(FxHashMap::default()),
        }
    }

    /// Number of resolved entries.
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .values()
            .filter(|cell| cell.initialized())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn cell(&self, key: CacheKey) -> Arc<OnceCell<RouteGeometry>> {
        let mut entries = self.entries.lock();
        Arc::clone(entries.entry(key).or_default())
    }
}

impl<P> GeometryProvider for CachedGeometryProvider<P>
where
    P: GeometryProvider,
{
    async fn route(&self, stops: &[LatLng]) -> Result<RouteGeometry, GeometryError> {
        let cell = self.cell(cache_key(stops));
        let geometry = cell.get_or_try_init(|| self.inner.route(stops)).await?;
        Ok(geometry.clone())
    }
}
