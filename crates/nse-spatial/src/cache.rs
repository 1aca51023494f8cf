//! `GraphCache`: one lazily-fetched street graph per network type for a
//! fixed region.
//!
//! The cache is an explicit value owned by the caller and passed by
//! reference to whoever needs a graph.  Each slot is a `OnceLock`: the first
//! caller runs the fetch while concurrent callers block on the same slot and
//! then observe its result, so a graph is fetched at most once per cache no
//! matter how many workers ask for it.  A failed fetch is stored as `None`
//! and not retried.

use std::sync::{Arc, OnceLock};

use crate::{GraphProvider, GraphQuery, NetworkType, StreetGraph};

pub struct GraphCache<'p> {
    provider: &'p dyn GraphProvider,
    region:   GraphQuery,
    slots:    [OnceLock<Option<Arc<StreetGraph>>>; 2],
}

impl<'p> GraphCache<'p> {
    pub fn new(provider: &'p dyn GraphProvider, region: GraphQuery) -> Self {
        Self {
            provider,
            region,
            slots: [OnceLock::new(), OnceLock::new()],
        }
    }

    pub fn region(&self) -> &GraphQuery {
        &self.region
    }

    /// The graph for `network`, fetching it on first use.
    ///
    /// `None` means the fetch failed (the error is logged once).
    pub fn get(&self, network: NetworkType) -> Option<Arc<StreetGraph>> {
        self.slot(network)
            .get_or_init(|| {
                log::info!("fetching {network} graph for {}", self.region);
                match self.provider.fetch(&self.region, network) {
                    Ok(g) => {
                        log::info!("{network} graph ready: {} nodes", g.node_count());
                        Some(Arc::new(g))
                    }
                    Err(e) => {
                        log::warn!("{network} graph unavailable for {}: {e}", self.region);
                        None
                    }
                }
            })
            .clone()
    }

    /// Whether a fetch for `network` has completed (successfully or not).
    pub fn is_resolved(&self, network: NetworkType) -> bool {
        self.slot(network).get().is_some()
    }

    fn slot(&self, network: NetworkType) -> &OnceLock<Option<Arc<StreetGraph>>> {
        match network {
            NetworkType::Drive => &self.slots[0],
            NetworkType::Walk  => &self.slots[1],
        }
    }
}
