pub mod availability;
mod error;
pub mod filter;
pub mod lifecycle;
mod mutations;
mod queries;
pub mod store;

pub use error::EngineError;

use std::collections::HashMap;
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::RwLock;
use ulid::Ulid;

use crate::model::*;
use crate::notify::NotifyHub;
use crate::observability;

use store::SnapshotSource;

pub type SharedVillaState = Arc<RwLock<VillaState>>;

/// In-memory villa inventory plus booking requests, fed by snapshots from the
/// external store and mutated through host/guest actions. Each villa's state
/// lives behind its own lock; a reverse index maps request ids to villas.
pub struct Engine {
    pub state: DashMap<Ulid, SharedVillaState>,
    /// Reverse lookup: booking request id → villa id.
    pub(super) request_index: DashMap<Ulid, Ulid>,
    pub notify: Arc<NotifyHub>,
}

/// Apply an event directly to a VillaState (no locking — caller holds the lock).
fn apply_to_villa(rs: &mut VillaState, event: &Event, index: &DashMap<Ulid, Ulid>) {
    match event {
        Event::VillaUpdated { villa } => {
            rs.villa = villa.clone();
            // Keep the denormalized display titles in sync; they are a cache,
            // never a join key.
            for request in &mut rs.requests {
                request.villa_title = villa.title.clone();
            }
        }
        Event::RequestCreated { request } => {
            index.insert(request.id, request.villa_id);
            rs.insert_request(request.clone());
        }
        Event::RequestStatusChanged { id, to, .. } => {
            if let Some(request) = rs.request_mut(*id) {
                request.status = *to;
            }
        }
        // VillaCreated/Deleted are handled at the DashMap level, not here
        Event::VillaCreated { .. } | Event::VillaDeleted { .. } => {}
    }
}

impl Engine {
    pub fn new(notify: Arc<NotifyHub>) -> Self {
        Self {
            state: DashMap::new(),
            request_index: DashMap::new(),
            notify,
        }
    }

    /// Replace all in-memory state from an external snapshot.
    ///
    /// The snapshot may be stale relative to the store's latest writes; the
    /// engine only promises to reflect what it was handed. Requests whose
    /// villa is not in the snapshot are dropped, not errored — a conservative
    /// read of partially-consistent data.
    ///
    /// Each `VillaState` is assembled in full before its Arc is published
    /// into `state`, so concurrent readers never see a villa without its
    /// requests and no lock is taken on the fresh Arcs.
    pub async fn hydrate(&self, source: &dyn SnapshotSource) -> Result<(), EngineError> {
        let start = std::time::Instant::now();
        let villas = source.list_villas().await?;
        let requests = source.list_booking_requests().await?;

        let mut fresh: HashMap<Ulid, VillaState> = villas
            .into_iter()
            .map(|villa| (villa.id, VillaState::new(villa)))
            .collect();

        let mut orphans = 0u64;
        let mut index = Vec::new();
        for request in requests {
            match fresh.get_mut(&request.villa_id) {
                Some(rs) => {
                    index.push((request.id, request.villa_id));
                    rs.insert_request(request);
                }
                None => {
                    orphans += 1;
                    tracing::warn!(
                        "dropping request {} for unknown villa {}",
                        request.id,
                        request.villa_id
                    );
                }
            }
        }

        self.state.clear();
        self.request_index.clear();
        for (id, rs) in fresh {
            self.state.insert(id, Arc::new(RwLock::new(rs)));
        }
        for (request_id, villa_id) in index {
            self.request_index.insert(request_id, villa_id);
        }

        if orphans > 0 {
            metrics::counter!(observability::HYDRATE_ORPHANS_TOTAL).increment(orphans);
        }
        metrics::gauge!(observability::VILLAS_ACTIVE).set(self.state.len() as f64);
        metrics::histogram!(observability::HYDRATE_DURATION_SECONDS)
            .record(start.elapsed().as_secs_f64());
        Ok(())
    }

    pub fn get_villa_state(&self, id: &Ulid) -> Option<SharedVillaState> {
        self.state.get(id).map(|e| e.value().clone())
    }

    pub fn villa_for_request(&self, request_id: &Ulid) -> Option<Ulid> {
        self.request_index.get(request_id).map(|e| *e.value())
    }

    /// Apply + notify in one call, after the caller's checks passed.
    pub(super) fn apply_and_notify(&self, villa_id: Ulid, rs: &mut VillaState, event: &Event) {
        apply_to_villa(rs, event, &self.request_index);
        self.notify.send(villa_id, event);
    }

    /// Lookup request → villa, get villa state, acquire write lock.
    pub(super) async fn resolve_request_write(
        &self,
        request_id: &Ulid,
    ) -> Result<(Ulid, tokio::sync::OwnedRwLockWriteGuard<VillaState>), EngineError> {
        let villa_id = self
            .villa_for_request(request_id)
            .ok_or(EngineError::NotFound(*request_id))?;
        let rs = self
            .get_villa_state(&villa_id)
            .ok_or(EngineError::NotFound(villa_id))?;
        let guard = rs.write_owned().await;
        Ok((villa_id, guard))
    }
}
