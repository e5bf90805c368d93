use baubles_shared::{BaubleStorage, Payload};

/// Sync record of one owner: the payloads last broadcast for each slot.
///
/// Uninitialized until the first sync allocates the snapshot, tracking from
/// then on.
pub struct SyncTracker<P: Payload> {
    snapshot: Option<Vec<P>>,
}

impl<P: Payload> SyncTracker<P> {
    pub fn new() -> Self {
        Self { snapshot: None }
    }

    pub fn is_tracking(&self) -> bool {
        self.snapshot.is_some()
    }

    pub fn snapshot(&self) -> Option<&[P]> {
        self.snapshot.as_deref()
    }

    /// Back to uninitialized, releasing the snapshot
    pub fn reset(&mut self) {
        self.snapshot = None;
    }

    /// Slot count of the store as of the last pass, if there was one
    pub(crate) fn tracked_capacity(&self) -> Option<usize> {
        self.snapshot.as_ref().map(Vec::len)
    }

    /// Records every slot of `storage` as broadcast
    pub(crate) fn record_all(&mut self, storage: &BaubleStorage<P>) {
        let snapshot = self.snapshot.get_or_insert_with(Vec::new);
        snapshot.clear();
        snapshot.extend(storage.iter().map(|(_, payload)| payload.clone()));
    }

    /// Snapshot sized to `capacity`, allocating or resizing it as needed.
    /// Surviving entries keep their values, new ones start empty.
    pub(crate) fn snapshot_for(&mut self, capacity: usize) -> &mut Vec<P> {
        let snapshot = self
            .snapshot
            .get_or_insert_with(|| Vec::with_capacity(capacity));
        if snapshot.len() != capacity {
            snapshot.resize_with(capacity, P::empty);
        }
        snapshot
    }
}

impl<P: Payload> Default for SyncTracker<P> {
    fn default() -> Self {
        Self::new()
    }
}
