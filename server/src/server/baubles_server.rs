use std::{collections::HashMap, sync::Arc};

use log::{debug, info, warn};

use baubles_shared::{
    new_message_allocator, BaubleStorage, BitReader, BitWriter, CategoryRegistry, EntityId,
    FullState, ItemCapabilities, Payload, PoolStats, SlotIndex, StorageError, StringPool,
    TypeCache, MAX_SLOT_INDEX,
};

use crate::{
    drops::DroppedItem,
    error::{BaublesServerError, EquipError, SyncError},
    sync::{ObserverResolver, SyncTracker, Synchronizer, Transport},
    ServerConfig,
};

/// Authoritative owner of every entity's bauble store.
///
/// Stores and sync records live in component tables keyed by `EntityId`.
/// Equip validation goes through the shared `TypeCache`; each `tick` runs the
/// owner's worn-item hooks and then one synchronization pass.
pub struct BaublesServer<P: Payload, C: ItemCapabilities<P>> {
    server_config: ServerConfig,
    capabilities: C,
    type_cache: Arc<TypeCache<P::Kind>>,
    strings: Arc<StringPool>,
    synchronizer: Arc<Synchronizer<P>>,
    observers: Arc<dyn ObserverResolver>,
    transport: Arc<dyn Transport<P>>,
    minimum_slots: usize,
    rng: fastrand::Rng,
    // Component tables
    stores: HashMap<EntityId, BaubleStorage<P>>,
    trackers: HashMap<EntityId, SyncTracker<P>>,
}

impl<P: Payload, C: ItemCapabilities<P>> BaublesServer<P, C> {
    /// Create a new BaublesServer
    pub fn new(
        server_config: ServerConfig,
        registry: CategoryRegistry,
        capabilities: C,
        observers: Arc<dyn ObserverResolver>,
        transport: Arc<dyn Transport<P>>,
    ) -> Self {
        let minimum_slots = registry.minimum_slots();
        let type_cache = Arc::new(TypeCache::new(
            Arc::new(registry),
            &server_config.type_cache,
        ));
        let strings = Arc::new(StringPool::new(server_config.string_pool.clone()));
        let synchronizer = Arc::new(Synchronizer::new(new_message_allocator(
            &server_config.message_pool,
        )));

        Self {
            server_config,
            capabilities,
            type_cache,
            strings,
            synchronizer,
            observers,
            transport,
            minimum_slots,
            rng: fastrand::Rng::new(),
            stores: HashMap::new(),
            trackers: HashMap::new(),
        }
    }

    // Stores

    /// Gives `owner` a store provisioned for every enabled category, unless
    /// it already has one. Returns whether a store was created.
    pub fn attach(&mut self, owner: EntityId) -> bool {
        if self.stores.contains_key(&owner) {
            return false;
        }
        attached_store(&mut self.stores, owner, self.minimum_slots);
        true
    }

    pub fn storage(&self, owner: EntityId) -> Option<&BaubleStorage<P>> {
        self.stores.get(&owner)
    }

    /// Direct access for hosts that edit payloads themselves. Changes made
    /// through the store's own methods are tracked as usual.
    pub fn storage_mut(&mut self, owner: EntityId) -> Option<&mut BaubleStorage<P>> {
        self.stores.get_mut(&owner)
    }

    pub fn owners(&self) -> impl Iterator<Item = &EntityId> {
        self.stores.keys()
    }

    pub fn is_tracking(&self, owner: EntityId) -> bool {
        self.trackers
            .get(&owner)
            .map_or(false, SyncTracker::is_tracking)
    }

    /// Drops every piece of state held for `owner`, returning its store
    pub fn teardown(&mut self, owner: EntityId) -> Option<BaubleStorage<P>> {
        self.trackers.remove(&owner);
        let storage = self.stores.remove(&owner);
        if storage.is_some() {
            info!("BaublesServer: tore down {:?}", owner);
        }
        storage
    }

    // Equipment

    /// Puts `payload` into `slot`, returning the payload it displaced.
    ///
    /// The payload must be a slot item whose category accepts `slot`, and the
    /// item must agree to be equipped, before the slot itself is checked.
    /// `slot == size` grows the store, up to `MAX_SLOT_INDEX`. A store is
    /// attached on first use.
    pub fn equip(
        &mut self,
        owner: EntityId,
        slot: SlotIndex,
        payload: P,
    ) -> Result<Option<P>, EquipError> {
        let Some(category) = self.type_cache.classify(&payload, &self.capabilities) else {
            return Err(EquipError::SlotCategoryMismatch {
                slot,
                category: None,
            });
        };
        if !self.type_cache.is_valid_for_slot(category, slot) {
            return Err(EquipError::SlotCategoryMismatch {
                slot,
                category: Some(category),
            });
        }
        if !self.capabilities.can_equip(&payload, owner) {
            return Err(EquipError::EquipRejectedByItem { slot });
        }

        let storage = attached_store(&mut self.stores, owner, self.minimum_slots);
        if slot == storage.size() && slot >= MAX_SLOT_INDEX {
            return Err(EquipError::OutOfRange {
                slot,
                size: storage.capacity(),
            });
        }
        let previous = storage.set(slot, payload)?;

        if !previous.is_empty() {
            self.capabilities.on_unequipped(&previous, owner);
        }
        self.capabilities.on_equipped(storage.get(slot)?, owner);

        Ok((!previous.is_empty()).then_some(previous))
    }

    /// Empties `slot` and returns what was there. Returns `None` for an empty
    /// or missing slot, or when the item refuses to come off.
    pub fn unequip(&mut self, owner: EntityId, slot: SlotIndex) -> Option<P> {
        let storage = self.stores.get_mut(&owner)?;
        let current = storage.get(slot).ok()?;
        if current.is_empty() {
            return None;
        }
        if !self.capabilities.can_unequip(current, owner) {
            debug!(
                "BaublesServer: item in slot {} of {:?} refused to unequip",
                slot, owner
            );
            return None;
        }

        let previous = storage.set(slot, P::empty()).ok()?;
        self.capabilities.on_unequipped(&previous, owner);
        Some(previous)
    }

    /// Equips an item straight from a player's hand: into the first empty
    /// slot its category accepts, or just before the guard when the category
    /// accepts that position. Returns the slot used. A store is attached
    /// only once the item has been accepted.
    pub fn add_item(&mut self, owner: EntityId, payload: P) -> Result<SlotIndex, EquipError> {
        let size = self
            .stores
            .get(&owner)
            .map_or(self.minimum_slots, BaubleStorage::size);

        if !self.server_config.right_click_equip
            || !self.capabilities.can_right_click_equip(&payload)
        {
            return Err(EquipError::EquipRejectedByItem { slot: size });
        }
        let Some(category) = self.type_cache.classify(&payload, &self.capabilities) else {
            return Err(EquipError::SlotCategoryMismatch {
                slot: size,
                category: None,
            });
        };
        if !self.capabilities.can_equip(&payload, owner) {
            return Err(EquipError::EquipRejectedByItem { slot: size });
        }

        let storage = attached_store(&mut self.stores, owner, self.minimum_slots);
        let type_cache = &self.type_cache;
        let open_slot = storage
            .iter()
            .take(size)
            .find(|(slot, current)| {
                current.is_empty() && type_cache.is_valid_for_slot(category, *slot)
            })
            .map(|(slot, _)| slot);

        let slot = match open_slot {
            Some(slot) => {
                storage.set(slot, payload)?;
                slot
            }
            None if size >= MAX_SLOT_INDEX => {
                return Err(EquipError::OutOfRange {
                    slot: size,
                    size: storage.capacity(),
                })
            }
            None if self.type_cache.is_valid_for_slot(category, size) => storage.insert(payload),
            None => {
                return Err(EquipError::SlotCategoryMismatch {
                    slot: size,
                    category: Some(category),
                })
            }
        };

        self.capabilities.on_equipped(storage.get(slot)?, owner);
        Ok(slot)
    }

    /// Removes the slot entirely, shifting later slots down, then pads the
    /// store back to its provisioned size. Returns the removed payload, which
    /// is empty if the slot was. A slot that no longer exists is ignored and
    /// gives `None`.
    pub fn remove_item(&mut self, owner: EntityId, slot: SlotIndex) -> Option<P> {
        let storage = self.stores.get_mut(&owner)?;
        let removed = storage.remove_at(slot)?;
        if let Err(err) = pad_to_minimum(storage, self.minimum_slots) {
            warn!("BaublesServer: could not pad store of {:?}: {}", owner, err);
        }

        if !removed.is_empty() {
            self.capabilities.on_unequipped(&removed, owner);
        }
        Some(removed)
    }

    /// Strips every payload from `owner` on death, unless inventories are
    /// kept. Payloads come out highest slot first, each with a random
    /// scatter for the host to spawn it with.
    pub fn drop_all(&mut self, owner: EntityId) -> Vec<DroppedItem<P>> {
        if self.server_config.keep_inventory {
            return Vec::new();
        }
        let Some(storage) = self.stores.get_mut(&owner) else {
            return Vec::new();
        };

        let mut dropped = Vec::new();
        for slot in (0..storage.size()).rev() {
            let is_filled = storage.get(slot).map_or(false, |payload| !payload.is_empty());
            if !is_filled {
                continue;
            }
            if let Some(payload) = storage.remove_at(slot) {
                self.capabilities.on_unequipped(&payload, owner);
                dropped.push(DroppedItem::scatter(payload, &self.rng));
            }
        }

        if self.server_config.compact_after_drop {
            storage.compact_if_needed(self.minimum_slots + 1);
        }
        info!("BaublesServer: {:?} dropped {} items", owner, dropped.len());
        dropped
    }

    // Synchronization

    /// Runs the owner's worn-item hooks, then one synchronization pass.
    /// Returns how many slots were broadcast.
    pub fn tick(&mut self, owner: EntityId) -> Result<usize, SyncError> {
        let Some(storage) = self.stores.get_mut(&owner) else {
            return Ok(0);
        };
        for (_, payload) in storage.iter() {
            if !payload.is_empty() {
                self.capabilities.on_worn_tick(payload, owner);
            }
        }

        let tracker = self.trackers.entry(owner).or_default();
        self.synchronizer.sync(
            owner,
            storage,
            tracker,
            &self.capabilities,
            self.observers.as_ref(),
            self.transport.as_ref(),
        )
    }

    /// Ticks every owner. Interrupted passes are logged and retried on the
    /// next call; returns the total number of slots broadcast.
    pub fn tick_all(&mut self) -> usize {
        let owners: Vec<EntityId> = self.stores.keys().copied().collect();
        let mut sent = 0;
        for owner in owners {
            match self.tick(owner) {
                Ok(count) => sent += count,
                Err(err) => warn!("BaublesServer: sync of {:?} failed: {}", owner, err),
            }
        }
        sent
    }

    /// Sends `owner` the full state of its own store, attaching one first if
    /// needed
    pub fn join(&mut self, owner: EntityId) -> Result<(), BaublesServerError> {
        self.attach(owner);
        self.send_full_state(owner, owner)
    }

    /// Sends `observer` the full state of `owner`'s store, if it has one.
    /// Diffing afterwards continues from the existing snapshot.
    pub fn start_tracking(
        &mut self,
        owner: EntityId,
        observer: EntityId,
    ) -> Result<(), BaublesServerError> {
        if !self.stores.contains_key(&owner) {
            return Ok(());
        }
        self.send_full_state(owner, observer)
    }

    fn send_full_state(
        &self,
        owner: EntityId,
        observer: EntityId,
    ) -> Result<(), BaublesServerError> {
        let Some(storage) = self.stores.get(&owner) else {
            return Ok(());
        };
        let state = FullState::from_storage(owner, storage);
        self.transport
            .deliver_full_state(observer, &state)
            .map_err(|source| BaublesServerError::FullState { owner, source })
    }

    // Persistence

    /// Serialized store of `owner`
    pub fn save(&self, owner: EntityId) -> Option<Vec<u8>> {
        let storage = self.stores.get(&owner)?;
        let mut writer = BitWriter::new();
        storage.write(&mut writer);
        Some(writer.to_bytes())
    }

    /// Replaces `owner`'s store with one read from `bytes`. On failure the
    /// existing store is left exactly as it was.
    pub fn load(&mut self, owner: EntityId, bytes: &[u8]) -> Result<(), BaublesServerError> {
        let mut reader = BitReader::new(bytes);
        let mut storage = BaubleStorage::<P>::read(&mut reader)
            .map_err(|source| BaublesServerError::Load { owner, source })?;

        pad_to_minimum(&mut storage, self.minimum_slots)
            .map_err(|source| BaublesServerError::Provision { owner, source })?;
        storage.canonicalize(&self.strings);

        info!(
            "BaublesServer: loaded {} payloads for {:?}",
            storage.non_empty_count(),
            owner
        );
        self.stores.insert(owner, storage);
        Ok(())
    }

    // Shared state

    pub fn config(&self) -> &ServerConfig {
        &self.server_config
    }

    pub fn registry(&self) -> &CategoryRegistry {
        self.type_cache.registry()
    }

    pub fn type_cache(&self) -> &Arc<TypeCache<P::Kind>> {
        &self.type_cache
    }

    pub fn strings(&self) -> &Arc<StringPool> {
        &self.strings
    }

    pub fn synchronizer(&self) -> &Arc<Synchronizer<P>> {
        &self.synchronizer
    }

    pub fn message_stats(&self) -> PoolStats {
        self.synchronizer.message_stats()
    }

    pub fn capabilities(&self) -> &C {
        &self.capabilities
    }
}

/// Grows `storage` with empty slots until it has `minimum_slots` logical slots
fn pad_to_minimum<P: Payload>(
    storage: &mut BaubleStorage<P>,
    minimum_slots: usize,
) -> Result<(), StorageError> {
    if storage.size() < minimum_slots {
        storage.set_extending(minimum_slots, P::empty())?;
    }
    Ok(())
}

fn attached_store<P: Payload>(
    stores: &mut HashMap<EntityId, BaubleStorage<P>>,
    owner: EntityId,
    minimum_slots: usize,
) -> &mut BaubleStorage<P> {
    stores.entry(owner).or_insert_with(|| {
        info!(
            "BaublesServer: attaching store of {} slots to {:?}",
            minimum_slots, owner
        );
        BaubleStorage::with_minimum(minimum_slots)
    })
}
