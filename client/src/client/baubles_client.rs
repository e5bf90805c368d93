use std::{collections::HashMap, mem, sync::Arc};

use log::{debug, warn};

use baubles_shared::{
    new_message_allocator, BaubleStorage, BitReader, DecodeError, EntityId, FullState,
    MessageAllocator, MessageKind, Payload, PoolStats, StringPool,
};

use crate::ClientConfig;

/// Mirrors the bauble stores of every entity this observer tracks.
///
/// Each received message is decoded completely before anything is applied,
/// so a malformed message never touches a local store.
pub struct BaublesClient<P: Payload> {
    client_config: ClientConfig,
    strings: StringPool,
    messages: Arc<dyn MessageAllocator<P>>,
    stores: HashMap<EntityId, BaubleStorage<P>>,
}

impl<P: Payload> BaublesClient<P> {
    /// Create a new BaublesClient
    pub fn new(client_config: ClientConfig) -> Self {
        let strings = StringPool::new(client_config.string_pool.clone());
        let messages = new_message_allocator(&client_config.message_pool);
        Self {
            client_config,
            strings,
            messages,
            stores: HashMap::new(),
        }
    }

    /// Decodes one message and applies it, returning the owner whose store
    /// changed. A full state replaces the local store outright, which is how
    /// a store that shrank on the server shrinks here too.
    pub fn receive(&mut self, bytes: &[u8]) -> Result<EntityId, DecodeError> {
        let mut reader = BitReader::new(bytes);
        let result = match MessageKind::read(&mut reader) {
            Ok(MessageKind::SlotUpdate) => self.receive_slot_update(&mut reader),
            Ok(MessageKind::FullState) => self.receive_full_state(&mut reader),
            Err(err) => Err(err),
        };
        if let Err(err) = &result {
            warn!("BaublesClient: dropping message: {}", err);
        }
        result
    }

    fn receive_slot_update(&mut self, reader: &mut BitReader) -> Result<EntityId, DecodeError> {
        let mut message = self.messages.acquire_blank();
        if let Err(err) = message.read_into(reader) {
            self.messages.release(message);
            return Err(err.into());
        }
        message.payload_mut().canonicalize(&self.strings);

        let owner = message.owner();
        let slot = message.slot();
        let payload = mem::replace(message.payload_mut(), P::empty());
        self.messages.release(message);

        self.stores
            .entry(owner)
            .or_default()
            .set_extending(slot, payload)?;
        debug!("BaublesClient: slot {} of {:?} updated", slot, owner);
        Ok(owner)
    }

    fn receive_full_state(&mut self, reader: &mut BitReader) -> Result<EntityId, DecodeError> {
        let mut state = FullState::<P>::read(reader)?;
        for (_, payload) in state.slots_mut() {
            payload.canonicalize(&self.strings);
        }

        let owner = state.owner();
        let storage = state.to_storage();
        debug!(
            "BaublesClient: full state of {:?} with {} slots",
            owner,
            storage.capacity()
        );
        self.stores.insert(owner, storage);
        Ok(owner)
    }

    pub fn storage(&self, owner: EntityId) -> Option<&BaubleStorage<P>> {
        self.stores.get(&owner)
    }

    pub fn owners(&self) -> impl Iterator<Item = &EntityId> {
        self.stores.keys()
    }

    /// Forgets the mirrored store of an owner that is no longer tracked
    pub fn forget(&mut self, owner: EntityId) -> Option<BaubleStorage<P>> {
        self.stores.remove(&owner)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.client_config
    }

    pub fn strings(&self) -> &StringPool {
        &self.strings
    }

    pub fn message_stats(&self) -> PoolStats {
        self.messages.stats()
    }
}
