use std::{
    marker::PhantomData,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};

use crossbeam_channel::{bounded, Receiver, Sender};
use log::debug;

use crate::{config::MessagePoolConfig, EntityId, Payload, SlotIndex, SlotUpdate};

/// Counters describing how a message source has been used
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PoolStats {
    pub created: u64,
    pub reused: u64,
    pub recycled: u64,
    pub available: usize,
}

/// Where slot update messages come from and go back to
pub trait MessageAllocator<P: Payload>: Send + Sync {
    /// A message filled with the given fields
    fn acquire(&self, owner: EntityId, slot: SlotIndex, payload: &P) -> SlotUpdate<P>;

    /// A cleared message, for decoding into
    fn acquire_blank(&self) -> SlotUpdate<P>;

    /// Hands a message back once every delivery is done
    fn release(&self, message: SlotUpdate<P>);

    fn stats(&self) -> PoolStats;
}

/// Allocates a fresh message every time and drops released ones
pub struct UnpooledMessages<P: Payload> {
    created: AtomicU64,
    phantom_p: PhantomData<fn() -> P>,
}

impl<P: Payload> UnpooledMessages<P> {
    pub fn new() -> Self {
        Self {
            created: AtomicU64::new(0),
            phantom_p: PhantomData,
        }
    }
}

impl<P: Payload> Default for UnpooledMessages<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Payload> MessageAllocator<P> for UnpooledMessages<P> {
    fn acquire(&self, owner: EntityId, slot: SlotIndex, payload: &P) -> SlotUpdate<P> {
        self.created.fetch_add(1, Ordering::Relaxed);
        SlotUpdate::new(owner, slot, payload)
    }

    fn acquire_blank(&self) -> SlotUpdate<P> {
        self.created.fetch_add(1, Ordering::Relaxed);
        SlotUpdate::blank()
    }

    fn release(&self, _message: SlotUpdate<P>) {}

    fn stats(&self) -> PoolStats {
        PoolStats {
            created: self.created.load(Ordering::Relaxed),
            ..Default::default()
        }
    }
}

/// Bounded pool of reusable slot update messages.
///
/// Released messages are cleared before they are queued, so nothing from a
/// previous use leaks into the next one. When the queue is full a released
/// message is simply dropped; when it is empty `acquire` allocates.
pub struct MessagePool<P: Payload> {
    sender: Sender<SlotUpdate<P>>,
    receiver: Receiver<SlotUpdate<P>>,
    created: AtomicU64,
    reused: AtomicU64,
    recycled: AtomicU64,
}

impl<P: Payload> MessagePool<P> {
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = bounded(capacity);
        Self {
            sender,
            receiver,
            created: AtomicU64::new(0),
            reused: AtomicU64::new(0),
            recycled: AtomicU64::new(0),
        }
    }

    pub fn capacity(&self) -> usize {
        self.sender.capacity().unwrap_or(0)
    }

    pub fn available(&self) -> usize {
        self.receiver.len()
    }

    /// Drops every pooled message
    pub fn clear(&self) {
        while self.receiver.try_recv().is_ok() {}
    }

    pub fn reset_stats(&self) {
        self.created.store(0, Ordering::Relaxed);
        self.reused.store(0, Ordering::Relaxed);
        self.recycled.store(0, Ordering::Relaxed);
    }

    fn take(&self) -> Option<SlotUpdate<P>> {
        let message = self.receiver.try_recv().ok()?;
        self.reused.fetch_add(1, Ordering::Relaxed);
        Some(message)
    }
}

impl<P: Payload> MessageAllocator<P> for MessagePool<P> {
    fn acquire(&self, owner: EntityId, slot: SlotIndex, payload: &P) -> SlotUpdate<P> {
        match self.take() {
            Some(mut message) => {
                message.reset(owner, slot, payload);
                message
            }
            None => {
                self.created.fetch_add(1, Ordering::Relaxed);
                SlotUpdate::new(owner, slot, payload)
            }
        }
    }

    fn acquire_blank(&self) -> SlotUpdate<P> {
        self.take().unwrap_or_else(|| {
            self.created.fetch_add(1, Ordering::Relaxed);
            SlotUpdate::blank()
        })
    }

    fn release(&self, mut message: SlotUpdate<P>) {
        message.clear();
        if self.sender.try_send(message).is_ok() {
            self.recycled.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn stats(&self) -> PoolStats {
        PoolStats {
            created: self.created.load(Ordering::Relaxed),
            reused: self.reused.load(Ordering::Relaxed),
            recycled: self.recycled.load(Ordering::Relaxed),
            available: self.available(),
        }
    }
}

/// Picks the pooled or unpooled strategy from config
pub fn new_message_allocator<P: Payload>(config: &MessagePoolConfig) -> Arc<dyn MessageAllocator<P>> {
    if config.capacity == 0 {
        debug!("MessagePool: pooling disabled");
        Arc::new(UnpooledMessages::new())
    } else {
        Arc::new(MessagePool::new(config.capacity))
    }
}
