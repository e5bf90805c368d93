use std::mem;

use baubles_serde::{BitReader, BitWrite, Serde, SerdeErr, UnsignedVariableInteger};
use log::debug;

use crate::{constants::MAX_SLOT_INDEX, Payload, SlotIndex, StringPool};

use super::{dirty_flags::DirtyFlags, error::StorageError};

/// The resizable slot array owned by one entity.
///
/// There is always a trailing empty "guard" slot after the last logical slot,
/// which UI and insertion use as the open slot. `size()` counts logical slots,
/// `capacity()` counts the guard too.
///
/// Every mutation marks the slots whose contents changed as dirty. Removal
/// shifts later slots down, keeping their order, and raises a structure flag
/// that `compact_if_needed` consumes.
#[derive(Clone, Debug)]
pub struct BaubleStorage<P: Payload> {
    slots: Vec<P>,
    dirty: DirtyFlags,
    structure_dirty: bool,
}

impl<P: Payload> BaubleStorage<P> {
    /// A store holding only the guard slot
    pub fn new() -> Self {
        Self::with_minimum(0)
    }

    /// A store with `size` empty logical slots plus the guard
    pub fn with_minimum(size: usize) -> Self {
        let mut slots = Vec::with_capacity(size + 1);
        slots.resize_with(size + 1, P::empty);
        Self::from_slots(slots)
    }

    /// A store holding `slots` in order, with a guard appended unless the
    /// last slot is already empty. Every slot starts dirty.
    pub fn from_slots(mut slots: Vec<P>) -> Self {
        if slots.last().map_or(true, |payload| !payload.is_empty()) {
            slots.push(P::empty());
        }
        let mut dirty = DirtyFlags::new();
        dirty.resize(slots.len());
        Self {
            slots,
            dirty,
            structure_dirty: false,
        }
    }

    /// Logical slot count, excluding the guard
    pub fn size(&self) -> usize {
        self.slots.len() - 1
    }

    /// Slot count including the guard
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Any slot below `capacity()`, guard included
    pub fn get(&self, slot: SlotIndex) -> Result<&P, StorageError> {
        self.check(slot)?;
        Ok(&self.slots[slot])
    }

    pub fn iter(&self) -> impl Iterator<Item = (SlotIndex, &P)> {
        self.slots.iter().enumerate()
    }

    pub fn non_empty_count(&self) -> usize {
        self.slots.iter().filter(|payload| !payload.is_empty()).count()
    }

    /// Replaces the payload in `slot`, returning what was there.
    ///
    /// `slot == size()` fills the guard and appends a new one. Anything past
    /// that is out of range.
    pub fn set(&mut self, slot: SlotIndex, payload: P) -> Result<P, StorageError> {
        self.check(slot)?;

        if slot == self.size() && !payload.is_empty() {
            self.push_guard();
        }

        let previous = mem::replace(&mut self.slots[slot], payload);
        self.dirty.mark(slot);
        Ok(previous)
    }

    /// Like `set`, but first grows the store with empty slots until `slot`
    /// exists. Used to mirror a remote store whose size is not known up front.
    pub fn set_extending(&mut self, slot: SlotIndex, payload: P) -> Result<P, StorageError> {
        if slot > self.size() {
            let len = slot.checked_add(1).ok_or(StorageError::OutOfRange {
                slot,
                size: self.slots.len(),
            })?;
            self.slots.resize_with(len, P::empty);
            self.dirty.resize(len);
        }
        if slot == self.size() && !payload.is_empty() {
            self.push_guard();
        }

        let previous = mem::replace(&mut self.slots[slot], payload);
        self.dirty.mark(slot);
        Ok(previous)
    }

    /// Places `payload` just before the guard, growing the store by one
    pub fn insert(&mut self, payload: P) -> SlotIndex {
        self.push_guard();
        let slot = self.slots.len() - 2;
        self.slots[slot] = payload;
        self.dirty.mark(slot);
        slot
    }

    /// Removes the logical slot, shifting every later slot down by one.
    /// Slots that no longer exist are ignored.
    pub fn remove_at(&mut self, slot: SlotIndex) -> Option<P> {
        if slot >= self.size() {
            return None;
        }

        let removed = self.slots.remove(slot);
        self.dirty.resize(self.slots.len());
        self.dirty.mark_from(slot);
        self.structure_dirty = true;

        Some(removed)
    }

    /// Rebuilds the store with every non-empty payload packed at the front,
    /// in original order.
    ///
    /// The result has `max(1, non_empty + 1, requested)` slots, so no
    /// non-empty payload is ever dropped, whatever `requested` is.
    pub fn resize_discarding_empty_trailing(&mut self, requested: usize) {
        let kept: Vec<P> = mem::take(&mut self.slots)
            .into_iter()
            .filter(|payload| !payload.is_empty())
            .collect();

        let len = requested.max(kept.len() + 1).max(1);
        debug!(
            "BaubleStorage: compacting {} payloads into {} slots",
            kept.len(),
            len
        );

        self.slots = kept;
        self.slots.resize_with(len, P::empty);

        self.dirty.resize(len);
        self.dirty.mark_from(0);
        self.structure_dirty = false;
    }

    /// Compacts only if a removal happened since the last compaction.
    /// Returns whether it compacted.
    pub fn compact_if_needed(&mut self, requested: usize) -> bool {
        if !self.structure_dirty {
            return false;
        }
        self.resize_discarding_empty_trailing(requested);
        true
    }

    /// Swaps payload strings for the pool's canonical instances. Contents are
    /// unchanged by value, so no slot is marked dirty.
    pub fn canonicalize(&mut self, strings: &StringPool) {
        for payload in &mut self.slots {
            payload.canonicalize(strings);
        }
    }

    pub fn structure_dirty(&self) -> bool {
        self.structure_dirty
    }

    pub fn is_dirty(&self, slot: SlotIndex) -> bool {
        self.dirty.is_dirty(slot)
    }

    pub fn any_dirty(&self) -> bool {
        self.dirty.any()
    }

    /// Flags a slot whose payload changed behind the store's back
    pub fn mark_dirty(&mut self, slot: SlotIndex) -> Result<(), StorageError> {
        self.check(slot)?;
        self.dirty.mark(slot);
        Ok(())
    }

    pub fn clear_dirty(&mut self, slot: SlotIndex) -> Result<(), StorageError> {
        self.check(slot)?;
        self.dirty.clear(slot);
        Ok(())
    }

    // `OutOfRange.size` is always the capacity, guard included
    fn check(&self, slot: SlotIndex) -> Result<(), StorageError> {
        if slot >= self.slots.len() {
            return Err(StorageError::OutOfRange {
                slot,
                size: self.slots.len(),
            });
        }
        Ok(())
    }

    fn push_guard(&mut self) {
        self.slots.push(P::empty());
        self.dirty.resize(self.slots.len());
    }

    // Serialization

    /// Writes every slot, guard included, in order
    pub fn write(&self, writer: &mut dyn BitWrite) {
        UnsignedVariableInteger::<5>::new(self.slots.len() as u64).ser(writer);
        for payload in &self.slots {
            payload.ser(writer);
        }
    }

    /// Reads a store written by `write`. If the data ends on a non-empty slot
    /// a guard is appended. Every slot starts dirty. Stores of more than
    /// `MAX_SLOT_INDEX + 1` slots are refused.
    pub fn read(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        let len: usize = UnsignedVariableInteger::<5>::de(reader)?.try_to()?;
        // every payload takes at least one bit
        let limit = reader.bits_remaining().min(MAX_SLOT_INDEX + 1);
        if len > limit {
            return Err(SerdeErr::LengthLimit { len, limit });
        }

        let mut slots = Vec::with_capacity(len + 1);
        for _ in 0..len {
            slots.push(P::de(reader)?);
        }
        let storage = Self::from_slots(slots);
        if storage.capacity() > MAX_SLOT_INDEX + 1 {
            return Err(SerdeErr::LengthLimit {
                len: storage.capacity(),
                limit: MAX_SLOT_INDEX + 1,
            });
        }
        Ok(storage)
    }
}

impl<P: Payload> Default for BaubleStorage<P> {
    fn default() -> Self {
        Self::new()
    }
}
