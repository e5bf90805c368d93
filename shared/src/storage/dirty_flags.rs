use crate::SlotIndex;

/// Per-slot "changed since last sync" markers.
///
/// A slot without a recorded flag reads as dirty, so any slot the flags have
/// not caught up with yet gets synced rather than left stale.
#[derive(Clone, Debug, Default)]
pub struct DirtyFlags {
    flags: Vec<bool>,
}

impl DirtyFlags {
    pub fn new() -> Self {
        Self { flags: Vec::new() }
    }

    pub fn is_dirty(&self, slot: SlotIndex) -> bool {
        self.flags.get(slot).copied().unwrap_or(true)
    }

    pub fn mark(&mut self, slot: SlotIndex) {
        if let Some(flag) = self.flags.get_mut(slot) {
            *flag = true;
        }
    }

    /// Returns false when the slot has no recorded flag
    pub fn clear(&mut self, slot: SlotIndex) -> bool {
        match self.flags.get_mut(slot) {
            Some(flag) => {
                *flag = false;
                true
            }
            None => false,
        }
    }

    /// Marks every slot from `start` to the end
    pub fn mark_from(&mut self, start: SlotIndex) {
        for flag in self.flags.iter_mut().skip(start) {
            *flag = true;
        }
    }

    /// Grows or shrinks to `len` flags. New flags start dirty.
    pub fn resize(&mut self, len: usize) {
        self.flags.resize(len, true);
    }

    pub fn any(&self) -> bool {
        self.flags.iter().any(|flag| *flag)
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }
}
