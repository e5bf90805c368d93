use crate::SlotIndex;

/// Tags for the kinds of slot item a store accepts
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SlotCategory {
    Amulet,
    Ring,
    Belt,
    /// Universal category, fits any slot
    Trinket,
    Head,
    Body,
    Charm,
}

/// Slot indices a category may occupy
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValidSlots {
    Any,
    Only(&'static [SlotIndex]),
}

impl ValidSlots {
    /// Highest listed index, `None` for `Any`
    pub fn highest(&self) -> Option<SlotIndex> {
        match self {
            ValidSlots::Any => None,
            ValidSlots::Only(slots) => slots.iter().copied().max(),
        }
    }
}

impl SlotCategory {
    pub const ALL: [SlotCategory; 7] = [
        SlotCategory::Amulet,
        SlotCategory::Ring,
        SlotCategory::Belt,
        SlotCategory::Trinket,
        SlotCategory::Head,
        SlotCategory::Body,
        SlotCategory::Charm,
    ];

    pub fn identifier(&self) -> &'static str {
        match self {
            SlotCategory::Amulet => "AMULET",
            SlotCategory::Ring => "RING",
            SlotCategory::Belt => "BELT",
            SlotCategory::Trinket => "TRINKET",
            SlotCategory::Head => "HEAD",
            SlotCategory::Body => "BODY",
            SlotCategory::Charm => "CHARM",
        }
    }

    /// Looks a category up by identifier, ignoring ASCII case
    pub fn from_identifier(identifier: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|category| category.identifier().eq_ignore_ascii_case(identifier))
    }

    pub fn valid_slots(&self) -> ValidSlots {
        match self {
            SlotCategory::Amulet => ValidSlots::Only(&[0]),
            SlotCategory::Ring => ValidSlots::Only(&[1, 2]),
            SlotCategory::Belt => ValidSlots::Only(&[3]),
            SlotCategory::Trinket => ValidSlots::Any,
            SlotCategory::Head => ValidSlots::Only(&[4]),
            SlotCategory::Body => ValidSlots::Only(&[5]),
            SlotCategory::Charm => ValidSlots::Only(&[6]),
        }
    }

    pub fn is_universal(&self) -> bool {
        matches!(self.valid_slots(), ValidSlots::Any)
    }
}
