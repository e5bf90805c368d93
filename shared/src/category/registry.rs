use std::collections::HashMap;

use log::{info, warn};

use crate::SlotIndex;

use super::{error::CategoryError, slot_category::SlotCategory, slot_category::ValidSlots};

/// A registration or modification request for a category, sent by the host
/// (or by other item providers) during startup
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategoryRegistration {
    pub identifier: String,
    /// Default number of slots
    pub size: usize,
    /// Enabled categories are provisioned on every new store
    pub enabled: bool,
    /// Hidden categories still exist but are left out of the default UI
    pub hidden: bool,
}

impl CategoryRegistration {
    pub fn new(identifier: &str, size: usize) -> Self {
        Self {
            identifier: identifier.to_string(),
            size,
            enabled: true,
            hidden: false,
        }
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }
}

/// Registered state of one category
#[derive(Clone, Debug)]
pub struct CategoryInfo {
    category: SlotCategory,
    valid_slots: ValidSlots,
    validity: Box<[bool]>,
    size: usize,
    enabled: bool,
    hidden: bool,
}

impl CategoryInfo {
    fn new(category: SlotCategory, size: usize, enabled: bool, hidden: bool) -> Self {
        let valid_slots = category.valid_slots();
        Self {
            category,
            valid_slots,
            validity: build_validity(valid_slots),
            size,
            enabled,
            hidden,
        }
    }

    /// Merging never shrinks a category: the larger size wins, any disable
    /// sticks and any hide sticks
    fn merge(&mut self, registration: &CategoryRegistration) {
        self.size = self.size.max(registration.size);
        self.enabled &= registration.enabled;
        self.hidden |= registration.hidden;
    }

    pub fn category(&self) -> SlotCategory {
        self.category
    }

    pub fn valid_slots(&self) -> ValidSlots {
        self.valid_slots
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn accepts(&self, slot: SlotIndex) -> bool {
        match self.valid_slots {
            ValidSlots::Any => true,
            ValidSlots::Only(_) => self.validity.get(slot).copied().unwrap_or(false),
        }
    }

    fn minimum_slots(&self) -> usize {
        match self.valid_slots.highest() {
            Some(highest) => self.size.max(highest + 1),
            None => self.size,
        }
    }
}

fn build_validity(valid_slots: ValidSlots) -> Box<[bool]> {
    let ValidSlots::Only(slots) = valid_slots else {
        return Box::new([]);
    };
    let Some(highest) = valid_slots.highest() else {
        return Box::new([]);
    };

    let mut validity = vec![false; highest + 1];
    for slot in slots {
        validity[*slot] = true;
    }
    validity.into_boxed_slice()
}

/// The set of categories known to a world, with a slot-acceptance bitmap
/// precomputed for each one.
///
/// Built once at startup and then shared read-only.
#[derive(Clone, Debug, Default)]
pub struct CategoryRegistry {
    categories: HashMap<SlotCategory, CategoryInfo>,
}

impl CategoryRegistry {
    /// A registry with nothing registered
    pub fn empty() -> Self {
        Self {
            categories: HashMap::new(),
        }
    }

    /// Every category registered, enabled and visible, sized to its valid slots
    pub fn with_defaults() -> Self {
        let mut registry = Self::empty();
        for category in SlotCategory::ALL {
            let size = match category.valid_slots() {
                ValidSlots::Any => 1,
                ValidSlots::Only(slots) => slots.len(),
            };
            registry
                .categories
                .insert(category, CategoryInfo::new(category, size, true, false));
        }
        registry
    }

    /// Creates the category, or merges into it if it already exists
    pub fn register(&mut self, registration: &CategoryRegistration) -> Result<(), CategoryError> {
        let category = lookup(registration)?;
        match self.categories.get_mut(&category) {
            Some(info) => info.merge(registration),
            None => {
                info!(
                    "CategoryRegistry: registering {} (size {})",
                    category.identifier(),
                    registration.size
                );
                self.categories.insert(
                    category,
                    CategoryInfo::new(
                        category,
                        registration.size,
                        registration.enabled,
                        registration.hidden,
                    ),
                );
            }
        }
        Ok(())
    }

    /// Merges into an existing category. Returns false when the category has
    /// not been registered, in which case nothing changes.
    pub fn modify(&mut self, registration: &CategoryRegistration) -> Result<bool, CategoryError> {
        let category = lookup(registration)?;
        let Some(info) = self.categories.get_mut(&category) else {
            return Ok(false);
        };
        info.merge(registration);
        Ok(true)
    }

    /// Applies every registration, then every modification. Bad identifiers
    /// are logged and skipped.
    pub fn process<'a>(
        &mut self,
        register: impl IntoIterator<Item = &'a CategoryRegistration>,
        modify: impl IntoIterator<Item = &'a CategoryRegistration>,
    ) {
        for registration in register {
            if let Err(err) = self.register(registration) {
                warn!("CategoryRegistry: skipping registration: {}", err);
            }
        }
        for registration in modify {
            if let Err(err) = self.modify(registration) {
                warn!("CategoryRegistry: skipping modification: {}", err);
            }
        }
    }

    pub fn info(&self, category: SlotCategory) -> Option<&CategoryInfo> {
        self.categories.get(&category)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CategoryInfo> {
        self.categories.values()
    }

    /// Whether `category` may occupy `slot`. Unregistered categories fit nowhere.
    pub fn is_valid_for_slot(&self, category: SlotCategory, slot: SlotIndex) -> bool {
        self.categories
            .get(&category)
            .map_or(false, |info| info.accepts(slot))
    }

    /// Logical slot count a new store needs so that every enabled category
    /// has all of its slots
    pub fn minimum_slots(&self) -> usize {
        self.categories
            .values()
            .filter(|info| info.enabled)
            .map(CategoryInfo::minimum_slots)
            .max()
            .unwrap_or(0)
    }
}

fn lookup(registration: &CategoryRegistration) -> Result<SlotCategory, CategoryError> {
    SlotCategory::from_identifier(&registration.identifier).ok_or_else(|| {
        CategoryError::UnknownIdentifier {
            identifier: registration.identifier.clone(),
        }
    })
}
