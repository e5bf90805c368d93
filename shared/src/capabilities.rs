use crate::{EntityId, Payload, SlotCategory};

/// Item behaviour supplied by the host game.
///
/// Only `classify` is required. The other hooks default to permissive no-ops,
/// matching items that do not implement them.
pub trait ItemCapabilities<P: Payload>: Send + Sync {
    /// Category of a slot item, or `None` when the payload is not one
    fn classify(&self, payload: &P) -> Option<SlotCategory>;

    /// Whether changes to this payload are pushed without the slot being
    /// marked dirty
    fn will_auto_sync(&self, _payload: &P, _owner: EntityId) -> bool {
        false
    }

    fn can_equip(&self, _payload: &P, _owner: EntityId) -> bool {
        true
    }

    fn can_unequip(&self, _payload: &P, _owner: EntityId) -> bool {
        true
    }

    fn can_right_click_equip(&self, _payload: &P) -> bool {
        true
    }

    fn on_equipped(&self, _payload: &P, _owner: EntityId) {}

    fn on_unequipped(&self, _payload: &P, _owner: EntityId) {}

    /// Called once per tick for every worn payload
    fn on_worn_tick(&self, _payload: &P, _owner: EntityId) {}
}
