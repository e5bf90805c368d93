mod error;
mod registry;
mod slot_category;

pub use error::CategoryError;
pub use registry::{CategoryInfo, CategoryRegistration, CategoryRegistry};
pub use slot_category::{SlotCategory, ValidSlots};
