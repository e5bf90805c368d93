mod baubles_message;
mod error;
mod full_state;
mod slot_update;

pub use baubles_message::{encode_full_state, encode_slot_update, BaublesMessage, MessageKind};
pub use error::DecodeError;
pub use full_state::FullState;
pub use slot_update::SlotUpdate;
