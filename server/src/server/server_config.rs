use std::default::Default;

use baubles_shared::{MessagePoolConfig, StringPoolConfig, TypeCacheConfig};

/// Contains Config properties which will be used by the Server
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Limits of the pool that deduplicates item identifiers
    pub string_pool: StringPoolConfig,
    /// Sizing of the slot update message pool
    pub message_pool: MessagePoolConfig,
    /// Diagnostics of the item type cache
    pub type_cache: TypeCacheConfig,
    /// Whether `add_item` may equip items directly from a player's hand
    pub right_click_equip: bool,
    /// When set, `drop_all` keeps every payload in place
    pub keep_inventory: bool,
    /// Whether `drop_all` compacts the emptied store back to its minimum size
    pub compact_after_drop: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            string_pool: StringPoolConfig::default(),
            message_pool: MessagePoolConfig::default(),
            type_cache: TypeCacheConfig::default(),
            right_click_equip: true,
            keep_inventory: false,
            compact_after_drop: true,
        }
    }
}
