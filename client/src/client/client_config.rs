use std::default::Default;

use baubles_shared::{MessagePoolConfig, StringPoolConfig};

/// Contains Config properties which will be used by a Client
#[derive(Clone, Debug, Default)]
pub struct ClientConfig {
    /// Limits of the pool that deduplicates item identifiers in received payloads
    pub string_pool: StringPoolConfig,
    /// Sizing of the pool of messages decoded into
    pub message_pool: MessagePoolConfig,
}
