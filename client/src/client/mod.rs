mod baubles_client;
mod client_config;

pub use baubles_client::BaublesClient;
pub use client_config::ClientConfig;
