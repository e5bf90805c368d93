mod baubles_server;
mod server_config;

pub use baubles_server::BaublesServer;
pub use server_config::ServerConfig;
