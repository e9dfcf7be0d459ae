// Client configuration context.
//
// Settings are loaded once at startup into an explicit ClientConfig value
// that is handed to the components which need it.

pub mod client_config;

pub use client_config::{CONFIG_FILE, ClientConfig, ConfigOverrides};
