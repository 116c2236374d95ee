// Adapters layer: concrete implementations for external systems (http server, webhook relay).

pub mod http;
pub mod webhook;
