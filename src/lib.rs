pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::{http::router, webhook::DiscordWebhook};
pub use config::CliConfig;
pub use core::{link_fix::LinkFixService, rewriter::RuleSet};
pub use utils::error::{LinkFixError, Result};
