pub mod link_fix;
pub mod rewriter;

pub use crate::domain::model::{FixRequest, FixResponse, WebhookMessage};
pub use crate::domain::ports::{ConfigProvider, Relay};
pub use crate::utils::error::Result;
