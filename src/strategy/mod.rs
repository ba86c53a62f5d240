//! Transport strategies for the generate operation
//!
//! Each strategy is one concrete way of turning a [`JobRequest`] into an
//! image URL: a proxy that performs submit+poll server-side, a direct
//! call against the predictions API, or a local placeholder. They share
//! one signature so the orchestrator can try them in order.

pub mod direct;
pub mod mock;
pub mod placeholder;
pub mod proxy;

pub use direct::DirectStrategy;
pub use mock::MockStrategy;
pub use placeholder::{PlaceholderStrategy, PLACEHOLDER_IMAGE_URL};
pub use proxy::ProxyStrategy;

use crate::models::JobRequest;
use crate::Result;
use async_trait::async_trait;

#[async_trait]
pub trait GenerateStrategy: Send + Sync {
    /// Short label used when reporting per-strategy failures.
    fn name(&self) -> &str;

    /// Run the full generation for this transport, returning one usable
    /// image URL.
    async fn generate(&self, request: &JobRequest) -> Result<String>;
}
