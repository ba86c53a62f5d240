use super::GenerateStrategy;
use crate::models::JobRequest;
use crate::Result;
use async_trait::async_trait;

/// Stock image served when every real transport has failed.
pub const PLACEHOLDER_IMAGE_URL: &str =
    "https://images.unsplash.com/photo-1637858868799-7f26a0640eb6?q=80&w=2000";

/// Terminal fallback: a local synthetic result that cannot fail, so a
/// chain ending in it always resolves. Only enabled by explicit
/// configuration since it substitutes a stock image for a real failure.
pub struct PlaceholderStrategy;

#[async_trait]
impl GenerateStrategy for PlaceholderStrategy {
    fn name(&self) -> &str {
        "placeholder"
    }

    async fn generate(&self, request: &JobRequest) -> Result<String> {
        tracing::info!(
            "Serving placeholder image for prompt '{}'",
            request.input.prompt
        );
        Ok(PLACEHOLDER_IMAGE_URL.to_string())
    }
}
