use async_trait::async_trait;
use orbit_shared::ChatMessage;

/// Produces a single reply from an ordered transcript.
///
/// The route hands over the validated messages exactly as received. An
/// implementation may fail for any reason; the error's display text is what
/// the caller ends up seeing.
#[async_trait]
pub trait Agent: Send + Sync {
    async fn run(&self, messages: Vec<ChatMessage>) -> anyhow::Result<String>;
}
