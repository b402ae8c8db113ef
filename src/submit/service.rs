use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

/// Backend endpoint creating one resource.
///
/// `Ok(None)` stands for an empty response body, which the forms treat as a
/// failed creation.
#[async_trait]
pub trait CreateService<P>: Send + Sync
where
    P: Send + 'static,
{
    async fn create(&self, payload: P) -> Result<Option<Value>>;
}
