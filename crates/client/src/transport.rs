//! Transport seam: the single async boundary of the client.

use async_trait::async_trait;
use modelkv_protocol::{CommandArg, Reply};
use thiserror::Error;

/// Opaque transport fault, propagated to callers unchanged.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct TransportError(Box<dyn std::error::Error + Send + Sync>);

impl TransportError {
    pub fn new(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self(source.into())
    }
}

/// A request/response connection able to send one flat command and await
/// its reply. Connection lifecycle, pooling and retries all live behind
/// this trait; the client only suspends here. Cancellation is the caller
/// abandoning the awaited call.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send_command(
        &self,
        command: &str,
        args: Vec<CommandArg>,
    ) -> Result<Reply, TransportError>;
}
