mod error;
mod http_client;

pub use error::{AdminError, AdminResult};
pub use http_client::HttpAdminClient;

use async_trait::async_trait;

/// Administrative connection to a CMS server.
///
/// The startup and shutdown sequencers drive a server exclusively through
/// this interface; [`HttpAdminClient`] is the production implementation.
#[async_trait]
pub trait AdminConnection: Send + Sync {
    /// Establish the connection.
    ///
    /// Idempotent; calling it on an established connection is a no-op.
    async fn connect(&self) -> AdminResult<()>;

    /// Whether the connection is established and the server still answers.
    async fn is_connected(&self) -> bool;

    /// Numeric startup run level currently reported by the server.
    async fn run_level(&self) -> AdminResult<u8>;

    /// Ask the server to shut itself down.
    ///
    /// A connection torn down by the dying server surfaces as
    /// [`AdminError::ConnectionSevered`].
    async fn stop_server(&self) -> AdminResult<()>;

    /// Release the local handle. Best-effort, never fails.
    async fn disconnect(&self);
}
