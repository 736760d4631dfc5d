use async_trait::async_trait;

use crate::errors::DispatchError;
use crate::ids::WindowToken;
use crate::message::Envelope;

/// Port for the same-window broadcast channel connecting the isolated
/// scope to page-scope processing adapters.
///
/// There is no shared memory across the seam; envelopes are the only
/// traffic. Every receiver must drop envelopes whose source is not its
/// own window token.
#[async_trait]
pub trait BridgePort: Send + Sync {
    /// The token identifying this window. Envelopes are stamped with it
    /// on post and filtered against it on receive.
    fn window(&self) -> WindowToken;

    /// Post an envelope onto the channel. Fire and forget: correlation
    /// happens later via the message's correlation id.
    async fn post(&self, envelope: Envelope) -> Result<(), DispatchError>;

    /// Subscribe to everything on the channel, own posts included.
    fn subscribe(&self) -> tokio::sync::broadcast::Receiver<Envelope>;
}
