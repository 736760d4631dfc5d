use async_trait::async_trait;
use tokio::sync::broadcast;

use ff_core::ports::BridgePort;
use ff_core::{DispatchError, Envelope, WindowToken};

/// The same-window broadcast channel both scopes post to and listen on.
///
/// Everything on the bus reaches every subscriber; the source token is
/// what receivers filter on. `sibling()` models another frame with
/// access to the same bus, which is exactly the spoofing scenario the
/// filter exists for.
pub struct WindowChannel {
    token: WindowToken,
    bus: broadcast::Sender<Envelope>,
}

impl WindowChannel {
    pub fn new() -> Self {
        let (bus, _) = broadcast::channel(64);
        Self {
            token: WindowToken::new(),
            bus,
        }
    }

    /// A channel handle with a different window token on the same bus.
    pub fn sibling(&self) -> Self {
        Self {
            token: WindowToken::new(),
            bus: self.bus.clone(),
        }
    }
}

impl Default for WindowChannel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BridgePort for WindowChannel {
    fn window(&self) -> WindowToken {
        self.token.clone()
    }

    async fn post(&self, envelope: Envelope) -> Result<(), DispatchError> {
        self.bus
            .send(envelope)
            .map(|_| ())
            .map_err(|_| DispatchError::ChannelClosed)
    }

    fn subscribe(&self) -> broadcast::Receiver<Envelope> {
        self.bus.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ff_core::PageMessage;

    #[tokio::test]
    async fn test_everything_on_the_bus_reaches_subscribers() {
        let channel = WindowChannel::new();
        let mut rx = channel.subscribe();
        channel
            .post(Envelope::new(channel.window(), PageMessage::Unknown))
            .await
            .unwrap();
        let env = rx.recv().await.unwrap();
        assert!(env.is_from(&channel.window()));
    }

    #[tokio::test]
    async fn test_sibling_posts_carry_a_foreign_token() {
        let ours = WindowChannel::new();
        let theirs = ours.sibling();
        let mut rx = ours.subscribe();

        theirs
            .post(Envelope::new(theirs.window(), PageMessage::Unknown))
            .await
            .unwrap();

        let env = rx.recv().await.unwrap();
        assert!(!env.is_from(&ours.window()));
    }
}
