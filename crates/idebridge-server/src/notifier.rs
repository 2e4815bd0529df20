//! Delivers "tools changed" to the connected MCP client

use async_trait::async_trait;
use parking_lot::RwLock;
use rmcp::service::{Peer, RoleServer};

use idebridge_core::ChangeNotifier;

/// Sends `notifications/tools/list_changed` once a client is attached.
///
/// Events raised before [`attach`](Self::attach) are dropped; the client
/// lists tools after `initialize` anyway.
#[derive(Default)]
pub struct PeerNotifier {
    peer: RwLock<Option<Peer<RoleServer>>>,
}

impl PeerNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attach(&self, peer: Peer<RoleServer>) {
        *self.peer.write() = Some(peer);
    }

    pub fn is_attached(&self) -> bool {
        self.peer.read().is_some()
    }
}

#[async_trait]
impl ChangeNotifier for PeerNotifier {
    async fn tools_changed(&self) {
        let peer = self.peer.read().clone();
        let Some(peer) = peer else {
            tracing::debug!("Tool list changed before a client connected");
            return;
        };
        if let Err(e) = peer.notify_tool_list_changed().await {
            tracing::warn!("Failed to send tools/list_changed: {}", e);
        }
    }
}
