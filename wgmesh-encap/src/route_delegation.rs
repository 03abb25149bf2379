//! Route-delegation encapsulation.
//!
//! Used when an external CNI router already provides host-to-pod routing:
//! traffic to a peer subnet is handed straight to that subnet's own
//! address, no tunnel is created and no firewall rules are contributed.
//! The only state this variant maintains is the OS interface index of the
//! well-known bridge device the external router creates, kept current by
//! a background watcher so other routing decisions can reference it.

use std::net::Ipv4Addr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use cidr::Ipv4Cidr;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::encapsulator::Encapsulator;
use crate::firewall;
use crate::link_ops::{LinkEvent, LinkOps};
use crate::{Error, Strategy};

/// The bridge device the external CNI router is expected to create.
pub const DELEGATE_DEVICE_NAME: &str = "cni-bridge";

/// Creates a route-delegation encapsulator backed by the kernel's
/// rtnetlink interface.
#[cfg(target_os = "linux")]
pub fn route_delegation(strategy: Strategy) -> Result<RouteDelegation<crate::NetlinkLinkOps>, Error> {
    Ok(RouteDelegation::new(strategy, crate::NetlinkLinkOps::connect()?))
}

/// [`Encapsulator`] that delegates routing to an external CNI router.
///
/// Generic over `L: LinkOps` so tests can inject mock link operations.
pub struct RouteDelegation<L: LinkOps> {
    strategy: Strategy,
    link_ops: L,
    /// Index of the delegate bridge device, 0 until first observed.
    iface: Arc<AtomicU32>,
    watch: Option<Watch>,
}

/// Lifecycle handle for the background link watcher.
struct Watch {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl<L: LinkOps> RouteDelegation<L> {
    pub fn new(strategy: Strategy, link_ops: L) -> Self {
        Self {
            strategy,
            link_ops,
            iface: Arc::new(AtomicU32::new(0)),
            watch: None,
        }
    }

    /// Cancels the watcher and waits for it to finish.
    async fn stop_watch(&mut self) {
        let Some(watch) = self.watch.take() else {
            return;
        };
        watch.cancel.cancel();
        if let Err(error) = watch.task.await {
            tracing::warn!(%error, "link watcher did not shut down cleanly");
        }
    }
}

#[async_trait]
impl<L: LinkOps> Encapsulator for RouteDelegation<L> {
    /// Starts the link watcher and resolves the delegate device's current
    /// index. The host interface index is not needed here; routing to
    /// peers is the external router's business.
    async fn init(&mut self, _host_iface_index: u32) -> Result<(), Error> {
        if self.watch.is_some() {
            return Err(Error::AlreadyInitialized);
        }

        let mut events = self.link_ops.subscribe().await?;
        let cancel = CancellationToken::new();
        let iface = Arc::clone(&self.iface);
        let token = cancel.clone();
        let task = tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    event = events.recv() => match event {
                        Some(LinkEvent { name, index }) if name == DELEGATE_DEVICE_NAME => {
                            iface.store(index, Ordering::SeqCst);
                            tracing::debug!(device = %name, index, "delegate device link update");
                        }
                        Some(_) => {}
                        None => break,
                    },
                }
            }
            tracing::debug!("link watcher stopped");
        });
        self.watch = Some(Watch { cancel, task });

        // The device may not exist yet; the watcher picks it up whenever
        // the external router creates it.
        match self.link_ops.link_index(DELEGATE_DEVICE_NAME).await {
            Ok(Some(index)) => {
                self.iface.store(index, Ordering::SeqCst);
                tracing::debug!(device = DELEGATE_DEVICE_NAME, index, "delegate device present");
            }
            Ok(None) => {
                tracing::debug!(
                    device = DELEGATE_DEVICE_NAME,
                    "delegate device not present yet, waiting for link updates"
                );
            }
            Err(e) => {
                self.stop_watch().await;
                return Err(e);
            }
        }
        Ok(())
    }

    async fn clean_up(&mut self) -> Result<(), Error> {
        self.stop_watch().await;
        Ok(())
    }

    /// Routing is delegated, so no gateway translation happens: the
    /// subnet's own address is the next hop.
    fn gw(&self, _node_ip: Ipv4Addr, _peer_ip: Ipv4Addr, subnet: &Ipv4Cidr) -> Ipv4Addr {
        subnet.first_address()
    }

    fn index(&self) -> u32 {
        self.iface.load(Ordering::SeqCst)
    }

    /// The external router owns the firewall surface; nothing to add.
    fn rules(&self, _subnets: &[Ipv4Cidr]) -> Vec<firewall::Rule> {
        Vec::new()
    }

    /// Network configuration is delegated externally.
    async fn set(&self, _subnet: &Ipv4Cidr) -> Result<(), Error> {
        Ok(())
    }

    fn strategy(&self) -> Strategy {
        self.strategy
    }
}
