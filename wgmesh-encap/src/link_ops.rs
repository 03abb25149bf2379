//! Abstraction over OS link-change notifications for testability.
//!
//! Defines the [`LinkOps`] trait that decouples strategy logic from the
//! raw netlink wire format.
//!
//! Production code uses [`NetlinkLinkOps`](crate::NetlinkLinkOps) which
//! wraps an `rtnetlink` connection. Tests use stateful mocks (see the
//! `mocks` module).

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::Error;

/// A change to an OS network interface's attributes.
///
/// Delivery order is whatever the OS notification subsystem guarantees;
/// no reordering or coalescing happens on top of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkEvent {
    /// Interface name, e.g. "cni-bridge".
    pub name: String,
    /// OS-assigned interface index.
    pub index: u32,
}

/// Abstraction over the OS link-notification subsystem.
#[async_trait]
pub trait LinkOps: Send + Sync + 'static {
    /// Establishes a live stream of link-update events.
    ///
    /// Fails with [`Error::Subscription`] when the notification
    /// subsystem is unreachable. The stream stays open until the
    /// receiver is dropped.
    async fn subscribe(&self) -> Result<mpsc::UnboundedReceiver<LinkEvent>, Error>;

    /// Resolves a device name to its current interface index.
    ///
    /// `Ok(None)` means the device does not exist (not an error); any
    /// other failure is [`Error::Query`].
    async fn link_index(&self, name: &str) -> Result<Option<u32>, Error>;
}
