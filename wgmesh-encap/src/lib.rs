//! Per-peer encapsulation strategies for the wgmesh overlay network.
//!
//! The route reconciler decides how traffic reaches each peer through the
//! [`Encapsulator`] contract. Each strategy variant implements the same
//! contract; this crate ships the route-delegation variant
//! ([`RouteDelegation`]), used when an external CNI router already provides
//! host-to-pod routing. That variant contributes no tunnel and no firewall
//! rules, but keeps track of the well-known bridge device the external
//! router creates so other routing decisions can reference its interface
//! index.
//!
//! **Limitation:** All operations are IPv4-only. IPv6 overlays are not
//! supported.

use thiserror::Error;

pub mod encapsulator;
pub mod firewall;
pub mod link_ops;
pub mod route_delegation;
pub mod strategy;

#[cfg(target_os = "linux")]
mod link_ops_linux;

#[cfg(test)]
mod mocks;

pub use encapsulator::Encapsulator;
pub use link_ops::{LinkEvent, LinkOps};
pub use route_delegation::{DELEGATE_DEVICE_NAME, RouteDelegation};
pub use strategy::Strategy;

#[cfg(target_os = "linux")]
pub use link_ops_linux::NetlinkLinkOps;
#[cfg(target_os = "linux")]
pub use route_delegation::route_delegation;

#[derive(Debug, Error)]
pub enum Error {
    /// The link-change notification subsystem could not be reached.
    /// Fatal to `init`; nothing was started.
    #[error("failed to subscribe to link updates")]
    Subscription(#[source] std::io::Error),
    /// Lookup-by-name failed for a reason other than "device not found".
    #[error("failed to query for the {device} interface")]
    Query {
        device: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// `init` was called on an instance that is already watching.
    #[error("encapsulator is already initialized")]
    AlreadyInitialized,
    #[error("unknown encapsulation strategy {0:?}")]
    UnknownStrategy(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    General(String),
}
