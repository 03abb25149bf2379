//! The contract every encapsulation strategy variant implements.
//!
//! The route reconciler is the sole caller: it selects a variant at
//! startup, calls [`Encapsulator::init`] once, then queries the accessors
//! at its own cadence (possibly from several logical callers at once)
//! while link state changes asynchronously in the background, and calls
//! [`Encapsulator::clean_up`] once at shutdown.

use std::net::Ipv4Addr;

use async_trait::async_trait;
use cidr::Ipv4Cidr;

use crate::firewall;
use crate::{Error, Strategy};

/// A per-peer traffic-handling strategy.
///
/// Accessor methods must be safe under concurrent invocation with any
/// other method and must never block beyond a short synchronized read.
#[async_trait]
pub trait Encapsulator: Send + Sync {
    /// One-time setup: subscribe to link updates and resolve the current
    /// state of the interface this strategy tracks.
    ///
    /// A tracked device that does not exist yet is NOT an error; its
    /// index is populated later from link updates. Calling `init` a
    /// second time returns [`Error::AlreadyInitialized`].
    async fn init(&mut self, host_iface_index: u32) -> Result<(), Error>;

    /// Stops the background watcher and releases its resources.
    ///
    /// Waits for the watcher to finish, so no further background
    /// mutation is possible once this returns. Idempotent: calling it
    /// again is a no-op.
    async fn clean_up(&mut self) -> Result<(), Error>;

    /// The gateway IP to use when routing to a peer. Pure; no side
    /// effects.
    fn gw(&self, node_ip: Ipv4Addr, peer_ip: Ipv4Addr, subnet: &Ipv4Cidr) -> Ipv4Addr;

    /// Current best-known OS interface index of the relevant device for
    /// this strategy, 0 if not yet observed. Reflects watcher updates
    /// without external synchronization by the caller.
    fn index(&self) -> u32;

    /// Firewall rules this strategy requires for the given peer subnets.
    /// May be empty.
    fn rules(&self, subnets: &[Ipv4Cidr]) -> Vec<firewall::Rule>;

    /// Applies strategy-specific network configuration for a subnet.
    /// May be a no-op.
    async fn set(&self, subnet: &Ipv4Cidr) -> Result<(), Error>;

    /// The policy value this instance was constructed with.
    fn strategy(&self) -> Strategy;
}
