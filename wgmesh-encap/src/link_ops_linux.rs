//! Production [`LinkOps`] backed by rtnetlink.

use async_trait::async_trait;
use futures::{StreamExt, TryStreamExt};
use netlink_packet_core::NetlinkPayload;
use netlink_packet_route::RouteNetlinkMessage;
use netlink_packet_route::link::{LinkAttribute, LinkMessage};
use netlink_sys::{AsyncSocket, SocketAddr};
use rtnetlink::constants::RTMGRP_LINK;
use tokio::sync::mpsc;

use crate::Error;
use crate::link_ops::{LinkEvent, LinkOps};

/// Talks to the kernel's rtnetlink interface for link queries and
/// link-change notifications.
pub struct NetlinkLinkOps {
    handle: rtnetlink::Handle,
}

impl NetlinkLinkOps {
    /// Opens the rtnetlink connection used for link queries.
    pub fn connect() -> Result<Self, Error> {
        let (conn, handle, _) = rtnetlink::new_connection()?;
        tokio::task::spawn(conn); // Task terminates once the handle is dropped
        Ok(Self { handle })
    }
}

#[async_trait]
impl LinkOps for NetlinkLinkOps {
    async fn subscribe(&self) -> Result<mpsc::UnboundedReceiver<LinkEvent>, Error> {
        // Dedicated connection for notifications: the multicast group must
        // be joined before the connection driver starts.
        let (mut conn, handle, mut messages) = rtnetlink::new_connection().map_err(Error::Subscription)?;
        conn.socket_mut()
            .socket_mut()
            .bind(&SocketAddr::new(0, RTMGRP_LINK))
            .map_err(Error::Subscription)?;
        tokio::task::spawn(conn);

        let (tx, rx) = mpsc::unbounded_channel();
        tokio::task::spawn(async move {
            // The connection driver shuts down once every handle is gone,
            // so the forwarder owns one for the lifetime of the stream.
            let _handle = handle;
            while let Some((message, _)) = messages.next().await {
                let NetlinkPayload::InnerMessage(inner) = message.payload else {
                    continue;
                };
                // Deletions are forwarded too; the event simply reports
                // whatever index the kernel announced for the link.
                let link = match inner {
                    RouteNetlinkMessage::NewLink(link) | RouteNetlinkMessage::DelLink(link) => link,
                    _ => continue,
                };
                let Some(name) = link_name(&link) else {
                    continue;
                };
                let event = LinkEvent {
                    name,
                    index: link.header.index,
                };
                if tx.send(event).is_err() {
                    // Receiver gone, the watcher has stopped.
                    break;
                }
            }
            tracing::debug!("link notification stream closed");
        });
        Ok(rx)
    }

    async fn link_index(&self, name: &str) -> Result<Option<u32>, Error> {
        let links: Vec<LinkMessage> = self
            .handle
            .link()
            .get()
            .execute()
            .try_collect()
            .await
            .map_err(|e| Error::Query {
                device: name.to_string(),
                source: Box::new(e),
            })?;

        Ok(links.iter().find_map(|link| {
            link_name(link).filter(|n| n == name).map(|_| link.header.index)
        }))
    }
}

fn link_name(link: &LinkMessage) -> Option<String> {
    link.attributes.iter().find_map(|attr| match attr {
        LinkAttribute::IfName(name) => Some(name.clone()),
        _ => None,
    })
}
