//! Stateful mocks for the link-ops trait abstraction.
//!
//! The mock tracks actual state (which links exist, who is subscribed)
//! rather than just verifying call sequences, and lets tests inject
//! synthetic link-update events into live subscriptions.
//!
//! Uses `Arc<Mutex<_>>` for interior mutability in async contexts.

#![cfg(test)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

use crate::Error;
use crate::link_ops::{LinkEvent, LinkOps};

#[derive(Debug, Default)]
pub struct LinkOpsState {
    /// Links that currently exist: (name, index).
    pub links: Vec<(String, u32)>,
    /// Map of operation name -> error message. If set, the operation will fail.
    pub fail_on: HashMap<String, String>,
    /// Senders for every live subscription.
    pub subscribers: Vec<mpsc::UnboundedSender<LinkEvent>>,
}

impl LinkOpsState {
    fn check_fail(&self, op: &str) -> Result<(), Error> {
        if let Some(msg) = self.fail_on.get(op) {
            Err(Error::General(msg.clone()))
        } else {
            Ok(())
        }
    }
}

#[derive(Clone)]
pub struct MockLinkOps {
    pub state: Arc<Mutex<LinkOpsState>>,
}

impl MockLinkOps {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(LinkOpsState::default())),
        }
    }

    pub fn with_state(state: LinkOpsState) -> Self {
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    /// Delivers a synthetic link-update event to all live subscriptions.
    ///
    /// Sends to closed subscriptions are silently dropped, mirroring the
    /// kernel not caring whether anyone still listens.
    pub fn send_event(&self, event: LinkEvent) {
        let s = self.state.lock().unwrap();
        for tx in &s.subscribers {
            let _ = tx.send(event.clone());
        }
    }
}

#[async_trait]
impl LinkOps for MockLinkOps {
    async fn subscribe(&self) -> Result<mpsc::UnboundedReceiver<LinkEvent>, Error> {
        let mut s = self.state.lock().unwrap();
        s.check_fail("subscribe")?;
        let (tx, rx) = mpsc::unbounded_channel();
        s.subscribers.push(tx);
        Ok(rx)
    }

    async fn link_index(&self, name: &str) -> Result<Option<u32>, Error> {
        let s = self.state.lock().unwrap();
        s.check_fail("link_index")?;
        Ok(s.links.iter().find(|(n, _)| n == name).map(|(_, index)| *index))
    }
}
