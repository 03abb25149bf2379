//! The encapsulation policy stored by every [`Encapsulator`](crate::Encapsulator).
//!
//! The value is opaque to this crate: variants are stored at construction
//! and handed back verbatim by `strategy()`. Interpreting them (when to
//! tunnel, when to send traffic in the clear) is the reconciler's job.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Error;

/// How traffic to a peer should be encapsulated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Never encapsulate.
    Never,
    /// Encapsulate only when the peer is in a different logical subnet.
    CrossSubnet,
    /// Always encapsulate.
    Always,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Strategy::Never => "never",
            Strategy::CrossSubnet => "crosssubnet",
            Strategy::Always => "always",
        };
        write!(f, "{s}")
    }
}

impl FromStr for Strategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "never" => Ok(Strategy::Never),
            "crosssubnet" => Ok(Strategy::CrossSubnet),
            "always" => Ok(Strategy::Always),
            other => Err(Error::UnknownStrategy(other.to_string())),
        }
    }
}
