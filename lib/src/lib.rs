//! Gate incoming requests on their network origin.
//!
//! A [`Gatekeeper`] pairs a [`ClientIpResolver`], which determines the client
//! address behind a configurable number of trusted reverse-proxy hops, with an
//! [`AllowList`] of literal addresses and CIDR ranges. Evaluating a request
//! yields a [`Decision`] carrying the resolved address, so callers can log it
//! and echo it back in rejection responses.
//!
//! ```
//! use portero::{AllowList, ClientIpResolver, Decision, Gatekeeper};
//! use http::HeaderMap;
//! use std::net::IpAddr;
//!
//! let allow_list: AllowList = ["45.232.149.130", "10.214.0.0/16"]
//!     .iter()
//!     .map(|entry| entry.parse().unwrap())
//!     .collect();
//! let gatekeeper = Gatekeeper::new(ClientIpResolver::new("x-forwarded-for", 1), allow_list);
//!
//! let peer = IpAddr::from([10, 214, 9, 9]);
//! assert!(matches!(gatekeeper.evaluate(&HeaderMap::new(), peer), Decision::Allow { .. }));
//! ```

pub mod allowlist;
pub mod resolver;

pub use crate::allowlist::{AllowList, AllowListEntry};
pub use crate::resolver::ClientIpResolver;

use http::HeaderMap;
use std::net::IpAddr;

/// The outcome of evaluating a single request.
///
/// Both variants carry the address the request was attributed to, letting the
/// caller report exactly which address was accepted or rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow { addr: IpAddr },
    Deny { addr: IpAddr },
}

impl Decision {
    /// The address the request was attributed to, whichever way it went.
    pub fn addr(&self) -> IpAddr {
        match self {
            Decision::Allow { addr } | Decision::Deny { addr } => *addr,
        }
    }
}

/// Resolves the client address of a request and checks it against the
/// allow-list.
///
/// Holds no mutable state; a single instance can be shared across concurrent
/// requests without synchronization.
#[derive(Debug, Clone)]
pub struct Gatekeeper {
    resolver: ClientIpResolver,
    allow_list: AllowList,
}

impl Gatekeeper {
    pub fn new(resolver: ClientIpResolver, allow_list: AllowList) -> Self {
        Gatekeeper {
            resolver,
            allow_list,
        }
    }

    /// Evaluate one request from its headers and TCP peer address.
    ///
    /// Pure and immediate; repeated evaluation of the same input yields the
    /// same decision.
    pub fn evaluate(&self, headers: &HeaderMap, peer: IpAddr) -> Decision {
        let addr = self.resolver.resolve(headers, peer);
        if self.allow_list.contains(addr) {
            Decision::Allow { addr }
        } else {
            Decision::Deny { addr }
        }
    }
}
