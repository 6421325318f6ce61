use ipnet::IpNet;
use serde::{de::Visitor, Deserialize, Deserializer};
use std::fmt::{self, Display};
use std::net::IpAddr;
use std::str::FromStr;
use thiserror::Error;

/// A single permitted origin, either a literal address or a CIDR range.
///
/// Parses from the textual forms used in configuration: `"45.232.149.130"`
/// for a literal address, `"10.214.0.0/16"` for a range. Prefix lengths are
/// validated against the address family of the base (0-32 for IPv4, 0-128
/// for IPv6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllowListEntry {
    Exact(IpAddr),
    Range(IpNet),
}

impl AllowListEntry {
    /// Whether this entry permits `addr`.
    ///
    /// Exact entries compare parsed addresses, so the comparison is on
    /// canonical forms and an IPv4-mapped IPv6 address does not match its
    /// IPv4 counterpart. Range entries compare the masked prefix; an
    /// address of the other family is simply not a match.
    pub fn matches(&self, addr: IpAddr) -> bool {
        match self {
            AllowListEntry::Exact(exact) => *exact == addr,
            AllowListEntry::Range(net) => net.contains(&addr),
        }
    }
}

#[derive(Debug, Error)]
pub enum ParseEntryError {
    #[error("invalid address: {0}")]
    Addr(#[from] std::net::AddrParseError),
    #[error("invalid address range: {0}")]
    Range(#[from] ipnet::AddrParseError),
}

impl FromStr for AllowListEntry {
    type Err = ParseEntryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.contains('/') {
            Ok(AllowListEntry::Range(s.parse()?))
        } else {
            Ok(AllowListEntry::Exact(s.parse()?))
        }
    }
}

impl Display for AllowListEntry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AllowListEntry::Exact(addr) => addr.fmt(f),
            AllowListEntry::Range(net) => net.fmt(f),
        }
    }
}

impl<'de> Deserialize<'de> for AllowListEntry {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct V;

        impl<'de> Visitor<'de> for V {
            type Value = AllowListEntry;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("an IP address or CIDR range like 10.214.0.0/16")
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                value.parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_str(V)
    }
}

/// The set of permitted origins, built once at startup and never mutated.
///
/// Membership is existential: any matching entry permits the address, and
/// entry order does not affect the result.
#[derive(Debug, Clone, Default)]
pub struct AllowList {
    entries: Vec<AllowListEntry>,
}

impl AllowList {
    pub fn new(entries: Vec<AllowListEntry>) -> Self {
        AllowList { entries }
    }

    /// Whether `addr` matches any entry. First match short-circuits.
    pub fn contains(&self, addr: IpAddr) -> bool {
        self.entries.iter().any(|entry| entry.matches(addr))
    }

    /// Check an address in textual form.
    ///
    /// A value that does not parse as an address of any supported family is
    /// logged and treated as not allowed, never an error.
    pub fn allows(&self, addr: &str) -> bool {
        match addr.parse::<IpAddr>() {
            Ok(addr) => self.contains(addr),
            Err(_) => {
                tracing::warn!("unparseable client address {addr:?}");
                false
            }
        }
    }
}

impl FromIterator<AllowListEntry> for AllowList {
    fn from_iter<I: IntoIterator<Item = AllowListEntry>>(iter: I) -> Self {
        AllowList::new(iter.into_iter().collect())
    }
}
