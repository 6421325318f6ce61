use http::HeaderMap;
use std::net::IpAddr;

/// Determines the client address of a request behind a known number of
/// reverse-proxy hops.
///
/// Each proxy in the chain prepends the address it saw to the forwarding
/// header, so the entries nearest the server end were written by the proxies
/// nearest the server. The resolver trusts exactly `trusted_hops` of those
/// entries; anything further out is client-controlled and ignored.
#[derive(Debug, Clone)]
pub struct ClientIpResolver {
    header: String,
    trusted_hops: usize,
}

impl ClientIpResolver {
    pub fn new(header: impl Into<String>, trusted_hops: usize) -> Self {
        ClientIpResolver {
            header: header.into(),
            trusted_hops,
        }
    }

    /// Resolve the client address from the forwarding header and the TCP
    /// peer address.
    ///
    /// With `trusted_hops == 0` the header is ignored entirely and the peer
    /// address is returned. Otherwise the result is the entry `trusted_hops`
    /// positions in from the server-adjacent end of the chain, or the
    /// furthest entry if the chain is shorter than that. A missing or
    /// malformed header falls back to the peer address.
    pub fn resolve(&self, headers: &HeaderMap, peer: IpAddr) -> IpAddr {
        if self.trusted_hops == 0 {
            return peer;
        }
        match self.forwarded_chain(headers) {
            Some(hops) if !hops.is_empty() => hops[hops.len().saturating_sub(self.trusted_hops)],
            _ => peer,
        }
    }

    /// The addresses declared by the forwarding header, client-first.
    ///
    /// `None` if the header is absent or any entry fails to parse; a chain
    /// with a bogus entry in it cannot be trusted positionally.
    fn forwarded_chain(&self, headers: &HeaderMap) -> Option<Vec<IpAddr>> {
        let value = headers.get(self.header.as_str())?.to_str().ok()?;
        value
            .split(',')
            .map(|hop| unbracketed(hop.trim()).parse::<IpAddr>().ok())
            .collect()
    }
}

/// Strip the brackets some proxies put around IPv6 entries.
fn unbracketed(hop: &str) -> &str {
    hop.strip_prefix('[')
        .and_then(|hop| hop.strip_suffix(']'))
        .unwrap_or(hop)
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;

    const PEER: IpAddr = IpAddr::V4(std::net::Ipv4Addr::new(10, 214, 9, 9));

    fn headers(forwarded: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_str(forwarded).unwrap());
        headers
    }

    fn resolve(trusted_hops: usize, forwarded: &str) -> IpAddr {
        ClientIpResolver::new("x-forwarded-for", trusted_hops).resolve(&headers(forwarded), PEER)
    }

    #[test]
    fn zero_trusted_hops_ignores_the_header() {
        assert_eq!(resolve(0, "1.2.3.4"), PEER);
    }

    #[test]
    fn one_trusted_hop_takes_the_header_value() {
        assert_eq!(resolve(1, "1.2.3.4"), "1.2.3.4".parse::<IpAddr>().unwrap());
    }

    #[test]
    fn hops_are_counted_from_the_server_adjacent_end() {
        assert_eq!(
            resolve(1, "203.0.113.5, 10.214.1.2"),
            "10.214.1.2".parse::<IpAddr>().unwrap()
        );
        assert_eq!(
            resolve(2, "203.0.113.5, 10.214.1.2"),
            "203.0.113.5".parse::<IpAddr>().unwrap()
        );
    }

    #[test]
    fn hop_count_beyond_the_chain_takes_the_furthest_entry() {
        assert_eq!(
            resolve(5, "203.0.113.5, 10.214.1.2"),
            "203.0.113.5".parse::<IpAddr>().unwrap()
        );
    }

    #[test]
    fn missing_header_falls_back_to_the_peer() {
        let resolver = ClientIpResolver::new("x-forwarded-for", 1);
        assert_eq!(resolver.resolve(&HeaderMap::new(), PEER), PEER);
    }

    #[test]
    fn malformed_header_falls_back_to_the_peer() {
        assert_eq!(resolve(1, ""), PEER);
        assert_eq!(resolve(1, "not-an-address"), PEER);
        // one bogus entry poisons the whole chain
        assert_eq!(resolve(1, "garbage, 10.214.1.2"), PEER);
    }

    #[test]
    fn bracketed_ipv6_entries_parse() {
        assert_eq!(
            resolve(1, "[2001:db8::1]"),
            "2001:db8::1".parse::<IpAddr>().unwrap()
        );
    }

    #[test]
    fn header_name_is_configurable() {
        let mut headers = HeaderMap::new();
        headers.insert("x-real-ip", HeaderValue::from_static("1.2.3.4"));
        let resolver = ClientIpResolver::new("x-real-ip", 1);
        assert_eq!(
            resolver.resolve(&headers, PEER),
            "1.2.3.4".parse::<IpAddr>().unwrap()
        );
    }
}
