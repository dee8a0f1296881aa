//! Classification of raw address input.
//!
//! Three shapes are accepted, all IPv4:
//!
//! | input              | category | normalized       |
//! |--------------------|----------|------------------|
//! | `10.1.2.3`         | Host     | `10.1.2.3`       |
//! | `10.1.2.0/24`      | Network  | `10.1.2.0/24`    |
//! | `10.1.2.10~20`     | Range    | `10.1.2.10~20`   |
//! | `10.1.2.10~10.1.2.20` | Range | `10.1.2.10~20`   |

use crate::error::AddrError;
use entity::sea_orm_active_enums::Category;
use ipnetwork::Ipv4Network;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr};

/// A validated address resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Address {
    Host(Ipv4Addr),
    Network(Ipv4Network),
    Range(IpRange),
}

/// Consecutive hosts inside one /24, `start` and `end` inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IpRange {
    start: Ipv4Addr,
    end: u8,
}

impl IpRange {
    pub fn start(&self) -> Ipv4Addr {
        self.start
    }

    pub fn end(&self) -> Ipv4Addr {
        let [a, b, c, _] = self.start.octets();
        Ipv4Addr::new(a, b, c, self.end)
    }
}

impl fmt::Display for IpRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}~{}", self.start, self.end)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Address::Host(ip) => write!(f, "{ip}"),
            Address::Network(net) => write!(f, "{}/{}", net.ip(), net.prefix()),
            Address::Range(range) => write!(f, "{range}"),
        }
    }
}

impl Address {
    pub fn category(&self) -> Category {
        match self {
            Address::Host(_) => Category::Host,
            Address::Network(_) => Category::Network,
            Address::Range(_) => Category::Range,
        }
    }
}

/// Parse and validate a raw address.
pub fn parse(raw: &str) -> Result<Address, AddrError> {
    let raw = raw.trim();
    let slashes = raw.matches('/').count();
    let tildes = raw.matches('~').count();

    match (slashes, tildes) {
        (0, 0) => parse_ipv4(raw).map(Address::Host),
        (1, 0) => parse_network(raw).map(Address::Network),
        (0, 1) => parse_range(raw).map(Address::Range),
        _ => Err(AddrError::Malformed),
    }
}

/// Returns the canonical form of `raw` together with its category.
pub fn classify(raw: &str) -> Result<(String, Category), AddrError> {
    let addr = parse(raw)?;
    Ok((addr.to_string(), addr.category()))
}

fn parse_ipv4(s: &str) -> Result<Ipv4Addr, AddrError> {
    match s.trim().parse::<IpAddr>() {
        Ok(IpAddr::V4(ip)) => Ok(ip),
        Ok(IpAddr::V6(_)) => Err(AddrError::OnlyIpv4),
        Err(_) => Err(AddrError::NotIpv4Host),
    }
}

/// A non-empty run of ASCII digits that fits in a `u8`.
fn decimal(s: &str) -> Option<u8> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

fn parse_network(s: &str) -> Result<Ipv4Network, AddrError> {
    let (ip, prefix) = s.split_once('/').ok_or(AddrError::Malformed)?;
    let ip = match parse_ipv4(ip) {
        Err(AddrError::NotIpv4Host) => {
            return Err(AddrError::InvalidNetwork(format!("bad network address {s}")))
        }
        other => other?,
    };
    let prefix = decimal(prefix.trim())
        .ok_or_else(|| AddrError::InvalidNetwork(format!("bad prefix length in {s}")))?;
    let net = Ipv4Network::new(ip, prefix).map_err(|e| AddrError::InvalidNetwork(e.to_string()))?;
    if net.network() != ip {
        return Err(AddrError::InvalidNetwork(format!("{s} has host bits set")));
    }
    Ok(net)
}

fn parse_range(s: &str) -> Result<IpRange, AddrError> {
    let (start, end) = s.split_once('~').ok_or(AddrError::Malformed)?;
    let start = parse_ipv4(start)?;
    let end = end.trim();

    let end = if end.contains('.') {
        let end_ip = match parse_ipv4(end) {
            Err(AddrError::NotIpv4Host) => {
                return Err(AddrError::InvalidRange(format!("bad range end {end}")))
            }
            other => other?,
        };
        let (s_oct, e_oct) = (start.octets(), end_ip.octets());
        if s_oct[..3] != e_oct[..3] {
            return Err(AddrError::InvalidRange(format!(
                "{end_ip} is outside the /24 of {start}"
            )));
        }
        e_oct[3]
    } else {
        decimal(end).ok_or_else(|| AddrError::InvalidRange(format!("range end {end} is not within 0-255")))?
    };

    if end < start.octets()[3] {
        return Err(AddrError::RangeStartAfterEnd);
    }
    Ok(IpRange { start, end })
}
