use crate::addr::{self, Address};
use crate::error::AddrError;
use entity::sea_orm_active_enums::Category;
use std::net::Ipv4Addr;

impl Address {
    /// Every individual host this resource stands for, ascending.
    ///
    /// A host resource has no expansion of its own. Networks exclude their
    /// network and broadcast addresses except for /31 and /32.
    pub fn hosts(&self) -> Vec<Ipv4Addr> {
        match self {
            Address::Host(_) => Vec::new(),
            Address::Network(net) => {
                let first = u32::from(net.network());
                let last = u32::from(net.broadcast());
                match net.prefix() {
                    31 | 32 => (first..=last).map(Ipv4Addr::from).collect(),
                    _ => (first + 1..last).map(Ipv4Addr::from).collect(),
                }
            }
            Address::Range(range) => {
                let [a, b, c, start] = range.start().octets();
                let end = range.end().octets()[3];
                (start..=end).map(|d| Ipv4Addr::new(a, b, c, d)).collect()
            }
        }
    }
}

/// Expands a normalized address of the given category into its host list.
pub fn expand(category: Category, normalized: &str) -> Result<Vec<String>, AddrError> {
    let addr = addr::parse(normalized)?;
    if addr.category() != category {
        return Err(AddrError::Malformed);
    }
    Ok(addr.hosts().into_iter().map(|ip| ip.to_string()).collect())
}
