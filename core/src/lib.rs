//! Address management services: parsing, fingerprinting and expansion of IPv4
//! resources, plus the vendor, facility and VLAN registries around them.
//!
//! Every service is a unit struct of async functions taking a [`DbConn`].
//! Writes run inside [`txn::transactional`].
//!
//! [`DbConn`]: sea_orm::DbConn

pub mod addr;
mod error;
pub mod expand;
pub mod filter;
pub mod fingerprint;
mod idc;
mod ipaddr;
pub mod patch;
mod stats;
pub mod txn;
mod vendor;
mod vlan;

pub use error::*;
pub use idc::*;
pub use ipaddr::*;
pub use stats::*;
pub use vendor::*;
pub use vlan::*;

pub use entity;
pub use sea_orm;
