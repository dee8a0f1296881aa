//! SeaORM entities for the netls schema.
//!
//! Every entity declares its table name explicitly; nothing is derived from
//! the Rust type name at runtime.

pub mod idc;
pub mod ip_addr;
pub mod ip_expand;
pub mod prelude;
pub mod sea_orm_active_enums;
pub mod vendor;
pub mod vlan;

pub use sea_orm;
