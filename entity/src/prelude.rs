pub use super::idc::Entity as Idc;
pub use super::ip_addr::Entity as IpAddr;
pub use super::ip_expand::Entity as IpExpand;
pub use super::sea_orm_active_enums::{Category, NetFlag};
pub use super::vendor::Entity as Vendor;
pub use super::vlan::Entity as Vlan;
