//! Filter sets and pagination for the list endpoints.
//!
//! Every filter field is optional. Blank strings and the "any" codes are
//! dropped before the condition is built, so a default filter selects all.

use crate::error::ServiceResult;
use crate::patch::{reference, text};
use entity::sea_orm_active_enums::NetFlag;
use entity::{idc, ip_addr, ip_expand, vendor, vlan};
use sea_orm::{
    sea_query::IntoCondition, ActiveEnum, ColumnTrait, Condition, ConnectionTrait, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Select,
};
use serde::{de, Deserialize, Deserializer, Serialize};

/// Tri-state filter over `is_assigned`, sent as `1`, `0` or `-1`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Assigned {
    Yes,
    No,
    #[default]
    Any,
}

impl Assigned {
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            1 => Some(Assigned::Yes),
            0 => Some(Assigned::No),
            -1 => Some(Assigned::Any),
            _ => None,
        }
    }

    fn condition<C: ColumnTrait>(self, col: C) -> Option<Condition> {
        match self {
            Assigned::Yes => Some(col.eq(true).into_condition()),
            Assigned::No => Some(col.eq(false).into_condition()),
            Assigned::Any => None,
        }
    }
}

impl<'de> Deserialize<'de> for Assigned {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let code = i32::deserialize(deserializer)?;
        Assigned::from_code(code)
            .ok_or_else(|| de::Error::custom(format!("invalid assigned state: {code}")))
    }
}

// `-1` and absence both mean any flag.
fn flag_or_any<'de, D>(deserializer: D) -> Result<Option<NetFlag>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<i32>::deserialize(deserializer)? {
        None | Some(-1) => Ok(None),
        Some(code) => NetFlag::try_from_value(&code)
            .map(Some)
            .map_err(|_| de::Error::custom(format!("invalid network flag: {code}"))),
    }
}

/// Page selection. `page` is 1-indexed; page `0` returns the full set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u64,
    pub page_size: u64,
}

impl Pagination {
    pub fn new(page: u64, page_size: u64) -> Self {
        Self { page, page_size }
    }

    pub fn all() -> Self {
        Self::new(0, 0)
    }

    /// Offset and limit of the page, `None` for the full set.
    pub fn window(&self) -> Option<(u64, u64)> {
        if self.page == 0 {
            return None;
        }
        let size = self.page_size.max(1);
        Some(((self.page - 1) * size, size))
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::all()
    }
}

/// Total match count and the requested page of rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Listing<T> {
    pub count: u64,
    pub list: Vec<T>,
}

pub(crate) async fn fetch<C, E>(
    db: &C,
    select: Select<E>,
    pagination: Pagination,
) -> ServiceResult<Listing<E::Model>>
where
    C: ConnectionTrait,
    E: EntityTrait,
    E::Model: Sync,
{
    if pagination.window().is_none() {
        let list = select.all(db).await?;
        return Ok(Listing {
            count: list.len() as u64,
            list,
        });
    }

    let paginator = select.paginate(db, pagination.page_size.max(1));
    let count = paginator.num_items().await?;
    let list = paginator.fetch_page(pagination.page - 1).await?;
    Ok(Listing { count, list })
}

fn contains<C: ColumnTrait>(col: C, value: &Option<String>) -> Option<Condition> {
    text(value).map(|v| col.contains(v).into_condition())
}

fn equals<C: ColumnTrait>(col: C, value: &Option<String>) -> Option<Condition> {
    text(value).map(|v| col.eq(v).into_condition())
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct IpAddrFilter {
    pub vlan_id: Option<String>,
    #[serde(deserialize_with = "flag_or_any")]
    pub flag: Option<NetFlag>,
    pub ipaddr: Option<String>,
    pub is_assigned: Assigned,
    pub assignment: Option<String>,
    pub idc_name: Option<String>,
    pub ip_owner: Option<String>,
}

impl IpAddrFilter {
    pub fn condition(&self) -> Condition {
        Condition::all()
            .add_option(equals(ip_addr::Column::VlanId, &self.vlan_id))
            .add_option(self.flag.map(|f| ip_addr::Column::Flag.eq(f)))
            .add_option(contains(ip_addr::Column::Ipaddr, &self.ipaddr))
            .add_option(self.is_assigned.condition(ip_addr::Column::IsAssigned))
            .add_option(contains(ip_addr::Column::Assignment, &self.assignment))
            .add_option(contains(ip_addr::Column::IdcName, &self.idc_name))
            .add_option(equals(ip_addr::Column::IpOwner, &self.ip_owner))
    }

    pub fn select(&self) -> Select<ip_addr::Entity> {
        ip_addr::Entity::find()
            .filter(self.condition())
            .order_by_desc(ip_addr::Column::CreatedAt)
            .order_by_desc(ip_addr::Column::Id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ExpandFilter {
    pub ipaddr_id: Option<i32>,
    #[serde(deserialize_with = "flag_or_any")]
    pub flag: Option<NetFlag>,
    pub ipaddr: Option<String>,
    pub is_assigned: Assigned,
    pub assignment: Option<String>,
    pub relate_inf: Option<String>,
    pub idc_device: Option<String>,
    pub idc_dev_port: Option<String>,
}

impl ExpandFilter {
    pub fn condition(&self) -> Condition {
        Condition::all()
            .add_option(reference(self.ipaddr_id).map(|id| ip_expand::Column::IpaddrId.eq(id)))
            .add_option(self.flag.map(|f| ip_expand::Column::Flag.eq(f)))
            .add_option(contains(ip_expand::Column::Ipaddr, &self.ipaddr))
            .add_option(self.is_assigned.condition(ip_expand::Column::IsAssigned))
            .add_option(contains(ip_expand::Column::Assignment, &self.assignment))
            .add_option(contains(ip_expand::Column::RelateInf, &self.relate_inf))
            .add_option(contains(ip_expand::Column::IdcDevice, &self.idc_device))
            .add_option(contains(ip_expand::Column::IdcDevPort, &self.idc_dev_port))
    }

    pub fn select(&self) -> Select<ip_expand::Entity> {
        ip_expand::Entity::find()
            .filter(self.condition())
            .order_by_desc(ip_expand::Column::IpaddrId)
            .order_by_asc(ip_expand::Column::Id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct VendorFilter {
    /// Matches the short or the full name.
    pub name: Option<String>,
}

impl VendorFilter {
    pub fn condition(&self) -> Condition {
        Condition::all().add_option(text(&self.name).map(|name| {
            Condition::any()
                .add(vendor::Column::CompName.contains(&name))
                .add(vendor::Column::CompFullname.contains(&name))
        }))
    }

    pub fn select(&self) -> Select<vendor::Entity> {
        vendor::Entity::find()
            .filter(self.condition())
            .order_by_asc(vendor::Column::Id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct IdcFilter {
    pub name: Option<String>,
    pub vendor_id: Option<i32>,
    pub vendor_name: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
}

impl IdcFilter {
    pub fn condition(&self) -> Condition {
        Condition::all()
            .add_option(contains(idc::Column::Name, &self.name))
            .add_option(reference(self.vendor_id).map(|id| idc::Column::VendorId.eq(id)))
            .add_option(contains(idc::Column::VendorName, &self.vendor_name))
            .add_option(equals(idc::Column::Country, &self.country))
            .add_option(equals(idc::Column::City, &self.city))
    }

    pub fn select(&self) -> Select<idc::Entity> {
        idc::Entity::find()
            .filter(self.condition())
            .order_by_asc(idc::Column::Id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct VlanFilter {
    pub vlan_id: Option<String>,
    pub name: Option<String>,
    /// Prefix of the network, `10.1.` matches `10.1.0.0/16`.
    pub network: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
}

impl VlanFilter {
    pub fn condition(&self) -> Condition {
        Condition::all()
            .add_option(equals(vlan::Column::VlanId, &self.vlan_id))
            .add_option(contains(vlan::Column::Name, &self.name))
            .add_option(text(&self.network).map(|n| vlan::Column::Network.starts_with(n).into_condition()))
            .add_option(equals(vlan::Column::Country, &self.country))
            .add_option(equals(vlan::Column::City, &self.city))
    }

    pub fn select(&self) -> Select<vlan::Entity> {
        vlan::Entity::find()
            .filter(self.condition())
            .order_by_asc(vlan::Column::Id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sea_orm::{DbBackend, QueryTrait};

    #[test]
    fn page_window() {
        assert_eq!(Pagination::all().window(), None);
        assert_eq!(Pagination::new(1, 10).window(), Some((0, 10)));
        assert_eq!(Pagination::new(3, 25).window(), Some((50, 25)));
        assert_eq!(Pagination::new(2, 0).window(), Some((1, 1)));
    }

    #[test]
    fn assigned_codes() {
        assert_eq!(Assigned::from_code(1), Some(Assigned::Yes));
        assert_eq!(Assigned::from_code(0), Some(Assigned::No));
        assert_eq!(Assigned::from_code(-1), Some(Assigned::Any));
        assert_eq!(Assigned::from_code(2), None);
    }

    #[test]
    fn default_filter_selects_everything() {
        assert_eq!(
            IpAddrFilter::default().select().build(DbBackend::Sqlite).to_string(),
            ip_addr::Entity::find()
                .order_by_desc(ip_addr::Column::CreatedAt)
                .order_by_desc(ip_addr::Column::Id)
                .build(DbBackend::Sqlite)
                .to_string()
        );
    }

    #[test]
    fn blank_fields_are_ignored() {
        let filter = IpAddrFilter {
            vlan_id: Some("  ".into()),
            ipaddr: Some("10.0.".into()),
            is_assigned: Assigned::No,
            ..Default::default()
        };
        let sql = filter.select().build(DbBackend::Sqlite).to_string();
        assert!(!sql.contains("\"vlan_id\" ="));
        assert!(sql.contains("\"ipaddr\" LIKE '%10.0.%'"));
        assert!(sql.contains("\"is_assigned\" ="));
    }

    #[test]
    fn vendor_name_matches_either_name() {
        let filter = VendorFilter {
            name: Some("acme".into()),
        };
        let sql = filter.select().build(DbBackend::Sqlite).to_string();
        assert!(sql.contains("\"comp_name\" LIKE '%acme%' OR \"ty_vendor\".\"comp_fullname\" LIKE '%acme%'"));
    }

    #[test]
    fn expand_order() {
        let sql = ExpandFilter {
            ipaddr_id: Some(4),
            ..Default::default()
        }
        .select()
        .build(DbBackend::Sqlite)
        .to_string();
        assert!(sql.contains("\"ipaddr_id\" = 4"));
        assert!(sql.ends_with("ORDER BY \"ty_ipaddr_expand\".\"ipaddr_id\" DESC, \"ty_ipaddr_expand\".\"id\" ASC"));
    }
}
